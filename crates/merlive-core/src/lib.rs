//! Merlive Core - allocation model and projections
//!
//! Turns the loosely-typed JSON documents returned by the Merlive endpoints
//! into typed, validated models:
//! - **Graph projection**: `{nodes, edges}` → [`AllocationGraph`] with
//!   categorized, styled nodes and edges
//! - **Stats projection**: per-role counts and totals → [`AllocationStats`]
//!   and chart-ready [`Series`]
//!
//! Both projections read the `{EC, EM, DT}` envelope first and report
//! [`ProjectionError::NoData`] when the server did not return data.
//!
//! # Example
//!
//! ```rust
//! use merlive_core::{project_graph, NodeCategory};
//! use serde_json::json;
//!
//! let payload = json!({
//!     "EC": 0,
//!     "DT": {"nodes": [{"id": "u1", "label": "Alice", "type": "user"}], "edges": []}
//! });
//! let graph = project_graph(&payload).unwrap();
//! assert_eq!(graph.node_count(), 1);
//! assert_eq!(graph.node("u1").unwrap().category, NodeCategory::User);
//! ```

#![warn(missing_docs)]

pub mod envelope;
pub mod error;
pub mod graph;
pub mod stats;
pub mod style;

// Re-exports
pub use envelope::{open_envelope, Envelope};
pub use error::{InvalidCountError, MalformedGraphError, ProjectionError};
pub use graph::{project_graph, AllocationGraph, Edge, EdgeCategory, GraphBuilder, Node, NodeCategory};
pub use stats::{
    coerce_count, project_stats, AllocationStats, RolePermissionCount, RoleUserCount, Series,
    SummaryTotals, NO_ROLE_LABEL,
};
pub use style::{Color, EdgeStyle, NodeStyle};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with projections
    pub use crate::{
        project_graph, project_stats, AllocationGraph, AllocationStats, EdgeCategory,
        NodeCategory, ProjectionError, Series,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
