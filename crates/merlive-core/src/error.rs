//! Error types for the projection layer
//!
//! Every shape violation in an API payload surfaces here instead of
//! panicking at the point of access:
//! - Envelope failures (non-zero `EC`, missing `DT`)
//! - Graph shape violations (duplicate ids, dangling edges)
//! - Count coercion failures in statistics

/// Errors raised while projecting a raw payload into a typed model
#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    /// The envelope carried no usable data
    #[error("no data (EC={code}): {message}")]
    NoData {
        /// Error code reported by the server
        code: i64,
        /// Error message reported by the server
        message: String,
    },

    /// Graph payload violated the node/edge contract
    #[error("malformed graph: {0}")]
    MalformedGraph(#[from] MalformedGraphError),

    /// Statistics payload had the wrong shape
    #[error("malformed stats: {0}")]
    MalformedStats(String),

    /// A count field could not be coerced to a non-negative integer
    #[error("invalid count: {0}")]
    InvalidCount(#[from] InvalidCountError),
}

impl ProjectionError {
    /// Create a `NoData` error
    pub fn no_data(code: i64, message: impl Into<String>) -> Self {
        Self::NoData {
            code,
            message: message.into(),
        }
    }

    /// Check whether the server itself reported the failure
    #[inline]
    #[must_use]
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData { .. })
    }
}

/// Graph contract violations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedGraphError {
    /// Two nodes share an id
    #[error("duplicate node id: {0}")]
    DuplicateNode(String),

    /// An edge points at an id with no node
    #[error("edge {source_id} -> {target_id} references unknown node {missing}")]
    DanglingEdge {
        /// Edge source id
        source_id: String,
        /// Edge target id
        target_id: String,
        /// The id that was not found
        missing: String,
    },

    /// The payload did not decode into nodes and edges
    #[error("unexpected shape: {0}")]
    Shape(String),
}

/// A count that is not a non-negative integer
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} for '{label}' is not a non-negative integer: {value}")]
pub struct InvalidCountError {
    /// JSON field name, e.g. `permissionCount`
    pub field: &'static str,
    /// Row label the count belongs to
    pub label: String,
    /// Raw JSON text of the offending value
    pub value: String,
}
