//! Merlive Client - HTTP access to the allocation endpoints
//!
//! Wraps the five Merlive calls used by the visualizer:
//! - `POST /login` → access token
//! - `GET /merlive/allocation-data` → graph payload
//! - `GET /merlive/allocation-stats` → stats payload
//! - `POST /merlive/assign-role`, `POST /merlive/update-permissions`
//!
//! Fetches return the raw JSON document; turning it into a typed model is
//! the job of `merlive-core`.
//!
//! # Example
//!
//! ```rust,ignore
//! use merlive_client::{ApiClient, ClientConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::new(&ClientConfig::new())?;
//! let token = client.login("admin@example.com", "secret").await?;
//!
//! let client = ApiClient::new(&ClientConfig::new().with_token(token))?;
//! let graph = merlive_core::project_graph(&client.fetch_graph().await?)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod error;

// Re-exports
pub use client::{AllocationSource, ApiClient};
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{ApiError, AuthError, ClientError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
