//! Testing utilities for the Merlive workspace
//!
//! Canned payloads shaped like the auth service's responses, and a mock
//! API server that serves them over real HTTP.

#![allow(missing_docs)]

pub mod fixtures;
pub mod mock_api;

pub use fixtures::{
    error_payload, graph_payload, sample_graph, sample_graph_payload, sample_stats,
    sample_stats_payload,
};
pub use mock_api::{MockApi, MockState, RecordedRequest};
