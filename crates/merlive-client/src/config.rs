//! Client configuration
//!
//! Built once at process start and handed to [`ApiClient::new`](crate::ApiClient::new);
//! the client never mutates it.

use serde::{Deserialize, Serialize};

/// Default API root of a locally running auth service
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/v1";

/// Connection settings for the Merlive API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API root, e.g. `http://localhost:8080/api/v1`
    pub base_url: String,
    /// Bearer token for authenticated endpoints
    pub token: Option<String>,
}

impl ClientConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With API root
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// With bearer token
    #[inline]
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Token, treating a blank value as absent
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_token_is_absent() {
        assert_eq!(ClientConfig::new().with_token("  ").token(), None);
        assert_eq!(ClientConfig::new().with_token("abc").token(), Some("abc"));
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: ClientConfig = serde_json::from_str(r#"{"token": "t"}"#).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.token(), Some("t"));
    }
}
