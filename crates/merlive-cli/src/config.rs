//! Application configuration
//!
//! Resolved once at startup: built-in defaults, then a TOML file, then
//! environment overrides. The result is passed around by reference.
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:8080/api/v1"
//! token = "eyJhbGciOi..."
//!
//! [output]
//! dir = "charts"
//! graph_size = [1200, 1000]
//! layout_iterations = 300
//! ```

use merlive_client::ClientConfig;
use merlive_render::OutputConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Names a config file explicitly
pub const CONFIG_ENV: &str = "MERLIVE_CONFIG";
/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "merlive.toml";
/// Overrides `api.base_url`
pub const BASE_URL_ENV: &str = "MERLIVE_API_BASE_URL";
/// Overrides `api.token`
pub const TOKEN_ENV: &str = "MERLIVE_TOKEN";
/// Overrides `output.dir`
pub const OUTPUT_DIR_ENV: &str = "MERLIVE_OUTPUT_DIR";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File is not valid TOML for [`AppConfig`]
    #[error("invalid config file {path}: {source}")]
    Parse {
        /// File path
        path: PathBuf,
        /// Parser error
        #[source]
        source: toml::de::Error,
    },
}

/// Everything the binary needs to run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// API connection
    pub api: ClientConfig,
    /// Chart output
    pub output: OutputConfig,
}

impl AppConfig {
    /// Load from the process environment and working directory
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load using `env` to look up variables
    pub fn load_with(env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let path = non_blank(env(CONFIG_ENV)).map(PathBuf::from).or_else(|| {
            let local = PathBuf::from(DEFAULT_CONFIG_FILE);
            local.is_file().then_some(local)
        });

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(env);
        Ok(config)
    }

    /// Read and parse a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Apply `MERLIVE_*` overrides; blank values are ignored
    pub fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(url) = non_blank(env(BASE_URL_ENV)) {
            self.api.base_url = url;
        }
        if let Some(token) = non_blank(env(TOKEN_ENV)) {
            self.api.token = Some(token);
        }
        if let Some(dir) = non_blank(env(OUTPUT_DIR_ENV)) {
            self.output.dir = PathBuf::from(dir);
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
