//! Error types for the API client

/// Any failure talking to the Merlive API
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Credentials or token problem
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// Transport, decoding or server-side rejection
    #[error("api request failed: {0}")]
    Api(#[from] ApiError),
}

impl ClientError {
    /// Message suitable for the operator
    ///
    /// For server rejections this is the envelope's `EM` text.
    #[must_use]
    pub fn reason(&self) -> String {
        match self {
            Self::Auth(AuthError::Rejected { message }) | Self::Api(ApiError::Rejected { message, .. }) => {
                message.clone()
            }
            other => other.to_string(),
        }
    }
}

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The login endpoint answered with a non-zero `EC`
    #[error("login rejected: {message}")]
    Rejected {
        /// `EM` from the response
        message: String,
    },

    /// Login succeeded but `DT.access_token` was absent or empty
    #[error("login response carried no access token")]
    NoAccessToken,

    /// An authenticated call was attempted without a configured token
    #[error("no access token configured; run `merlive login <email> <password>` first")]
    MissingToken,
}

/// Request-level errors
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Configured base URL does not parse
    #[error("invalid base url '{url}': {reason}")]
    InvalidBaseUrl {
        /// The configured value
        url: String,
        /// Parser message
        reason: String,
    },

    /// Connection, TLS or protocol failure
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body was not JSON
    #[error("could not decode response (HTTP {status}): {source}")]
    Decode {
        /// HTTP status of the response
        status: u16,
        /// JSON error
        #[source]
        source: serde_json::Error,
    },

    /// The server answered with a non-zero `EC`
    #[error("server rejected request (EC={code}): {message}")]
    Rejected {
        /// `EC`
        code: i64,
        /// `EM`
        message: String,
    },
}
