//! Merlive API client
//!
//! Thin async wrapper over `reqwest`. Every call is a single request with
//! no retry; the caller awaits each one before issuing the next.

use crate::config::ClientConfig;
use crate::error::{ApiError, AuthError, ClientError};
use async_trait::async_trait;
use merlive_core::Envelope;
use serde::Serialize;
use serde_json::Value;

const LOGIN_PATH: &str = "login";
const ALLOCATION_DATA_PATH: &str = "merlive/allocation-data";
const ALLOCATION_STATS_PATH: &str = "merlive/allocation-stats";
const ASSIGN_ROLE_PATH: &str = "merlive/assign-role";
const UPDATE_PERMISSIONS_PATH: &str = "merlive/update-permissions";

/// Source of raw allocation payloads
///
/// Implemented by [`ApiClient`]; tests substitute canned payloads.
#[async_trait]
pub trait AllocationSource: Send + Sync {
    /// Raw allocation-data response
    async fn fetch_graph(&self) -> Result<Value, ClientError>;

    /// Raw allocation-stats response
    async fn fetch_stats(&self) -> Result<Value, ClientError>;
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssignRoleRequest {
    user_id: u64,
    role_id: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdatePermissionsRequest<'a> {
    role_id: u64,
    permission_ids: &'a [u64],
}

/// HTTP client bound to one API root and token
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client from configuration
    ///
    /// Fails if the base URL does not parse.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        reqwest::Url::parse(&config.base_url).map_err(|e| ApiError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("merlive/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Transport)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token().map(str::to_string),
        })
    }

    /// Configured API root, without trailing slash
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `true` when a bearer token is configured
    #[inline]
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn require_token(&self) -> Result<&str, AuthError> {
        self.token.as_deref().ok_or(AuthError::MissingToken)
    }

    /// Exchange credentials for an access token
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ClientError> {
        let url = self.endpoint(LOGIN_PATH);
        tracing::debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .json(&LoginRequest { email, password })
            .send()
            .await
            .map_err(ApiError::Transport)?;
        let payload = decode(response).await?;

        let envelope = Envelope::read(&payload);
        if !envelope.is_ok() {
            return Err(AuthError::Rejected {
                message: envelope.message_or_default().to_string(),
            }
            .into());
        }

        envelope
            .data
            .and_then(|dt| dt.get("access_token"))
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .ok_or_else(|| AuthError::NoAccessToken.into())
    }

    /// `GET merlive/allocation-data`
    pub async fn fetch_graph(&self) -> Result<Value, ClientError> {
        self.get_json(ALLOCATION_DATA_PATH).await
    }

    /// `GET merlive/allocation-stats`
    pub async fn fetch_stats(&self) -> Result<Value, ClientError> {
        self.get_json(ALLOCATION_STATS_PATH).await
    }

    /// Assign a role to a user
    ///
    /// Returns the response's `DT`.
    pub async fn assign_role(&self, user_id: u64, role_id: u64) -> Result<Value, ClientError> {
        let payload = self
            .post_json(ASSIGN_ROLE_PATH, &AssignRoleRequest { user_id, role_id })
            .await?;
        accepted_data(&payload)
    }

    /// Replace the permission set of a role
    ///
    /// Returns the response's `DT`.
    pub async fn update_permissions(
        &self,
        role_id: u64,
        permission_ids: &[u64],
    ) -> Result<Value, ClientError> {
        let payload = self
            .post_json(
                UPDATE_PERMISSIONS_PATH,
                &UpdatePermissionsRequest {
                    role_id,
                    permission_ids,
                },
            )
            .await?;
        accepted_data(&payload)
    }

    async fn get_json(&self, path: &str) -> Result<Value, ClientError> {
        let token = self.require_token()?;
        let url = self.endpoint(path);
        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(ApiError::Transport)?;
        Ok(decode(response).await?)
    }

    async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ClientError> {
        let token = self.require_token()?;
        let url = self.endpoint(path);
        tracing::debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(ApiError::Transport)?;
        Ok(decode(response).await?)
    }
}

#[async_trait]
impl AllocationSource for ApiClient {
    async fn fetch_graph(&self) -> Result<Value, ClientError> {
        ApiClient::fetch_graph(self).await
    }

    async fn fetch_stats(&self) -> Result<Value, ClientError> {
        ApiClient::fetch_stats(self).await
    }
}

/// Decode a body as JSON whatever the status; the server reports failures
/// inside the envelope.
async fn decode(response: reqwest::Response) -> Result<Value, ApiError> {
    let status = response.status();
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|source| ApiError::Decode {
        status: status.as_u16(),
        source,
    })
}

fn accepted_data(payload: &Value) -> Result<Value, ClientError> {
    let envelope = Envelope::read(payload);
    if envelope.is_ok() {
        Ok(envelope.data.cloned().unwrap_or(Value::Null))
    } else {
        Err(ApiError::Rejected {
            code: envelope.code.unwrap_or(merlive_core::envelope::MISSING_CODE),
            message: envelope.message_or_default().to_string(),
        }
        .into())
    }
}
