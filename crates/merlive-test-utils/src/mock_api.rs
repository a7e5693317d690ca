//! In-process mock of the auth service's Merlive endpoints
//!
//! Binds an ephemeral port on 127.0.0.1 and serves the `/api/v1` routes
//! the client uses. Responses follow the `{EC, EM, DT}` envelope of the
//! real service, including its error messages.

use crate::fixtures::{sample_graph_payload, sample_stats_payload};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use warp::http::StatusCode;
use warp::reply::{Json, WithStatus};
use warp::Filter;

/// One request as the mock saw it
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub path: &'static str,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

/// What the mock serves
#[derive(Debug, Clone)]
pub struct MockState {
    pub email: String,
    pub password: String,
    pub token: String,
    pub graph: Value,
    pub stats: Value,
    pub write_response: Value,
    requests: Vec<RecordedRequest>,
}

impl MockState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_graph(mut self, graph: Value) -> Self {
        self.graph = graph;
        self
    }

    #[must_use]
    pub fn with_stats(mut self, stats: Value) -> Self {
        self.stats = stats;
        self
    }

    #[must_use]
    pub fn with_write_response(mut self, response: Value) -> Self {
        self.write_response = response;
        self
    }
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            email: "admin@merlive.test".to_string(),
            password: "correct-horse".to_string(),
            token: "mock-access-token".to_string(),
            graph: sample_graph_payload(),
            stats: sample_stats_payload(),
            write_response: json!({"EM": "Role assigned to user successfully", "EC": 0, "DT": {}}),
            requests: Vec::new(),
        }
    }
}

type Shared = Arc<Mutex<MockState>>;

/// Running mock server; shuts down on drop
#[derive(Debug)]
pub struct MockApi {
    addr: SocketAddr,
    state: Shared,
    shutdown: Option<oneshot::Sender<()>>,
}

impl MockApi {
    /// Start serving `state` on an ephemeral port
    ///
    /// Must be called inside a tokio runtime.
    pub fn start(state: MockState) -> Self {
        let state: Shared = Arc::new(Mutex::new(state));
        let (tx, rx) = oneshot::channel::<()>();

        let (addr, server) = warp::serve(routes(state.clone())).bind_with_graceful_shutdown(
            ([127, 0, 0, 1], 0),
            async move {
                let _ = rx.await;
            },
        );
        tokio::spawn(server);

        Self {
            addr,
            state,
            shutdown: Some(tx),
        }
    }

    /// API root to put in `ClientConfig::base_url`
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/api/v1", self.addr)
    }

    /// Credentials the mock accepts
    #[must_use]
    pub fn credentials(&self) -> (String, String) {
        let state = self.state.lock();
        (state.email.clone(), state.password.clone())
    }

    /// Token the mock issues and expects
    #[must_use]
    pub fn token(&self) -> String {
        self.state.lock().token.clone()
    }

    /// Requests received so far, in order
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().requests.clone()
    }
}

impl Drop for MockApi {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

fn reply(status: StatusCode, body: &Value) -> WithStatus<Json> {
    warp::reply::with_status(warp::reply::json(body), status)
}

fn routes(
    state: Shared,
) -> impl Filter<Extract = (WithStatus<Json>,), Error = warp::Rejection> + Clone + Send + Sync + 'static {
    let with_state = warp::any().map(move || state.clone());

    let login = warp::path!("api" / "v1" / "login")
        .and(warp::post())
        .and(warp::body::json::<Value>())
        .and(with_state.clone())
        .map(handle_login);

    let data = warp::path!("api" / "v1" / "merlive" / "allocation-data")
        .and(warp::get())
        .and(warp::header::optional::<String>("authorization"))
        .and(with_state.clone())
        .map(|auth: Option<String>, state: Shared| {
            authorized_read(&state, "/merlive/allocation-data", auth, |s| s.graph.clone())
        });

    let stats = warp::path!("api" / "v1" / "merlive" / "allocation-stats")
        .and(warp::get())
        .and(warp::header::optional::<String>("authorization"))
        .and(with_state.clone())
        .map(|auth: Option<String>, state: Shared| {
            authorized_read(&state, "/merlive/allocation-stats", auth, |s| s.stats.clone())
        });

    let assign = warp::path!("api" / "v1" / "merlive" / "assign-role")
        .and(warp::post())
        .and(warp::header::optional::<String>("authorization"))
        .and(warp::body::json::<Value>())
        .and(with_state.clone())
        .map(|auth: Option<String>, body: Value, state: Shared| {
            authorized_write(&state, "/merlive/assign-role", auth, body)
        });

    let update = warp::path!("api" / "v1" / "merlive" / "update-permissions")
        .and(warp::post())
        .and(warp::header::optional::<String>("authorization"))
        .and(warp::body::json::<Value>())
        .and(with_state)
        .map(|auth: Option<String>, body: Value, state: Shared| {
            authorized_write(&state, "/merlive/update-permissions", auth, body)
        });

    login
        .or(data)
        .unify()
        .or(stats)
        .unify()
        .or(assign)
        .unify()
        .or(update)
        .unify()
}

fn handle_login(body: Value, state: Shared) -> WithStatus<Json> {
    let mut state = state.lock();
    state.requests.push(RecordedRequest {
        method: "POST",
        path: "/login",
        authorization: None,
        body: Some(body.clone()),
    });

    let matches = body.get("email").and_then(Value::as_str) == Some(state.email.as_str())
        && body.get("password").and_then(Value::as_str) == Some(state.password.as_str());
    if matches {
        reply(
            StatusCode::OK,
            &json!({
                "EM": "Login successful! Welcome back!",
                "EC": 0,
                "DT": {"access_token": state.token, "email": state.email}
            }),
        )
    } else {
        reply(
            StatusCode::OK,
            &json!({
                "EM": "Your email/phone number or password is incorrect!",
                "EC": 1,
                "DT": ""
            }),
        )
    }
}

fn check_token(state: &MockState, auth: Option<&str>) -> Result<(), WithStatus<Json>> {
    match auth {
        None => Err(reply(
            StatusCode::UNAUTHORIZED,
            &json!({"EM": "No authentication tokens found", "EC": -1, "DT": ""}),
        )),
        Some(header) if header == format!("Bearer {}", state.token) => Ok(()),
        Some(_) => Err(reply(
            StatusCode::UNAUTHORIZED,
            &json!({"EM": "Invalid access token", "EC": -1, "DT": ""}),
        )),
    }
}

fn authorized_read(
    state: &Shared,
    path: &'static str,
    auth: Option<String>,
    payload: impl FnOnce(&MockState) -> Value,
) -> WithStatus<Json> {
    let mut state = state.lock();
    state.requests.push(RecordedRequest {
        method: "GET",
        path,
        authorization: auth.clone(),
        body: None,
    });
    if let Err(denied) = check_token(&state, auth.as_deref()) {
        return denied;
    }
    reply(StatusCode::OK, &payload(&state))
}

fn authorized_write(state: &Shared, path: &'static str, auth: Option<String>, body: Value) -> WithStatus<Json> {
    let mut state = state.lock();
    state.requests.push(RecordedRequest {
        method: "POST",
        path,
        authorization: auth.clone(),
        body: Some(body),
    });
    if let Err(denied) = check_token(&state, auth.as_deref()) {
        return denied;
    }
    reply(StatusCode::OK, &state.write_response)
}
