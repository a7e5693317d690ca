//! Client tests against the in-process mock API

use merlive_client::{ApiClient, ApiError, AuthError, ClientConfig, ClientError};
use merlive_test_utils::{error_payload, sample_graph_payload, MockApi, MockState};
use pretty_assertions::assert_eq;
use serde_json::json;

fn client_for(api: &MockApi, token: Option<String>) -> ApiClient {
    let mut config = ClientConfig::new().with_base_url(api.base_url());
    config.token = token;
    ApiClient::new(&config).unwrap()
}

#[tokio::test]
async fn login_with_valid_credentials_returns_token() {
    let api = MockApi::start(MockState::new());
    let (email, password) = api.credentials();

    let token = client_for(&api, None).login(&email, &password).await.unwrap();

    assert!(!token.is_empty());
    assert_eq!(token, api.token());
    let requests = api.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].body,
        Some(json!({"email": email, "password": password}))
    );
}

#[tokio::test]
async fn login_with_bad_credentials_reports_server_message() {
    let api = MockApi::start(MockState::new());

    let err = client_for(&api, None)
        .login("admin@merlive.test", "wrong")
        .await
        .unwrap_err();

    match &err {
        ClientError::Auth(AuthError::Rejected { message }) => {
            assert_eq!(message, "Your email/phone number or password is incorrect!");
        }
        other => panic!("expected rejected login, got {other:?}"),
    }
    assert_eq!(err.reason(), "Your email/phone number or password is incorrect!");
}

#[tokio::test]
async fn fetches_send_bearer_token() {
    let api = MockApi::start(MockState::new());
    let client = client_for(&api, Some(api.token()));

    let graph = client.fetch_graph().await.unwrap();
    let stats = client.fetch_stats().await.unwrap();

    assert_eq!(graph, sample_graph_payload());
    assert_eq!(stats["EC"], 0);

    let requests = api.requests();
    let paths: Vec<_> = requests.iter().map(|r| r.path).collect();
    assert_eq!(paths, vec!["/merlive/allocation-data", "/merlive/allocation-stats"]);
    for request in &requests {
        assert_eq!(request.authorization.as_deref(), Some("Bearer mock-access-token"));
    }
}

#[tokio::test]
async fn wrong_token_still_returns_envelope() {
    let api = MockApi::start(MockState::new());
    let client = client_for(&api, Some("stale".to_string()));

    // The service answers 401 with an envelope; the client hands it on
    let payload = client.fetch_graph().await.unwrap();
    assert_eq!(payload["EC"], -1);
    assert_eq!(payload["EM"], "Invalid access token");
}

#[tokio::test]
async fn error_payload_passes_through_fetch() {
    let api = MockApi::start(MockState::new().with_graph(error_payload(-1, "Error from server")));
    let client = client_for(&api, Some(api.token()));

    let payload = client.fetch_graph().await.unwrap();
    let err = merlive_core::project_graph(&payload).unwrap_err();
    assert!(err.is_no_data());
}

#[tokio::test]
async fn assign_role_posts_camel_case_body() {
    let api = MockApi::start(MockState::new().with_write_response(json!({
        "EM": "Role assigned to user successfully",
        "EC": 0,
        "DT": {"userId": 4, "roleId": 2, "email": "minh@example.com"}
    })));
    let client = client_for(&api, Some(api.token()));

    let dt = client.assign_role(4, 2).await.unwrap();

    assert_eq!(dt["email"], "minh@example.com");
    let request = api.requests().pop().unwrap();
    assert_eq!(request.path, "/merlive/assign-role");
    assert_eq!(request.body, Some(json!({"userId": 4, "roleId": 2})));
}

#[tokio::test]
async fn update_permissions_rejection_is_api_error() {
    let api = MockApi::start(
        MockState::new().with_write_response(error_payload(3, "One or more permissions do not exist")),
    );
    let client = client_for(&api, Some(api.token()));

    let err = client.update_permissions(1, &[1, 2, 99]).await.unwrap_err();

    assert!(matches!(err, ClientError::Api(ApiError::Rejected { code: 3, .. })));
    let request = api.requests().pop().unwrap();
    assert_eq!(request.body, Some(json!({"roleId": 1, "permissionIds": [1, 2, 99]})));
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let config = ClientConfig::new()
        .with_base_url(format!("http://127.0.0.1:{port}/api/v1"))
        .with_token("t");
    let err = ApiClient::new(&config).unwrap().fetch_stats().await.unwrap_err();
    assert!(matches!(err, ClientError::Api(ApiError::Transport(_))));
}
