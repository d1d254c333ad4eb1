
use async_trait::async_trait;
use httpmock::prelude::*;
use serde_json::json;
use signal_viewer::api::{ApiOperation, Role};
use signal_viewer::config::ViewerConfig;
use signal_viewer::signer::{LegacySigner, QueryParams, RequestSigner, SignerError};
use signal_viewer::viewer::{Credentials, IceTransportPolicy, ViewerBootstrap, ViewerError};
use test_helpers::*;

async fn mock_full_backend(server: &MockServer, role: &str) {
    mock_login(server, 200, json!({"data": {"access_token": TEST_TOKEN}})).await;
    mock_create_session(server, 201, json!({"data": {"id": TEST_SESSION_ID}})).await;
    mock_channel_data(server, role, 200, json!({"data": channel_data_json()})).await;
}

fn credentials() -> Credentials {
    Credentials::new("alice", "secret")
}

#[tokio::test]
async fn test_bootstrap_produces_signed_signaling_config() {
    let server = MockServer::start_async().await;
    mock_full_backend(&server, "VIEWER").await;

    let options = ViewerConfig {
        client_id: Some("viewer-1".to_owned()),
        ..ViewerConfig::default()
    };
    let session = ViewerBootstrap::new(test_client(&server), options)
        .start(&credentials())
        .await
        .unwrap();

    assert_eq!(session.session_id(), TEST_SESSION_ID);
    assert_eq!(session.token.as_str(), TEST_TOKEN);

    let signaling = &session.signaling;
    assert_eq!(signaling.signed_url, expected_signed_url());
    assert_eq!(
        signaling.channel_endpoint,
        "wss://v-1234.kinesisvideo.us-west-2.amazonaws.com"
    );
    assert_eq!(signaling.client_id, "viewer-1");
    assert_eq!(signaling.role, Role::Viewer);
    assert_eq!(signaling.region, "us-west-2");
    assert_eq!(signaling.system_clock_offset, 0);
    assert_eq!(signaling.ice_transport_policy, IceTransportPolicy::All);
    assert!(!signaling.signed_url.contains("X-Amz-Security-Token"));

    assert_eq!(signaling.ice_servers.len(), 1);
    assert_eq!(signaling.ice_servers[0].username.as_deref(), Some("1700000300:djE6YXJu"));
    assert_eq!(signaling.ice_servers[0].credential.as_deref(), Some("turn-password"));
}

#[tokio::test]
async fn test_bootstrap_generates_client_id_when_unset() {
    let server = MockServer::start_async().await;
    mock_full_backend(&server, "VIEWER").await;

    let session = ViewerBootstrap::new(test_client(&server), ViewerConfig::default())
        .start(&credentials())
        .await
        .unwrap();

    let client_id = &session.signaling.client_id;
    assert_eq!(client_id.len(), 13);
    assert!(client_id
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
}

#[tokio::test]
async fn test_bootstrap_master_role_with_forced_turn() {
    let server = MockServer::start_async().await;
    mock_full_backend(&server, "MASTER").await;

    let options = ViewerConfig {
        role: Role::Master,
        force_turn: true,
        ..ViewerConfig::default()
    };
    let bootstrap = ViewerBootstrap::new(test_client(&server), options.clone());
    assert_eq!(bootstrap.options(), &options);
    assert_eq!(bootstrap.client().base_url().as_str(), format!("{}/", server.base_url()));

    let session = bootstrap.start(&credentials()).await.unwrap();

    assert_eq!(session.signaling.role, Role::Master);
    assert_eq!(session.signaling.ice_transport_policy, IceTransportPolicy::Relay);
}

#[tokio::test]
async fn test_bootstrap_stops_at_failed_login() {
    let server = MockServer::start_async().await;
    mock_login(&server, 401, json!({"message": "Invalid credentials"})).await;
    let sessions = mock_create_session(&server, 201, json!({"data": {"id": TEST_SESSION_ID}})).await;

    let err = ViewerBootstrap::new(test_client(&server), ViewerConfig::default())
        .start(&credentials())
        .await
        .unwrap_err();

    match &err {
        ViewerError::Api(api) => assert_eq!(api.operation(), Some(ApiOperation::Login)),
        other => panic!("expected API error, got {other:?}"),
    }
    assert_eq!(err.to_string(), "Authentication failed: Invalid credentials");
    assert_eq!(sessions.hits_async().await, 0);
}

#[tokio::test]
async fn test_bootstrap_without_wss_endpoint() {
    let server = MockServer::start_async().await;
    let mut data = channel_data_json();
    data["endpoints"] = json!([
        {"Protocol": "HTTPS", "ResourceEndpoint": "https://r-1234.kinesisvideo.us-west-2.amazonaws.com"}
    ]);
    mock_login(&server, 200, json!({"data": {"access_token": TEST_TOKEN}})).await;
    mock_create_session(&server, 201, json!({"data": {"id": TEST_SESSION_ID}})).await;
    mock_channel_data(&server, "VIEWER", 200, json!({"data": data})).await;

    let err = ViewerBootstrap::new(test_client(&server), ViewerConfig::default())
        .start(&credentials())
        .await
        .unwrap_err();

    assert!(matches!(err, ViewerError::MissingWssEndpoint));
    assert_eq!(err.to_string(), "WSS endpoint not found in channel data");
}

#[tokio::test]
async fn test_bootstrap_missing_credentials_makes_no_requests() {
    let server = MockServer::start_async().await;
    let login = mock_login(&server, 200, json!({"access_token": TEST_TOKEN})).await;

    let err = ViewerBootstrap::new(test_client(&server), ViewerConfig::default())
        .start(&Credentials::new("", "secret"))
        .await
        .unwrap_err();

    assert!(matches!(err, ViewerError::MissingCredentials));
    assert_eq!(login.hits_async().await, 0);
}

#[tokio::test]
async fn test_bootstrap_with_legacy_signer() {
    let server = MockServer::start_async().await;
    mock_full_backend(&server, "VIEWER").await;

    let session = ViewerBootstrap::with_signer(test_client(&server), LegacySigner, ViewerConfig::default())
        .start(&credentials())
        .await
        .unwrap();

    let url = &session.signaling.signed_url;
    let (endpoint, query) = url.split_once('?').unwrap();
    assert_eq!(endpoint, "wss://v-1234.kinesisvideo.us-west-2.amazonaws.com");
    assert_eq!(query.split('&').count(), 7);
    assert!(query.contains("X-Amz-Signature=0123abcd"));
    assert!(!query.contains("X-Amz-Security-Token"));
}

/// Signer that ignores the parameters entirely.
struct FixedSigner;

#[async_trait]
impl RequestSigner for FixedSigner {
    async fn signed_url(&self, endpoint: &str, _params: &QueryParams) -> Result<String, SignerError> {
        Ok(format!("{endpoint}?fixed=1"))
    }
}

#[tokio::test]
async fn test_bootstrap_accepts_custom_signer() {
    let server = MockServer::start_async().await;
    mock_full_backend(&server, "VIEWER").await;

    let session = ViewerBootstrap::with_signer(test_client(&server), FixedSigner, ViewerConfig::default())
        .start(&credentials())
        .await
        .unwrap();

    assert_eq!(
        session.signaling.signed_url,
        "wss://v-1234.kinesisvideo.us-west-2.amazonaws.com?fixed=1"
    );
}

#[tokio::test]
async fn test_signaling_config_serializes_for_signaling_clients() {
    let server = MockServer::start_async().await;
    mock_full_backend(&server, "VIEWER").await;

    let session = ViewerBootstrap::new(test_client(&server), ViewerConfig::default())
        .start(&credentials())
        .await
        .unwrap();

    let value = serde_json::to_value(&session.signaling).unwrap();
    assert_eq!(value["role"], json!("VIEWER"));
    assert_eq!(value["signed_url"], json!(expected_signed_url()));
    assert!(value["ice_servers"].is_array());
}
