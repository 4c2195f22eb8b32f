//! End-to-end tests of the local authorization callback server.

use std::collections::HashMap;

use serde_json::{Value, json};
use sortify::{
    Error, Res,
    api::{ACCESS_GRANTED, CallbackState, LOGIN_FAILED, STATE_MISMATCH},
    config::Config,
    server::CallbackServer,
    spotify::auth::TokenExchange,
    types::Credential,
};
use tokio::sync::mpsc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn start_server(
    token_url: &str,
) -> (CallbackServer, mpsc::Receiver<Res<Credential>>) {
    let vars: HashMap<&str, String> = HashMap::from([
        ("SPOTIFY_CLIENT_ID", "client-id".to_string()),
        ("SPOTIFY_CLIENT_SECRET", "client-secret".to_string()),
        ("SPOTIFY_TOKEN_URL", token_url.to_string()),
    ]);
    let config = Config::from_vars(|key| vars.get(key).cloned());

    let (sender, receiver) = mpsc::channel(1);
    let state = CallbackState::new(
        "expected-state".to_string(),
        TokenExchange::from_config(&config),
        sender,
    );
    let server = CallbackServer::start("127.0.0.1:0", state).await.unwrap();
    (server, receiver)
}

async fn get_text(url: String) -> String {
    reqwest::get(url).await.unwrap().text().await.unwrap()
}

#[tokio::test]
async fn test_callback_exchanges_code_and_delivers_token() {
    let token_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "BQC-from-callback",
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&token_server)
        .await;

    let (server, mut receiver) = start_server(&format!("{}/api/token", token_server.uri())).await;
    let addr = server.local_addr();

    let body = get_text(format!(
        "http://{}/callback?code=auth-code&state=expected-state",
        addr
    ))
    .await;
    assert!(body.contains(ACCESS_GRANTED));

    let credential = receiver.recv().await.unwrap().unwrap();
    assert_eq!(credential, Credential::new("BQC-from-callback"));

    server.shutdown().await;
}

#[tokio::test]
async fn test_callback_rejects_foreign_state() {
    let token_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&token_server)
        .await;

    let (server, mut receiver) = start_server(&format!("{}/api/token", token_server.uri())).await;

    let body = get_text(format!(
        "http://{}/callback?code=auth-code&state=someone-else",
        server.local_addr()
    ))
    .await;
    assert!(body.contains(STATE_MISMATCH));
    assert!(receiver.try_recv().is_err());

    server.shutdown().await;
}

#[tokio::test]
async fn test_callback_forwards_refused_consent() {
    let (server, mut receiver) = start_server("http://127.0.0.1:1/api/token").await;

    let body = get_text(format!(
        "http://{}/callback?error=access_denied&state=expected-state",
        server.local_addr()
    ))
    .await;
    assert!(body.contains(LOGIN_FAILED));

    match receiver.recv().await.unwrap() {
        Err(Error::Authorization(msg)) => assert!(msg.contains("access_denied")),
        other => panic!("expected authorization error, got {:?}", other),
    }

    server.shutdown().await;
}

#[tokio::test]
async fn test_callback_forwards_invalid_client() {
    let token_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_client"
        })))
        .mount(&token_server)
        .await;

    let (server, mut receiver) = start_server(&format!("{}/api/token", token_server.uri())).await;

    let body = get_text(format!(
        "http://{}/callback?code=auth-code&state=expected-state",
        server.local_addr()
    ))
    .await;
    assert!(body.contains(LOGIN_FAILED));
    assert!(receiver.recv().await.unwrap().unwrap_err().is_config());

    server.shutdown().await;
}

#[tokio::test]
async fn test_health_reports_authorization_progress() {
    let token_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "BQC-from-callback",
            "token_type": "Bearer"
        })))
        .mount(&token_server)
        .await;

    let (server, mut receiver) = start_server(&format!("{}/api/token", token_server.uri())).await;
    let health_url = format!("http://{}/health", server.local_addr());

    let body: Value = reqwest::get(&health_url).await.unwrap().json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["authorization"], "waiting");

    get_text(format!(
        "http://{}/callback?code=auth-code&state=expected-state",
        server.local_addr()
    ))
    .await;
    assert!(receiver.recv().await.unwrap().is_ok());

    let body: Value = reqwest::get(&health_url).await.unwrap().json().await.unwrap();
    assert_eq!(body["authorization"], "received");

    server.shutdown().await;
}

#[tokio::test]
async fn test_invalid_server_address_is_a_config_error() {
    let (sender, _receiver) = mpsc::channel(1);
    let config = Config::from_vars(|_| None);
    let state = CallbackState::new("s".to_string(), TokenExchange::from_config(&config), sender);

    match CallbackServer::start("not-an-address", state).await {
        Err(e) => assert!(e.is_config()),
        Ok(_) => panic!("expected config error"),
    }
}
