//! Helpers shared by the crate's unit tests: a throwaway HTTP backend and
//! signed test tokens.

use axum::Router;
use evcharge_core::config::ApiConfig;

use crate::api::ApiClient;
use crate::session::SessionStore;

/// Serve `router` on an ephemeral localhost port and return its base URL.
pub async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{addr}")
}

/// API config with short timeouts pointing at `base_url`.
pub fn api_config(base_url: &str) -> ApiConfig {
    ApiConfig {
        base_url: base_url.to_string(),
        connect_timeout_secs: 2,
        read_timeout_secs: 2,
        write_timeout_secs: 2,
    }
}

pub fn client_for(base_url: &str) -> ApiClient {
    ApiClient::new(&api_config(base_url), SessionStore::in_memory()).unwrap()
}

/// A base URL nobody listens on.
pub async fn dead_backend() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// HS256 token carrying `claims`, signed with a key the client never sees.
pub fn fake_jwt(claims: &serde_json::Value) -> String {
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        claims,
        &jsonwebtoken::EncodingKey::from_secret(b"backend-secret"),
    )
    .unwrap()
}
