#![allow(dead_code)] // each test binary uses a subset of these helpers

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Method, Request};
use axum::Router;
use figment::{
    providers::{Format, Yaml},
    Figment,
};
use passage::auth::Gate;
use passage::config::{Config, ConfigV1};
use passage::models::UserRecord;
use passage::routes::create_router;
use passage::state::AppState;
use passage::store::{create_store, Store};
use serde_json::Value;

pub const TEST_CONFIG: &str = r#"
version: "1.0.0"
logging:
  level: "debug"
  format: "json"
gate:
  strategies:
    - name: "Local strategy"
      type: "local"
store:
  type: "memory"
session:
  ttl_seconds: 3600
bind_address: 127.0.0.1:0
"#;

pub fn load_test_config() -> ConfigV1 {
    let config: Config = Figment::new()
        .merge(Yaml::string(TEST_CONFIG))
        .extract()
        .expect("Failed to parse test config YAML");

    match config {
        Config::ConfigV1(cfg) => cfg,
    }
}

pub async fn build_app(config: ConfigV1) -> (Router, Arc<dyn Store>) {
    let config = Arc::new(config);
    let store = create_store(&config.store).await;
    let gate = Arc::new(Gate::new(&config.gate, store.clone()));

    let state = AppState {
        config,
        gate,
        store: store.clone(),
    };

    (create_router(state), store)
}

/// Seeds an account with a low-cost hash so test logins stay fast.
pub async fn seed_user(store: &Arc<dyn Store>, email: &str, name: &str, secret: &str) -> UserRecord {
    let hash = bcrypt::hash(secret, 4).expect("hashing should succeed");
    let user = UserRecord::new(email.to_string(), name.to_string(), hash);
    store.add_user(&user).await.expect("seeding should succeed");
    user
}

fn with_connect_info(mut request: Request<Body>) -> Request<Body> {
    request.extensions_mut().insert(ConnectInfo(SocketAddr::new(
        IpAddr::V4(Ipv4Addr::LOCALHOST),
        0,
    )));
    request
}

pub fn json_request(path: &str, method: Method, body: &Value) -> Request<Body> {
    let request = Request::builder()
        .method(method)
        .uri(path)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("failed to build request");

    with_connect_info(request)
}

pub fn request_with_bearer(path: &str, token: &str, method: Method) -> Request<Body> {
    let request = Request::builder()
        .method(method)
        .uri(path)
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .expect("failed to build request");

    with_connect_info(request)
}

pub fn bare_request(path: &str, method: Method) -> Request<Body> {
    let request = Request::builder()
        .method(method)
        .uri(path)
        .body(Body::empty())
        .expect("failed to build request");

    with_connect_info(request)
}

pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
