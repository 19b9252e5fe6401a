use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::Value;

use crate::AppState;
use crate::config::{Config, UpstreamCredentials};
use crate::routes;

pub const ACCOUNT_ID: &str = "acct-test";
pub const TOKEN: &str = "test-token";
pub const SITE_KEY: &str = "0x4AAAAAAAtest";
pub const UPSTREAM_PREFIX: &str = "/backend-api";
pub const VERIFY_PATH: &str = "/siteverify";

pub fn test_config(server_url: &str, verify_server_url: &str, ttl_secs: u64) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        credentials: UpstreamCredentials {
            account_id: ACCOUNT_ID.to_string(),
            authorization_token: TOKEN.to_string(),
        },
        upstream_base_url: format!("{server_url}{UPSTREAM_PREFIX}"),
        turnstile_secret_key: "secret".to_string(),
        turnstile_site_key: SITE_KEY.to_string(),
        turnstile_verify_url: format!("{verify_server_url}{VERIFY_PATH}"),
        stats_cache_ttl_secs: ttl_secs,
        static_dir: None,
    }
}

/// Router wired to `upstream_url` for the team API and `verify_url` for Turnstile.
pub fn create_test_app(upstream_url: &str, verify_url: &str, ttl_secs: u64) -> Router {
    let state = AppState::from_config(test_config(upstream_url, verify_url, ttl_secs)).unwrap();
    routes::app(state)
}

/// A URL nothing is listening on.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub async fn response_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn response_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn invite_form(emails: &str, token: Option<&str>) -> Request<Body> {
    let mut fields = vec![("emails", emails)];
    if let Some(token) = token {
        fields.push(("cf-turnstile-response", token));
    }
    let body = serde_urlencoded::to_string(&fields).unwrap();

    Request::builder()
        .method("POST")
        .uri("/send-invites")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header("CF-Connecting-IP", "203.0.113.7")
        .body(Body::from(body))
        .unwrap()
}
