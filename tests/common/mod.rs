//! Test utilities: app builders, token issuance, request builders.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use form_guard::config::Config;
use form_guard::{AppState, create_app};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Tokens obtained from `GET /antiforgery/token`.
pub struct IssuedTokens {
    /// `name=value` pair ready for a `Cookie` header.
    pub cookie: String,
    pub request_token: String,
}

/// Build a test app with the default test configuration.
pub fn build_test_app() -> (axum::Router, Arc<AppState>) {
    build_test_app_with_config(Config::test_default())
}

/// Build a test app with a custom Config.
pub fn build_test_app_with_config(config: Config) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(config));
    let app = create_app(state.clone());
    (app, state)
}

/// Read response body as JSON.
pub async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Read response body as text.
pub async fn body_text(response: axum::response::Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

/// Call the issuance endpoint and collect the cookie and request token.
pub async fn issue_tokens(app: &axum::Router) -> IssuedTokens {
    let req = Request::builder()
        .uri("/antiforgery/token")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(';').next())
        .map(String::from)
        .expect("token endpoint should set a cookie");

    let body = body_json(response).await;
    IssuedTokens {
        cookie,
        request_token: body["requestToken"].as_str().unwrap().to_string(),
    }
}

/// JSON POST carrying the anti-forgery cookie + header and the AJAX marker.
pub fn ajax_json_post(uri: &str, tokens: &IssuedTokens, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .header("X-Requested-With", "XMLHttpRequest")
        .header("Cookie", &tokens.cookie)
        .header("RequestVerificationToken", &tokens.request_token)
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

/// Url-encoded POST with the cookie; the request token must be in `body`.
pub fn form_post(uri: &str, cookie: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .header("Cookie", cookie)
        .body(Body::from(body.to_string()))
        .unwrap()
}
