//! Shared helpers for API integration tests: an in-memory app plus request
//! builders.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use coursekit_api::{AppState, config::ApiConfig};
use coursekit_core::accounts::MemoryAccountStore;
use coursekit_core::auth::service::CreateAccount;
use coursekit_core::auth::{AuthConfig, CredentialService, MIN_BCRYPT_COST};
use coursekit_core::models::account::Role;
use tower::ServiceExt;

pub const PASSWORD: &str = "password123";

pub struct TestApp {
    pub router: Router,
    pub auth: CredentialService,
}

pub fn auth_config() -> AuthConfig {
    AuthConfig::new("test-access-secret", "test-refresh-secret")
        .unwrap()
        .with_bcrypt_cost(MIN_BCRYPT_COST)
        .unwrap()
}

pub fn spawn_app() -> TestApp {
    let config = ApiConfig::new(auth_config());
    let auth = CredentialService::new(Arc::new(MemoryAccountStore::new()), &config.auth);
    let router = coursekit_api::router(AppState::new(auth.clone(), config));
    TestApp { router, auth }
}

impl TestApp {
    pub async fn seed(&self, name: &str, email: &str, role: Role) -> String {
        self.auth
            .create_account(CreateAccount {
                name: name.into(),
                email: email.into(),
                password: PASSWORD.into(),
                role,
            })
            .await
            .expect("seed account")
            .id
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("request")
    }

    /// Log in and return (access token, refresh token from Set-Cookie).
    pub async fn login(&self, email: &str) -> (String, String) {
        let resp = self
            .send(json_request(
                "POST",
                "/auth/login",
                serde_json::json!({"email": email, "password": PASSWORD}),
            ))
            .await;
        assert_eq!(resp.status(), StatusCode::OK, "login failed for {email}");
        let refresh = refresh_cookie_value(&resp).expect("refresh cookie");
        let body = body_json(resp).await;
        let access = body["accessToken"].as_str().expect("accessToken").to_string();
        (access, refresh)
    }
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn authed(method: &str, uri: &str, token: &str, body: Option<serde_json::Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"));
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub fn set_cookie_header(resp: &Response<Body>) -> Option<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("refreshToken="))
        .map(str::to_string)
}

pub fn refresh_cookie_value(resp: &Response<Body>) -> Option<String> {
    let header = set_cookie_header(resp)?;
    let pair = header.split(';').next()?;
    pair.strip_prefix("refreshToken=").map(str::to_string)
}

pub async fn body_json(resp: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse JSON")
}
