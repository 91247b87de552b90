use actix_web::{
    body::MessageBody,
    http::{header::AUTHORIZATION, StatusCode},
    test,
    test::TestRequest,
    web,
    web::ServiceConfig,
    App,
};
use checkout_engine::db_types::UserId;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use log::debug;

use crate::{
    auth::{JwtClaims, TokenVerifier},
    config::AuthConfig,
    server::json_config,
};

// DO NOT re-use this secret anywhere.
pub const TEST_SECRET: &str = "a-test-only-secret-that-is-long-enough-for-hs256";

pub fn get_auth_config() -> AuthConfig {
    AuthConfig::new(TEST_SECRET)
}

pub fn claims_for(user_id: &UserId, valid_for: Duration) -> JwtClaims {
    JwtClaims {
        id: user_id.clone(),
        email: Some("buyer@example.com".to_string()),
        discord_id: None,
        exp: (Utc::now() + valid_for).timestamp(),
    }
}

pub fn issue_token_with_secret(claims: &JwtClaims, secret: &str) -> String {
    encode(&Header::default(), claims, &EncodingKey::from_secret(secret.as_bytes())).expect("Failed to sign token")
}

pub fn issue_token(claims: &JwtClaims) -> String {
    issue_token_with_secret(claims, TEST_SECRET)
}

pub fn valid_token(user_id: &UserId) -> String {
    issue_token(&claims_for(user_id, Duration::days(1)))
}

pub async fn get_request<F>(token: Option<&str>, path: &str, configure: F) -> (StatusCode, String)
where F: FnOnce(&mut ServiceConfig) {
    let req = with_token(TestRequest::get().uri(path), token);
    send(req, configure).await
}

pub async fn post_request<F>(token: Option<&str>, path: &str, body: &str, configure: F) -> (StatusCode, String)
where F: FnOnce(&mut ServiceConfig) {
    let req = TestRequest::post().uri(path).insert_header(("Content-Type", "application/json")).set_payload(body.to_string());
    let req = with_token(req, token);
    send(req, configure).await
}

fn with_token(req: TestRequest, token: Option<&str>) -> TestRequest {
    match token {
        Some(t) => req.insert_header((AUTHORIZATION, format!("Bearer {t}"))),
        None => req,
    }
}

async fn send<F>(req: TestRequest, configure: F) -> (StatusCode, String)
where F: FnOnce(&mut ServiceConfig) {
    let app = App::new()
        .app_data(web::Data::new(TokenVerifier::new(&get_auth_config())))
        .app_data(json_config())
        .configure(configure);
    let service = test::init_service(app).await;
    debug!("Making request");
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let body = res.into_body().try_into_bytes().map(|b| String::from_utf8_lossy(&b).into_owned()).unwrap_or_default();
    (status, body)
}
