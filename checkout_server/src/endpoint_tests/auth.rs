use actix_web::{
    http::{header::AUTHORIZATION, StatusCode},
    test::TestRequest,
    web,
    web::ServiceConfig,
};
use checkout_engine::{db_types::UserId, AccountApi};
use chrono::Duration;

use super::{
    helpers::{claims_for, get_request, issue_token, issue_token_with_secret, valid_token},
    mocks::MockCheckoutDb,
};
use crate::{auth::bearer_token, routes::MyOrdersRoute};

fn configure(cfg: &mut ServiceConfig) {
    let mut db = MockCheckoutDb::new();
    db.expect_fetch_orders_for_user().returning(|_| Ok(vec![]));
    cfg.app_data(web::Data::new(AccountApi::new(db))).service(MyOrdersRoute::<MockCheckoutDb>::new());
}

#[actix_web::test]
async fn no_token_is_unauthorized() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request(None, "/my-orders", configure).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.is_empty(), "Auth failure leaked a body: {body}");
}

#[actix_web::test]
async fn valid_token_is_accepted() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(&UserId::random());
    let (status, _) = get_request(Some(&token), "/my-orders", configure).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn tampered_signature_is_forbidden() {
    let _ = env_logger::try_init().ok();
    let mut token = valid_token(&UserId::random());
    let n = token.len();
    let tail = if token.ends_with("AAAAA") { "BBBBB" } else { "AAAAA" };
    token.replace_range(n - 5..n, tail);
    let (status, body) = get_request(Some(&token), "/my-orders", configure).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.is_empty(), "Auth failure leaked a body: {body}");
}

#[actix_web::test]
async fn token_signed_with_another_secret_is_forbidden() {
    let _ = env_logger::try_init().ok();
    let claims = claims_for(&UserId::random(), Duration::days(1));
    let token = issue_token_with_secret(&claims, "some-other-secret-entirely-0123456789");
    let (status, _) = get_request(Some(&token), "/my-orders", configure).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn expired_token_is_forbidden() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(&claims_for(&UserId::random(), Duration::hours(-2)));
    let (status, _) = get_request(Some(&token), "/my-orders", configure).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn garbage_token_is_forbidden() {
    let _ = env_logger::try_init().ok();
    let (status, _) = get_request(Some("not-a-jwt"), "/my-orders", configure).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[test]
fn only_bearer_scheme_is_read() {
    let token = valid_token(&UserId::random());
    let req = TestRequest::get().insert_header((AUTHORIZATION, format!("Basic {token}"))).to_http_request();
    assert!(bearer_token(&req).is_none());
    let req = TestRequest::get().insert_header((AUTHORIZATION, "Bearer ")).to_http_request();
    assert!(bearer_token(&req).is_none());
    let req = TestRequest::get().insert_header((AUTHORIZATION, format!("Bearer {token}"))).to_http_request();
    assert_eq!(bearer_token(&req), Some(token.as_str()));
}
