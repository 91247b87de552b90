use actix_web::{http::StatusCode, web, web::ServiceConfig};
use checkout_engine::{
    db_types::{NewOrder, OrderId, OrderItem, UserId},
    events::EventProducers,
    order_objects::TotalPolicy,
    traits::CheckoutDatabaseError,
    AccountApi,
    OrderFlowApi,
};
use cko_common::Amount;
use serde_json::Value;

use super::{
    helpers::{get_request, post_request, valid_token},
    mocks::{buyer, stored, MockCheckoutDb},
};
use crate::{
    data_objects::CreatePaymentResponse,
    routes::{health, CreatePaymentRoute, MyOrdersRoute, OrderStatusRoute},
};

const PRO_PLAN: &str = r#"{"items":[{"name":"Pro Plan","quantity":1,"price":49.9}],"total":49.9}"#;

fn configure_orders(db: MockCheckoutDb, policy: TotalPolicy) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let api = OrderFlowApi::new(db, EventProducers::default()).with_total_policy(policy);
        cfg.app_data(web::Data::new(api))
            .service(CreatePaymentRoute::<MockCheckoutDb>::new())
            .service(OrderStatusRoute::<MockCheckoutDb>::new());
    }
}

fn configure_accounts(db: MockCheckoutDb) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(AccountApi::new(db))).service(MyOrdersRoute::<MockCheckoutDb>::new());
    }
}

fn known_buyer_db(user_id: &UserId) -> MockCheckoutDb {
    let mut db = MockCheckoutDb::new();
    let user = buyer(user_id);
    db.expect_fetch_user_by_id().returning(move |_| Ok(Some(user.clone())));
    db
}

fn amount(v: f64) -> Amount {
    Amount::try_from(v).unwrap()
}

fn error_message(body: &str) -> String {
    let json: Value = serde_json::from_str(body).expect("Error body was not JSON");
    json["error"].as_str().expect("No error field").to_string()
}

#[actix_web::test]
async fn health_check() {
    let (status, body) = get_request(None, "/health", |cfg| {
        cfg.service(health);
    })
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "👍️\n");
}

#[actix_web::test]
async fn create_payment() {
    let _ = env_logger::try_init().ok();
    let user_id = UserId::random();
    let mut db = known_buyer_db(&user_id);
    let owner = user_id.clone();
    db.expect_insert_order()
        .withf(move |o: &NewOrder| o.user_id == owner && o.status.is_terminal() && o.total == amount(49.9))
        .times(1)
        .returning(|o| Ok(stored(o)));
    let token = valid_token(&user_id);
    let (status, body) =
        post_request(Some(&token), "/create-payment", PRO_PLAN, configure_orders(db, TotalPolicy::Trusted)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let response: CreatePaymentResponse = serde_json::from_str(&body).unwrap();
    assert!(!response.order_id.as_str().is_empty());
    assert!(response.message.contains("approved"));
}

#[actix_web::test]
async fn create_payment_records_the_submitted_total() {
    let _ = env_logger::try_init().ok();
    let user_id = UserId::random();
    let mut db = known_buyer_db(&user_id);
    db.expect_insert_order().withf(|o: &NewOrder| o.total == amount(1.0)).times(1).returning(|o| Ok(stored(o)));
    let token = valid_token(&user_id);
    let body = r#"{"items":[{"name":"Pro Plan","quantity":1,"price":49.9}],"total":1.0}"#;
    let (status, _) = post_request(Some(&token), "/create-payment", body, configure_orders(db, TotalPolicy::Trusted)).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn create_payment_strict_totals() {
    let _ = env_logger::try_init().ok();
    let user_id = UserId::random();
    let mut db = known_buyer_db(&user_id);
    db.expect_insert_order().never();
    let token = valid_token(&user_id);
    let body = r#"{"items":[{"name":"Pro Plan","quantity":2,"price":49.9}],"total":49.9}"#;
    let (status, body) =
        post_request(Some(&token), "/create-payment", body, configure_orders(db, TotalPolicy::Recompute)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&body).contains("does not match"));
}

#[actix_web::test]
async fn create_payment_without_token() {
    let _ = env_logger::try_init().ok();
    let mut db = MockCheckoutDb::new();
    db.expect_insert_order().never();
    let (status, body) = post_request(None, "/create-payment", PRO_PLAN, configure_orders(db, TotalPolicy::Trusted)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.is_empty());
}

#[actix_web::test]
async fn create_payment_for_unknown_user() {
    let _ = env_logger::try_init().ok();
    let mut db = MockCheckoutDb::new();
    db.expect_fetch_user_by_id().returning(|_| Ok(None));
    db.expect_insert_order().never();
    let token = valid_token(&UserId::random());
    let (status, body) =
        post_request(Some(&token), "/create-payment", PRO_PLAN, configure_orders(db, TotalPolicy::Trusted)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.is_empty());
}

#[actix_web::test]
async fn create_payment_malformed_bodies() {
    let _ = env_logger::try_init().ok();
    let user_id = UserId::random();
    let token = valid_token(&user_id);
    let bodies = [
        r#"{"items": "Pro Plan", "total": 49.9}"#,
        r#"{"items":[{"name":"Pro Plan","quantity":1,"price":-49.9}],"total":49.9}"#,
        r#"{"items":[{"name":"Pro Plan","quantity":1,"price":49.9}]}"#,
        r#"{"items":[],"total":0}"#,
        r#"{"items":[{"name":"Pro Plan","quantity":0,"price":49.9}],"total":0}"#,
        "not json",
    ];
    for body in bodies {
        let mut db = known_buyer_db(&user_id);
        db.expect_insert_order().never();
        let (status, response) =
            post_request(Some(&token), "/create-payment", body, configure_orders(db, TotalPolicy::Trusted)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "Body {body} was accepted");
        assert!(!error_message(&response).is_empty());
    }
}

#[actix_web::test]
async fn create_payment_storage_failure_is_not_leaked() {
    let _ = env_logger::try_init().ok();
    let user_id = UserId::random();
    let mut db = known_buyer_db(&user_id);
    db.expect_insert_order()
        .returning(|_| Err(CheckoutDatabaseError::DatabaseError("/srv/checkout/data.db is locked".into())));
    let token = valid_token(&user_id);
    let (status, body) =
        post_request(Some(&token), "/create-payment", PRO_PLAN, configure_orders(db, TotalPolicy::Trusted)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body.contains("/srv/checkout"));
}

#[actix_web::test]
async fn order_status_of_paid_order() {
    let _ = env_logger::try_init().ok();
    let order = stored(
        NewOrder::new(UserId::random(), vec![OrderItem::new("Pro Plan", 1, amount(49.9))], amount(49.9)).approved(),
    );
    let path = format!("/order-status/{}", order.id);
    let mut db = MockCheckoutDb::new();
    let id = order.id.clone();
    db.expect_fetch_order_by_id().withf(move |o: &OrderId| *o == id).returning(move |_| Ok(Some(order.clone())));
    let (status, body) = get_request(None, &path, configure_orders(db, TotalPolicy::Trusted)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"status":"paid"}"#);
}

#[actix_web::test]
async fn order_status_of_unknown_order() {
    let _ = env_logger::try_init().ok();
    let mut db = MockCheckoutDb::new();
    db.expect_fetch_order_by_id().returning(|_| Ok(None));
    let (status, body) = get_request(None, "/order-status/doesnotexist", configure_orders(db, TotalPolicy::Trusted)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_message(&body), "Order doesnotexist not found.");
}

#[actix_web::test]
async fn fetch_my_orders() {
    let _ = env_logger::try_init().ok();
    let user_id = UserId::random();
    let older = stored(NewOrder::new(user_id.clone(), vec![OrderItem::new("Basic", 1, amount(9.9))], amount(9.9)));
    let newer =
        stored(NewOrder::new(user_id.clone(), vec![OrderItem::new("Pro Plan", 1, amount(49.9))], amount(49.9)).approved());
    let orders = vec![newer.clone(), older.clone()];
    let mut db = MockCheckoutDb::new();
    let owner = user_id.clone();
    db.expect_fetch_orders_for_user()
        .withf(move |u: &UserId| *u == owner)
        .times(1)
        .returning(move |_| Ok(orders.clone()));
    let token = valid_token(&user_id);
    let (status, body) = get_request(Some(&token), "/my-orders", configure_accounts(db)).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    let list = json.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["id"], newer.id.as_str());
    assert_eq!(list[0]["status"], "paid");
    assert_eq!(list[0]["items"][0]["name"], "Pro Plan");
    assert_eq!(list[1]["status"], "pending");
}

#[actix_web::test]
async fn fetch_my_orders_when_there_are_none() {
    let _ = env_logger::try_init().ok();
    let mut db = MockCheckoutDb::new();
    db.expect_fetch_orders_for_user().returning(|_| Ok(vec![]));
    let token = valid_token(&UserId::random());
    let (status, body) = get_request(Some(&token), "/my-orders", configure_accounts(db)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
}
