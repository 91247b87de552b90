//! Sale notifications end to end: a real database, the Discord adapters, and a stand-in for the Discord API.
use std::sync::Mutex;

use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use checkout_engine::{
    db_types::{NewOrder, NewUser, OrderItem, User},
    order_objects::CheckoutRequest,
    test_utils::prepare_env::{prepare_test_env, random_db_path},
    OrderFlowApi,
    OrderManagement,
    SqliteDatabase,
    UserManagement,
};
use cko_common::Amount;
use discord_tools::DiscordConfig;
use serde_json::{json, Value};

use crate::{
    config::StoreConfig,
    integrations::discord::{create_dispatcher, create_notification_event_handlers},
};

const BOT_TOKEN: &str = "test-bot-token";

#[derive(Debug, Clone)]
struct RecordedRequest {
    path: String,
    body: Value,
    authorization: Option<String>,
}

#[derive(Default)]
struct FakeDiscord {
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeDiscord {
    fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn fake_discord_endpoint(req: HttpRequest, body: web::Json<Value>, state: web::Data<FakeDiscord>) -> HttpResponse {
    let path = req.path().to_string();
    let authorization = req.headers().get("Authorization").and_then(|v| v.to_str().ok()).map(String::from);
    state.requests.lock().unwrap().push(RecordedRequest { path: path.clone(), body: body.into_inner(), authorization });
    match path.as_str() {
        "/webhook" => HttpResponse::Ok().json(json!({"id": "w-1", "channel_id": "admin"})),
        "/users/@me/channels" => HttpResponse::Ok().json(json!({"id": "dm-1", "type": 1})),
        "/channels/dm-1/messages" => HttpResponse::Ok().json(json!({"id": "m-1", "channel_id": "dm-1"})),
        _ => HttpResponse::InternalServerError().body("unavailable"),
    }
}

/// Starts the stand-in Discord API on a free port and returns its base URL.
fn start_fake_discord(state: web::Data<FakeDiscord>) -> String {
    let server = HttpServer::new(move || {
        App::new().app_data(state.clone()).default_service(web::post().to(fake_discord_endpoint))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("Could not bind fake Discord server");
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{addr}")
}

fn discord_config(base: &str, webhook_path: &str) -> DiscordConfig {
    DiscordConfig::default()
        .with_api_url(base)
        .with_webhook_url(format!("{base}{webhook_path}"))
        .with_bot_token(BOT_TOKEN)
}

fn store() -> StoreConfig {
    StoreConfig { name: "Acme".into(), currency_symbol: "R$".into() }
}

fn pro_plan() -> (Vec<OrderItem>, Amount) {
    let price = Amount::try_from(49.9).unwrap();
    (vec![OrderItem::new("Pro Plan", 1, price)], price)
}

async fn discord_buyer(db: &SqliteDatabase) -> User {
    let user = NewUser::with_discord_id("123456789").with_email("buyer@example.com");
    db.insert_user(user).await.expect("Error creating user")
}

#[actix_web::test]
async fn both_channels_are_notified() {
    let state = web::Data::new(FakeDiscord::default());
    let base = start_fake_discord(state.clone());
    let db = prepare_test_env(&random_db_path()).await;
    let user = discord_buyer(&db).await;
    let (items, total) = pro_plan();
    let order = db.insert_order(NewOrder::new(user.id.clone(), items, total).approved()).await.unwrap();

    let dispatcher = create_dispatcher(db.clone(), &store(), &discord_config(&base, "/webhook")).unwrap();
    let report = dispatcher.dispatch(&order).await;
    assert!(report.admin.is_delivered(), "{report:?}");
    assert!(report.buyer.is_delivered(), "{report:?}");

    let requests = state.requests();
    assert_eq!(requests.len(), 3);
    let embed = &requests[0].body["embeds"][0];
    assert_eq!(requests[0].path, "/webhook");
    assert!(requests[0].authorization.is_none(), "The bot token must not be sent to the webhook");
    assert_eq!(embed["title"], "New sale approved!");
    assert_eq!(embed["color"], 3447003);
    assert_eq!(embed["fields"][0]["value"], "Pro Plan");
    assert_eq!(embed["fields"][1]["value"], "R$ 49.90");
    assert_eq!(embed["fields"][2]["value"], "buyer@example.com");
    assert_eq!(embed["fields"][3]["value"], order.id.as_str());

    assert_eq!(requests[1].path, "/users/@me/channels");
    assert_eq!(requests[1].body["recipient_id"], "123456789");
    assert_eq!(requests[1].authorization.as_deref(), Some("Bot test-bot-token"));
    assert_eq!(requests[2].authorization.as_deref(), Some("Bot test-bot-token"));
    let content = requests[2].body["content"].as_str().unwrap();
    assert!(content.contains("**Pro Plan**"));
    assert!(content.ends_with("Acme!"));
}

#[actix_web::test]
async fn failed_webhook_does_not_stop_the_direct_message() {
    let state = web::Data::new(FakeDiscord::default());
    let base = start_fake_discord(state.clone());
    let db = prepare_test_env(&random_db_path()).await;
    let user = discord_buyer(&db).await;
    let (items, total) = pro_plan();
    let order = db.insert_order(NewOrder::new(user.id.clone(), items, total).approved()).await.unwrap();

    let dispatcher = create_dispatcher(db.clone(), &store(), &discord_config(&base, "/broken-webhook")).unwrap();
    let report = dispatcher.dispatch(&order).await;
    assert!(report.admin.is_failed(), "{report:?}");
    assert!(report.buyer.is_delivered(), "{report:?}");
    assert_eq!(state.requests().len(), 3);
}

#[actix_web::test]
async fn new_orders_are_announced_in_the_background() {
    let state = web::Data::new(FakeDiscord::default());
    let base = start_fake_discord(state.clone());
    let db = prepare_test_env(&random_db_path()).await;
    let user = discord_buyer(&db).await;

    let dispatcher = create_dispatcher(db.clone(), &store(), &discord_config(&base, "/webhook")).unwrap();
    let handlers = create_notification_event_handlers(dispatcher);
    let api = OrderFlowApi::new(db.clone(), handlers.producers());
    let jobs = handlers.start_handlers();
    let (items, total) = pro_plan();
    let order = api.create_order(&user.id, CheckoutRequest::new(items, total)).await.unwrap();
    assert!(order.status.is_terminal());
    // Dropping the last producer lets the handler finish its queue and exit
    drop(api);
    for job in jobs {
        job.await.unwrap();
    }
    let requests = state.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[0].body["embeds"][0]["fields"][3]["value"], order.id.as_str());
}

#[actix_web::test]
async fn unconfigured_channels_are_skipped() {
    let db = prepare_test_env(&random_db_path()).await;
    let user = db.insert_user(NewUser::with_password("buyer@example.com", "$argon2id$dummy")).await.unwrap();
    let (items, total) = pro_plan();
    let order = db.insert_order(NewOrder::new(user.id.clone(), items, total).approved()).await.unwrap();
    let dispatcher = create_dispatcher(db.clone(), &store(), &DiscordConfig::default()).unwrap();
    let report = dispatcher.dispatch(&order).await;
    assert!(report.admin.is_skipped());
    assert!(report.buyer.is_skipped());
}
