use std::time::Duration;

use actix_web::{dev::Server, error::JsonPayloadError, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use checkout_engine::{events::EventProducers, AccountApi, OrderFlowApi, SqliteDatabase};
use futures::future::join_all;
use log::*;

use crate::{
    auth::TokenVerifier,
    config::ServerConfig,
    errors::ServerError,
    integrations::discord::{create_dispatcher, create_notification_event_handlers},
    routes::{health, CreatePaymentRoute, MyOrdersRoute, OrderStatusRoute},
};

const DB_MAX_CONNECTIONS: u32 = 25;
/// How long to wait for in-flight notifications once the server has stopped
const NOTIFICATION_DRAIN_TIMEOUT: Duration = Duration::from_secs(15);

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_or_create(&config.database_url, DB_MAX_CONNECTIONS)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.migrate().await.map_err(|e| ServerError::InitializeError(format!("Could not migrate the database. {e}")))?;
    let dispatcher = create_dispatcher(db.clone(), &config.store, &config.discord)
        .map_err(|e| ServerError::InitializeError(format!("Could not create the Discord client. {e}")))?;
    let handlers = create_notification_event_handlers(dispatcher);
    let producers = handlers.producers();
    let jobs = handlers.start_handlers();
    let srv = create_server_instance(config, db.clone(), producers)?;
    let result = srv.await.map_err(ServerError::from);
    info!("🚀️ Server has stopped. Waiting for outstanding notifications.");
    if tokio::time::timeout(NOTIFICATION_DRAIN_TIMEOUT, join_all(jobs)).await.is_err() {
        warn!("🚀️ Some notifications were still in flight at shutdown and have been abandoned.");
    }
    db.close().await;
    result
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let policy = config.total_policy();
    let host = config.host.clone();
    let port = config.port;
    let srv = HttpServer::new(move || {
        let orders_api = OrderFlowApi::new(db.clone(), producers.clone()).with_total_policy(policy);
        let accounts_api = AccountApi::new(db.clone());
        let verifier = TokenVerifier::new(&config.auth);
        let api_scope = web::scope("/api")
            .service(CreatePaymentRoute::<SqliteDatabase>::new())
            .service(OrderStatusRoute::<SqliteDatabase>::new())
            .service(MyOrdersRoute::<SqliteDatabase>::new());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("cko::access_log"))
            .app_data(json_config())
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(accounts_api))
            .app_data(web::Data::new(verifier))
            .service(health)
            .service(api_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}

/// Malformed or mistyped JSON bodies are answered with 400 and the parser's message.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req| {
        debug!("💻️ Rejected request body. {err}");
        ServerError::InvalidRequestBody(err.to_string()).into()
    })
}
