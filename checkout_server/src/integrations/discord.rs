//! Sends sale notifications through Discord.
//!
//! [`DiscordSaleNotifier`] posts an embed to the admin webhook, and [`DiscordDirectMessenger`] sends the buyer a bot
//! direct message. [`create_notification_event_handlers`] puts both behind the engine's order-created hook.
use checkout_engine::{
    events::{EventHandlers, EventHooks},
    AdminNotifier,
    DirectMessenger,
    NotificationDispatcher,
    NotificationError,
    SaleNotice,
    SqliteDatabase,
};
use cko_common::format_amount;
use discord_tools::{DiscordApi, DiscordApiError, DiscordConfig, Embed, WebhookMessage};
use log::*;

use crate::config::StoreConfig;

pub const NOTIFICATION_EVENT_BUFFER_SIZE: usize = 25;
pub const SALE_EMBED_COLOR: u32 = 3447003;
pub const SALE_EMBED_TITLE: &str = "New sale approved!";

pub type DiscordDispatcher = NotificationDispatcher<SqliteDatabase, DiscordSaleNotifier, DiscordDirectMessenger>;

pub fn notification_error(e: DiscordApiError) -> NotificationError {
    match e {
        DiscordApiError::QueryError { status: 404, message } => NotificationError::RecipientNotFound(message),
        DiscordApiError::QueryError { .. } | DiscordApiError::JsonError(_) => NotificationError::Rejected(e.to_string()),
        _ => NotificationError::Unreachable(e.to_string()),
    }
}

/// Renders a sale notice as a Discord embed.
pub fn sale_embed(notice: &SaleNotice, store: &StoreConfig) -> WebhookMessage {
    let embed = Embed::new(SALE_EMBED_TITLE, SALE_EMBED_COLOR)
        .field("Product", notice.item_name.as_str(), true)
        .field("Amount", format_amount(notice.total, &store.currency_symbol), true)
        .field("Customer email", notice.customer_email.as_str(), true)
        .field("Order ID", notice.order_id.to_string(), false)
        .footer(store.name.as_str())
        .timestamp(notice.timestamp);
    WebhookMessage::with_embed(embed)
}

#[derive(Clone)]
pub struct DiscordSaleNotifier {
    api: DiscordApi,
    store: StoreConfig,
}

impl DiscordSaleNotifier {
    pub fn new(api: DiscordApi, store: StoreConfig) -> Self {
        Self { api, store }
    }
}

impl AdminNotifier for DiscordSaleNotifier {
    async fn notify_sale(&self, notice: &SaleNotice) -> Result<(), NotificationError> {
        let message = sale_embed(notice, &self.store);
        self.api.execute_webhook(&message).await.map_err(notification_error)?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct DiscordDirectMessenger {
    api: DiscordApi,
}

impl DiscordDirectMessenger {
    pub fn new(api: DiscordApi) -> Self {
        Self { api }
    }
}

impl DirectMessenger for DiscordDirectMessenger {
    async fn send_direct_message(&self, external_id: &str, text: &str) -> Result<(), NotificationError> {
        self.api.send_direct_message(external_id, text).await.map_err(notification_error)?;
        Ok(())
    }
}

/// Builds the dispatcher from configuration. Channels without credentials are left out, and their notifications are
/// reported as skipped.
pub fn create_dispatcher(
    db: SqliteDatabase,
    store: &StoreConfig,
    config: &DiscordConfig,
) -> Result<DiscordDispatcher, DiscordApiError> {
    let api = DiscordApi::new(config.clone())?;
    let admin = api.can_execute_webhook().then(|| DiscordSaleNotifier::new(api.clone(), store.clone()));
    let buyer = api.can_send_direct_messages().then(|| DiscordDirectMessenger::new(api.clone()));
    info!(
        "📣️ Sale notifications: admin webhook {}, buyer direct messages {}",
        if admin.is_some() { "enabled" } else { "disabled" },
        if buyer.is_some() { "enabled" } else { "disabled" }
    );
    Ok(NotificationDispatcher::new(db, admin, buyer, store.name.as_str()))
}

/// Assigns the notification dispatcher to the order-created hook.
///
/// Each new order is dispatched on its own task, so checkout never waits for Discord.
pub fn create_notification_event_handlers(dispatcher: DiscordDispatcher) -> EventHandlers {
    let mut hooks = EventHooks::default();
    hooks.on_order_created(move |ev| {
        let dispatcher = dispatcher.clone();
        Box::pin(async move {
            let report = dispatcher.dispatch(&ev.order).await;
            trace!("📣️ Dispatch report for order [{}]: {report:?}", ev.order.id);
        })
    });
    EventHandlers::new(NOTIFICATION_EVENT_BUFFER_SIZE, hooks)
}
