//! A small client for the two Discord features the storefront uses: executing a channel webhook and sending a bot
//! direct message. Nothing here knows about orders; callers build the payloads.
mod api;
mod config;
mod data_objects;
mod error;

pub use api::DiscordApi;
pub use config::{DiscordConfig, DEFAULT_DISCORD_API_URL, DEFAULT_DISCORD_TIMEOUT};
pub use data_objects::{CreateMessage, DmChannel, Embed, EmbedField, EmbedFooter, Message, WebhookMessage};
pub use error::DiscordApiError;
