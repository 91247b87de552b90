use std::time::Duration;

use cko_common::Secret;
use log::*;

pub const DEFAULT_DISCORD_API_URL: &str = "https://discord.com/api/v10";
pub const DEFAULT_DISCORD_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct DiscordConfig {
    /// Base URL of the REST API, without a trailing slash
    pub api_url: String,
    /// Bot token, needed for direct messages
    pub bot_token: Option<Secret<String>>,
    /// The full webhook URL (it embeds the webhook token), needed for admin notifications
    pub webhook_url: Option<Secret<String>>,
    /// Upper bound on the time any single request may take
    pub timeout: Duration,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_DISCORD_API_URL.to_string(),
            bot_token: None,
            webhook_url: None,
            timeout: DEFAULT_DISCORD_TIMEOUT,
        }
    }
}

impl DiscordConfig {
    pub fn new_from_env_or_default() -> Self {
        let api_url = std::env::var("CKO_DISCORD_API_URL")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_DISCORD_API_URL.to_string());
        let bot_token = non_empty_var("CKO_DISCORD_BOT_TOKEN").map(Secret::new);
        if bot_token.is_none() {
            warn!("📣️ CKO_DISCORD_BOT_TOKEN is not set. Buyers will not receive direct messages.");
        }
        let webhook_url = non_empty_var("CKO_DISCORD_WEBHOOK_URL").map(Secret::new);
        if webhook_url.is_none() {
            warn!("📣️ CKO_DISCORD_WEBHOOK_URL is not set. Sale notifications will not be sent to the admin channel.");
        }
        let timeout = std::env::var("CKO_DISCORD_TIMEOUT")
            .ok()
            .and_then(|s| {
                s.parse::<u64>()
                    .map_err(|e| warn!("📣️ Invalid value for CKO_DISCORD_TIMEOUT ({s}). {e}. Using the default."))
                    .ok()
            })
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_DISCORD_TIMEOUT);
        Self { api_url, bot_token, webhook_url, timeout }
    }

    pub fn with_bot_token<S: Into<String>>(mut self, token: S) -> Self {
        self.bot_token = Some(Secret::new(token.into()));
        self
    }

    pub fn with_webhook_url<S: Into<String>>(mut self, url: S) -> Self {
        self.webhook_url = Some(Secret::new(url.into()));
        self
    }

    pub fn with_api_url<S: Into<String>>(mut self, url: S) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.trim().is_empty())
}
