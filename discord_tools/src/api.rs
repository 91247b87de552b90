use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client,
    Method,
    RequestBuilder,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::DiscordConfig,
    data_objects::{CreateDmRequest, CreateMessage, DmChannel, Message, WebhookMessage},
    DiscordApiError,
};

#[derive(Clone)]
pub struct DiscordApi {
    config: DiscordConfig,
    client: Arc<Client>,
    /// `Bot <token>`, sent with bot API calls only. Webhook URLs carry their own credential.
    bot_auth: Option<HeaderValue>,
}

impl DiscordApi {
    pub fn new(config: DiscordConfig) -> Result<Self, DiscordApiError> {
        let bot_auth = match &config.bot_token {
            Some(token) => {
                let mut val = HeaderValue::from_str(&format!("Bot {}", token.reveal()))
                    .map_err(|e| DiscordApiError::Initialization(e.to_string()))?;
                val.set_sensitive(true);
                Some(val)
            },
            None => None,
        };
        let mut headers = HeaderMap::with_capacity(1);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| DiscordApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client), bot_auth })
    }

    pub fn config(&self) -> &DiscordConfig {
        &self.config
    }

    pub fn can_send_direct_messages(&self) -> bool {
        self.config.bot_token.is_some()
    }

    pub fn can_execute_webhook(&self) -> bool {
        self.config.webhook_url.is_some()
    }

    fn request<B: Serialize>(
        &self,
        method: Method,
        url: &str,
        params: &[(&str, &str)],
        body: Option<B>,
        authorization: Option<&HeaderValue>,
    ) -> RequestBuilder {
        let mut req = self.client.request(method, url);
        if let Some(auth) = authorization {
            req = req.header(AUTHORIZATION, auth.clone());
        }
        if !params.is_empty() {
            req = req.query(params);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }
        req
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        url: &str,
        params: &[(&str, &str)],
        body: Option<B>,
        authorization: Option<&HeaderValue>,
    ) -> Result<T, DiscordApiError> {
        let req = self.request(method, url, params, body, authorization);
        let response = req.send().await.map_err(|e| DiscordApiError::RestRequestError(e.to_string()))?;
        if response.status().is_success() {
            trace!("📣️ REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| DiscordApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| DiscordApiError::RestResponseError(e.to_string()))?;
            Err(DiscordApiError::QueryError { status, message })
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_url)
    }

    /// Posts a message to the configured webhook. `wait=true` makes Discord return the created message instead of an
    /// empty 204.
    pub async fn execute_webhook(&self, message: &WebhookMessage) -> Result<Message, DiscordApiError> {
        let url = self.config.webhook_url.as_ref().ok_or(DiscordApiError::NotConfigured("The webhook URL"))?;
        trace!("📣️ Executing webhook");
        let result = self.rest_query(Method::POST, url.reveal(), &[("wait", "true")], Some(message), None).await?;
        debug!("📣️ Webhook executed");
        Ok(result)
    }

    /// Opens (or reuses) the private channel between the bot and `recipient_id`.
    pub async fn open_dm_channel(&self, recipient_id: &str) -> Result<DmChannel, DiscordApiError> {
        let auth = self.bot_auth()?;
        let body = CreateDmRequest { recipient_id: recipient_id.to_string() };
        let url = self.url("/users/@me/channels");
        self.rest_query(Method::POST, &url, &[], Some(body), Some(auth)).await
    }

    pub async fn create_message(&self, channel_id: &str, content: &str) -> Result<Message, DiscordApiError> {
        let auth = self.bot_auth()?;
        let body = CreateMessage { content: content.to_string() };
        let url = self.url(&format!("/channels/{channel_id}/messages"));
        self.rest_query(Method::POST, &url, &[], Some(body), Some(auth)).await
    }

    /// Sends `content` to the user privately. This takes two requests: one to open the DM channel and one to post
    /// the message.
    pub async fn send_direct_message(&self, recipient_id: &str, content: &str) -> Result<Message, DiscordApiError> {
        let channel = self.open_dm_channel(recipient_id).await?;
        trace!("📣️ DM channel {} opened for {recipient_id}", channel.id);
        let message = self.create_message(&channel.id, content).await?;
        debug!("📣️ Direct message {} sent to {recipient_id}", message.id);
        Ok(message)
    }

    fn bot_auth(&self) -> Result<&HeaderValue, DiscordApiError> {
        self.bot_auth.as_ref().ok_or(DiscordApiError::NotConfigured("The bot token"))
    }
}
