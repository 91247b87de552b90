use std::time::Duration;

use anyhow::{anyhow, Result};
use checkout_engine::db_types::{Order, OrderId, OrderStatusType};
use checkout_server::data_objects::{CreatePaymentRequest, CreatePaymentResponse, OrderStatusResponse};
use cko_common::Secret;
use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Response,
};
use serde::de::DeserializeOwned;
use url::Url;

use crate::poller::StatusSource;

/// Requests that take longer than this are abandoned.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub struct CheckoutClient {
    client: Client,
    server: Url,
    access_token: Option<Secret<String>>,
}

impl CheckoutClient {
    pub fn new(server: Url, access_token: Option<Secret<String>>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("Accept", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .user_agent("Checkout CLI")
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client. {e}"))?;
        Ok(Self { client, server, access_token })
    }

    pub fn server(&self) -> &Url {
        &self.server
    }

    pub fn url(&self, path: &str) -> Result<Url> {
        self.server.join(path).map_err(|e| anyhow!("Failed to join URL: {e}"))
    }

    /// Where the storefront sends the buyer once the order is paid.
    pub fn success_url(&self, order_id: &OrderId) -> Result<Url> {
        let mut url = self.url("/success.html")?;
        url.query_pairs_mut().append_pair("orderId", order_id.as_str());
        Ok(url)
    }

    fn bearer(&self) -> Result<String> {
        self.access_token
            .as_ref()
            .map(|t| format!("Bearer {}", t.reveal()))
            .ok_or_else(|| anyhow!("An access token is required. Set CKO_ACCESS_TOKEN or pass --token."))
    }

    pub async fn health(&self) -> Result<String> {
        let res = self.client.get(self.url("/health")?).send().await?;
        Ok(res.text().await?)
    }

    pub async fn create_payment(&self, request: &CreatePaymentRequest) -> Result<CreatePaymentResponse> {
        let url = self.url("/api/create-payment")?;
        debug!("Submitting order to {url}");
        let res = self.client.post(url).header("Authorization", self.bearer()?).json(request).send().await?;
        parse_response(res).await
    }

    pub async fn order_status(&self, order_id: &OrderId) -> Result<OrderStatusType> {
        let url = self.url(&format!("/api/order-status/{order_id}"))?;
        let res = self.client.get(url).send().await?;
        let status: OrderStatusResponse = parse_response(res).await?;
        Ok(status.status)
    }

    pub async fn my_orders(&self) -> Result<Vec<Order>> {
        let url = self.url("/api/my-orders")?;
        let res = self.client.get(url).header("Authorization", self.bearer()?).send().await?;
        parse_response(res).await
    }
}

impl StatusSource for CheckoutClient {
    async fn fetch_status(&self, order_id: &OrderId) -> Result<OrderStatusType> {
        self.order_status(order_id).await
    }
}

/// Decodes a successful response, or turns the server's `{"error": ...}` body into an error.
async fn parse_response<T: DeserializeOwned>(res: Response) -> Result<T> {
    let status = res.status();
    if status.is_success() {
        return Ok(res.json::<T>().await?);
    }
    let body = res.text().await.unwrap_or_default();
    let reason = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v["error"].as_str().map(String::from))
        .unwrap_or(body);
    Err(anyhow!("The server responded with {status}. {reason}"))
}
