use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use cko_common::Amount;
use log::error;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

const ORDER_ID_BYTES: usize = 12;
const USER_ID_BYTES: usize = 12;
const PAYMENT_REFERENCE_BYTES: usize = 8;
const SIMULATED_PAYMENT_PREFIX: &str = "sim_";

/// Hex-encodes `n` bytes drawn from the thread-local CSPRNG.
fn random_hex(n: usize) -> String {
    let mut bytes = vec![0u8; n];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[derive(Debug, Clone, Error)]
#[error("Conversion error: {0}")]
pub struct ConversionError(String);

//--------------------------------------        UserId         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn random() -> Self {
        Self(random_hex(USER_ID_BYTES))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//--------------------------------------        OrderId        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    /// A fresh, collision-resistant order id.
    pub fn random() -> Self {
        Self(random_hex(ORDER_ID_BYTES))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for OrderId {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ConversionError("An order id cannot be empty".to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//--------------------------------------   PaymentReference    ---------------------------------------------------------
/// Stands in for a payment gateway transaction id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct PaymentReference(pub String);

impl PaymentReference {
    /// A reference for a payment approved by the built-in simulation, e.g. `sim_4f0c2a9e1b7d3356`.
    pub fn simulated() -> Self {
        Self(format!("{SIMULATED_PAYMENT_PREFIX}{}", random_hex(PAYMENT_REFERENCE_BYTES)))
    }

    pub fn is_simulated(&self) -> bool {
        self.0.starts_with(SIMULATED_PAYMENT_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PaymentReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//--------------------------------------   OrderStatusType     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatusType {
    /// The order has been created, but the payment has not been approved yet.
    #[default]
    Pending,
    /// The payment for the order has been approved. This is a terminal state.
    Paid,
}

impl OrderStatusType {
    /// Status only ever moves forward, from `Pending` to `Paid`, and only once.
    pub fn can_transition_to(&self, new_status: OrderStatusType) -> bool {
        matches!((self, new_status), (OrderStatusType::Pending, OrderStatusType::Paid))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatusType::Paid)
    }
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Pending => write!(f, "pending"),
            OrderStatusType::Paid => write!(f, "paid"),
        }
    }
}

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

impl From<String> for OrderStatusType {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid order status: {value}. But this conversion cannot fail. Defaulting to pending");
            OrderStatusType::Pending
        })
    }
}

//--------------------------------------      OrderItem        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub quantity: u32,
    /// The unit price of the item
    pub price: Amount,
}

impl OrderItem {
    pub fn new<S: Into<String>>(name: S, quantity: u32, price: Amount) -> Self {
        Self { name: name.into(), quantity, price }
    }

    pub fn line_total(&self) -> Amount {
        self.price * self.quantity
    }
}

//--------------------------------------        Order          ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    pub total: Amount,
    pub status: OrderStatusType,
    pub payment_reference: PaymentReference,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// The name of the item being purchased. The storefront only ever sells one item per order.
    pub fn headline_item(&self) -> &str {
        self.items.first().map(|i| i.name.as_str()).unwrap_or("Unknown item")
    }

    /// The sum of the line totals. This is not necessarily equal to `total`, which is what the buyer was charged.
    pub fn items_total(&self) -> Amount {
        self.items.iter().map(OrderItem::line_total).sum()
    }
}

//--------------------------------------       NewOrder        ---------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    pub total: Amount,
    pub status: OrderStatusType,
    pub payment_reference: PaymentReference,
    pub created_at: DateTime<Utc>,
}

impl NewOrder {
    /// A fresh order with a new id and timestamp, in `Pending` status.
    pub fn new(user_id: UserId, items: Vec<OrderItem>, total: Amount) -> Self {
        Self {
            id: OrderId::random(),
            user_id,
            items,
            total,
            status: OrderStatusType::Pending,
            payment_reference: PaymentReference::simulated(),
            created_at: Utc::now(),
        }
    }

    /// Marks the order as paid. There is no payment gateway: every order is approved as soon as it is submitted.
    pub fn approved(mut self) -> Self {
        if self.status.can_transition_to(OrderStatusType::Paid) {
            self.status = OrderStatusType::Paid;
        }
        self
    }
}

//--------------------------------------         User          ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: Option<String>,
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    pub discord_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// A user can log in with a password if a hash is stored, or via the chat platform if an external id is linked.
    /// A record with neither is orphaned.
    pub fn can_authenticate(&self) -> bool {
        self.password_hash.is_some() || self.discord_id.is_some()
    }

    pub fn email_or_placeholder(&self) -> &str {
        self.email.as_deref().unwrap_or(EMAIL_PLACEHOLDER)
    }
}

pub const EMAIL_PLACEHOLDER: &str = "not available";

//--------------------------------------       NewUser         ---------------------------------------------------------
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub discord_id: Option<String>,
}

#[derive(Debug, Clone, Error)]
pub enum NewUserError {
    #[error("A user must have a password or a linked chat account")]
    NoCredentials,
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
}

impl NewUser {
    pub fn with_password<S: Into<String>, H: Into<String>>(email: S, password_hash: H) -> Self {
        Self { email: Some(email.into()), password_hash: Some(password_hash.into()), discord_id: None }
    }

    pub fn with_discord_id<S: Into<String>>(discord_id: S) -> Self {
        Self { email: None, password_hash: None, discord_id: Some(discord_id.into()) }
    }

    pub fn with_email<S: Into<String>>(mut self, email: S) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Checks the credential invariant and normalises the email address to lowercase.
    pub fn validated(mut self) -> Result<Self, NewUserError> {
        if self.password_hash.is_none() && self.discord_id.is_none() {
            return Err(NewUserError::NoCredentials);
        }
        if let Some(email) = self.email.as_mut() {
            let normalised = email.trim().to_lowercase();
            if normalised.is_empty() || !normalised.contains('@') {
                return Err(NewUserError::InvalidEmail(email.clone()));
            }
            *email = normalised;
        }
        Ok(self)
    }
}
