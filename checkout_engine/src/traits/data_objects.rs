use chrono::{DateTime, Utc};
use cko_common::Amount;
use serde::{Deserialize, Serialize};

use crate::db_types::{Order, OrderId, User, EMAIL_PLACEHOLDER};

/// The summary of a sale that is sent to the shop administrators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleNotice {
    pub item_name: String,
    pub total: Amount,
    /// The buyer's email, or `"not available"` for accounts without one
    pub customer_email: String,
    pub order_id: OrderId,
    pub timestamp: DateTime<Utc>,
}

impl SaleNotice {
    pub fn new(order: &Order, owner: Option<&User>) -> Self {
        let customer_email = owner.map(|u| u.email_or_placeholder()).unwrap_or(EMAIL_PLACEHOLDER).to_string();
        Self {
            item_name: order.headline_item().to_string(),
            total: order.total,
            customer_email,
            order_id: order.id.clone(),
            timestamp: Utc::now(),
        }
    }
}
