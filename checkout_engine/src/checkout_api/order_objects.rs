use std::{fmt::Display, str::FromStr};

use cko_common::{amounts_match, Amount};
use serde::{Deserialize, Serialize};

use crate::{checkout_api::errors::OrderFlowError, db_types::OrderItem};

/// Decides what happens when the total submitted with an order disagrees with its items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TotalPolicy {
    /// The submitted total is recorded as-is.
    #[default]
    Trusted,
    /// The total is recomputed from the items, and a submitted total that differs by more than half a cent is rejected.
    Recompute,
}

impl TotalPolicy {
    pub fn from_strict_flag(strict: bool) -> Self {
        if strict {
            TotalPolicy::Recompute
        } else {
            TotalPolicy::Trusted
        }
    }
}

impl Display for TotalPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TotalPolicy::Trusted => write!(f, "trusted"),
            TotalPolicy::Recompute => write!(f, "recompute"),
        }
    }
}

impl FromStr for TotalPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trusted" => Ok(TotalPolicy::Trusted),
            "recompute" | "strict" => Ok(TotalPolicy::Recompute),
            _ => Err(format!("Unknown total policy: {s}")),
        }
    }
}

/// The contents of a cart, as submitted at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<OrderItem>,
    pub total: Amount,
}

impl CheckoutRequest {
    pub fn new(items: Vec<OrderItem>, total: Amount) -> Self {
        Self { items, total }
    }

    /// Checks the item list and the total against the given policy. Returns the total that should be recorded.
    pub fn validate(&self, policy: TotalPolicy) -> Result<Amount, OrderFlowError> {
        if self.items.is_empty() {
            return Err(OrderFlowError::ValidationError("An order must contain at least one item".into()));
        }
        for item in &self.items {
            if item.name.trim().is_empty() {
                return Err(OrderFlowError::ValidationError("Item names cannot be empty".into()));
            }
            if item.quantity == 0 {
                return Err(OrderFlowError::ValidationError(format!("Quantity for '{}' must be at least 1", item.name)));
            }
        }
        match policy {
            TotalPolicy::Trusted => Ok(self.total),
            TotalPolicy::Recompute => {
                let expected: Amount = self.items.iter().map(OrderItem::line_total).sum();
                if amounts_match(expected, self.total) {
                    Ok(expected)
                } else {
                    Err(OrderFlowError::ValidationError(format!(
                        "The order total ({}) does not match the sum of the items ({expected})",
                        self.total
                    )))
                }
            },
        }
    }
}
