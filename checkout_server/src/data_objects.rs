use checkout_engine::{
    db_types::{OrderId, OrderItem, OrderStatusType},
    order_objects::CheckoutRequest,
};
use cko_common::Amount;
use serde::{Deserialize, Serialize};

/// The body of `POST /api/create-payment`. The owner of the order is taken from the access token, never from here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePaymentRequest {
    pub items: Vec<OrderItem>,
    pub total: Amount,
}

impl From<CreatePaymentRequest> for CheckoutRequest {
    fn from(value: CreatePaymentRequest) -> Self {
        CheckoutRequest::new(value.items, value.total)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentResponse {
    pub order_id: OrderId,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusResponse {
    pub status: OrderStatusType,
}
