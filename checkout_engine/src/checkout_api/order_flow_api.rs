use std::fmt::Debug;

use log::*;

use crate::{
    checkout_api::{
        errors::OrderFlowError,
        order_objects::{CheckoutRequest, TotalPolicy},
    },
    db_types::{NewOrder, Order, OrderId, OrderStatusType, UserId},
    events::{EventProducers, OrderCreatedEvent},
    traits::CheckoutDatabase,
};

/// `OrderFlowApi` is the primary API for the checkout flow. It turns a submitted cart into a stored order.
///
/// Payment is simulated: every order that passes validation is approved on the spot and stored as `paid`. Listeners on
/// the order-created hook (e.g. the notification dispatcher) are told about the new order after it has been stored.
pub struct OrderFlowApi<B> {
    db: B,
    producers: EventProducers,
    policy: TotalPolicy,
}

impl<B> Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi ({})", self.policy)
    }
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers, policy: TotalPolicy::default() }
    }

    pub fn with_total_policy(mut self, policy: TotalPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn total_policy(&self) -> TotalPolicy {
        self.policy
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B> OrderFlowApi<B>
where B: CheckoutDatabase
{
    /// Creates and approves a new order for `user_id`.
    ///
    /// The caller must have authenticated `user_id` already; the owner is never taken from the request body.
    /// Returns as soon as the order is stored. Notifications happen later, on the event handler's task.
    pub async fn create_order(&self, user_id: &UserId, request: CheckoutRequest) -> Result<Order, OrderFlowError> {
        let total = request.validate(self.policy)?;
        if self.db.fetch_user_by_id(user_id).await?.is_none() {
            warn!("🛒️ Order submitted for unknown user {user_id}. Rejecting it.");
            return Err(OrderFlowError::UnknownCustomer(user_id.clone()));
        }
        let new_order = NewOrder::new(user_id.clone(), request.items, total).approved();
        let order = self.db.insert_order(new_order).await.map_err(|e| {
            error!("🛒️ Could not save order for user {user_id}. {e}");
            e
        })?;
        info!(
            "🛒️ Order [{}] created for user {user_id}. Total: {}. Payment reference {}",
            order.id, order.total, order.payment_reference
        );
        self.call_order_created_hook(&order).await;
        Ok(order)
    }

    async fn call_order_created_hook(&self, order: &Order) {
        for emitter in &self.producers.order_created_producer {
            debug!("🛒️ Notifying order created hook subscribers");
            let event = OrderCreatedEvent::new(order.clone());
            emitter.publish_event(event).await;
        }
    }

    /// The current status of the order.
    pub async fn order_status(&self, order_id: &OrderId) -> Result<OrderStatusType, OrderFlowError> {
        let order = self.fetch_order(order_id).await?;
        Ok(order.status)
    }

    pub async fn fetch_order(&self, order_id: &OrderId) -> Result<Order, OrderFlowError> {
        self.db.fetch_order_by_id(order_id).await?.ok_or_else(|| OrderFlowError::OrderNotFound(order_id.clone()))
    }
}
