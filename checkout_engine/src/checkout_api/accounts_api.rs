//! Read-only queries about a user's orders.

use std::fmt::Debug;

use log::trace;

use crate::{
    checkout_api::errors::AccountApiError,
    db_types::{Order, UserId},
    traits::OrderManagement,
};

/// The `AccountApi` provides access to a user's order history.
pub struct AccountApi<B> {
    db: B,
}

impl<B: Debug> Debug for AccountApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccountApi ({:?})", self.db)
    }
}

impl<B> AccountApi<B>
where B: OrderManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// All the orders placed by the user, newest first. A user without orders gets an empty list.
    pub async fn orders_for_user(&self, user_id: &UserId) -> Result<Vec<Order>, AccountApiError> {
        let orders = self.db.fetch_orders_for_user(user_id).await?;
        trace!("🛒️ {} orders found for user {user_id}", orders.len());
        Ok(orders)
    }
}
