use crate::{
    db_types::{NewOrder, Order, OrderId, UserId},
    traits::CheckoutDatabaseError,
};

/// The `OrderManagement` trait defines the behaviour for storing and querying orders in the database backend.
///
/// Orders are written once and never modified or deleted through this interface.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// Stores a brand-new order and returns the stored record.
    ///
    /// If an order with the same id already exists, [`CheckoutDatabaseError::OrderAlreadyExists`] is returned and the
    /// existing order is left untouched.
    async fn insert_order(&self, order: NewOrder) -> Result<Order, CheckoutDatabaseError>;

    /// Fetches the order with the given id, or `None` if there is no such order.
    async fn fetch_order_by_id(&self, order_id: &OrderId) -> Result<Option<Order>, CheckoutDatabaseError>;

    /// Fetches all orders owned by `user_id`, most recent first. An empty vector is returned if there are none.
    async fn fetch_orders_for_user(&self, user_id: &UserId) -> Result<Vec<Order>, CheckoutDatabaseError>;
}
