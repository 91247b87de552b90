use crate::db_types::Order;

/// Emitted once an order has been persisted. The order is a snapshot taken at creation time.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderCreatedEvent {
    pub order: Order,
}

impl OrderCreatedEvent {
    pub fn new(order: Order) -> Self {
        Self { order }
    }
}
