use thiserror::Error;

use crate::{
    db_types::{OrderId, UserId},
    traits::CheckoutDatabaseError,
};

#[derive(Debug, Clone, Error)]
pub enum OrderFlowError {
    #[error("Invalid order. {0}")]
    ValidationError(String),
    #[error("User {0} does not exist")]
    UnknownCustomer(UserId),
    #[error("Order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("Could not save the order. {0}")]
    PersistenceFailure(#[from] CheckoutDatabaseError),
}

#[derive(Debug, Clone, Error)]
pub enum AccountApiError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] CheckoutDatabaseError),
}
