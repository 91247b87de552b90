use thiserror::Error;

use crate::{
    db_types::{NewUserError, OrderId},
    traits::{OrderManagement, UserManagement},
};

/// The highest level of behaviour for storage backends supporting the checkout flow.
///
/// Backends are cloned into every HTTP worker and every event handler, so cloning must be cheap (e.g. a shared pool).
pub trait CheckoutDatabase: Clone + OrderManagement + UserManagement {
    /// The URL of the database
    fn url(&self) -> &str;
}

#[derive(Debug, Clone, Error)]
pub enum CheckoutDatabaseError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Order already exists. Order.id = {0}")]
    OrderAlreadyExists(OrderId),
    #[error("A user with the same {0} already exists")]
    UserAlreadyExists(String),
    #[error("Invalid user record. {0}")]
    InvalidUser(#[from] NewUserError),
    #[error("Could not decode stored record. {0}")]
    CorruptRecord(String),
}

impl From<sqlx::Error> for CheckoutDatabaseError {
    fn from(e: sqlx::Error) -> Self {
        CheckoutDatabaseError::DatabaseError(e.to_string())
    }
}
