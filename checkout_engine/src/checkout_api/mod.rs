//! # Checkout engine public API
//!
//! The `checkout_api` module exposes the programmatic API for the checkout engine.
//!
//! * [`order_flow_api`] creates orders, approves them (payment is simulated) and publishes the order-created event.
//! * [`accounts_api`] lists the order history of a user.
//!
//! # API usage
//!
//! An API instance is created by supplying a database backend that implements the backend traits required by the API.
//!
//! ```rust,ignore
//! use checkout_engine::{AccountApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url(...).await?;
//! // SqliteDatabase implements OrderManagement
//! let api = AccountApi::new(db);
//! let orders = api.orders_for_user(&user_id).await?;
//! ```
pub mod accounts_api;
pub mod errors;
pub mod order_flow_api;
pub mod order_objects;
