//! # Storage and notification contracts
//!
//! This module defines the interface contracts that the checkout engine expects from its collaborators.
//!
//! ## Storage
//! * [`OrderManagement`] persists orders and answers order queries.
//! * [`UserManagement`] stores users and resolves their contact details (email, linked chat account).
//! * [`CheckoutDatabase`] bundles both for backends that serve the whole checkout flow. The SQLite backend
//!   implements all three.
//!
//! ## Notifications
//! * [`AdminNotifier`] delivers a [`SaleNotice`] to the shop administrators.
//! * [`DirectMessenger`] sends a private message to a buyer, addressed by their external chat id.
mod checkout_database;
mod data_objects;
mod notifications;
mod order_management;
mod user_management;

pub use checkout_database::{CheckoutDatabase, CheckoutDatabaseError};
pub use data_objects::SaleNotice;
pub use notifications::{AdminNotifier, DirectMessenger, NotificationError};
pub use order_management::OrderManagement;
pub use user_management::UserManagement;
