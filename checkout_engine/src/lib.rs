//! Checkout Engine
//!
//! The checkout engine turns a storefront cart into a stored order, approves it (payment is simulated), and tells the
//! shop administrators and the buyer about the sale. It is independent of any web framework or chat platform.
//!
//! The library is divided into these sections:
//! 1. Storage. The contracts a backend must fulfil live in [`mod@traits`]; [`SqliteDatabase`] is the bundled
//!    implementation. The data types stored in the database are defined in [`mod@db_types`] and are public.
//! 2. The engine public API ([`OrderFlowApi`] and [`AccountApi`]). Callers should use these rather than the database
//!    directly.
//! 3. Notifications ([`mod@notifications`]), sent by a [`NotificationDispatcher`] through channels that implement
//!    [`AdminNotifier`] and [`DirectMessenger`].
//!
//! The engine emits an event when an order is created. Hooks registered in [`events::EventHooks`] run on their own
//! tasks, so a slow notification never holds up checkout.
mod checkout_api;
mod sqlite;

pub mod db_types;
pub mod events;
pub mod notifications;
pub mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use checkout_api::{
    accounts_api::AccountApi,
    errors::{AccountApiError, OrderFlowError},
    order_flow_api::OrderFlowApi,
    order_objects,
};
pub use notifications::{ChannelOutcome, DispatchReport, NotificationDispatcher};
pub use sqlite::{db::db_url, SqliteDatabase};
pub use traits::{
    AdminNotifier,
    CheckoutDatabase,
    CheckoutDatabaseError,
    DirectMessenger,
    NotificationError,
    OrderManagement,
    SaleNotice,
    UserManagement,
};
