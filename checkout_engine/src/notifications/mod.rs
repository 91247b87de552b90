//! # Sale notifications
//!
//! When an order is created, two independent messages go out:
//! 1. a sale summary for the shop administrators, through an [`AdminNotifier`](crate::traits::AdminNotifier), and
//! 2. a direct message to the buyer, through a [`DirectMessenger`](crate::traits::DirectMessenger), if the buyer has
//!    linked a chat account.
//!
//! Delivery is best-effort. Each channel's result is reported in a [`DispatchReport`] and logged, but never retried and
//! never passed back to the code that created the order.
mod dispatcher;
mod messages;

pub use dispatcher::{ChannelOutcome, DispatchReport, NotificationDispatcher};
pub use messages::buyer_message;
