//! Order lifecycle events.
//!
//! Components that need to react to order activity (e.g. the notification dispatcher) register a hook in
//! [`EventHooks`]. [`EventHandlers`] turns the hooks into running handlers, and hands out [`EventProducers`] that the
//! order flow uses to publish events.
mod channel;
mod event_types;
mod hooks;

pub use channel::{EventHandler, EventProducer, Handler};
pub use event_types::*;
pub use hooks::{EventHandlers, EventHooks, EventProducers};
