//! Connections between the checkout engine and outside services.
pub mod discord;
