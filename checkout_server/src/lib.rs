//! # Checkout server
//! This crate hosts the HTTP API for the storefront checkout. It is responsible for:
//! * verifying the bearer token that identifies the buyer,
//! * turning a submitted cart into an approved order via the checkout engine,
//! * answering order status and order history queries, and
//! * wiring the sale notifications (Discord webhook and direct message) onto the engine's order-created hook.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `POST /api/create-payment`: Creates and approves an order for the authenticated user.
//! * `GET /api/order-status/{orderId}`: The status of an order. No authentication is required.
//! * `GET /api/my-orders`: The authenticated user's orders, newest first.
pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod routes;
pub mod server;
