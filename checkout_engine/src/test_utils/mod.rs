//! Helpers for setting up throw-away databases in tests.
pub mod prepare_env;
