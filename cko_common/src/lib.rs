mod helpers;
mod money;
mod secret;

pub use helpers::parse_boolean_flag;
pub use money::{amounts_match, format_amount, Amount, InvalidAmount, DEFAULT_CURRENCY_SYMBOL};
pub use secret::Secret;
