use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Mul},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CURRENCY_SYMBOL: &str = "R$";

/// Two amounts closer than half a cent are considered equal.
const CENT_TOLERANCE: f64 = 0.005;

//--------------------------------------       Amount        ---------------------------------------------------------
/// A monetary amount in the store currency.
///
/// The value is kept exactly as supplied (no rounding to cents), so that a total recorded for an order is bit-for-bit
/// the total the storefront sent. Only finite, non-negative values can be constructed through [`Amount::try_from`].
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Amount(f64);

#[derive(Debug, Clone, Error)]
#[error("Invalid amount: {0}")]
pub struct InvalidAmount(String);

impl TryFrom<f64> for Amount {
    type Error = InvalidAmount;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(InvalidAmount(format!("{value} is not a finite number")));
        }
        if value < 0.0 {
            return Err(InvalidAmount(format!("{value} is negative")));
        }
        Ok(Self(value))
    }
}

impl From<Amount> for f64 {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl Amount {
    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Mul<u32> for Amount {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self::Output {
        Self(self.0 * f64::from(rhs))
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Formats an amount for humans, e.g. `R$ 49.90`.
pub fn format_amount(amount: Amount, symbol: &str) -> String {
    format!("{symbol} {amount}")
}

/// Compares two amounts to the nearest cent.
pub fn amounts_match(a: Amount, b: Amount) -> bool {
    (a.0 - b.0).abs() < CENT_TOLERANCE
}
