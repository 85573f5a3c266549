//! Amount type for transaction amounts.
//!
//! This module provides the `Amount` type which wraps `Decimal` and enforces the
//! non-negative invariant that transaction amounts carry. The sign of an amount
//! in aggregates is determined by the transaction kind, never stored here.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Represents a non-negative monetary amount.
///
/// Parsing is lenient in one specific way: an empty (or whitespace-only) string
/// parses as zero, matching the numeric coercion an empty form field undergoes.
/// Negative and non-numeric input is rejected.
///
/// # Examples
///
/// ```
/// # use fintrack_sync::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("1500.00").unwrap();
/// assert_eq!(amount.to_string(), "1500.00");
/// assert!(Amount::from_str("-10").is_err());
/// assert!(Amount::from_str("").unwrap().is_zero());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Creates a new `Amount`, rejecting negative values.
    pub fn new(value: Decimal) -> crate::Result<Self> {
        if value.is_sign_negative() && !value.is_zero() {
            anyhow::bail!("Transaction amounts must be non-negative, got '{value}'");
        }
        Ok(Self(value))
    }

    /// Returns the underlying `Decimal` value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns the amount as an `f64` for wire encodings that use doubles.
    ///
    /// Returns `None` when the value cannot be represented, which does not
    /// happen for amounts a user can enter.
    pub fn to_f64(&self) -> Option<f64> {
        self.0.to_f64()
    }
}

impl FromStr for Amount {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Self::ZERO);
        }
        let value = Decimal::from_str(trimmed)
            .map_err(|e| anyhow::anyhow!("Unable to parse amount '{trimmed}': {e}"))?;
        Self::new(value)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<f64> for Amount {
    type Error = crate::Error;

    fn try_from(value: f64) -> crate::Result<Self> {
        let decimal = Decimal::try_from(value)
            .map_err(|e| anyhow::anyhow!("Unable to represent amount '{value}': {e}"))?;
        Self::new(decimal)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}
