//! Money amounts stored as integer cents
//!
//! JSON carries prices as decimal numbers (`250.00`); they are kept as cents
//! everywhere else so arithmetic on totals is exact.

use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::iter::Sum;
use std::str::FromStr;

/// Amount in the smallest currency unit (cents)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Exclusive bound on decimal amounts read from JSON numbers (15 significant digits)
    pub const MAX_DECIMAL: f64 = 1e13;

    pub fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    /// Convert a decimal amount, rejecting more than two fractional digits.
    ///
    /// Magnitudes must stay below [`Money::MAX_DECIMAL`] so every two-decimal value
    /// keeps all of its digits in an `f64`; larger amounts are rejected rather than
    /// rounded.
    pub fn from_decimal(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::BadRequest(format!("Invalid amount: {}", value)));
        }
        if value.abs() >= Self::MAX_DECIMAL {
            return Err(Error::BadRequest(format!("Amount {} is out of range", value)));
        }
        // shortest round-trip text of the f64 is the decimal the client sent
        value.to_string().parse()
    }

    pub fn as_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Multiply by a quantity, `None` on overflow
    pub fn checked_mul(&self, quantity: i64) -> Option<Money> {
        self.0.checked_mul(quantity).map(Money)
    }

    pub fn checked_add(&self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }
}

impl FromStr for Money {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));
        let valid = !whole.is_empty()
            && whole.chars().all(|c| c.is_ascii_digit())
            && frac.chars().all(|c| c.is_ascii_digit());
        if !valid {
            return Err(Error::BadRequest(format!("Invalid amount: {}", s)));
        }
        if frac.len() > 2 {
            return Err(Error::BadRequest(format!(
                "Amount {} has more than 2 decimal places",
                s
            )));
        }

        let whole: i64 = whole
            .parse()
            .map_err(|_| Error::BadRequest(format!("Amount {} is out of range", s)))?;
        let frac: i64 = format!("{:0<2}", frac).parse().unwrap_or(0);
        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac))
            .ok_or_else(|| Error::BadRequest(format!("Amount {} is out of range", s)))?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        Money(iter.map(|m| m.0).sum())
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_decimal())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        let parsed = match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Money::from_decimal(n),
            Raw::Text(s) => s.parse(),
        };
        parsed.map_err(serde::de::Error::custom)
    }
}
