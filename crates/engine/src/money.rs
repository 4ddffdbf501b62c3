use std::fmt;

use serde::{Deserialize, Serialize};

/// Monetary amount as computed by the engine.
///
/// The engine works with unrounded `f64` values; rounding to two decimals
/// happens only when an amount is displayed.
///
/// # Examples
///
/// ```rust
/// use fare_engine::Amount;
///
/// let amount = Amount::new(1234.5);
/// assert_eq!(amount.to_string(), "1234.50");
/// assert_eq!(amount.with_symbol("$"), "$1234.50");
/// assert_eq!(Amount::new(-0.006).with_symbol("$"), "-$0.01");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(f64);

impl Amount {
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Rounded to whole cents, half away from zero. Non-finite values are 0.
    #[must_use]
    pub fn cents(self) -> i64 {
        if self.0.is_finite() {
            (self.0 * 100.0).round() as i64
        } else {
            0
        }
    }

    /// Formats the amount with a currency symbol, sign first (`-$12.00`).
    #[must_use]
    pub fn with_symbol(self, symbol: &str) -> String {
        let (sign, units, cents) = self.parts();
        format!("{sign}{symbol}{units}.{cents:02}")
    }

    fn parts(self) -> (&'static str, u64, u64) {
        let cents = self.cents();
        let sign = if cents < 0 { "-" } else { "" };
        let abs = cents.unsigned_abs();
        (sign, abs / 100, abs % 100)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (sign, units, cents) = self.parts();
        write!(f, "{sign}{units}.{cents:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_rounds_to_cents() {
        assert_eq!(Amount::new(0.0).to_string(), "0.00");
        assert_eq!(Amount::new(0.1).to_string(), "0.10");
        assert_eq!(Amount::new(5200.0).to_string(), "5200.00");
        assert_eq!(Amount::new(87.499).to_string(), "87.50");
        assert_eq!(Amount::new(-10.5).to_string(), "-10.50");
    }

    #[test]
    fn tiny_negative_rounds_to_plain_zero() {
        assert_eq!(Amount::new(-0.001).to_string(), "0.00");
    }

    #[test]
    fn non_finite_displays_as_zero() {
        assert_eq!(Amount::new(f64::NAN).to_string(), "0.00");
    }
}
