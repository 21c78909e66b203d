//! Money type for representing monetary values.
//!
//! Amounts are held in integer minor units (cents) so cart arithmetic is
//! exact. The backend speaks plain decimal JSON numbers (`49.99`), so the
//! serde impls convert at the boundary.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// Minor units per major unit.
const MINOR_UNITS: i64 = 100;

/// Supported display currencies.
///
/// The backend is single-currency per tenant and never sends a currency
/// code, so this only drives formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
    INR,
    MXN,
    PHP,
}

impl Currency {
    /// Get the currency code (e.g., "USD").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
            Currency::INR => "INR",
            Currency::MXN => "MXN",
            Currency::PHP => "PHP",
        }
    }

    /// Get the currency symbol (e.g., "$").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::CAD => "CA$",
            Currency::AUD => "A$",
            Currency::INR => "\u{20b9}",
            Currency::MXN => "MX$",
            Currency::PHP => "\u{20b1}",
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "CAD" => Some(Currency::CAD),
            "AUD" => Some(Currency::AUD),
            "INR" => Some(Currency::INR),
            "MXN" => Some(Currency::MXN),
            "PHP" => Some(Currency::PHP),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary amount in minor units.
///
/// Negative values are allowed: a cart total can drop below zero when the
/// caller supplies a discount larger than the subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money {
    /// Amount in minor units (e.g., cents).
    pub amount_cents: i64,
}

impl Money {
    /// Zero.
    pub const ZERO: Money = Money { amount_cents: 0 };

    /// Create a Money value from cents.
    pub const fn from_cents(amount_cents: i64) -> Self {
        Self { amount_cents }
    }

    /// Create a Money value from a decimal amount, rounding to the nearest cent.
    ///
    /// ```
    /// use storefront_commerce::money::Money;
    /// let price = Money::from_decimal(49.99);
    /// assert_eq!(price.amount_cents, 4999);
    /// ```
    ///
    /// Amounts outside the representable range saturate; use
    /// [`try_from_decimal`](Self::try_from_decimal) to reject them instead.
    pub fn from_decimal(amount: f64) -> Self {
        Self::from_cents((amount * MINOR_UNITS as f64).round() as i64)
    }

    /// Like [`from_decimal`](Self::from_decimal), but `None` when the amount
    /// is not finite or does not fit in `i64` cents.
    pub fn try_from_decimal(amount: f64) -> Option<Self> {
        let cents = (amount * MINOR_UNITS as f64).round();
        // i64::MIN is exactly representable; i64::MAX rounds up to 2^63.
        if !cents.is_finite() || cents < i64::MIN as f64 || cents >= i64::MAX as f64 {
            return None;
        }
        Some(Self::from_cents(cents as i64))
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_cents == 0
    }

    /// Check if this is positive.
    pub fn is_positive(&self) -> bool {
        self.amount_cents > 0
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.amount_cents < 0
    }

    /// Convert to a decimal value.
    pub fn to_decimal(&self) -> f64 {
        self.amount_cents as f64 / MINOR_UNITS as f64
    }

    /// Add, returning `None` on overflow.
    pub fn checked_add(&self, other: Money) -> Option<Money> {
        self.amount_cents.checked_add(other.amount_cents).map(Money::from_cents)
    }

    /// Subtract, returning `None` on overflow.
    pub fn checked_sub(&self, other: Money) -> Option<Money> {
        self.amount_cents.checked_sub(other.amount_cents).map(Money::from_cents)
    }

    /// Multiply by a quantity, returning `None` on overflow.
    pub fn checked_mul(&self, factor: i64) -> Option<Money> {
        self.amount_cents.checked_mul(factor).map(Money::from_cents)
    }

    /// Calculate a percentage of this amount, rounded to the nearest cent.
    pub fn percentage(&self, percent: f64) -> Money {
        Money::from_cents((self.amount_cents as f64 * percent / 100.0).round() as i64)
    }

    /// Format with a currency symbol (e.g., "$49.99", "-$5.00").
    pub fn display(&self, currency: Currency) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        format!("{}{}{}", sign, currency.symbol(), self.abs_amount())
    }

    fn abs_amount(&self) -> String {
        let abs = self.amount_cents.unsigned_abs();
        let minor = MINOR_UNITS as u64;
        format!("{}.{:02}", abs / minor, abs % minor)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money::from_cents(self.amount_cents + other.amount_cents)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.amount_cents += other.amount_cents;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money::from_cents(self.amount_cents - other.amount_cents)
    }
}

impl Mul<i64> for Money {
    type Output = Money;

    fn mul(self, factor: i64) -> Money {
        Money::from_cents(self.amount_cents * factor)
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money::from_cents(-self.amount_cents)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        write!(f, "{}{}", sign, self.abs_amount())
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.amount_cents % MINOR_UNITS == 0 {
            serializer.serialize_i64(self.amount_cents / MINOR_UNITS)
        } else {
            serializer.serialize_f64(self.to_decimal())
        }
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Money::try_from_decimal(amount).ok_or_else(|| {
            serde::de::Error::custom(format!("money amount {} is out of range", amount))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_decimal() {
        assert_eq!(Money::from_decimal(49.99).amount_cents, 4999);
        assert_eq!(Money::from_decimal(0.1 + 0.2).amount_cents, 30);
        assert_eq!(Money::from_decimal(-5.0).amount_cents, -500);
    }

    #[test]
    fn test_money_try_from_decimal_rejects_out_of_range() {
        assert_eq!(Money::try_from_decimal(49.99), Some(Money::from_cents(4999)));
        assert_eq!(Money::try_from_decimal(1e300), None);
        assert_eq!(Money::try_from_decimal(-1e300), None);
        assert_eq!(Money::try_from_decimal(f64::NAN), None);
        assert_eq!(Money::try_from_decimal(1.0e17), None);
        assert!(Money::try_from_decimal(9.0e16).is_some());
    }

    #[test]
    fn test_money_json_out_of_range_fails() {
        assert!(serde_json::from_str::<Money>("1e300").is_err());
        assert!(serde_json::from_str::<Money>("-1e300").is_err());
        assert_eq!(serde_json::from_str::<Money>("12.5").unwrap(), Money::from_cents(1250));
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::from_cents(4999).display(Currency::USD), "$49.99");
        assert_eq!(Money::from_cents(-500).display(Currency::USD), "-$5.00");
        assert_eq!(Money::from_cents(7).to_string(), "0.07");
        assert_eq!(Money::from_cents(-1205).to_string(), "-12.05");
    }

    #[test]
    fn test_money_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(300);
        assert_eq!((a + b).amount_cents, 1300);
        assert_eq!((b - a).amount_cents, -700);
        assert_eq!((a * 3).amount_cents, 3000);
        assert_eq!((-a).amount_cents, -1000);
    }

    #[test]
    fn test_money_checked_overflow() {
        let big = Money::from_cents(i64::MAX);
        assert!(big.checked_add(Money::from_cents(1)).is_none());
        assert!(big.checked_mul(2).is_none());
        assert_eq!(
            Money::from_cents(250).checked_mul(4),
            Some(Money::from_cents(1000))
        );
    }

    #[test]
    fn test_money_percentage() {
        let m = Money::from_cents(3500);
        assert_eq!(m.percentage(10.0).amount_cents, 350);
        assert_eq!(Money::from_cents(999).percentage(10.0).amount_cents, 100);
    }

    #[test]
    fn test_money_sum() {
        let total: Money = [100, 250, 5].iter().map(|c| Money::from_cents(*c)).sum();
        assert_eq!(total.amount_cents, 355);
    }

    #[test]
    fn test_money_json_is_decimal_number() {
        assert_eq!(serde_json::to_string(&Money::from_cents(4999)).unwrap(), "49.99");
        assert_eq!(serde_json::to_string(&Money::from_cents(1000)).unwrap(), "10");

        let parsed: Money = serde_json::from_str("12.5").unwrap();
        assert_eq!(parsed.amount_cents, 1250);
        let parsed: Money = serde_json::from_str("7").unwrap();
        assert_eq!(parsed.amount_cents, 700);
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("USD"), Some(Currency::USD));
        assert_eq!(Currency::from_code("eur"), Some(Currency::EUR));
        assert_eq!(Currency::from_code("INVALID"), None);
    }
}
