//! Cart pricing breakdown.

use crate::error::CommerceError;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Derived totals for a cart at a given tax amount.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CartPricing {
    /// Sum of effective unit price times quantity.
    pub subtotal: Money,
    /// Discount amount stored on the cart (zero when none).
    pub discount: Money,
    /// Tax supplied by the caller.
    pub tax: Money,
    /// subtotal - discount + tax. Not clamped.
    pub total: Money,
}

impl CartPricing {
    /// Fails with [`CommerceError::Overflow`] when the total is out of range.
    pub fn new(subtotal: Money, discount: Money, tax: Money) -> Result<Self, CommerceError> {
        let total = subtotal
            .checked_sub(discount)
            .and_then(|t| t.checked_add(tax))
            .ok_or(CommerceError::Overflow)?;
        Ok(Self {
            subtotal,
            discount,
            tax,
            total,
        })
    }

    /// Check if any discount is applied.
    pub fn has_discount(&self) -> bool {
        self.discount.is_positive()
    }

    /// Discount as a percentage of subtotal.
    pub fn discount_percentage(&self) -> f64 {
        if self.subtotal.is_zero() {
            return 0.0;
        }
        (self.discount.amount_cents as f64 / self.subtotal.amount_cents as f64) * 100.0
    }

    /// True when an oversized discount pushed the total below zero.
    pub fn is_negative(&self) -> bool {
        self.total.is_negative()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pricing_total() {
        let pricing = CartPricing::new(
            Money::from_cents(3500),
            Money::from_cents(500),
            Money::from_cents(200),
        )
        .unwrap();
        assert_eq!(pricing.total.amount_cents, 3200);
        assert!(pricing.has_discount());
    }

    #[test]
    fn test_discount_percentage() {
        let pricing = CartPricing::new(Money::from_cents(10000), Money::from_cents(1000), Money::ZERO)
            .unwrap();
        assert!((pricing.discount_percentage() - 10.0).abs() < 0.01);
        assert_eq!(CartPricing::new(Money::ZERO, Money::ZERO, Money::ZERO).unwrap().discount_percentage(), 0.0);
    }

    #[test]
    fn test_oversized_discount_goes_negative() {
        let pricing = CartPricing::new(Money::from_cents(1000), Money::from_cents(1500), Money::ZERO)
            .unwrap();
        assert_eq!(pricing.total.amount_cents, -500);
        assert!(pricing.is_negative());
    }

    #[test]
    fn test_total_out_of_range_fails() {
        let max = Money::from_cents(i64::MAX);
        assert_eq!(
            CartPricing::new(max, Money::ZERO, Money::from_cents(1)),
            Err(CommerceError::Overflow)
        );
        assert_eq!(
            CartPricing::new(Money::from_cents(-2), max, Money::ZERO),
            Err(CommerceError::Overflow)
        );
    }
}
