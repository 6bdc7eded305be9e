//! Threshold-based discount policy.
//!
//! A pure function of the subtotal. The boundary is strict: a subtotal
//! exactly equal to the threshold earns no discount (see DESIGN.md, D1).

use rust_decimal::Decimal;
use serde::Serialize;

/// Applied discount, derived from a cart subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Discount {
    /// Effective rate: the configured rate when applied, zero otherwise.
    #[serde(with = "rust_decimal::serde::float")]
    pub rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub threshold: Decimal,
}

impl Discount {
    /// Whether any discount applies.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        self.amount > Decimal::ZERO
    }
}

/// Compute the discount for a subtotal.
///
/// `amount = subtotal * rate` when `subtotal > threshold`, zero otherwise.
#[must_use]
pub fn compute_discount(subtotal: Decimal, threshold: Decimal, rate: Decimal) -> Discount {
    if subtotal > threshold {
        Discount {
            rate,
            amount: subtotal * rate,
            threshold,
        }
    } else {
        Discount {
            rate: Decimal::ZERO,
            amount: Decimal::ZERO,
            threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: i64 = 30_000;

    fn rate() -> Decimal {
        Decimal::new(10, 2) // 0.10
    }

    #[test]
    fn test_below_threshold_no_discount() {
        let d = compute_discount(Decimal::from(10_000), Decimal::from(THRESHOLD), rate());
        assert_eq!(d.amount, Decimal::ZERO);
        assert_eq!(d.rate, Decimal::ZERO);
        assert!(!d.is_applied());
    }

    #[test]
    fn test_exactly_at_threshold_no_discount() {
        // Strict boundary: equality does not qualify
        let d = compute_discount(Decimal::from(THRESHOLD), Decimal::from(THRESHOLD), rate());
        assert_eq!(d.amount, Decimal::ZERO);
    }

    #[test]
    fn test_one_unit_above_threshold_applies() {
        let d = compute_discount(Decimal::from(THRESHOLD + 1), Decimal::from(THRESHOLD), rate());
        assert!(d.is_applied());
        assert_eq!(d.rate, rate());
    }

    #[test]
    fn test_discount_amount_is_exact() {
        let d = compute_discount(Decimal::from(35_000), Decimal::from(THRESHOLD), rate());
        assert_eq!(d.amount, Decimal::from(3_500));
    }

    #[test]
    fn test_threshold_is_carried_either_way() {
        let below = compute_discount(Decimal::ZERO, Decimal::from(THRESHOLD), rate());
        let above = compute_discount(Decimal::from(40_000), Decimal::from(THRESHOLD), rate());
        assert_eq!(below.threshold, Decimal::from(THRESHOLD));
        assert_eq!(above.threshold, Decimal::from(THRESHOLD));
    }
}
