//! Pricing engine.
//!
//! A pure function from cart lines, coupon, and loyalty inputs to a totals
//! breakdown. No I/O; identical inputs always produce an identical
//! breakdown.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::CartLine;
use crate::money::Money;

/// Orders with a subtotal strictly above this ship free.
pub const FREE_SHIPPING_THRESHOLD: Money = Money::from_cents(999);

/// Flat shipping fee below the free-shipping threshold.
pub const FLAT_SHIPPING_FEE: Money = Money::from_cents(99);

/// Tax rate applied to the subtotal, in percent.
pub const TAX_RATE_PERCENT: u32 = 18;

/// A coupon in the static registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coupon {
    pub code: &'static str,
    /// Discount applied to the subtotal, in percent.
    pub discount_percent: u32,
    pub description: &'static str,
}

/// Static coupon registry.
pub const COUPONS: &[Coupon] = &[
    Coupon {
        code: "WELCOME10",
        discount_percent: 10,
        description: "10% off for new customers",
    },
    Coupon {
        code: "FESTIVE20",
        discount_percent: 20,
        description: "20% festive season discount",
    },
    Coupon {
        code: "VENDOR5",
        discount_percent: 5,
        description: "5% off vendor spotlight picks",
    },
];

/// Looks up a coupon by code, ASCII-case-insensitively.
pub fn lookup_coupon(code: &str) -> Option<&'static Coupon> {
    COUPONS.iter().find(|c| c.code.eq_ignore_ascii_case(code))
}

/// Errors that can occur while pricing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// Coupon code is not in the registry.
    #[error("invalid coupon code: {code}")]
    InvalidCoupon { code: String },
}

/// Derived totals for a checkout. Never stored; recomputed from inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingBreakdown {
    pub subtotal: Money,
    pub shipping_fee: Money,
    pub tax: Money,
    pub coupon_discount: Money,
    /// Loyalty points applied, 1 point = 1 minor currency unit.
    pub points_applied: Money,
    /// subtotal + shipping + tax - coupon discount, floored at zero.
    pub total: Money,
    /// total - points applied, never negative.
    pub effective_total: Money,
}

/// Prices a set of cart lines.
///
/// `requested_points` is clamped to `[0, loyalty_balance]` and to the total;
/// the caller never over-redeems. An unknown coupon code fails with
/// [`PricingError::InvalidCoupon`]; whether that blocks checkout is the
/// caller's call.
pub fn price(
    lines: &[CartLine],
    coupon_code: Option<&str>,
    requested_points: i64,
    loyalty_balance: i64,
) -> Result<PricingBreakdown, PricingError> {
    let subtotal: Money = lines.iter().map(CartLine::line_total).sum();

    let shipping_fee = if subtotal > FREE_SHIPPING_THRESHOLD {
        Money::zero()
    } else {
        FLAT_SHIPPING_FEE
    };

    let tax = subtotal.percent(TAX_RATE_PERCENT);

    let coupon_discount = match coupon_code {
        Some(code) => {
            let coupon = lookup_coupon(code).ok_or_else(|| PricingError::InvalidCoupon {
                code: code.to_string(),
            })?;
            subtotal.percent(coupon.discount_percent)
        }
        None => Money::zero(),
    };

    let total = (subtotal + shipping_fee + tax).saturating_sub(coupon_discount);

    let points_applied = Money::from_cents(requested_points.max(0))
        .min(Money::from_cents(loyalty_balance.max(0)))
        .min(total);
    let effective_total = total.saturating_sub(points_applied);

    Ok(PricingBreakdown {
        subtotal,
        shipping_fee,
        tax,
        coupon_discount,
        points_applied,
        total,
        effective_total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::Cart;
    use crate::product::Product;

    fn lines(entries: &[(&str, i64, u32)]) -> Vec<CartLine> {
        let mut cart = Cart::new();
        for (id, price_cents, qty) in entries {
            let product = Product::new(
                *id,
                format!("Product {id}"),
                Money::from_cents(*price_cents),
                "Acme Goods",
                "misc",
            );
            cart.add_item(&product, *qty).unwrap();
        }
        cart.snapshot().lines
    }

    #[test]
    fn test_free_shipping_above_threshold() {
        // 500 x 2 = 1000 > 999: free shipping, tax 180, total 1180
        let breakdown = price(&lines(&[("SKU-001", 500, 2)]), None, 0, 0).unwrap();
        assert_eq!(breakdown.subtotal.cents(), 1000);
        assert_eq!(breakdown.shipping_fee, Money::zero());
        assert_eq!(breakdown.tax.cents(), 180);
        assert_eq!(breakdown.total.cents(), 1180);
        assert_eq!(breakdown.effective_total.cents(), 1180);
    }

    #[test]
    fn test_flat_shipping_at_or_below_threshold() {
        // subtotal 500: shipping 99, tax 90, total 689
        let breakdown = price(&lines(&[("SKU-001", 500, 1)]), None, 0, 0).unwrap();
        assert_eq!(breakdown.shipping_fee.cents(), 99);
        assert_eq!(breakdown.tax.cents(), 90);
        assert_eq!(breakdown.total.cents(), 689);

        // subtotal exactly 999 still pays the flat fee
        let at_threshold = price(&lines(&[("SKU-001", 999, 1)]), None, 0, 0).unwrap();
        assert_eq!(at_threshold.shipping_fee.cents(), 99);
    }

    #[test]
    fn test_welcome10_coupon() {
        // subtotal 1000, discount 100, total = 1000 + 0 + 180 - 100 = 1080
        let breakdown = price(&lines(&[("SKU-001", 500, 2)]), Some("WELCOME10"), 0, 0).unwrap();
        assert_eq!(breakdown.coupon_discount.cents(), 100);
        assert_eq!(breakdown.total.cents(), 1080);
    }

    #[test]
    fn test_coupon_code_is_case_insensitive() {
        let breakdown = price(&lines(&[("SKU-001", 500, 2)]), Some("welcome10"), 0, 0).unwrap();
        assert_eq!(breakdown.coupon_discount.cents(), 100);
    }

    #[test]
    fn test_unknown_coupon_fails() {
        let result = price(&lines(&[("SKU-001", 500, 2)]), Some("NOPE99"), 0, 0);
        assert_eq!(
            result,
            Err(PricingError::InvalidCoupon {
                code: "NOPE99".to_string()
            })
        );
    }

    #[test]
    fn test_points_clamped_to_balance() {
        let breakdown = price(&lines(&[("SKU-001", 500, 2)]), None, 500, 200).unwrap();
        assert_eq!(breakdown.points_applied.cents(), 200);
        assert_eq!(breakdown.effective_total.cents(), 1180 - 200);
    }

    #[test]
    fn test_points_clamped_to_total() {
        let breakdown = price(&lines(&[("SKU-001", 100, 1)]), None, 100_000, 100_000).unwrap();
        assert_eq!(breakdown.points_applied, breakdown.total);
        assert_eq!(breakdown.effective_total, Money::zero());
    }

    #[test]
    fn test_negative_points_treated_as_zero() {
        let breakdown = price(&lines(&[("SKU-001", 500, 1)]), None, -50, 200).unwrap();
        assert_eq!(breakdown.points_applied, Money::zero());
        assert_eq!(breakdown.effective_total, breakdown.total);
    }

    #[test]
    fn test_empty_lines() {
        let breakdown = price(&[], None, 0, 0).unwrap();
        assert_eq!(breakdown.subtotal, Money::zero());
        // Flat fee applies at subtotal zero; the orchestrator rejects empty
        // carts before pricing matters.
        assert_eq!(breakdown.shipping_fee.cents(), 99);
    }

    #[test]
    fn test_effective_total_never_negative() {
        for (cents, qty, points) in [(1, 1, 1_000_000), (999, 1, 0), (50_000, 15, 123)] {
            let breakdown = price(
                &lines(&[("SKU-001", cents, qty)]),
                Some("FESTIVE20"),
                points,
                points,
            )
            .unwrap();
            assert!(!breakdown.effective_total.is_negative());
            assert!(!breakdown.total.is_negative());
        }
    }

    #[test]
    fn test_same_inputs_same_output() {
        let input = lines(&[("SKU-001", 450, 3), ("SKU-002", 1200, 1)]);
        let a = price(&input, Some("FESTIVE20"), 150, 400).unwrap();
        let b = price(&input, Some("FESTIVE20"), 150, 400).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_lookup_coupon() {
        assert!(lookup_coupon("WELCOME10").is_some());
        assert!(lookup_coupon("vendor5").is_some());
        assert!(lookup_coupon("MISSING").is_none());
    }
}
