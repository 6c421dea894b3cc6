//! # Pricing Module
//!
//! Works out what one line item really costs once tax and discount apply.
//!
//! ## Two-Tier Tax Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  name (case-insensitive)                  rate                          │
//! │  ───────────────────────────────────────  ─────                         │
//! │  contains "plastic" AND contains "bag"    10%   "Plastic Shopping Bag"  │
//! │  anything else                             8%   "Plastic Bottle", "BAG" │
//! │                                                                         │
//! │  effective = price_before_tax × (1 + rate) − discount_amount           │
//! │                                                                         │
//! │  No clamping here: a discount larger than the taxed price gives a      │
//! │  negative effective cost. The settlement decides what to do with it.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use ts_rs::TS;

use crate::money::Amount;
use crate::types::{LineItem, TaxRate};
use crate::{PLASTIC_BAG_TAX_BPS, STANDARD_TAX_BPS};

/// Selects the tax rate for an item by its name.
///
/// ## Example
/// ```rust
/// use picsplit_core::pricing::tax_rate_for;
///
/// assert_eq!(tax_rate_for("Plastic Shopping Bag").bps(), 1000);
/// assert_eq!(tax_rate_for("Plastic Bottle").bps(), 800);
/// ```
pub fn tax_rate_for(name: &str) -> TaxRate {
    let lower = name.to_lowercase();
    if lower.contains("plastic") && lower.contains("bag") {
        TaxRate::from_bps(PLASTIC_BAG_TAX_BPS)
    } else {
        TaxRate::from_bps(STANDARD_TAX_BPS)
    }
}

/// Tax-inclusive, discount-adjusted cost of an item. May be negative.
pub fn effective_cost(item: &LineItem) -> Amount {
    price_breakdown(item).effective_cost
}

/// Every intermediate figure of an item's pricing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct PriceBreakdown {
    pub tax_rate: TaxRate,
    pub price_before_tax: Amount,
    pub taxed_price: Amount,
    pub discount: Amount,
    pub effective_cost: Amount,
}

/// Prices an item, keeping the intermediate figures for display.
pub fn price_breakdown(item: &LineItem) -> PriceBreakdown {
    let tax_rate = tax_rate_for(&item.normalized_name);
    let taxed_price = item.price_before_tax.with_tax(tax_rate);
    let effective_cost = taxed_price - item.discount_amount;

    tracing::trace!(
        item = %item.normalized_name,
        rate_bps = tax_rate.bps(),
        effective = effective_cost.value(),
        "Priced line item"
    );

    PriceBreakdown {
        tax_rate,
        price_before_tax: item.price_before_tax,
        taxed_price,
        discount: item.discount_amount,
        effective_cost,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_selection() {
        assert_eq!(tax_rate_for("Plastic Shopping Bag").bps(), 1000);
        assert_eq!(tax_rate_for("plastic bag").bps(), 1000);
        assert_eq!(tax_rate_for("BAG OF PLASTIC FORKS").bps(), 1000);
        assert_eq!(tax_rate_for("Plastic Bottle").bps(), 800);
        assert_eq!(tax_rate_for("BAG").bps(), 800);
        assert_eq!(tax_rate_for("Milk").bps(), 800);
    }

    #[test]
    fn test_effective_cost_standard_item() {
        let item = LineItem::new("Milk", Amount::new(100.0));
        assert!(effective_cost(&item).approx_eq(Amount::new(108.0), 1e-9));
    }

    #[test]
    fn test_effective_cost_with_discount() {
        let item = LineItem::new("Bread", Amount::new(200.0)).with_discount(Amount::new(30.0));
        assert!(effective_cost(&item).approx_eq(Amount::new(186.0), 1e-9));
    }

    #[test]
    fn test_effective_cost_plastic_bag() {
        let item = LineItem::new("Plastic Bag", Amount::new(5.0));
        assert!(effective_cost(&item).approx_eq(Amount::new(5.5), 1e-9));
    }

    #[test]
    fn test_oversized_discount_is_not_clamped() {
        let item = LineItem::new("Tofu", Amount::new(50.0)).with_discount(Amount::new(100.0));
        let breakdown = price_breakdown(&item);
        assert!(breakdown.effective_cost.is_negative());
        assert!(breakdown.effective_cost.approx_eq(Amount::new(-46.0), 1e-9));
        assert!(breakdown.taxed_price.approx_eq(Amount::new(54.0), 1e-9));
    }
}
