//! # Money Module
//!
//! Provides the `Amount` type for every monetary value in the engine.
//!
//! ## Why Full-Precision Amounts?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SPLITTING IS NOT SELLING                                               │
//! │                                                                         │
//! │  A shop rounds once per line. A split divides a taxed price by a       │
//! │  quantity and multiplies by arbitrary fractions:                        │
//! │                                                                         │
//! │    ¥100 × 1.08 / 3 × (1/3)  = ¥12.00                                    │
//! │    ¥98  × 1.08 / 3 × (2/3)  = ¥23.52                                    │
//! │                                                                         │
//! │  Rounding every intermediate step to whole cents would make each       │
//! │  person's total depend on the order of operations. Instead:            │
//! │    • carry full f64 precision through the whole settlement             │
//! │    • round ONLY when showing a figure (Display, round_to_minor)         │
//! │  The arithmetic is IEEE-754 and order-fixed, so results are            │
//! │  bit-for-bit reproducible for the same inputs.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use picsplit_core::money::Amount;
//!
//! let price = Amount::new(108.0);
//! let unit = price.divide_by_quantity(2);   // 54.00
//! let half = unit.scale(0.5);               // 27.00
//! assert_eq!(half.to_string(), "27.00");
//! assert_eq!(half.round_to_minor(), 2700);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Amount Type
// =============================================================================

/// A signed monetary value in major units (yen, dollars, ...).
///
/// ## Design Decisions
/// - **f64**: shares are arbitrary fractions; see the module docs
/// - **Signed**: a discount larger than the taxed price yields a negative
///   effective cost, which the settlement may propagate as a credit
/// - **Single field tuple struct**: serialises as a plain JSON number
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Amount(f64);

impl Amount {
    /// Creates an amount in major units.
    #[inline]
    pub const fn new(value: f64) -> Self {
        Amount(value)
    }

    /// Returns the raw value.
    #[inline]
    pub const fn value(&self) -> f64 {
        self.0
    }

    /// Returns zero.
    #[inline]
    pub const fn zero() -> Self {
        Amount(0.0)
    }

    /// Checks if the value is exactly zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }

    /// Checks if the value is strictly positive.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > 0.0
    }

    /// Checks if the value is strictly negative.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < 0.0
    }

    /// Checks the value is neither NaN nor infinite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }

    /// Returns the amount with `rate` added on top: `self * (1 + rate)`.
    ///
    /// ## Example
    /// ```rust
    /// use picsplit_core::money::Amount;
    /// use picsplit_core::types::TaxRate;
    ///
    /// let taxed = Amount::new(100.0).with_tax(TaxRate::from_bps(1000));
    /// assert_eq!(taxed.round_to_minor(), 11000);
    /// ```
    #[inline]
    pub fn with_tax(&self, rate: TaxRate) -> Amount {
        Amount(self.0 * (1.0 + rate.fraction()))
    }

    /// Divides the amount into `quantity` equal units.
    ///
    /// A quantity of zero returns zero; validated allocations never have one.
    #[inline]
    pub fn divide_by_quantity(&self, quantity: u32) -> Amount {
        if quantity == 0 {
            return Amount::zero();
        }
        Amount(self.0 / quantity as f64)
    }

    /// Multiplies the amount by a share value.
    #[inline]
    pub fn scale(&self, factor: f64) -> Amount {
        Amount(self.0 * factor)
    }

    /// Returns the amount, or zero when it is negative.
    #[inline]
    pub fn clamp_non_negative(&self) -> Amount {
        if self.0 < 0.0 {
            Amount::zero()
        } else {
            *self
        }
    }

    /// Rounds to hundredths of the major unit (cents) for display and
    /// reconciliation. Halves round away from zero.
    #[inline]
    pub fn round_to_minor(&self) -> i64 {
        (self.0 * 100.0).round() as i64
    }

    /// Checks two amounts are within `tolerance` of each other.
    #[inline]
    pub fn approx_eq(&self, other: Amount, tolerance: f64) -> bool {
        (self.0 - other.0).abs() <= tolerance
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Two decimals, sign first. Currency symbols are the caller's business.
impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minor = self.round_to_minor();
        let sign = if minor < 0 { "-" } else { "" };
        let minor = minor.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, minor / 100, minor % 100)
    }
}

impl Default for Amount {
    fn default() -> Self {
        Amount::zero()
    }
}

impl Add for Amount {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Amount(self.0 + other.0)
    }
}

impl AddAssign for Amount {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Amount {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Amount(self.0 - other.0)
    }
}

impl SubAssign for Amount {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Amount {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Amount(-self.0)
    }
}

/// Sums left to right, so the result depends only on iteration order.
impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::zero(), |acc, a| acc + a)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.fold(Amount::zero(), |acc, a| acc + *a)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Amount::new(54.0).to_string(), "54.00");
        assert_eq!(Amount::new(105.84).to_string(), "105.84");
        assert_eq!(Amount::new(-5.5).to_string(), "-5.50");
        assert_eq!(Amount::new(0.0).to_string(), "0.00");
        assert_eq!(Amount::new(-0.001).to_string(), "0.00");
    }

    #[test]
    fn test_with_tax() {
        let taxed = Amount::new(100.0).with_tax(TaxRate::from_bps(800));
        assert!(taxed.approx_eq(Amount::new(108.0), 1e-9));
    }

    #[test]
    fn test_divide_and_scale() {
        let unit = Amount::new(108.0).divide_by_quantity(3);
        assert!(unit.approx_eq(Amount::new(36.0), 1e-9));
        assert!(unit.scale(2.0).approx_eq(Amount::new(72.0), 1e-9));
        assert!(Amount::new(10.0).divide_by_quantity(0).is_zero());
    }

    #[test]
    fn test_clamp_non_negative() {
        assert!(Amount::new(-3.0).clamp_non_negative().is_zero());
        assert_eq!(Amount::new(3.0).clamp_non_negative(), Amount::new(3.0));
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Amount::new(10.5);
        let b = Amount::new(0.25);
        assert_eq!(a + b, Amount::new(10.75));
        assert_eq!(a - b, Amount::new(10.25));
        assert_eq!(-a, Amount::new(-10.5));

        let total: Amount = vec![a, b, b].into_iter().sum();
        assert_eq!(total, Amount::new(11.0));
    }

    #[test]
    fn test_zero_and_sign_checks() {
        assert!(Amount::zero().is_zero());
        assert!(!Amount::zero().is_positive());
        assert!(!Amount::zero().is_negative());
        assert!(Amount::new(0.01).is_positive());
        assert!(Amount::new(-0.01).is_negative());
        assert!(!Amount::new(f64::NAN).is_finite());
    }

    /// Splitting 100 three ways and adding the parts back is not exact in
    /// binary floating point; rounding to minor units hides the residue.
    #[test]
    fn test_three_way_split_rounds_back() {
        let third = Amount::new(100.0).divide_by_quantity(3);
        let rebuilt = third + third + third;
        assert_eq!(rebuilt.round_to_minor(), 10000);
    }
}
