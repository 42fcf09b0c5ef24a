//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely, plus the
//! [`RevenueShare`] percentage type used for coach compensation splits.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  In a settlement engine that prorates refunds and splits revenue,       │
//! │  that error compounds across every subscription every month.            │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    $300.00 × 15/30 = 30000 × 15 / 30 = 15000 cents, exactly            │
//! │    Where division cannot be exact we round half-up, once, explicitly   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use clubos_core::money::{Money, RevenueShare};
//!
//! // Create from cents (preferred)
//! let price = Money::from_cents(30_000); // $300.00
//!
//! // Prorate: 15 of 30 days unused
//! assert_eq!(price.prorate(15, 30).cents(), 15_000);
//!
//! // Split: coach keeps 70%
//! assert_eq!(price.share_of(RevenueShare::from_bps(7000)).cents(), 21_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for refunds and income
///   adjustments
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// Every monetary value in the engine flows through this type: catalog
/// prices, payments, refunds, coach shares, salaries, deductions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts, only the major unit should be negative:
    /// `from_major_minor(-5, 50)` = -$5.50, not -$4.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99, absolute value).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Clamps negative values to zero.
    ///
    /// Used for derived balances that must never go below zero, such as a
    /// subscription's remaining amount.
    #[inline]
    pub const fn clamp_non_negative(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            *self
        }
    }

    /// Takes a percentage share of this amount, rounding half-up.
    ///
    /// ## Implementation
    /// Integer math in i128 to prevent overflow on large amounts:
    /// `(amount_cents * bps + 5000) / 10000`. The +5000 provides the
    /// half-up rounding (5000/10000 = 0.5).
    ///
    /// ## Example
    /// ```rust
    /// use clubos_core::money::{Money, RevenueShare};
    ///
    /// let paid = Money::from_cents(100_000); // $1000.00
    /// let coach = paid.share_of(RevenueShare::from_bps(7000)); // 70%
    /// assert_eq!(coach.cents(), 70_000); // $700.00
    /// ```
    pub fn share_of(&self, share: RevenueShare) -> Money {
        let cents = (self.0 as i128 * share.bps() as i128 + 5000) / 10_000;
        Money::from_cents(cents as i64)
    }

    /// Prorates this amount by `numerator / denominator`, rounding half-up.
    ///
    /// Used for refunds: unused entries over total entries, or unused days
    /// over total days. A non-positive denominator yields zero (a zero-length
    /// subscription has nothing to prorate), and the numerator is clamped to
    /// `[0, denominator]` so a proration can never exceed the base amount.
    ///
    /// ## Example
    /// ```rust
    /// use clubos_core::money::Money;
    ///
    /// let paid = Money::from_cents(20_000); // $200.00
    /// // 15 of 20 entries unused
    /// assert_eq!(paid.prorate(15, 20).cents(), 15_000); // $150.00
    /// ```
    pub fn prorate(&self, numerator: i64, denominator: i64) -> Money {
        if denominator <= 0 {
            return Money::zero();
        }
        let numerator = numerator.clamp(0, denominator);
        // Half-up without a fractional intermediate:
        // (a*n)/d rounded half-up == (2*a*n + d) / (2*d) for non-negative a
        let cents = (2 * self.0 as i128 * numerator as i128 + denominator as i128)
            / (2 * denominator as i128);
        Money::from_cents(cents as i64)
    }
}

// =============================================================================
// Revenue Share
// =============================================================================

/// A revenue-share percentage represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 7000 bps = 70.00% (a typical private-training coach split)
///
/// Storing the split as an integer keeps the coach/club division exact and
/// auditable; the fractional percent only exists at the UI boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RevenueShare(u32);

impl RevenueShare {
    /// Creates a revenue share from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        RevenueShare(bps)
    }

    /// Creates a revenue share from a percentage (for convenience).
    pub fn from_percent(pct: f64) -> Self {
        RevenueShare((pct * 100.0).round() as u32)
    }

    /// Returns the share in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the share as a percentage (for display only).
    #[inline]
    pub fn percent(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero share.
    #[inline]
    pub const fn zero() -> Self {
        RevenueShare(0)
    }

    /// Checks if the share is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for RevenueShare {
    fn default() -> Self {
        RevenueShare::zero()
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs and debugging. Use frontend formatting for actual UI
/// display to handle localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Negation (for refund income adjustments).
impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by i64 (for quantity-style calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Sum of an iterator of Money values.
impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor_part(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        let money = Money::from_major_minor(10, 99);
        assert_eq!(money.cents(), 1099);

        let negative = Money::from_major_minor(-5, 50);
        assert_eq!(negative.cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);
        assert_eq!((-a).cents(), -1000);
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 250, 50].into_iter().map(Money::from_cents).sum();
        assert_eq!(total.cents(), 400);
    }

    #[test]
    fn test_clamp_non_negative() {
        assert_eq!(Money::from_cents(-1).clamp_non_negative().cents(), 0);
        assert_eq!(Money::from_cents(42).clamp_non_negative().cents(), 42);
    }

    #[test]
    fn test_share_of_exact() {
        // $1000.00 at 70% = $700.00
        let paid = Money::from_cents(100_000);
        let coach = paid.share_of(RevenueShare::from_bps(7000));
        assert_eq!(coach.cents(), 70_000);
    }

    #[test]
    fn test_share_of_rounds_half_up() {
        // 1001 cents at 50% = 500.5 → 501
        let amount = Money::from_cents(1001);
        assert_eq!(amount.share_of(RevenueShare::from_bps(5000)).cents(), 501);
    }

    #[test]
    fn test_prorate_time_based_refund() {
        // $300.00, 15 of 30 days remaining → $150.00
        let paid = Money::from_cents(30_000);
        assert_eq!(paid.prorate(15, 30).cents(), 15_000);
    }

    #[test]
    fn test_prorate_entry_based_refund() {
        // $200.00, 15 of 20 entries unused → $150.00
        let paid = Money::from_cents(20_000);
        assert_eq!(paid.prorate(15, 20).cents(), 15_000);
    }

    #[test]
    fn test_prorate_rounds_half_up() {
        // 100 cents * 1/8 = 12.5 → 13
        let amount = Money::from_cents(100);
        assert_eq!(amount.prorate(1, 8).cents(), 13);
    }

    #[test]
    fn test_prorate_clamps_numerator() {
        let amount = Money::from_cents(1000);
        // More unused than total can never refund above the base
        assert_eq!(amount.prorate(40, 30).cents(), 1000);
        // Negative remaining prorates to zero
        assert_eq!(amount.prorate(-5, 30).cents(), 0);
    }

    #[test]
    fn test_prorate_zero_denominator() {
        let amount = Money::from_cents(1000);
        assert_eq!(amount.prorate(1, 0).cents(), 0);
    }

    #[test]
    fn test_revenue_share_from_percent() {
        let share = RevenueShare::from_percent(70.0);
        assert_eq!(share.bps(), 7000);
        assert!((share.percent() - 70.0).abs() < 0.001);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs().cents(), 100);
    }
}
