//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Surcharges make it worse:                                              │
//! │    3.5 units × $8.125/unit summed over many lines drifts by cents      │
//! │                                                                         │
//! │  OUR SOLUTION: Fixed-point decimal (rust_decimal)                       │
//! │    Every add/multiply is exact. Rounding to cents happens ONCE,         │
//! │    at display time, "half up" (midpoint away from zero).               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use quotecraft_core::money::Money;
//!
//! // Create from cents (preferred for literals)
//! let base = Money::from_cents(30000); // $300.00
//!
//! // Arithmetic operations
//! let doubled = base * 2;                          // $600.00
//! let total = base + Money::from_cents(5000);      // $350.00
//! assert_eq!(total.to_string(), "$350.00");
//! # let _ = doubled;
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

/// Number of decimal places shown for a monetary amount.
pub const DISPLAY_SCALE: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// Represents an exact monetary amount in the quote currency.
///
/// ## Design Decisions
/// - **Signed**: negative values are legal (discount options)
/// - **Unrounded**: intermediate results keep full precision
/// - **Serialized as a string**: `"382.00"`, never a JSON float
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │  Catalog.base_price ──┐                                                 │
/// │  Choice.price_adder ──┼──► PriceBreakdownLine.amount ──► unit_price     │
/// │  Range.unit_surcharge ┤                                    │            │
/// │  Extra.price ─────────┘                                    ▼            │
/// │                                              unit_price × qty = total   │
/// │                                                                         │
/// │  Displayed as "$382.00" in the quote line renderer                      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(#[ts(type = "string")] Decimal);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use quotecraft_core::money::Money;
    ///
    /// let adder = Money::from_cents(5000); // Represents $50.00
    /// assert_eq!(adder.cents(), 5000);
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, DISPLAY_SCALE))
    }

    /// Creates a Money value from major and minor units (dollars and cents).
    ///
    /// For negative amounts, only the major unit should be negative:
    /// `from_major_minor(-5, 50)` = -$5.50.
    ///
    /// ```rust
    /// use quotecraft_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    #[inline]
    pub fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money::from_cents(major * 100 - minor)
        } else {
            Money::from_cents(major * 100 + minor)
        }
    }

    /// Wraps an exact decimal amount.
    #[inline]
    pub const fn from_decimal(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Returns the exact, unrounded amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns the amount rounded half up to whole cents.
    ///
    /// Amounts beyond the `i64` cent range saturate at `i64::MIN`/`i64::MAX`.
    ///
    /// ```rust
    /// use quotecraft_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let m = Money::from_decimal(Decimal::new(1_2345, 4)); // 1.2345
    /// assert_eq!(m.cents(), 123);
    /// ```
    pub fn cents(&self) -> i64 {
        let mut rounded = self.rounded().0;
        rounded.rescale(DISPLAY_SCALE);
        i64::try_from(rounded.mantissa()).unwrap_or(if rounded.is_sign_negative() {
            i64::MIN
        } else {
            i64::MAX
        })
    }

    /// Rounds to 2 decimal places, half up (midpoint away from zero).
    ///
    /// This is the ONLY rounding in the engine. Call it at display or
    /// persistence boundaries, never between pricing steps.
    ///
    /// ```rust
    /// use quotecraft_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let m = Money::from_decimal(Decimal::new(125, 3)); // 0.125
    /// assert_eq!(m.rounded().cents(), 13);
    /// ```
    pub fn rounded(&self) -> Money {
        Money(
            self.0
                .round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns the absolute value.
    #[inline]
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies money by a line quantity.
    ///
    /// ## Example
    /// ```rust
    /// use quotecraft_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(38200); // $382.00
    /// let line_total = unit_price.multiply_quantity(2);
    /// assert_eq!(line_total.cents(), 76400); // $764.00
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0 * Decimal::from(qty))
    }

    /// Returns the amount formatted for display without the currency symbol,
    /// e.g. `"382.00"`.
    pub fn display_amount(&self) -> String {
        let mut rounded = self.rounded().0;
        rounded.rescale(DISPLAY_SCALE);
        rounded.to_string()
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the rounded amount with a `$` prefix.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rounded = self.rounded().0;
        rounded.rescale(DISPLAY_SCALE);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        write!(f, "{}${}", sign, rounded.abs())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Money)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0 * Decimal::from(qty))
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
    }
}

/// Multiplication by a decimal measure (surcharge per unit × excess units).
impl Mul<Decimal> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, units: Decimal) -> Self {
        Money(self.0 * units)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.amount(), dec!(10.99));
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "$10.99");
        assert_eq!(Money::from_cents(500).to_string(), "$5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-$5.50");
        assert_eq!(Money::from_cents(0).to_string(), "$0.00");
        assert_eq!(Money::from_decimal(dec!(382)).to_string(), "$382.00");
    }

    #[test]
    fn test_display_rounds_half_up() {
        assert_eq!(Money::from_decimal(dec!(0.125)).to_string(), "$0.13");
        assert_eq!(Money::from_decimal(dec!(0.005)).to_string(), "$0.01");
        assert_eq!(Money::from_decimal(dec!(0.004)).to_string(), "$0.00");
        assert_eq!(Money::from_decimal(dec!(-0.125)).to_string(), "-$0.13");
        assert_eq!(Money::from_decimal(dec!(-0.001)).to_string(), "$0.00");
    }

    #[test]
    fn test_no_float_drift() {
        let a = Money::from_decimal(dec!(0.1));
        let b = Money::from_decimal(dec!(0.2));
        assert_eq!(a + b, Money::from_decimal(dec!(0.3)));
    }

    #[test]
    fn test_rounding_only_at_the_end() {
        // 3 × 0.125 = 0.375 → $0.38, whereas rounding each term first
        // would give 3 × 0.13 = 0.39.
        let unit = Money::from_decimal(dec!(0.125));
        let total: Money = [unit, unit, unit].iter().sum();
        assert_eq!(total.cents(), 38);
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((-b).cents(), -500);
        let result: Money = a * 3;
        assert_eq!(result.cents(), 3000);
        assert_eq!((Money::from_cents(800) * dec!(4)).cents(), 3200);
    }

    #[test]
    fn test_cents_saturates_outside_i64() {
        let huge = Money::from_decimal(Decimal::from(i64::MAX) * dec!(10));
        assert_eq!(huge.cents(), i64::MAX);
        assert_eq!(Money::from_decimal(-huge.amount()).cents(), i64::MIN);
        assert_eq!(Money::from_decimal(dec!(92233720368547758.07)).cents(), i64::MAX);
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

    #[test]
    fn test_parse_and_display_amount() {
        let m: Money = "382.5".parse().unwrap();
        assert_eq!(m.display_amount(), "382.50");
        assert!("abc".parse::<Money>().is_err());
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Money::from_cents(38200)).unwrap();
        assert_eq!(json, "\"382.00\"");
        let back: Money = serde_json::from_str("\"50.00\"").unwrap();
        assert_eq!(back.cents(), 5000);
    }
}
