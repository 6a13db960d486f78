//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A detail line total of 3 × 0.10 must be exactly 0.30, and the          │
//! │  average price in analytics must round the same way every time.         │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (cents)                              │
//! │    Prices arrive as decimal text ("1000.50"), are parsed once into      │
//! │    100050 cents, and every later calculation is integer arithmetic.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockroom_core::money::Money;
//!
//! let price = Money::parse_decimal("10.99").unwrap();
//! assert_eq!(price.cents(), 1099);
//!
//! let total = price.multiply_quantity(3).unwrap();
//! assert_eq!(total.to_string(), "32.97");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: differences and adjustments can be negative
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Stored as INTEGER**: the `sqlx` feature makes it a transparent column
///
/// ## Where Money is Used
/// ```text
/// Product.price ──┬──► OrderDetail.price (snapshot) ──► OrderDetail.total
///                 │
///                 └──► PriceAnalysis { min, max, average }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use stockroom_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole units (no fractional part).
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units * 100)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit portion.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
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

    /// Parses decimal text such as `"1000"`, `"12.5"` or `"-0.99"`.
    ///
    /// ## Rules
    /// - Surrounding whitespace is ignored
    /// - At most one leading sign
    /// - Digits after the second decimal place are rounded half away from zero
    /// - Exponent notation (`"1e3"`) is accepted
    /// - Anything else returns `None` (the caller decides what "not a number"
    ///   means for its field)
    ///
    /// ## Example
    /// ```rust
    /// use stockroom_core::money::Money;
    ///
    /// assert_eq!(Money::parse_decimal("1000").unwrap().cents(), 100000);
    /// assert_eq!(Money::parse_decimal(" 2.345 ").unwrap().cents(), 235);
    /// assert!(Money::parse_decimal("abc").is_none());
    /// assert!(Money::parse_decimal("").is_none());
    /// ```
    pub fn parse_decimal(text: &str) -> Option<Money> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        if let Some(money) = parse_plain_decimal(text) {
            return Some(money);
        }

        // Exponent notation falls back to f64; reject anything non-finite
        // or outside the i64 cents range.
        let value: f64 = text.parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        let cents = (value * 100.0).round();
        if cents.abs() >= i64::MAX as f64 {
            return None;
        }
        Some(Money(cents as i64))
    }

    /// Multiplies money by a quantity. `None` when the product does not fit
    /// in `i64` cents.
    ///
    /// ## Example
    /// ```rust
    /// use stockroom_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.multiply_quantity(3).unwrap().cents(), 897);
    /// assert!(unit_price.multiply_quantity(i64::MAX).is_none());
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds two amounts. `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Arithmetic mean of a set of amounts, rounded half away from zero to
    /// the nearest cent. Returns zero for an empty slice.
    ///
    /// ## Example
    /// ```rust
    /// use stockroom_core::money::Money;
    ///
    /// let prices = [Money::from_cents(100), Money::from_cents(101)];
    /// assert_eq!(Money::average(&prices).cents(), 101); // 100.5 → 101
    /// ```
    pub fn average(amounts: &[Money]) -> Money {
        if amounts.is_empty() {
            return Money::zero();
        }

        // i128 so that summing many large prices cannot overflow
        let sum: i128 = amounts.iter().map(|m| m.0 as i128).sum();
        let count = amounts.len() as i128;
        let half = count / 2;
        let rounded = if sum >= 0 {
            (sum + half) / count
        } else {
            (sum - half) / count
        };
        Money(rounded as i64)
    }
}

/// Parses `[-+]digits[.digits]` without going through floating point.
fn parse_plain_decimal(text: &str) -> Option<Money> {
    let (negative, body) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };

    let (whole, fraction) = match body.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (body, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let whole_value: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };

    let mut digits = fraction.bytes().map(|b| (b - b'0') as i64);
    let tenths = digits.next().unwrap_or(0);
    let hundredths = digits.next().unwrap_or(0);
    let round_up = digits.next().map(|d| d >= 5).unwrap_or(false);

    let mut cents = whole_value
        .checked_mul(100)?
        .checked_add(tenths * 10 + hundredths)?;
    if round_up {
        cents = cents.checked_add(1)?;
    }

    Some(Money(if negative { -cents } else { cents }))
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money as a plain two-decimal number (`"1000.50"`).
///
/// ## Note
/// Currency symbols and grouping are a frontend concern.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.units().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
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

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents_and_parts() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.units(), 10);
        assert_eq!(money.cents_part(), 99);
        assert_eq!(Money::from_units(5).cents(), 500);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(-5).to_string(), "-0.05");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_parse_decimal_plain() {
        assert_eq!(Money::parse_decimal("1000").unwrap().cents(), 100_000);
        assert_eq!(Money::parse_decimal("12.5").unwrap().cents(), 1250);
        assert_eq!(Money::parse_decimal(".75").unwrap().cents(), 75);
        assert_eq!(Money::parse_decimal("3.").unwrap().cents(), 300);
        assert_eq!(Money::parse_decimal("-0.99").unwrap().cents(), -99);
        assert_eq!(Money::parse_decimal("+4.10").unwrap().cents(), 410);
    }

    #[test]
    fn test_parse_decimal_rounds_extra_places() {
        assert_eq!(Money::parse_decimal("2.345").unwrap().cents(), 235);
        assert_eq!(Money::parse_decimal("2.344").unwrap().cents(), 234);
        assert_eq!(Money::parse_decimal("-2.345").unwrap().cents(), -235);
    }

    #[test]
    fn test_parse_decimal_exponent() {
        assert_eq!(Money::parse_decimal("1e3").unwrap().cents(), 100_000);
    }

    #[test]
    fn test_parse_decimal_rejects_garbage() {
        assert!(Money::parse_decimal("").is_none());
        assert!(Money::parse_decimal("   ").is_none());
        assert!(Money::parse_decimal("abc").is_none());
        assert!(Money::parse_decimal("1.2.3").is_none());
        assert!(Money::parse_decimal(".").is_none());
        assert!(Money::parse_decimal("-").is_none());
        assert!(Money::parse_decimal("NaN").is_none());
        assert!(Money::parse_decimal("inf").is_none());
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!(a.multiply_quantity(3), Some(Money::from_cents(3000)));
        assert_eq!(a.checked_add(b), Some(Money::from_cents(1500)));

        let total: Money = [a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_checked_arithmetic_overflow() {
        let ten = Money::from_units(10);
        assert!(ten.multiply_quantity(i64::MAX / 2).is_none());
        assert!(Money::from_cents(-1).multiply_quantity(i64::MIN).is_none());
        assert!(Money::from_cents(i64::MAX).checked_add(Money::from_cents(1)).is_none());
    }

    #[test]
    fn test_average_rounding() {
        assert_eq!(Money::average(&[]).cents(), 0);
        assert_eq!(
            Money::average(&[Money::from_cents(100), Money::from_cents(200)]).cents(),
            150
        );
        // 1/3 of a cent rounds down, 2/3 rounds up
        assert_eq!(
            Money::average(&[
                Money::from_cents(100),
                Money::from_cents(100),
                Money::from_cents(101)
            ])
            .cents(),
            100
        );
        assert_eq!(
            Money::average(&[
                Money::from_cents(100),
                Money::from_cents(101),
                Money::from_cents(101)
            ])
            .cents(),
            101
        );
    }

    #[test]
    fn test_zero_and_checks() {
        assert!(Money::zero().is_zero());
        assert!(Money::from_cents(100).is_positive());
        assert!(Money::from_cents(-100).is_negative());
    }
}
