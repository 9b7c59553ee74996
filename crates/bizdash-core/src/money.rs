//! # Money Module
//!
//! Provides the `Money` type for handling rupee amounts safely.
//!
//! ## Why Integer Paise?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The dashboard API sends prices as JSON numbers:                        │
//! │    0.1 + 0.2 = 0.30000000000000004                                      │
//! │                                                                         │
//! │  Summing a hundred line items in f64 drifts by fractions of a paisa,   │
//! │  and the drift shows up in the exported totals.                         │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise (1 rupee = 100 paise)                      │
//! │    ₹25,000 + ₹2,000 = 2500000 + 200000 = 2700000 paise                 │
//! │    Converted back to rupees only at the wire / render boundary          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bizdash_core::money::Money;
//!
//! let price = Money::from_paise(2_500_000); // ₹25,000.00
//! let total = price + Money::from_rupees(2_000);
//!
//! assert_eq!(total.paise(), 2_700_000);
//! assert_eq!(total.to_string(), "₹27,000.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in paise (the smallest INR unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: Arithmetic stays closed under subtraction
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Saturating arithmetic**: Ingested amounts are unbounded, so sums and
///   products clamp at `i64::MIN`/`i64::MAX` instead of overflowing
/// - **Derives**: Full serde support for JSON serialization
///
/// ## Where Money is Used
/// ```text
/// LineItem.unit_price ──► LineItem.line_total ──► subtotal
///                                                    │
///                              compute_gst(18%) ◄────┤
///                                                    ▼
///                                              grand total ──► "₹17,700.00"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise.
    ///
    /// ## Example
    /// ```rust
    /// use bizdash_core::money::Money;
    ///
    /// let price = Money::from_paise(1099); // ₹10.99
    /// assert_eq!(price.paise(), 1099);
    /// ```
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from whole rupees.
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees.saturating_mul(100))
    }

    /// Converts a decimal rupee amount received over the wire.
    ///
    /// Rounds half away from zero to the nearest paisa. Non-finite input
    /// yields zero. This is the only entry point from floating point and it
    /// exists for the API boundary; never use it for arithmetic. Amounts
    /// beyond the `i64` paise range clamp to its bounds.
    ///
    /// ## Example
    /// ```rust
    /// use bizdash_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal_rupees(99.99).paise(), 9999);
    /// assert_eq!(Money::from_decimal_rupees(0.005).paise(), 1);
    /// assert_eq!(Money::from_decimal_rupees(f64::NAN).paise(), 0);
    /// ```
    pub fn from_decimal_rupees(rupees: f64) -> Self {
        if !rupees.is_finite() {
            return Money::zero();
        }
        Money((rupees * 100.0).round() as i64)
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion.
    ///
    /// ```rust
    /// use bizdash_core::money::Money;
    ///
    /// assert_eq!(Money::from_paise(1099).rupees(), 10);
    /// assert_eq!(Money::from_paise(-550).rupees(), -5);
    /// ```
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns the amount as decimal rupees for wire and spreadsheet output.
    #[inline]
    pub fn to_decimal_rupees(&self) -> f64 {
        self.0 as f64 / 100.0
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

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Calculates tax at the given rate.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`. The +5000 rounds half
    /// up, so the result is exact whenever `amount × rate` is a whole number
    /// of paise and otherwise lands on the nearest paisa.
    ///
    /// ## Example
    /// ```rust
    /// use bizdash_core::money::Money;
    /// use bizdash_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_rupees(15_000);
    /// let gst = subtotal.calculate_tax(TaxRate::GST);
    /// assert_eq!(gst, Money::from_rupees(2_700));
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 so large invoices cannot overflow the intermediate product
        let sign = if self.0 < 0 { -1 } else { 1 };
        let tax = (self.0.unsigned_abs() as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_paise(sign * i64::try_from(tax).unwrap_or(i64::MAX))
    }

    /// Multiplies a unit price by a quantity, clamping at the `i64` bounds.
    ///
    /// ```rust
    /// use bizdash_core::money::Money;
    ///
    /// let unit_price = Money::from_paise(299);
    /// assert_eq!(unit_price.multiply_quantity(3).paise(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Formats with the rupee sign and Indian digit grouping: `₹1,23,456.00`.
    pub fn format_inr(&self) -> String {
        self.format_with_symbol("₹")
    }

    /// Same grouping with an ASCII prefix: `Rs. 1,23,456.00`.
    ///
    /// The built-in PDF fonts only cover WinAnsi, which has no `₹` glyph.
    pub fn format_inr_ascii(&self) -> String {
        self.format_with_symbol("Rs. ")
    }

    fn format_with_symbol(&self, symbol: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            symbol,
            group_indian(self.rupees().unsigned_abs()),
            self.paise_part()
        )
    }
}

/// Groups digits the Indian way: last three, then pairs (12,34,567).
fn group_indian(value: u64) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_inr())
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
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
