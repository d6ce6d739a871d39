//! Fixed-point decimal scalar
//!
//! Every price, amount, filled quantity and accumulated money value in the
//! book is a `Fixed`: a signed 64-bit integer counting units of 10^-9.
//! The scale is global, so two `Fixed` values are always directly comparable.
//!
//! ## Multiplication
//! A plain scaled product `(a * b) / SCALE` overflows `i64` for ordinary
//! prices and amounts, so `Mul` pre-truncates both operands instead:
//! `(a / 10^5) * (b / 10^4)`. The low digits of each operand are discarded
//! before the product is taken. Money values in the book depend on this exact
//! truncation.
//!
//! ## Overflow
//! `+`, `-` and `*` wrap on `i64` overflow in every build profile. A notional
//! above about 9.2e9 units therefore yields a wrapped (possibly negative)
//! money value instead of a panic, so a matching pass always runs to
//! completion and leaves the book consistent.
//!
//! ```rust
//! use limit_book::domain::fixed::Fixed;
//!
//! let price = Fixed::from_ratio(15, 1);
//! let amount = Fixed::from_f64(100.0);
//! assert_eq!(price * amount, Fixed::from_ratio(1500, 1));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

/// Number of raw units in one nominal unit
pub const SCALE: i64 = 1_000_000_000;

// Mul operand divisors, MUL_LHS_DIV * MUL_RHS_DIV == SCALE
const MUL_LHS_DIV: i64 = 100_000;
const MUL_RHS_DIV: i64 = 10_000;

/// Integer-backed decimal, scaled by 10^9
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fixed(i64);

/// Limit price of an order
pub type Price = Fixed;

/// Quantity (total, filled or remaining) and traded money
pub type Amount = Fixed;

impl Fixed {
    pub const ZERO: Fixed = Fixed(0);
    pub const ONE: Fixed = Fixed(SCALE);
    pub const MAX: Fixed = Fixed(i64::MAX);

    /// Wraps an already scaled raw value
    #[inline]
    pub const fn from_raw(raw: i64) -> Self {
        Fixed(raw)
    }

    /// Raw scaled value
    #[inline]
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// `numerator / denominator`, truncated toward zero at 10^-9
    ///
    /// A quotient beyond `i64::MAX / SCALE` (about 9.2e9 units) keeps only
    /// its low 64 bits, like the wrapping arithmetic operators.
    ///
    /// # Panics
    /// Panics if `denominator` is zero.
    pub fn from_ratio(numerator: i64, denominator: i64) -> Self {
        // i128 keeps the intermediate product exact for any i64 numerator
        let scaled = numerator as i128 * SCALE as i128 / denominator as i128;
        Fixed(scaled as i64)
    }

    /// Converts a float by scaling and truncating; float rounding error is inherited
    ///
    /// Out-of-range values saturate at `i64::MIN` / `i64::MAX` raw.
    pub fn from_f64(value: f64) -> Self {
        Fixed((value * SCALE as f64) as i64)
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / SCALE as f64
    }

    /// Integer half, truncated toward zero
    #[inline]
    pub const fn half(self) -> Self {
        Fixed(self.0 / 2)
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl Add for Fixed {
    type Output = Fixed;

    #[inline]
    fn add(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.wrapping_add(rhs.0))
    }
}

impl AddAssign for Fixed {
    #[inline]
    fn add_assign(&mut self, rhs: Fixed) {
        self.0 = self.0.wrapping_add(rhs.0);
    }
}

impl Sub for Fixed {
    type Output = Fixed;

    #[inline]
    fn sub(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.wrapping_sub(rhs.0))
    }
}

impl SubAssign for Fixed {
    #[inline]
    fn sub_assign(&mut self, rhs: Fixed) {
        self.0 = self.0.wrapping_sub(rhs.0);
    }
}

impl Mul for Fixed {
    type Output = Fixed;

    /// Truncating product, see the module docs
    #[inline]
    fn mul(self, rhs: Fixed) -> Fixed {
        Fixed((self.0 / MUL_LHS_DIV).wrapping_mul(rhs.0 / MUL_RHS_DIV))
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = format!("{:.*}", f.precision().unwrap_or(5), self.to_f64());
        match f.width() {
            Some(width) => write!(f, "{:>width$}", text, width = width),
            None => f.write_str(&text),
        }
    }
}
