//! Fixed-point decimal number used for prices and strategy arithmetic.
//!
//! [`Decimal`] stores a real number scaled by `10^7` as a signed 64-bit
//! "numerator": `value = numerator / 10_000_000`. All arithmetic operates on
//! numerators, so additions and subtractions are exact and comparisons are
//! plain integer comparisons.
//!
//! Overflow of the numerator is **undefined by design**: legal price and
//! amount ranges in the simulator keep every intermediate well inside `i64`,
//! so no saturation or checking is performed. Callers stepping outside those
//! ranges get ordinary integer wrap/panic semantics.

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encoder::TextStream;

/// Precomputed powers of ten, `10^0` through `10^18`.
const POWS_OF_10: [i64; 19] = build_pows_of_10();

const fn build_pows_of_10() -> [i64; 19] {
    let mut table = [1i64; 19];
    let mut i = 1;
    while i < 19 {
        table[i] = table[i - 1] * 10;
        i += 1;
    }
    table
}

/// Returns `10^n` from a precomputed table. `n` must be at most 18.
#[inline]
pub const fn stored_pow10(n: usize) -> i64 {
    POWS_OF_10[n]
}

/// Errors from fallible fixed-point operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NumericError {
    /// The divisor's numerator was zero.
    #[error("division of a Decimal by zero")]
    DivisionByZero,
}

/// Fixed-point decimal scaled by `10^7`.
///
/// # Examples
///
/// ```
/// use arena_sdk::types::Decimal;
///
/// let price = Decimal::from(50_000) + Decimal::from_f64(0.5);
/// assert_eq!(price.numerator(), 500_005_000_000);
/// assert_eq!(price.to_int(), 50_001); // rounds half away from zero
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Decimal {
    numerator: i64,
}

/// Number of decimal digits in the internal scale.
pub const SCALE_DIGITS: u32 = 7;

/// The internal scale factor, `10^7`.
pub const SCALE: i64 = 10_000_000;

impl Decimal {
    /// The zero value.
    pub const ZERO: Decimal = Decimal { numerator: 0 };

    /// Build a value directly from an already-scaled numerator.
    ///
    /// Escape hatch for code that computed the scaled integer itself; the
    /// result represents `numerator / 10^7`.
    #[inline]
    pub const fn from_numerator(numerator: i64) -> Self {
        Self { numerator }
    }

    /// Convert a floating-point value, rounding half away from zero at the
    /// seventh decimal digit.
    #[inline]
    pub fn from_f64(value: f64) -> Self {
        let scaled = SCALE as f64 * value;
        let adjusted = if value > 0.0 { scaled + 0.5 } else { scaled - 0.5 };
        Self {
            numerator: adjusted as i64,
        }
    }

    /// Returns the raw scaled integer.
    #[inline]
    pub const fn numerator(&self) -> i64 {
        self.numerator
    }

    /// Returns `true` if the numerator is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.numerator == 0
    }

    /// Returns the value with a non-negative numerator.
    #[inline]
    pub const fn abs(&self) -> Self {
        Self {
            numerator: self.numerator.abs(),
        }
    }

    /// Convert to `f64` by exact division of the numerator (subject to
    /// ordinary floating rounding).
    #[inline]
    pub fn to_f64(&self) -> f64 {
        self.numerator as f64 / SCALE as f64
    }

    /// Round to the nearest integer, half away from zero.
    ///
    /// Negative values round symmetrically: `-1.5` becomes `-2`, not `-1`.
    #[inline]
    pub const fn to_int(&self) -> i64 {
        if self.numerator >= 0 {
            (self.numerator + SCALE / 2) / SCALE
        } else {
            -((-self.numerator + SCALE / 2) / SCALE)
        }
    }

    /// Truncating integer quotient of two values' numerators.
    ///
    /// Used where a count of whole units is required (e.g. a spread measured
    /// in minimum price steps). Distinct from [`Decimal::try_div`], which
    /// returns a `Decimal`.
    ///
    /// # Panics
    ///
    /// Panics if `divisor` is zero.
    #[inline]
    pub const fn integer_division(&self, divisor: Decimal) -> i64 {
        self.numerator / divisor.numerator
    }

    /// Divide by another `Decimal`, rounding half away from zero.
    ///
    /// Promotes to `i128` so the rescaled dividend cannot overflow.
    pub fn try_div(self, rhs: Decimal) -> Result<Decimal, NumericError> {
        if rhs.numerator == 0 {
            return Err(NumericError::DivisionByZero);
        }
        let widened = self.numerator as i128 * SCALE as i128;
        Ok(Decimal {
            numerator: div_round_half_away(widened, rhs.numerator as i128) as i64,
        })
    }
}

/// Divide `a` by non-zero `b`, rounding a remainder of exactly one half away
/// from zero regardless of the signs of the operands.
#[inline]
fn div_round_half_away(a: i128, b: i128) -> i128 {
    let (a, b) = if b < 0 { (-a, -b) } else { (a, b) };
    if a >= 0 {
        (a + b / 2) / b
    } else {
        -((-a + b / 2) / b)
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Decimal {
                /// Exact conversion: the integer scaled by `10^7`.
                #[inline]
                fn from(value: $t) -> Self {
                    Self {
                        numerator: value as i64 * SCALE,
                    }
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl Add for Decimal {
    type Output = Decimal;

    #[inline]
    fn add(self, rhs: Decimal) -> Decimal {
        Decimal {
            numerator: self.numerator + rhs.numerator,
        }
    }
}

impl Sub for Decimal {
    type Output = Decimal;

    #[inline]
    fn sub(self, rhs: Decimal) -> Decimal {
        Decimal {
            numerator: self.numerator - rhs.numerator,
        }
    }
}

impl AddAssign for Decimal {
    #[inline]
    fn add_assign(&mut self, rhs: Decimal) {
        self.numerator += rhs.numerator;
    }
}

impl SubAssign for Decimal {
    #[inline]
    fn sub_assign(&mut self, rhs: Decimal) {
        self.numerator -= rhs.numerator;
    }
}

impl Neg for Decimal {
    type Output = Decimal;

    #[inline]
    fn neg(self) -> Decimal {
        Decimal {
            numerator: -self.numerator,
        }
    }
}

impl Mul for Decimal {
    type Output = Decimal;

    /// Full-precision product, rounded half away from zero to the nearest
    /// numerator.
    #[inline]
    fn mul(self, rhs: Decimal) -> Decimal {
        let widened = self.numerator as i128 * rhs.numerator as i128;
        Decimal {
            numerator: div_round_half_away(widened, SCALE as i128) as i64,
        }
    }
}

impl Div for Decimal {
    type Output = Decimal;

    /// Operator form of [`Decimal::try_div`] for strategy arithmetic.
    ///
    /// # Panics
    ///
    /// Panics if `rhs` is zero; use [`Decimal::try_div`] to propagate the
    /// error instead.
    #[inline]
    fn div(self, rhs: Decimal) -> Decimal {
        self.try_div(rhs).expect("Decimal::div division by zero")
    }
}

impl Mul<i64> for Decimal {
    type Output = Decimal;

    /// Exact: the numerator is multiplied directly.
    #[inline]
    fn mul(self, rhs: i64) -> Decimal {
        Decimal {
            numerator: self.numerator * rhs,
        }
    }
}

impl Mul<Decimal> for i64 {
    type Output = Decimal;

    #[inline]
    fn mul(self, rhs: Decimal) -> Decimal {
        rhs * self
    }
}

impl Div<i64> for Decimal {
    type Output = Decimal;

    /// Divide the numerator by a plain integer, rounding half away from zero.
    ///
    /// A negative divisor negates both operands first, so the rounding
    /// direction is sign-symmetric.
    ///
    /// # Panics
    ///
    /// Panics if `rhs` is zero.
    #[inline]
    fn div(self, rhs: i64) -> Decimal {
        let (numerator, divisor) = if rhs < 0 {
            (-self.numerator, -rhs)
        } else {
            (self.numerator, rhs)
        };
        if numerator >= 0 {
            Decimal {
                numerator: (numerator + divisor / 2) / divisor,
            }
        } else {
            Decimal {
                numerator: -((-numerator + divisor / 2) / divisor),
            }
        }
    }
}

macro_rules! impl_mixed_add_sub {
    ($($t:ty => $into:expr),*) => {
        $(
            impl Add<$t> for Decimal {
                type Output = Decimal;

                #[inline]
                fn add(self, rhs: $t) -> Decimal {
                    self + $into(rhs)
                }
            }

            impl Add<Decimal> for $t {
                type Output = Decimal;

                #[inline]
                fn add(self, rhs: Decimal) -> Decimal {
                    $into(self) + rhs
                }
            }

            impl Sub<$t> for Decimal {
                type Output = Decimal;

                #[inline]
                fn sub(self, rhs: $t) -> Decimal {
                    self - $into(rhs)
                }
            }

            impl Sub<Decimal> for $t {
                type Output = Decimal;

                #[inline]
                fn sub(self, rhs: Decimal) -> Decimal {
                    $into(self) - rhs
                }
            }
        )*
    };
}

impl_mixed_add_sub!(i64 => Decimal::from, f64 => Decimal::from_f64);

impl Mul<f64> for Decimal {
    type Output = Decimal;

    /// Performed in double precision, re-rounded by the construction rule.
    #[inline]
    fn mul(self, rhs: f64) -> Decimal {
        Decimal::from_f64(self.to_f64() * rhs)
    }
}

impl Div<f64> for Decimal {
    type Output = Decimal;

    /// Performed in double precision, re-rounded by the construction rule.
    /// A zero or non-finite divisor produces a saturated, meaningless value;
    /// callers must keep floating divisors finite and non-zero.
    #[inline]
    fn div(self, rhs: f64) -> Decimal {
        Decimal::from_f64(self.to_f64() / rhs)
    }
}

impl PartialEq<i64> for Decimal {
    #[inline]
    fn eq(&self, other: &i64) -> bool {
        *self == Decimal::from(*other)
    }
}

impl PartialOrd<i64> for Decimal {
    #[inline]
    fn partial_cmp(&self, other: &i64) -> Option<std::cmp::Ordering> {
        self.partial_cmp(&Decimal::from(*other))
    }
}

impl PartialEq<f64> for Decimal {
    #[inline]
    fn eq(&self, other: &f64) -> bool {
        *self == Decimal::from_f64(*other)
    }
}

impl PartialOrd<f64> for Decimal {
    #[inline]
    fn partial_cmp(&self, other: &f64) -> Option<std::cmp::Ordering> {
        self.partial_cmp(&Decimal::from_f64(*other))
    }
}

impl fmt::Display for Decimal {
    /// Renders through [`TextStream`] at its default precision, so `1.5`
    /// prints as `1.5` and whole values print with no decimal point.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stream = TextStream::new();
        stream.append(self);
        f.write_str(&String::from_utf8_lossy(stream.view()))
    }
}
