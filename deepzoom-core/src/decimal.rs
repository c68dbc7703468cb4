use crate::CoreError;
use dashu::integer::IBig;
use dashu_float::DBig;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Exact decimal number backed by `dashu_float::DBig`.
///
/// Every value is held at unlimited precision, so addition, subtraction and
/// multiplication never round. Digit growth is bounded by calling
/// [`Decimal::round_to`] after each step, which rounds half away from zero
/// at a fixed number of places after the decimal point.
///
/// Scientific notation such as `"1e-2000"` is accepted and values far
/// outside the f64 range survive.
#[derive(Clone, Debug)]
pub struct Decimal {
    value: DBig,
}

/// Drop the precision limit so later arithmetic is exact.
fn unlimited(value: DBig) -> DBig {
    value.with_precision(0).value()
}

fn pow10(exp: usize) -> IBig {
    IBig::from(10u8).pow(exp)
}

/// `n / d` rounded half away from zero. `d` must be positive.
fn div_half_away(n: IBig, d: &IBig) -> IBig {
    let two = IBig::from(2u8);
    let twice_d = d * &two;
    if n < IBig::ZERO {
        -((&two * -n + d) / &twice_d)
    } else {
        (&two * n + d) / &twice_d
    }
}

impl Decimal {
    fn from_dbig(value: DBig) -> Self {
        Self {
            value: unlimited(value),
        }
    }

    pub fn zero() -> Self {
        Self { value: DBig::ZERO }
    }

    pub fn one() -> Self {
        Self { value: DBig::ONE }
    }

    pub fn from_i64(val: i64) -> Self {
        Self::from_dbig(DBig::from_parts(IBig::from(val), 0))
    }

    /// `mantissa * 10^-scale`, e.g. `from_scaled(25, 2)` is `0.25`.
    pub fn from_scaled(mantissa: i64, scale: usize) -> Self {
        Self::from_dbig(DBig::from_parts(IBig::from(mantissa), -(scale as isize)))
    }

    /// Parse a decimal string, e.g. `"-0.75"` or `"3.5e-18"`.
    pub fn from_string(val: &str) -> Result<Self, CoreError> {
        val.trim()
            .parse::<DBig>()
            .map(Self::from_dbig)
            .map_err(|e| CoreError::Parse {
                input: val.to_string(),
                reason: e.to_string(),
            })
    }

    /// Convert from f64 using its shortest round-trip decimal form.
    ///
    /// `0.1` becomes exactly `0.1`, not the binary expansion of the double.
    pub fn from_f64(val: f64) -> Result<Self, CoreError> {
        if !val.is_finite() {
            return Err(CoreError::NonFinite(val));
        }
        Self::from_string(&format!("{:e}", val))
    }

    /// Number of digits after the decimal point needed to write the value.
    pub fn decimal_places(&self) -> usize {
        let exponent = self.value.repr().exponent();
        if exponent < 0 {
            exponent.unsigned_abs()
        } else {
            0
        }
    }

    /// Nearest f64 (for low-precision work and display only).
    pub fn to_f64(&self) -> f64 {
        self.value.to_f64().value()
    }

    pub fn is_zero(&self) -> bool {
        self.value.repr().is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.value > DBig::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.value < DBig::ZERO
    }

    pub fn add(&self, other: &Self) -> Self {
        Self {
            value: &self.value + &other.value,
        }
    }

    pub fn sub(&self, other: &Self) -> Self {
        Self {
            value: &self.value - &other.value,
        }
    }

    pub fn mul(&self, other: &Self) -> Self {
        Self {
            value: &self.value * &other.value,
        }
    }

    pub fn neg(&self) -> Self {
        Self {
            value: -&self.value,
        }
    }

    pub fn abs(&self) -> Self {
        if self.is_negative() {
            self.neg()
        } else {
            self.clone()
        }
    }

    /// Integer power by repeated squaring. `x.pow(0)` is one.
    pub fn pow(&self, exp: u32) -> Self {
        let mut result = Self::one();
        let mut base = self.clone();
        let mut exp = exp;
        while exp > 0 {
            if exp & 1 == 1 {
                result = result.mul(&base);
            }
            exp >>= 1;
            if exp > 0 {
                base = base.mul(&base);
            }
        }
        result
    }

    /// Divide by a positive integer, rounding the quotient to `digits`
    /// decimal places (ties away from zero). A zero divisor is treated as one.
    pub fn div_int(&self, divisor: u32, digits: u32) -> Self {
        let digits = (digits as usize).max(self.decimal_places());
        let repr = self.value.repr();
        // value * 10^digits is an integer because digits >= decimal_places
        let shift = repr.exponent() + digits as isize;
        let scaled = repr.significand() * pow10(shift.unsigned_abs());
        let quotient = div_half_away(scaled, &IBig::from(divisor.max(1)));
        Self::from_dbig(DBig::from_parts(quotient, -(digits as isize)))
    }

    /// Round to `digits` places after the decimal point, ties away from zero.
    ///
    /// Scales by `10^digits`, rounds to an integer and scales back, all exact.
    pub fn round_to(&self, digits: u32) -> Self {
        if self.decimal_places() <= digits as usize {
            return self.clone();
        }

        let repr = self.value.repr();
        let shift = digits as isize;
        let scaled = DBig::from_parts(repr.significand().clone(), repr.exponent() + shift);
        let rounded = scaled.round();
        let rounded = rounded.repr();
        Self::from_dbig(DBig::from_parts(
            rounded.significand().clone(),
            rounded.exponent() - shift,
        ))
    }

    /// Approximate base-10 logarithm of the absolute value.
    ///
    /// Works for magnitudes far outside the f64 range because only the
    /// leading digits are converted. Zero yields negative infinity.
    pub fn log10_approx(&self) -> f64 {
        if self.is_zero() {
            return f64::NEG_INFINITY;
        }
        let repr = self.value.repr();
        let digits = repr.digits() as isize;
        // significand rescaled into [1, 10)
        let leading = DBig::from_parts(repr.significand().clone(), 1 - digits)
            .to_f64()
            .value()
            .abs();
        leading.log10() + (repr.exponent() + digits - 1) as f64
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl std::fmt::Display for Decimal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl std::str::FromStr for Decimal {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

impl Serialize for Decimal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Decimal::from_string(&value).map_err(serde::de::Error::custom)
    }
}
