//! Complex number types for orbit and perturbation arithmetic.
//!
//! Provides a trait abstraction over f64 and exact decimal complex numbers,
//! so the reference orbit can be computed at either precision with one
//! generic implementation.

use crate::{CoreError, Decimal};
use serde::{Deserialize, Serialize};

/// Squared escape radius shared by every iteration in the workspace.
pub const ESCAPE_RADIUS_SQ: i64 = 4;

/// Complex number type for Mandelbrot iteration.
///
/// Abstracts the operations the orbit engine needs, enabling a single
/// generic implementation for native doubles and exact decimals.
pub trait ComplexNumber: Clone + Sized {
    /// Returns the additive identity (zero).
    fn zero(&self) -> Self;

    /// Complex addition.
    fn add(&self, other: &Self) -> Self;

    /// Complex subtraction.
    fn sub(&self, other: &Self) -> Self;

    /// Complex multiplication.
    fn mul(&self, other: &Self) -> Self;

    /// Complex square (optimized).
    fn square(&self) -> Self;

    /// Integer power; `powi(0)` is one.
    fn powi(&self, exp: u32) -> Self;

    /// Magnitude squared as f64.
    fn norm_sq(&self) -> f64;

    /// Whether |z|² exceeds `radius_sq`, compared at the type's own precision.
    fn exceeds_radius_sq(&self, radius_sq: i64) -> bool;

    /// Round both components to `digits` decimal places.
    fn round_to(&self, digits: u32) -> Self;

    /// Down-cast to the native low-precision representation.
    fn to_f64_complex(&self) -> F64Complex;
}

/// Simple f64 complex number.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct F64Complex {
    pub re: f64,
    pub im: f64,
}

impl F64Complex {
    pub const ZERO: F64Complex = F64Complex { re: 0.0, im: 0.0 };
    pub const ONE: F64Complex = F64Complex { re: 1.0, im: 0.0 };

    #[inline]
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// Multiply by f64 scalar.
    #[inline]
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            re: self.re * factor,
            im: self.im * factor,
        }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.re == 0.0 && self.im == 0.0
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }
}

impl ComplexNumber for F64Complex {
    #[inline]
    fn zero(&self) -> Self {
        Self::ZERO
    }

    #[inline]
    fn add(&self, other: &Self) -> Self {
        Self {
            re: self.re + other.re,
            im: self.im + other.im,
        }
    }

    #[inline]
    fn sub(&self, other: &Self) -> Self {
        Self {
            re: self.re - other.re,
            im: self.im - other.im,
        }
    }

    #[inline]
    fn mul(&self, other: &Self) -> Self {
        Self {
            re: self.re * other.re - self.im * other.im,
            im: self.re * other.im + self.im * other.re,
        }
    }

    #[inline]
    fn square(&self) -> Self {
        Self {
            re: self.re * self.re - self.im * self.im,
            im: 2.0 * self.re * self.im,
        }
    }

    fn powi(&self, exp: u32) -> Self {
        (0..exp).fold(Self::ONE, |acc, _| acc.mul(self))
    }

    #[inline]
    fn norm_sq(&self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    #[inline]
    fn exceeds_radius_sq(&self, radius_sq: i64) -> bool {
        self.norm_sq() > radius_sq as f64
    }

    /// Doubles already carry a fixed precision; rounding is a no-op.
    #[inline]
    fn round_to(&self, _digits: u32) -> Self {
        *self
    }

    #[inline]
    fn to_f64_complex(&self) -> F64Complex {
        *self
    }
}

/// Exact decimal complex number for reference orbits at deep zoom.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecimalComplex {
    pub re: Decimal,
    pub im: Decimal,
}

impl DecimalComplex {
    pub fn new(re: Decimal, im: Decimal) -> Self {
        Self { re, im }
    }

    pub fn from_f64_pair(re: f64, im: f64) -> Result<Self, CoreError> {
        Ok(Self {
            re: Decimal::from_f64(re)?,
            im: Decimal::from_f64(im)?,
        })
    }

    pub fn from_strings(re: &str, im: &str) -> Result<Self, CoreError> {
        Ok(Self {
            re: Decimal::from_string(re)?,
            im: Decimal::from_string(im)?,
        })
    }

    /// Exact |z|².
    pub fn norm_sq_exact(&self) -> Decimal {
        self.re.mul(&self.re).add(&self.im.mul(&self.im))
    }
}

impl ComplexNumber for DecimalComplex {
    fn zero(&self) -> Self {
        Self {
            re: Decimal::zero(),
            im: Decimal::zero(),
        }
    }

    fn add(&self, other: &Self) -> Self {
        Self {
            re: self.re.add(&other.re),
            im: self.im.add(&other.im),
        }
    }

    fn sub(&self, other: &Self) -> Self {
        Self {
            re: self.re.sub(&other.re),
            im: self.im.sub(&other.im),
        }
    }

    fn mul(&self, other: &Self) -> Self {
        Self {
            re: self.re.mul(&other.re).sub(&self.im.mul(&other.im)),
            im: self.re.mul(&other.im).add(&self.im.mul(&other.re)),
        }
    }

    fn square(&self) -> Self {
        let cross = self.re.mul(&self.im);
        Self {
            re: self.re.mul(&self.re).sub(&self.im.mul(&self.im)),
            im: cross.add(&cross),
        }
    }

    fn powi(&self, exp: u32) -> Self {
        let one = Self::new(Decimal::one(), Decimal::zero());
        (0..exp).fold(one, |acc, _| acc.mul(self))
    }

    fn norm_sq(&self) -> f64 {
        self.norm_sq_exact().to_f64()
    }

    fn exceeds_radius_sq(&self, radius_sq: i64) -> bool {
        self.norm_sq_exact() > Decimal::from_i64(radius_sq)
    }

    fn round_to(&self, digits: u32) -> Self {
        Self {
            re: self.re.round_to(digits),
            im: self.im.round_to(digits),
        }
    }

    fn to_f64_complex(&self) -> F64Complex {
        F64Complex::new(self.re.to_f64(), self.im.to_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f64_complex_mul() {
        // (1 + 2i) * (3 + 4i) = -5 + 10i
        let a = F64Complex::new(1.0, 2.0);
        let b = F64Complex::new(3.0, 4.0);
        assert_eq!(a.mul(&b), F64Complex::new(-5.0, 10.0));
    }

    #[test]
    fn f64_complex_square() {
        // (3 + 4i)² = -7 + 24i
        let a = F64Complex::new(3.0, 4.0);
        assert_eq!(a.square(), F64Complex::new(-7.0, 24.0));
    }

    #[test]
    fn f64_complex_powi() {
        let i = F64Complex::new(0.0, 1.0);
        assert_eq!(i.powi(0), F64Complex::ONE);
        assert_eq!(i.powi(2), F64Complex::new(-1.0, 0.0));
        assert_eq!(i.powi(4), F64Complex::ONE);
    }

    #[test]
    fn f64_complex_escape_comparison() {
        assert!(!F64Complex::new(2.0, 0.0).exceeds_radius_sq(ESCAPE_RADIUS_SQ));
        assert!(F64Complex::new(2.0, 0.001).exceeds_radius_sq(ESCAPE_RADIUS_SQ));
    }

    #[test]
    fn decimal_complex_mul_is_exact() {
        let a = DecimalComplex::from_strings("0.1", "0.2").unwrap();
        let b = DecimalComplex::from_strings("0.3", "-0.4").unwrap();
        // (0.1 + 0.2i)(0.3 - 0.4i) = 0.03 + 0.08 + (-0.04 + 0.06)i = 0.11 + 0.02i
        let c = a.mul(&b);
        assert_eq!(c, DecimalComplex::from_strings("0.11", "0.02").unwrap());
    }

    #[test]
    fn decimal_complex_square_matches_mul() {
        let a = DecimalComplex::from_strings("-0.75", "0.125").unwrap();
        assert_eq!(a.square(), a.mul(&a));
        assert_eq!(a.powi(2), a.mul(&a));
    }

    #[test]
    fn decimal_complex_escape_is_strict() {
        let on_circle = DecimalComplex::from_strings("2", "0").unwrap();
        assert!(!on_circle.exceeds_radius_sq(ESCAPE_RADIUS_SQ));
        let outside = DecimalComplex::from_strings("2", "1e-40").unwrap();
        assert!(outside.exceeds_radius_sq(ESCAPE_RADIUS_SQ));
        // f64 cannot see this difference
        assert_eq!(outside.norm_sq(), 4.0);
    }

    #[test]
    fn decimal_complex_rounds_both_components() {
        let a = DecimalComplex::from_strings("0.12345", "-0.98765").unwrap();
        let r = a.round_to(3);
        assert_eq!(r, DecimalComplex::from_strings("0.123", "-0.988").unwrap());
    }

    #[test]
    fn decimal_complex_downcast() {
        let a = DecimalComplex::from_strings("-0.75", "0.1").unwrap();
        assert_eq!(a.to_f64_complex(), F64Complex::new(-0.75, 0.1));
    }
}
