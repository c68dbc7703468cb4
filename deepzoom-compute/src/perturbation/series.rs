//! Degree-4 series approximation of orbits near the reference.
//!
//! For a pixel at offset δ from the reference,
//! `z_{n+1}(c_ref + δ) ≈ Z_{n+1} + a1 δ + a2 δ² + a3 δ³ + a4 δ⁴`.
//! Substituting into `z² + c` gives the recurrence
//!
//! ```text
//! a1' = 2 Z a1 + 1
//! a2' = 2 Z a2 + a1²
//! a3' = 2 Z a3 + 2 a1 a2
//! a4' = 2 Z a4 + a2² + 2 a1 a3
//! ```
//!
//! Entry `n` describes orbit step `n + 1`, so entry 0 is `z_1 = δ`, the
//! base case `(1, 0, 0, 0)`, and entry `n` is built from `Z_n`. The table
//! may be shorter than the orbit when the terms overflow.

use super::ReferenceOrbit;
use deepzoom_core::{ComplexNumber, F64Complex};

/// Coefficients for one orbit step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SeriesTerms {
    pub a1: F64Complex,
    pub a2: F64Complex,
    pub a3: F64Complex,
    pub a4: F64Complex,
}

impl SeriesTerms {
    pub const BASE: SeriesTerms = SeriesTerms {
        a1: F64Complex::ONE,
        a2: F64Complex::ZERO,
        a3: F64Complex::ZERO,
        a4: F64Complex::ZERO,
    };

    /// Terms for the next orbit step, given this step's orbit value.
    #[inline]
    fn next(&self, z: F64Complex) -> Self {
        let two_z = z.scale(2.0);
        Self {
            a1: two_z.mul(&self.a1).add(&F64Complex::ONE),
            a2: two_z.mul(&self.a2).add(&self.a1.square()),
            a3: two_z.mul(&self.a3).add(&self.a1.mul(&self.a2).scale(2.0)),
            a4: two_z
                .mul(&self.a4)
                .add(&self.a2.square())
                .add(&self.a1.mul(&self.a3).scale(2.0)),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.a1.is_finite() && self.a2.is_finite() && self.a3.is_finite() && self.a4.is_finite()
    }

    /// `a1 δ + a2 δ² + a3 δ³ + a4 δ⁴` for precomputed powers of δ.
    #[inline]
    pub fn evaluate(&self, powers: &DeltaPowers) -> F64Complex {
        self.a1
            .mul(&powers.d1)
            .add(&self.a2.mul(&powers.d2))
            .add(&self.a3.mul(&powers.d3))
            .add(&self.a4.mul(&powers.d4))
    }
}

/// δ, δ², δ³ and δ⁴ for one pixel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeltaPowers {
    pub d1: F64Complex,
    pub d2: F64Complex,
    pub d3: F64Complex,
    pub d4: F64Complex,
}

impl DeltaPowers {
    #[inline]
    pub fn new(delta: F64Complex) -> Self {
        let d2 = delta.square();
        let d3 = d2.mul(&delta);
        let d4 = d3.mul(&delta);
        Self {
            d1: delta,
            d2,
            d3,
            d4,
        }
    }
}

/// Series coefficients for every step of a reference orbit. Immutable
/// once built and shared read-only by all pixel workers.
#[derive(Clone, Debug)]
pub struct SeriesCoefficients {
    terms: Vec<SeriesTerms>,
}

impl SeriesCoefficients {
    /// One entry per orbit step after `Z_0`, stopping before the first
    /// step whose terms overflow f64.
    ///
    /// A reference that lingers near a repelling cycle (the tip at -2,
    /// Misiurewicz points) grows its coefficients by a constant factor per
    /// step until they become infinite and then NaN. Entries past that
    /// point carry no information, so the table is cut there.
    pub fn build(orbit: &ReferenceOrbit) -> Self {
        let count = orbit.orbit.len().saturating_sub(1);
        let mut terms = Vec::with_capacity(count);

        if count > 0 {
            let mut current = SeriesTerms::BASE;
            terms.push(current);
            for z in &orbit.orbit[1..count] {
                current = current.next(*z);
                if !current.is_finite() {
                    break;
                }
                terms.push(current);
            }
        }

        Self { terms }
    }

    #[inline]
    pub fn get(&self, n: usize) -> Option<&SeriesTerms> {
        self.terms.get(n)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[SeriesTerms] {
        &self.terms
    }
}
