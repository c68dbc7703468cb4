//! Reference orbit computation for perturbation rendering.
//!
//! Iterates the reference point at a fixed decimal digit budget and stores
//! the results as f64 for the per-pixel series evaluation.

use deepzoom_core::{ComplexNumber, F64Complex, ESCAPE_RADIUS_SQ};

/// A pre-computed reference orbit.
#[derive(Clone, Debug)]
pub struct ReferenceOrbit {
    /// Reference point C as f64
    pub c_ref: F64Complex,
    /// Orbit values Z_0..=Z_n as f64, with Z_0 = 0
    pub orbit: Vec<F64Complex>,
    /// Step at which |Z|² first exceeded 4 (None if it never did)
    pub escaped_at: Option<u32>,
    /// Decimal places every intermediate value was rounded to
    pub digit_budget: u32,
}

impl ReferenceOrbit {
    /// Compute `Z_{k+1} = Z_k² + c` until escape or `max_iterations` steps.
    ///
    /// The square and the sum are each rounded to `digit_budget` places
    /// (half away from zero), which keeps exact decimal arithmetic from
    /// growing without bound. For f64 inputs rounding is a no-op.
    pub fn compute<T: ComplexNumber>(c_ref: &T, max_iterations: u32, digit_budget: u32) -> Self {
        let c = c_ref.round_to(digit_budget);
        let mut z = c.zero();
        let mut orbit = Vec::with_capacity(max_iterations as usize + 1);
        orbit.push(z.to_f64_complex());

        let mut escaped_at = None;

        for k in 1..=max_iterations {
            z = z.square().round_to(digit_budget).add(&c).round_to(digit_budget);
            orbit.push(z.to_f64_complex());

            if z.exceeds_radius_sq(ESCAPE_RADIUS_SQ) {
                escaped_at = Some(k);
                break;
            }
        }

        Self {
            c_ref: c.to_f64_complex(),
            orbit,
            escaped_at,
            digit_budget,
        }
    }

    /// Last stored orbit index: the escape step, or `max_iterations` when
    /// the reference stayed bounded.
    pub fn escape_index(&self) -> u32 {
        self.orbit.len().saturating_sub(1) as u32
    }

    pub fn escaped(&self) -> bool {
        self.escaped_at.is_some()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.orbit.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orbit.is_empty()
    }
}
