//! Per-pixel escape estimation from the series approximation.

use super::{DeltaPowers, ReferenceOrbit, SeriesCoefficients};
use deepzoom_core::{ComplexNumber, F64Complex, ESCAPE_RADIUS_SQ};

/// Whether the approximated orbit of a pixel is outside the escape radius
/// at step `n + 1`. An approximation that overflows counts as outside.
#[inline]
fn approximation_escapes(
    n: usize,
    powers: &DeltaPowers,
    coeffs: &SeriesCoefficients,
    orbit: &ReferenceOrbit,
) -> bool {
    match (coeffs.get(n), orbit.orbit.get(n + 1)) {
        (Some(terms), Some(z)) => {
            let approx = z.add(&terms.evaluate(powers));
            !approx.norm_sq().is_finite() || approx.exceeds_radius_sq(ESCAPE_RADIUS_SQ)
        }
        _ => false,
    }
}

/// Estimated escape step for the pixel at `offset` from the reference.
///
/// Binary search over the stored coefficients for the first step whose
/// approximated value lies outside the escape radius, assuming that once
/// outside it stays outside. That is not guaranteed near the boundary;
/// [`estimate_escape_linear`] gives the exact first crossing for comparison.
///
/// Returns 0 when the approximation never leaves the radius (inside the
/// set). A zero offset is the reference itself and returns its own
/// escape step.
pub fn estimate_escape(offset: F64Complex, coeffs: &SeriesCoefficients, orbit: &ReferenceOrbit) -> u32 {
    if offset.is_zero() {
        return orbit.escaped_at.unwrap_or(0);
    }
    if coeffs.is_empty() {
        return 0;
    }

    let powers = DeltaPowers::new(offset);
    let mut low = 0;
    let mut high = coeffs.len() - 1;
    if !approximation_escapes(high, &powers, coeffs, orbit) {
        return 0;
    }

    while low < high {
        let mid = low + (high - low) / 2;
        if approximation_escapes(mid, &powers, coeffs, orbit) {
            high = mid;
        } else {
            low = mid + 1;
        }
    }

    low as u32 + 1
}

/// First step at which the approximation leaves the escape radius, found
/// by scanning every step. Same conventions as [`estimate_escape`].
pub fn estimate_escape_linear(
    offset: F64Complex,
    coeffs: &SeriesCoefficients,
    orbit: &ReferenceOrbit,
) -> u32 {
    if offset.is_zero() {
        return orbit.escaped_at.unwrap_or(0);
    }

    let powers = DeltaPowers::new(offset);
    (0..coeffs.len())
        .find(|&n| approximation_escapes(n, &powers, coeffs, orbit))
        .map_or(0, |n| n as u32 + 1)
}
