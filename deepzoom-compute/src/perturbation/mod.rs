//! Perturbation theory computation for deep Mandelbrot zoom.
//!
//! One reference orbit is computed at a fixed decimal digit budget, its
//! series coefficients are derived once, and every other pixel's escape
//! step is estimated from its f64 offset to the reference.

mod estimate;
mod reference_orbit;
mod series;

pub use estimate::{estimate_escape, estimate_escape_linear};
pub use reference_orbit::ReferenceOrbit;
pub use series::{DeltaPowers, SeriesCoefficients, SeriesTerms};

use deepzoom_core::{
    pixel_offset, pixel_to_complex, reference_pixel, ComplexNumber, DecimalComplex, F64Complex,
    SampleCheck, Viewport,
};
use log::debug;

/// Extra decimal places used when re-iterating a sample pixel directly,
/// so the pixel keeps its own coordinate instead of snapping to the
/// reference grid.
const VERIFY_GUARD_DIGITS: u32 = 10;

/// Everything per-pixel estimation needs, built once per render pass.
#[derive(Clone, Debug)]
pub struct PerturbationContext {
    pub orbit: ReferenceOrbit,
    pub coeffs: SeriesCoefficients,
    pub reference_pixel: u32,
    pub reference_point: DecimalComplex,
    pub pixel_extent: (f64, f64),
    pub canvas_size: (u32, u32),
    pub max_iterations: u32,
}

impl PerturbationContext {
    /// Compute the reference orbit at the center pixel and its coefficients.
    pub fn new(
        viewport: &Viewport,
        canvas_size: (u32, u32),
        max_iterations: u32,
        digit_budget: u32,
    ) -> Self {
        let reference_pixel = reference_pixel(canvas_size);
        let reference_point =
            pixel_to_complex(reference_pixel, viewport, canvas_size).round_to(digit_budget);

        let orbit = ReferenceOrbit::compute(&reference_point, max_iterations, digit_budget);
        let coeffs = SeriesCoefficients::build(&orbit);

        debug!(
            "Reference orbit: pixel={} len={} escaped_at={:?} budget={} coefficients={}",
            reference_pixel,
            orbit.len(),
            orbit.escaped_at,
            digit_budget,
            coeffs.len()
        );

        Self {
            orbit,
            coeffs,
            reference_pixel,
            reference_point,
            pixel_extent: viewport.pixel_extent(canvas_size),
            canvas_size,
            max_iterations,
        }
    }

    #[inline]
    pub fn offset_of(&self, index: u32) -> F64Complex {
        pixel_offset(index, self.reference_pixel, self.pixel_extent, self.canvas_size)
    }

    /// Estimated escape step for a pixel, 0 inside the set.
    #[inline]
    pub fn escape_at_pixel(&self, index: u32) -> u32 {
        estimate_escape(self.offset_of(index), &self.coeffs, &self.orbit)
    }

    pub fn digit_budget(&self) -> u32 {
        self.orbit.digit_budget
    }
}

/// Escape step of `point` iterated directly at `digit_budget` places,
/// 0 if it stays bounded.
pub fn direct_escape(point: &DecimalComplex, max_iterations: u32, digit_budget: u32) -> u32 {
    ReferenceOrbit::compute(point, max_iterations, digit_budget)
        .escaped_at
        .unwrap_or(0)
}

/// Pixel halfway between the top-left corner and the reference.
pub fn sample_pixel(canvas_size: (u32, u32)) -> u32 {
    canvas_size.0 / 4 + canvas_size.0 * (canvas_size.1 / 4)
}

/// Compare the estimate for one pixel against direct high-precision
/// iteration of that pixel's own coordinate.
pub fn verify_reference_sample(
    context: &PerturbationContext,
    viewport: &Viewport,
    index: u32,
) -> SampleCheck {
    let point = pixel_to_complex(index, viewport, context.canvas_size);
    let direct = direct_escape(
        &point,
        context.max_iterations,
        context.digit_budget() + VERIFY_GUARD_DIGITS,
    );
    SampleCheck {
        index,
        estimated: context.escape_at_pixel(index),
        direct,
    }
}

#[cfg(test)]
mod tests;
