use crate::mandelbrot::iterate;
use crate::perturbation::{ReferenceOrbit, SeriesCoefficients};
use deepzoom_core::{DecimalComplex, F64Complex};

/// Digit budget generous enough that rounding never decides an escape
/// in the shallow views used here.
pub const TEST_BUDGET: u32 = 30;

pub fn decimal_point(re: &str, im: &str) -> DecimalComplex {
    DecimalComplex::from_strings(re, im).unwrap()
}

/// Reference orbit plus coefficients for a point given as decimal strings.
pub fn reference(re: &str, im: &str, max_iterations: u32) -> (ReferenceOrbit, SeriesCoefficients) {
    let orbit = ReferenceOrbit::compute(&decimal_point(re, im), max_iterations, TEST_BUDGET);
    let coeffs = SeriesCoefficients::build(&orbit);
    (orbit, coeffs)
}

/// Escape step from plain f64 iteration, 0 if bounded.
pub fn direct_f64(point: F64Complex, max_iterations: u32) -> u32 {
    iterate(point, max_iterations).iterations
}
