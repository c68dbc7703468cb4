use deepzoom_core::{ComplexNumber, EscapeResult, F64Complex, ESCAPE_RADIUS_SQ};

/// Escape-time iteration of a single point in f64.
///
/// Suitable while f64 can tell adjacent pixels apart. Returns the first
/// step `i` with |z|² > 4 and the smoothed count `i - log2(log2(|z|²)) + 4`;
/// points that stay bounded for `max_iterations` steps are inside.
pub fn iterate(point: F64Complex, max_iterations: u32) -> EscapeResult {
    let mut z = F64Complex::ZERO;

    for i in 1..=max_iterations {
        z = z.square().add(&point);

        let norm_sq = z.norm_sq();
        if norm_sq > ESCAPE_RADIUS_SQ as f64 {
            let smoothed = i as f64 - norm_sq.log2().log2() + 4.0;
            return EscapeResult::escaped(i, smoothed);
        }
    }

    EscapeResult::INSIDE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_is_in_set() {
        let result = iterate(F64Complex::ZERO, 100);
        assert!(!result.escaped, "Origin should be in set");
        assert_eq!(result.iterations, 0);
        assert_eq!(result.value(), 0.0);
    }

    #[test]
    fn main_cardioid_point_in_set() {
        let result = iterate(F64Complex::new(-0.5, 0.0), 500);
        assert!(!result.escaped, "Point (-0.5, 0) should be in set");
    }

    #[test]
    fn view_corner_escapes_on_first_step() {
        // |(-2.5, -1.4)|² = 8.21
        let result = iterate(F64Complex::new(-2.5, -1.4), 4000);
        assert!(result.escaped);
        assert_eq!(result.iterations, 1);
        let expected = 1.0 - 8.21f64.log2().log2() + 4.0;
        assert!((result.smoothed - expected).abs() < 1e-12);
    }

    #[test]
    fn point_on_radius_does_not_escape_immediately() {
        // z1 = 2 sits on the circle, z2 = 6 is outside
        let result = iterate(F64Complex::new(2.0, 0.0), 100);
        assert!(result.escaped);
        assert_eq!(result.iterations, 2);
    }

    #[test]
    fn point_outside_cardioid_cusp_escapes_at_twelve() {
        let result = iterate(F64Complex::new(0.3, 0.0), 300);
        assert!(result.escaped);
        assert_eq!(result.iterations, 12);
    }

    #[test]
    fn parabolic_point_stays_bounded() {
        // center of the default view
        let result = iterate(F64Complex::new(-0.75, 0.0), 4000);
        assert!(result.is_inside());
    }

    #[test]
    fn smoothed_value_is_always_positive_when_escaped() {
        for re in [-2.5, -2.1, 0.5, 1.0, 3.0, 100.0] {
            let result = iterate(F64Complex::new(re, 0.7), 50);
            assert!(result.escaped);
            assert!(result.value() > 0.0, "non-positive value at re={}", re);
        }
    }
}
