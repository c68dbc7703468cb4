use serde::{Deserialize, Serialize};

/// Smallest smoothed value reported for an escaped point.
///
/// The smoothing formula can dip to zero or below for points that leave
/// the radius on the first steps; zero is reserved for "inside the set".
pub const SMOOTH_FLOOR: f64 = 1e-6;

/// Escape data computed for one pixel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EscapeResult {
    /// Step at which |z|² first exceeded the radius (0 if it never did).
    pub iterations: u32,
    /// Continuous escape count used for coloring. 0 inside the set.
    pub smoothed: f64,
    /// Whether the point escaped.
    pub escaped: bool,
}

impl EscapeResult {
    /// Point that stayed bounded for every iteration.
    pub const INSIDE: EscapeResult = EscapeResult {
        iterations: 0,
        smoothed: 0.0,
        escaped: false,
    };

    /// Escaped point. A non-finite or non-positive smoothed value is
    /// replaced so it never collides with the inside marker or breaks
    /// JSON serialization.
    pub fn escaped(iterations: u32, smoothed: f64) -> Self {
        let fallback = (iterations as f64).max(SMOOTH_FLOOR);
        Self {
            iterations,
            smoothed: sanitize_smoothed(smoothed, fallback),
            escaped: true,
        }
    }

    /// Value handed to the palette: smoothed count, or 0 inside the set.
    #[inline]
    pub fn value(&self) -> f64 {
        if self.escaped {
            self.smoothed
        } else {
            0.0
        }
    }

    #[inline]
    pub fn is_inside(&self) -> bool {
        !self.escaped
    }
}

impl Default for EscapeResult {
    fn default() -> Self {
        Self::INSIDE
    }
}

#[inline]
fn sanitize_smoothed(value: f64, fallback: f64) -> f64 {
    if !value.is_finite() {
        fallback
    } else if value <= 0.0 {
        SMOOTH_FLOOR
    } else {
        value
    }
}
