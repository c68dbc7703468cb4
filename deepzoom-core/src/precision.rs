//! Precision selection for fractal rendering.
//!
//! Decides once per render whether f64 can resolve adjacent pixels, and if
//! not, how many decimal digits the reference orbit should carry.

use crate::{Decimal, Viewport};
use serde::{Deserialize, Serialize};

/// Pixel size (in plane units) at or below which f64 is no longer trusted.
/// Expressed as a power of ten: 1e-16.
const HIGH_PRECISION_PIXEL_EXPONENT: usize = 16;

/// Rendering strategy chosen for one render pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrecisionMode {
    /// Direct f64 iteration per pixel.
    Standard,
    /// One exact reference orbit plus series-approximated pixels.
    Perturbative,
}

impl std::fmt::Display for PrecisionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrecisionMode::Standard => write!(f, "standard"),
            PrecisionMode::Perturbative => write!(f, "perturbative"),
        }
    }
}

/// Mode plus the decimal digit budget used for the reference orbit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrecisionSelection {
    pub mode: PrecisionMode,
    /// Only meaningful for `Perturbative`; zero otherwise.
    pub digit_budget: u32,
}

/// Whether the per-pixel extent in either axis is at or below 1e-16.
///
/// Compared exactly, so the threshold holds even when the extent
/// underflows f64.
pub fn requires_high_precision(viewport: &Viewport, canvas_size: (u32, u32)) -> bool {
    let threshold = Decimal::from_scaled(1, HIGH_PRECISION_PIXEL_EXPONENT);
    let limit_x = threshold.mul(&Decimal::from_i64(canvas_size.0 as i64));
    let limit_y = threshold.mul(&Decimal::from_i64(canvas_size.1 as i64));
    viewport.width() <= &limit_x || viewport.height() <= &limit_y
}

/// Decimal places needed to resolve the view span near unit magnitude:
/// `ceil(-log10(width / 2))`, at least one.
///
/// This is a heuristic, not an error bound. Orbits near the boundary can
/// still lose accuracy; callers retry with a larger budget if needed.
pub fn digit_budget(viewport: &Viewport) -> u32 {
    let half_width = viewport.width().mul(&Decimal::from_scaled(5, 1));
    let digits = (-half_width.log10_approx()).ceil();
    if digits.is_finite() && digits > 1.0 {
        digits as u32
    } else {
        1
    }
}

/// Select the rendering mode for a viewport and canvas.
pub fn select_mode(viewport: &Viewport, canvas_size: (u32, u32)) -> PrecisionSelection {
    select_mode_forced(viewport, canvas_size, false)
}

/// Like [`select_mode`], but `force_high_precision` always picks `Perturbative`.
pub fn select_mode_forced(
    viewport: &Viewport,
    canvas_size: (u32, u32),
    force_high_precision: bool,
) -> PrecisionSelection {
    if force_high_precision || requires_high_precision(viewport, canvas_size) {
        PrecisionSelection {
            mode: PrecisionMode::Perturbative,
            digit_budget: digit_budget(viewport),
        }
    } else {
        PrecisionSelection {
            mode: PrecisionMode::Standard,
            digit_budget: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_view_is_standard() {
        let vp = Viewport::from_strings("-0.75", "0", "3.5", "2.8").unwrap();
        let selection = select_mode(&vp, (800, 640));
        assert_eq!(selection.mode, PrecisionMode::Standard);
        assert_eq!(selection.digit_budget, 0);
    }

    #[test]
    fn tiny_extent_is_perturbative() {
        let vp = Viewport::from_strings("-0.75", "0", "1e-18", "8e-19").unwrap();
        let selection = select_mode(&vp, (800, 640));
        assert_eq!(selection.mode, PrecisionMode::Perturbative);
        // -log10(5e-19) = 18.3
        assert_eq!(selection.digit_budget, 19);
    }

    #[test]
    fn threshold_is_inclusive() {
        // 800e-16 / 800 == 1e-16 exactly
        let at = Viewport::from_strings("0", "0", "8e-14", "1").unwrap();
        assert!(requires_high_precision(&at, (800, 640)));

        let above = Viewport::from_strings("0", "0", "8.0001e-14", "1").unwrap();
        assert!(!requires_high_precision(&above, (800, 640)));
    }

    #[test]
    fn height_alone_can_trigger_high_precision() {
        let vp = Viewport::from_strings("0", "0", "1", "1e-20").unwrap();
        assert!(requires_high_precision(&vp, (800, 640)));
    }

    #[test]
    fn forced_mode_uses_budget_heuristic() {
        let vp = Viewport::from_strings("-0.75", "0", "0.002", "0.0016").unwrap();
        let selection = select_mode_forced(&vp, (800, 640), true);
        assert_eq!(selection.mode, PrecisionMode::Perturbative);
        // -log10(0.001) = 3
        assert_eq!(selection.digit_budget, 3);
    }

    #[test]
    fn budget_is_at_least_one_digit() {
        let vp = Viewport::from_strings("0", "0", "100", "100").unwrap();
        assert_eq!(digit_budget(&vp), 1);
    }

    #[test]
    fn budget_grows_beyond_f64_range() {
        let vp = Viewport::from_strings("0", "0", "2e-500", "2e-500").unwrap();
        assert_eq!(digit_budget(&vp), 500);
    }
}
