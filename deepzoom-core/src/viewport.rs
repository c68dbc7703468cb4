use crate::{transforms, CoreError, Decimal, DecimalComplex};
use serde::{Deserialize, Serialize};

/// Viewport in the complex plane with exact decimal coordinates
///
/// Defines a rectangular region:
/// - `center`: Center point in the plane
/// - `width`: Visible width (real axis extent)
/// - `height`: Visible height (imaginary axis extent)
///
/// Extents are always strictly positive. A viewport is an immutable
/// snapshot: zooming or panning produces a new value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ViewportFields")]
pub struct Viewport {
    center: DecimalComplex,
    width: Decimal,
    height: Decimal,
}

#[derive(Deserialize)]
struct ViewportFields {
    center: DecimalComplex,
    width: Decimal,
    height: Decimal,
}

impl TryFrom<ViewportFields> for Viewport {
    type Error = CoreError;

    fn try_from(fields: ViewportFields) -> Result<Self, Self::Error> {
        Viewport::new(fields.center, fields.width, fields.height)
    }
}

impl Viewport {
    /// Create new viewport, rejecting zero or negative extents.
    pub fn new(center: DecimalComplex, width: Decimal, height: Decimal) -> Result<Self, CoreError> {
        if !width.is_positive() || !height.is_positive() {
            return Err(CoreError::InvalidViewport {
                width: width.to_string(),
                height: height.to_string(),
            });
        }
        Ok(Self {
            center,
            width,
            height,
        })
    }

    /// Create new viewport from f64 values.
    ///
    /// Use this for initial viewport creation or when f64 precision is sufficient.
    pub fn from_f64(center_x: f64, center_y: f64, width: f64, height: f64) -> Result<Self, CoreError> {
        Self::new(
            DecimalComplex::from_f64_pair(center_x, center_y)?,
            Decimal::from_f64(width)?,
            Decimal::from_f64(height)?,
        )
    }

    /// Create viewport from string representations (for extreme precision coordinates)
    pub fn from_strings(
        center_x: &str,
        center_y: &str,
        width: &str,
        height: &str,
    ) -> Result<Self, CoreError> {
        Self::new(
            DecimalComplex::from_strings(center_x, center_y)?,
            Decimal::from_string(width)?,
            Decimal::from_string(height)?,
        )
    }

    pub fn center(&self) -> &DecimalComplex {
        &self.center
    }

    pub fn width(&self) -> &Decimal {
        &self.width
    }

    pub fn height(&self) -> &Decimal {
        &self.height
    }

    /// Corner with the smallest real and imaginary parts (center minus half extent).
    pub fn min_corner(&self) -> DecimalComplex {
        let half = Decimal::from_scaled(5, 1);
        DecimalComplex::new(
            self.center.re.sub(&self.width.mul(&half)),
            self.center.im.sub(&self.height.mul(&half)),
        )
    }

    /// Size of one pixel in plane units, as f64.
    pub fn pixel_extent(&self, canvas_size: (u32, u32)) -> (f64, f64) {
        (
            self.width.to_f64() / canvas_size.0.max(1) as f64,
            self.height.to_f64() / canvas_size.1.max(1) as f64,
        )
    }

    /// New viewport centered at `point` with both extents scaled by `zoom_factor`.
    ///
    /// Factors below one zoom in (0.25 for a click), above one zoom out (4).
    pub fn zoomed_at(&self, point: DecimalComplex, zoom_factor: f64) -> Result<Self, CoreError> {
        let factor = Decimal::from_f64(zoom_factor)?;
        Self::new(point, self.width.mul(&factor), self.height.mul(&factor))
    }

    /// New viewport with the same extent moved to `point`.
    pub fn recentered(&self, point: DecimalComplex) -> Self {
        Self {
            center: point,
            width: self.width.clone(),
            height: self.height.clone(),
        }
    }

    /// Recenter on a pixel of a `canvas_size` rendering and scale the extent.
    pub fn zoom_at_pixel(
        &self,
        index: u32,
        canvas_size: (u32, u32),
        zoom_factor: f64,
    ) -> Result<Self, CoreError> {
        transforms::recenter_and_zoom(self, index, canvas_size, zoom_factor)
    }

    /// Shift by whole pixels of a `canvas_size` rendering.
    pub fn pan_pixels(&self, dx: i64, dy: i64, canvas_size: (u32, u32)) -> Self {
        transforms::pan_pixels(self, dx, dy, canvas_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_zero_width() {
        let result = Viewport::from_strings("0", "0", "0", "1");
        assert!(matches!(result, Err(CoreError::InvalidViewport { .. })));
    }

    #[test]
    fn new_rejects_negative_height() {
        let result = Viewport::from_f64(0.0, 0.0, 1.0, -2.8);
        assert!(matches!(result, Err(CoreError::InvalidViewport { .. })));
    }

    #[test]
    fn from_strings_returns_error_on_invalid_input() {
        let result = Viewport::from_strings("not_a_number", "0.0", "4.0", "3.0");
        assert!(matches!(result, Err(CoreError::Parse { .. })));
    }

    #[test]
    fn min_corner_is_center_minus_half_extent() {
        let vp = Viewport::from_f64(-0.75, 0.0, 3.5, 2.8).unwrap();
        let corner = vp.min_corner();
        assert_eq!(corner.re, Decimal::from_string("-2.5").unwrap());
        assert_eq!(corner.im, Decimal::from_string("-1.4").unwrap());
    }

    #[test]
    fn pixel_extent_divides_by_canvas() {
        let vp = Viewport::from_f64(0.0, 0.0, 4.0, 2.0).unwrap();
        assert_eq!(vp.pixel_extent((400, 100)), (0.01, 0.02));
    }

    #[test]
    fn zoomed_at_scales_extent_exactly() {
        let vp = Viewport::from_strings("-0.75", "0", "3.5", "2.8").unwrap();
        let point = DecimalComplex::from_strings("-1.25", "0.1").unwrap();
        let zoomed = vp.zoomed_at(point.clone(), 0.25).unwrap();

        assert_eq!(zoomed.center(), &point);
        assert_eq!(zoomed.width(), &Decimal::from_string("0.875").unwrap());
        assert_eq!(zoomed.height(), &Decimal::from_string("0.7").unwrap());
        // the original is untouched
        assert_eq!(vp.width(), &Decimal::from_string("3.5").unwrap());
    }

    #[test]
    fn zoomed_at_rejects_non_positive_factor() {
        let vp = Viewport::from_f64(0.0, 0.0, 1.0, 1.0).unwrap();
        let point = vp.center().clone();
        assert!(vp.zoomed_at(point.clone(), 0.0).is_err());
        assert!(vp.zoomed_at(point, f64::NAN).is_err());
    }

    #[test]
    fn zoom_at_pixel_quarters_extent() {
        let vp = Viewport::from_strings("-0.75", "0", "3.5", "2.8").unwrap();
        let zoomed = vp.zoom_at_pixel(0, (800, 640), 0.25).unwrap();
        assert_eq!(zoomed.center(), &DecimalComplex::from_strings("-2.5", "-1.4").unwrap());
        assert_eq!(zoomed.width(), &Decimal::from_string("0.875").unwrap());
    }

    #[test]
    fn viewport_supports_width_beyond_f64_range() {
        let vp = Viewport::from_strings("-0.75", "0.1", "1e-500", "8e-501").unwrap();
        assert!(vp.width().is_positive());
        assert_eq!(vp.width().to_f64(), 0.0);
        assert!((vp.width().log10_approx() + 500.0).abs() < 1e-9);
    }

    #[test]
    fn serialization_roundtrip_preserves_extreme_values() {
        let original = Viewport::from_strings(
            "-0.743643887037158704752191506114774",
            "0.131825904205311970493132056385139",
            "1e-40",
            "8e-41",
        )
        .unwrap();

        let json = serde_json::to_string(&original).unwrap();
        let restored: Viewport = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, original);
    }

    #[test]
    fn deserialization_rejects_degenerate_extent() {
        let json = r#"{"center":{"re":"0","im":"0"},"width":"0","height":"1"}"#;
        let result: Result<Viewport, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
