//! Mapping between pixel indices and points in the complex plane.
//!
//! Pixels are addressed by row-major index: column `index % width`,
//! row `index / width`. Row zero maps to the minimum imaginary coordinate.

use crate::{CoreError, Decimal, DecimalComplex, F64Complex, Viewport};

/// Extra decimal places carried when dividing the extent by the canvas size.
const MAPPING_GUARD_DIGITS: u32 = 20;

/// Split a row-major pixel index into (column, row).
#[inline]
pub fn pixel_position(index: u32, canvas_size: (u32, u32)) -> (u32, u32) {
    let width = canvas_size.0.max(1);
    (index % width, index / width)
}

/// Map a pixel to its exact point in the plane.
///
/// `re = col / w * width + xmin`, `im = row / h * height + ymin`. The
/// division by the canvas size is carried to the extent's own precision
/// plus guard digits, so the result distinguishes pixels at any depth.
pub fn pixel_to_complex(index: u32, viewport: &Viewport, canvas_size: (u32, u32)) -> DecimalComplex {
    let (col, row) = pixel_position(index, canvas_size);
    let min = viewport.min_corner();

    let re_digits = viewport.width().decimal_places() as u32 + MAPPING_GUARD_DIGITS;
    let im_digits = viewport.height().decimal_places() as u32 + MAPPING_GUARD_DIGITS;

    let re = viewport
        .width()
        .mul(&Decimal::from_i64(col as i64))
        .div_int(canvas_size.0, re_digits);
    let im = viewport
        .height()
        .mul(&Decimal::from_i64(row as i64))
        .div_int(canvas_size.1, im_digits);

    DecimalComplex::new(min.re.add(&re), min.im.add(&im))
}

/// The pixel whose coordinate serves as the perturbation reference:
/// `floor(w/2) + w * floor(h/2)`.
pub fn reference_pixel(canvas_size: (u32, u32)) -> u32 {
    canvas_size.0 / 2 + canvas_size.0 * (canvas_size.1 / 2)
}

/// Low-precision offset of `index` from `reference`, in plane units.
///
/// Computed from the pixel distance so it stays accurate even when the
/// absolute coordinates are indistinguishable in f64.
#[inline]
pub fn pixel_offset(
    index: u32,
    reference: u32,
    pixel_extent: (f64, f64),
    canvas_size: (u32, u32),
) -> F64Complex {
    let (col, row) = pixel_position(index, canvas_size);
    let (ref_col, ref_row) = pixel_position(reference, canvas_size);
    F64Complex::new(
        (col as f64 - ref_col as f64) * pixel_extent.0,
        (row as f64 - ref_row as f64) * pixel_extent.1,
    )
}

/// f64 view bounds used by the standard-precision path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaneBounds {
    pub x_min: f64,
    pub y_min: f64,
    pub width: f64,
    pub height: f64,
}

impl PlaneBounds {
    pub fn from_viewport(viewport: &Viewport) -> Self {
        let min = viewport.min_corner();
        Self {
            x_min: min.re.to_f64(),
            y_min: min.im.to_f64(),
            width: viewport.width().to_f64(),
            height: viewport.height().to_f64(),
        }
    }

    /// f64 counterpart of [`pixel_to_complex`].
    #[inline]
    pub fn pixel_to_point(&self, index: u32, canvas_size: (u32, u32)) -> F64Complex {
        let (col, row) = pixel_position(index, canvas_size);
        F64Complex::new(
            (col as f64 / canvas_size.0.max(1) as f64) * self.width + self.x_min,
            (row as f64 / canvas_size.1.max(1) as f64) * self.height + self.y_min,
        )
    }
}

/// Click navigation: center a new viewport on the clicked pixel and scale
/// the extent by `zoom_factor` (0.25 zooms in, 4 zooms out).
pub fn recenter_and_zoom(
    viewport: &Viewport,
    index: u32,
    canvas_size: (u32, u32),
    zoom_factor: f64,
) -> Result<Viewport, CoreError> {
    let point = pixel_to_complex(index, viewport, canvas_size);
    viewport.zoomed_at(point, zoom_factor)
}

/// Move the view by a whole number of pixels without changing the extent.
pub fn pan_pixels(viewport: &Viewport, dx: i64, dy: i64, canvas_size: (u32, u32)) -> Viewport {
    let re_digits = viewport.width().decimal_places() as u32 + MAPPING_GUARD_DIGITS;
    let im_digits = viewport.height().decimal_places() as u32 + MAPPING_GUARD_DIGITS;
    let shift_re = viewport
        .width()
        .mul(&Decimal::from_i64(dx))
        .div_int(canvas_size.0, re_digits);
    let shift_im = viewport
        .height()
        .mul(&Decimal::from_i64(dy))
        .div_int(canvas_size.1, im_digits);
    let center = viewport.center();
    viewport.recentered(DecimalComplex::new(
        center.re.add(&shift_re),
        center.im.add(&shift_im),
    ))
}
