//! Render request and response types exchanged with front ends.
//!
//! Coordinates travel as decimal strings so no precision is lost in JSON.

use crate::{CoreError, Decimal, DecimalComplex, Palette, PrecisionMode, Viewport};
use serde::{Deserialize, Serialize};

/// One render pass: where to look, at what size and depth.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderRequest {
    pub center_re: Decimal,
    pub center_im: Decimal,
    pub width: Decimal,
    pub height: Decimal,
    pub image_width: u32,
    pub image_height: u32,
    pub max_iterations: u32,
    /// Use the perturbative path even when f64 would resolve the view.
    #[serde(default)]
    pub force_high_precision: bool,
    #[serde(default)]
    pub palette: Palette,
}

impl RenderRequest {
    pub fn from_viewport(viewport: &Viewport, canvas_size: (u32, u32), max_iterations: u32) -> Self {
        Self {
            center_re: viewport.center().re.clone(),
            center_im: viewport.center().im.clone(),
            width: viewport.width().clone(),
            height: viewport.height().clone(),
            image_width: canvas_size.0,
            image_height: canvas_size.1,
            max_iterations,
            force_high_precision: false,
            palette: Palette::default(),
        }
    }

    /// Validated viewport for this request.
    pub fn viewport(&self) -> Result<Viewport, CoreError> {
        Viewport::new(
            DecimalComplex::new(self.center_re.clone(), self.center_im.clone()),
            self.width.clone(),
            self.height.clone(),
        )
    }

    /// Image size, rejecting empty canvases.
    pub fn canvas_size(&self) -> Result<(u32, u32), CoreError> {
        if self.image_width == 0 || self.image_height == 0 {
            return Err(CoreError::EmptyImage {
                width: self.image_width,
                height: self.image_height,
            });
        }
        Ok((self.image_width, self.image_height))
    }

    pub fn pixel_count(&self) -> usize {
        self.image_width as usize * self.image_height as usize
    }
}

/// Outcome of re-checking one pixel against direct high-precision iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleCheck {
    pub index: u32,
    /// Escape step predicted from the series approximation.
    pub estimated: u32,
    /// Escape step from iterating the pixel's own point (0 if bounded).
    pub direct: u32,
}

impl SampleCheck {
    pub fn agrees(&self) -> bool {
        self.estimated == self.direct
    }
}

/// Everything known about a finished pass apart from the pixels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderMetadata {
    pub mode: PrecisionMode,
    /// Decimal places carried by the reference orbit (0 in standard mode).
    pub digit_budget: u32,
    /// Escape step of the reference point, `None` if it stayed bounded
    /// or no reference was computed.
    pub reference_escape: Option<u32>,
    pub image_width: u32,
    pub image_height: u32,
    pub max_iterations: u32,
    pub elapsed_ms: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_check: Option<SampleCheck>,
}

/// Finished pass: RGBA pixels, row-major, four bytes per pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderResponse {
    pub pixels: Vec<u8>,
    pub metadata: RenderMetadata,
}
