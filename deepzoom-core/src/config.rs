//! Fractal configuration.
//!
//! Defaults shared by the renderer and front ends.

use crate::{CoreError, Palette, RenderRequest, Viewport};

/// Configuration for a fractal type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FractalConfig {
    /// Unique identifier
    pub id: &'static str,
    /// Human-readable name
    pub display_name: &'static str,
    /// Default center coordinates as strings (preserves precision)
    pub default_center: (&'static str, &'static str),
    /// Default width in fractal space as string
    pub default_width: &'static str,
    /// Default height in fractal space as string
    pub default_height: &'static str,
    pub default_image_size: (u32, u32),
    pub default_max_iterations: u32,
    pub palette: Palette,
    /// Re-check one pixel against direct high-precision iteration after
    /// every perturbative pass.
    pub verify_sample: bool,
    /// Side length of the tiles handed to kernel workers.
    pub tile_size: u32,
}

impl FractalConfig {
    /// Create the default viewport for this fractal.
    pub fn default_viewport(&self) -> Result<Viewport, CoreError> {
        Viewport::from_strings(
            self.default_center.0,
            self.default_center.1,
            self.default_width,
            self.default_height,
        )
    }

    /// Request for the default view at the default size.
    pub fn default_request(&self) -> Result<RenderRequest, CoreError> {
        let mut request = RenderRequest::from_viewport(
            &self.default_viewport()?,
            self.default_image_size,
            self.default_max_iterations,
        );
        request.palette = self.palette;
        Ok(request)
    }
}

/// Mandelbrot set configuration.
pub static MANDELBROT_CONFIG: FractalConfig = FractalConfig {
    id: "mandelbrot",
    display_name: "Mandelbrot Set",
    default_center: ("-0.75", "0"),
    default_width: "3.5",
    default_height: "2.8",
    default_image_size: (800, 640),
    default_max_iterations: 4000,
    palette: Palette::DEFAULT,
    verify_sample: true,
    tile_size: 64,
};

/// Look up a fractal configuration by ID.
pub fn get_fractal_config(id: &str) -> Option<&'static FractalConfig> {
    match id {
        "mandelbrot" => Some(&MANDELBROT_CONFIG),
        _ => None,
    }
}
