pub mod complex;
pub mod compute_data;
pub mod config;
pub mod decimal;
pub mod error;
pub mod messages;
pub mod palette;
pub mod pixel_rect;
pub mod precision;
pub mod transforms;
pub mod viewport;

pub use complex::{ComplexNumber, DecimalComplex, F64Complex, ESCAPE_RADIUS_SQ};
pub use compute_data::{EscapeResult, SMOOTH_FLOOR};
pub use config::{get_fractal_config, FractalConfig, MANDELBROT_CONFIG};
pub use decimal::Decimal;
pub use error::CoreError;
pub use messages::{RenderMetadata, RenderRequest, RenderResponse, SampleCheck};
pub use palette::{hsl_to_rgb, Palette};
pub use pixel_rect::{generate_tiles, PixelRect};
pub use precision::{
    digit_budget, requires_high_precision, select_mode, select_mode_forced, PrecisionMode,
    PrecisionSelection,
};
pub use transforms::{
    pan_pixels, pixel_offset, pixel_position, pixel_to_complex, recenter_and_zoom,
    reference_pixel, PlaneBounds,
};
pub use viewport::Viewport;
