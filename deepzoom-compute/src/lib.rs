pub mod cancellation;
pub mod error;
pub mod executor;
pub mod mandelbrot;
pub mod perturbation;
pub mod renderer;

pub use cancellation::{AtomicBoolChecker, CancellationChecker, NeverCancel};
pub use error::RenderError;
pub use executor::{KernelExecutor, ParallelMapExecutor, PixelExecutor};
pub use mandelbrot::iterate;
pub use perturbation::{
    direct_escape, estimate_escape, estimate_escape_linear, verify_reference_sample,
    PerturbationContext, ReferenceOrbit, SeriesCoefficients, SeriesTerms,
};
pub use renderer::{inspect_pixel, PixelInspection, Renderer};

// Re-export core types for convenience
pub use deepzoom_core::*;
