//! One render pass from request to RGBA pixels.

use crate::mandelbrot::iterate;
use crate::perturbation::{sample_pixel, verify_reference_sample, PerturbationContext};
use crate::{CancellationChecker, ParallelMapExecutor, PixelExecutor, RenderError};
use deepzoom_core::{
    pixel_position, pixel_to_complex, select_mode_forced, DecimalComplex, PlaneBounds,
    PrecisionMode, RenderMetadata, RenderRequest, RenderResponse, SampleCheck, Viewport,
    MANDELBROT_CONFIG,
};
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::Serialize;
use std::time::Instant;

/// Validated inputs of a render pass.
struct RenderPlan {
    viewport: Viewport,
    canvas_size: (u32, u32),
    max_iterations: u32,
}

impl RenderPlan {
    fn new(request: &RenderRequest) -> Result<Self, RenderError> {
        let viewport = request.viewport()?;
        let canvas_size = request.canvas_size()?;

        if request.max_iterations == 0 {
            return Err(RenderError::InvalidRequest(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if request.pixel_count() > u32::MAX as usize {
            return Err(RenderError::InvalidRequest(format!(
                "{}x{} pixels cannot be addressed by a 32-bit index",
                canvas_size.0, canvas_size.1
            )));
        }

        Ok(Self {
            viewport,
            canvas_size,
            max_iterations: request.max_iterations,
        })
    }
}

/// Renders requests with a chosen pixel executor.
#[derive(Clone, Debug)]
pub struct Renderer<E = ParallelMapExecutor> {
    executor: E,
    verify_sample: bool,
}

impl Default for Renderer<ParallelMapExecutor> {
    fn default() -> Self {
        Self::new(ParallelMapExecutor::default())
    }
}

impl<E: PixelExecutor> Renderer<E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            verify_sample: MANDELBROT_CONFIG.verify_sample,
        }
    }

    /// Re-check one pixel per perturbative pass against direct iteration.
    pub fn with_sample_verification(mut self, enabled: bool) -> Self {
        self.verify_sample = enabled;
        self
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Render a request to RGBA pixels.
    pub fn render<C>(&self, request: &RenderRequest, cancel: &C) -> Result<RenderResponse, RenderError>
    where
        C: CancellationChecker + Sync,
    {
        let start = Instant::now();
        let (values, mut metadata) = self.escape_values(request, cancel)?;

        let palette = request.palette;
        let pixels: Vec<u8> = values
            .par_iter()
            .flat_map_iter(|&value| palette.rgba_of(value))
            .collect();

        metadata.elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        info!(
            "Rendered {}x{} in {} mode (budget {}) with {} executor in {:.1} ms",
            metadata.image_width,
            metadata.image_height,
            metadata.mode,
            metadata.digit_budget,
            self.executor.name(),
            metadata.elapsed_ms
        );

        Ok(RenderResponse { pixels, metadata })
    }

    /// Escape value of every pixel, row-major, 0 inside the set.
    pub fn escape_values<C>(
        &self,
        request: &RenderRequest,
        cancel: &C,
    ) -> Result<(Vec<f64>, RenderMetadata), RenderError>
    where
        C: CancellationChecker + Sync,
    {
        let start = Instant::now();
        let plan = RenderPlan::new(request)?;
        let selection = select_mode_forced(
            &plan.viewport,
            plan.canvas_size,
            request.force_high_precision,
        );
        debug!(
            "Render {}x{}: mode={} budget={} max_iterations={}",
            plan.canvas_size.0,
            plan.canvas_size.1,
            selection.mode,
            selection.digit_budget,
            plan.max_iterations
        );

        let (values, reference_escape, sample_check) = match selection.mode {
            PrecisionMode::Standard => {
                let bounds = PlaneBounds::from_viewport(&plan.viewport);
                let canvas_size = plan.canvas_size;
                let max_iterations = plan.max_iterations;
                let kernel =
                    |index: u32| iterate(bounds.pixel_to_point(index, canvas_size), max_iterations).value();
                let values = self.executor.execute(canvas_size, kernel, cancel)?;
                (values, None, None)
            }
            PrecisionMode::Perturbative => {
                let context = PerturbationContext::new(
                    &plan.viewport,
                    plan.canvas_size,
                    plan.max_iterations,
                    selection.digit_budget,
                );
                if cancel.is_cancelled() {
                    return Err(RenderError::Cancelled);
                }

                let kernel = |index: u32| context.escape_at_pixel(index) as f64;
                let values = self.executor.execute(plan.canvas_size, kernel, cancel)?;

                let sample_check = self
                    .verify_sample
                    .then(|| self.check_sample(&context, &plan.viewport));
                (values, context.orbit.escaped_at, sample_check)
            }
        };

        let metadata = RenderMetadata {
            mode: selection.mode,
            digit_budget: selection.digit_budget,
            reference_escape,
            image_width: plan.canvas_size.0,
            image_height: plan.canvas_size.1,
            max_iterations: plan.max_iterations,
            elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
            sample_check,
        };
        Ok((values, metadata))
    }

    fn check_sample(&self, context: &PerturbationContext, viewport: &Viewport) -> SampleCheck {
        let check = verify_reference_sample(context, viewport, sample_pixel(context.canvas_size));
        if check.agrees() {
            debug!("Sample pixel {} agrees at step {}", check.index, check.direct);
        } else {
            warn!(
                "Sample pixel {} estimated escape {} but direct iteration gives {}; \
                 the digit budget {} may be too small for this view",
                check.index,
                check.estimated,
                check.direct,
                context.digit_budget()
            );
        }
        check
    }
}

/// What the cursor readout shows for one pixel.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PixelInspection {
    pub index: u32,
    pub column: u32,
    pub row: u32,
    pub point: DecimalComplex,
    pub mode: PrecisionMode,
    /// Escape step, 0 inside the set.
    pub iterations: u32,
    /// Value handed to the palette.
    pub value: f64,
}

/// Coordinate and escape count of a single pixel, computed the same way
/// a full render of `request` would compute it.
pub fn inspect_pixel(request: &RenderRequest, index: u32) -> Result<PixelInspection, RenderError> {
    let plan = RenderPlan::new(request)?;
    if index as usize >= request.pixel_count() {
        return Err(RenderError::InvalidRequest(format!(
            "pixel {} is outside a {}x{} image",
            index, plan.canvas_size.0, plan.canvas_size.1
        )));
    }

    let selection = select_mode_forced(&plan.viewport, plan.canvas_size, request.force_high_precision);
    let (iterations, value) = match selection.mode {
        PrecisionMode::Standard => {
            let bounds = PlaneBounds::from_viewport(&plan.viewport);
            let result = iterate(bounds.pixel_to_point(index, plan.canvas_size), plan.max_iterations);
            (result.iterations, result.value())
        }
        PrecisionMode::Perturbative => {
            let context = PerturbationContext::new(
                &plan.viewport,
                plan.canvas_size,
                plan.max_iterations,
                selection.digit_budget,
            );
            let steps = context.escape_at_pixel(index);
            (steps, steps as f64)
        }
    };

    let (column, row) = pixel_position(index, plan.canvas_size);
    Ok(PixelInspection {
        index,
        column,
        row,
        point: pixel_to_complex(index, &plan.viewport, plan.canvas_size),
        mode: selection.mode,
        iterations,
        value,
    })
}
