use deepzoom_compute::{
    inspect_pixel, AtomicBoolChecker, ComplexNumber, F64Complex, KernelExecutor, NeverCancel,
    ParallelMapExecutor, PrecisionMode, RenderError, RenderRequest, Renderer, Viewport,
    MANDELBROT_CONFIG,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

fn request_for(viewport: &Viewport, canvas_size: (u32, u32), max_iterations: u32) -> RenderRequest {
    RenderRequest::from_viewport(viewport, canvas_size, max_iterations)
}

// ============================================================================
// Default view
// ============================================================================

#[test]
fn default_view_corner_escapes_and_center_is_inside() {
    let request = MANDELBROT_CONFIG.default_request().unwrap();
    assert_eq!((request.image_width, request.image_height), (800, 640));
    assert_eq!(request.max_iterations, 4000);

    let corner = inspect_pixel(&request, 0).unwrap();
    assert_eq!(corner.mode, PrecisionMode::Standard);
    assert_eq!(corner.iterations, 1);
    assert!(corner.value > 0.0);
    assert_eq!(corner.point.to_f64_complex(), F64Complex::new(-2.5, -1.4));

    let center = inspect_pixel(&request, 400 + 800 * 320).unwrap();
    assert_eq!(center.iterations, 0);
    assert_eq!(center.value, 0.0);
    assert_eq!(MANDELBROT_CONFIG.palette.color_of(center.value), [0, 0, 0]);
}

#[test]
fn rendering_is_deterministic() {
    let vp = MANDELBROT_CONFIG.default_viewport().unwrap();
    let request = request_for(&vp, (96, 72), 300);
    let renderer = Renderer::default();

    let first = renderer.render(&request, &NeverCancel).unwrap();
    let second = renderer.render(&request, &NeverCancel).unwrap();
    assert_eq!(first.pixels, second.pixels);
}

#[test]
fn executors_produce_identical_images() {
    let vp = Viewport::from_strings("-0.75", "0.1", "0.05", "0.04").unwrap();
    let request = request_for(&vp, (120, 96), 400);

    let map = Renderer::new(ParallelMapExecutor::new(1000))
        .render(&request, &NeverCancel)
        .unwrap();
    let kernel = Renderer::new(KernelExecutor::new(3, 32))
        .render(&request, &NeverCancel)
        .unwrap();
    assert_eq!(map.pixels, kernel.pixels);
}

// ============================================================================
// Deep zoom
// ============================================================================

#[test]
fn tiny_extent_renders_perturbatively() {
    let vp = Viewport::from_strings("0.3", "0", "1e-18", "8e-19").unwrap();
    let request = request_for(&vp, (32, 24), 500);
    let response = Renderer::default().render(&request, &NeverCancel).unwrap();

    let meta = &response.metadata;
    assert_eq!(meta.mode, PrecisionMode::Perturbative);
    assert_eq!(meta.digit_budget, 19);
    assert_eq!(meta.reference_escape, Some(12));
    assert!(meta.sample_check.is_some_and(|check| check.agrees()));

    // every pixel escapes on the same step, so the image is one color
    let first = &response.pixels[0..4];
    assert_ne!(&first[0..3], &[0, 0, 0]);
    assert!(response.pixels.chunks(4).all(|px| px == first));
}

#[test]
fn deep_boundary_view_is_identical_across_executors() {
    let vp = Viewport::from_strings(
        "-0.743643887037158704752191506114774",
        "0.131825904205311970493132056385139",
        "1e-20",
        "8e-21",
    )
    .unwrap();
    let request = request_for(&vp, (48, 36), 1000);

    let map = Renderer::new(ParallelMapExecutor::new(256))
        .with_sample_verification(false)
        .render(&request, &NeverCancel)
        .unwrap();
    let kernel = Renderer::new(KernelExecutor::new(4, 8))
        .with_sample_verification(false)
        .render(&request, &NeverCancel)
        .unwrap();

    assert_eq!(map.metadata.mode, PrecisionMode::Perturbative);
    assert_eq!(map.metadata.sample_check, None);
    assert_eq!(map.pixels.len(), 48 * 36 * 4);
    assert_eq!(map.pixels, kernel.pixels);
}

#[test]
fn forced_high_precision_agrees_with_standard_mode() {
    let vp = Viewport::from_strings("0.3", "0", "0.002", "0.0016").unwrap();
    let standard = request_for(&vp, (40, 32), 300);
    let mut forced = standard.clone();
    forced.force_high_precision = true;

    let (values, meta) = Renderer::default()
        .escape_values(&forced, &NeverCancel)
        .unwrap();
    assert_eq!(meta.mode, PrecisionMode::Perturbative);
    assert_eq!(meta.digit_budget, 3);

    let agreeing = (0..40 * 32)
        .filter(|&index| {
            let direct = inspect_pixel(&standard, index).unwrap();
            values[index as usize] as u32 == direct.iterations
        })
        .count();
    assert!(agreeing as f64 / (40.0 * 32.0) >= 0.95);
}

// ============================================================================
// Navigation
// ============================================================================

#[test]
fn click_zoom_then_render_centers_on_clicked_point() {
    let vp = MANDELBROT_CONFIG.default_viewport().unwrap();
    let size = (80, 64);
    let clicked = 20 + 80 * 16;
    let zoomed = vp.zoom_at_pixel(clicked, size, 0.25).unwrap();

    let request = request_for(&zoomed, size, 200);
    let center = inspect_pixel(&request, 40 + 80 * 32).unwrap();
    let before = inspect_pixel(&request_for(&vp, size, 200), clicked).unwrap();

    assert_eq!(center.point, before.point);
    assert_eq!(center.iterations, before.iterations);
}

// ============================================================================
// Cancellation and errors
// ============================================================================

#[test]
fn cancelled_render_returns_no_pixels() {
    let checker = AtomicBoolChecker::new(Arc::new(AtomicBool::new(false)));
    checker.cancel();

    let shallow = MANDELBROT_CONFIG.default_request().unwrap();
    let result = Renderer::default().render(&shallow, &checker);
    assert_eq!(result, Err(RenderError::Cancelled));

    let vp = Viewport::from_strings("0.3", "0", "1e-18", "8e-19").unwrap();
    let deep = request_for(&vp, (32, 24), 500);
    let result = Renderer::new(KernelExecutor::new(2, 8)).render(&deep, &checker);
    assert_eq!(result, Err(RenderError::Cancelled));
}

#[test]
fn request_from_json_renders() {
    let json = r#"{
        "center_re": "-0.75", "center_im": "0",
        "width": "3.5", "height": "2.8",
        "image_width": 40, "image_height": 32,
        "max_iterations": 100
    }"#;
    let request: RenderRequest = serde_json::from_str(json).unwrap();
    let response = Renderer::default().render(&request, &NeverCancel).unwrap();
    assert_eq!(response.pixels.len(), 40 * 32 * 4);

    let meta_json = serde_json::to_string(&response.metadata).unwrap();
    assert!(meta_json.contains(r#""mode":"standard""#));
}

#[test]
fn empty_image_is_rejected() {
    let vp = MANDELBROT_CONFIG.default_viewport().unwrap();
    let request = request_for(&vp, (0, 10), 100);
    let result = Renderer::default().render(&request, &NeverCancel);
    assert!(matches!(result, Err(RenderError::Core(_))));
}

#[test]
fn tip_of_the_antenna_renders_in_color() {
    let vp = Viewport::from_strings("-2", "0", "1e-18", "8e-19").unwrap();
    let request = request_for(&vp, (40, 32), 2000);
    let response = Renderer::default().render(&request, &NeverCancel).unwrap();

    assert_eq!(response.metadata.mode, PrecisionMode::Perturbative);
    assert_eq!(response.metadata.reference_escape, None);
    // only the reference pixel itself sits on the set
    let black = response
        .pixels
        .chunks(4)
        .filter(|px| px[0..3] == [0, 0, 0])
        .count();
    assert_eq!(black, 1);
}
