use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use deepzoom_compute::{
    inspect_pixel, CancellationChecker, KernelExecutor, NeverCancel, ParallelMapExecutor,
    PixelExecutor, RenderError, Renderer,
};
use deepzoom_core::{
    CoreError, Decimal, DecimalComplex, Palette, RenderRequest, RenderResponse, Viewport,
    MANDELBROT_CONFIG,
};
use log::{error, info};
use thiserror::Error;

/// Render the Mandelbrot set at arbitrary zoom depth.
///
/// Example:
///   deepzoom --center-re -0.743643887 --center-im 0.131825904 --extent-width 1e-20 --output deep.png
#[derive(Parser, Debug)]
#[command(name = "deepzoom", version, about = "Deep-zoom Mandelbrot renderer")]
struct Cli {
    /// Real part of the view center (decimal string, any precision)
    #[arg(long, allow_hyphen_values = true)]
    center_re: Option<String>,

    /// Imaginary part of the view center
    #[arg(long, allow_hyphen_values = true)]
    center_im: Option<String>,

    /// Visible width of the view in the complex plane
    #[arg(long)]
    extent_width: Option<String>,

    /// Visible height of the view (defaults to keeping the image aspect ratio)
    #[arg(long)]
    extent_height: Option<String>,

    /// Output image width in pixels
    #[arg(long, default_value_t = MANDELBROT_CONFIG.default_image_size.0)]
    width: u32,

    /// Output image height in pixels
    #[arg(long, default_value_t = MANDELBROT_CONFIG.default_image_size.1)]
    height: u32,

    /// Maximum iterations per pixel
    #[arg(long, default_value_t = MANDELBROT_CONFIG.default_max_iterations)]
    iterations: u32,

    /// Use the perturbative path even when f64 would do
    #[arg(long)]
    force_high_precision: bool,

    /// Recenter on this pixel before rendering
    #[arg(long, num_args = 2, value_names = ["COL", "ROW"])]
    zoom_at: Option<Vec<u32>>,

    /// Extent multiplier applied with --zoom-at (0.25 zooms in, 4 zooms out)
    #[arg(long, default_value_t = 0.25)]
    zoom_factor: f64,

    /// Shift the view by whole pixels (after zooming)
    #[arg(long, num_args = 2, value_names = ["DX", "DY"], allow_hyphen_values = true)]
    pan: Option<Vec<i64>>,

    /// Start from a view saved with --save-view
    #[arg(long, value_name = "FILE")]
    load_view: Option<PathBuf>,

    /// Write the final view as JSON
    #[arg(long, value_name = "FILE")]
    save_view: Option<PathBuf>,

    /// How pixel work is scheduled
    #[arg(long, value_enum, default_value_t = ExecutorChoice::ParallelMap)]
    executor: ExecutorChoice,

    /// Palette preset (default, sunset, unshifted)
    #[arg(long, default_value = "default")]
    palette: String,

    /// Override the palette rotation, in iterations
    #[arg(long)]
    palette_offset: Option<f64>,

    /// Skip re-checking a sample pixel after perturbative renders
    #[arg(long)]
    no_verify: bool,

    /// Print coordinate and escape count of a pixel instead of rendering
    #[arg(long, num_args = 2, value_names = ["COL", "ROW"])]
    inspect: Option<Vec<u32>>,

    /// Print render metadata as JSON
    #[arg(long)]
    metadata: bool,

    /// Output PNG file
    #[arg(long, value_name = "FILE", default_value = "deepzoom.png")]
    output: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ExecutorChoice {
    /// rayon chunked parallel map
    ParallelMap,
    /// worker threads pulling tiles
    Kernel,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Unknown palette {0:?} (expected default, sunset or unshifted)")]
    UnknownPalette(String),

    #[error("Pixel ({col}, {row}) is outside the {width}x{height} image")]
    PixelOutside {
        col: u32,
        row: u32,
        width: u32,
        height: u32,
    },

    #[error("A {width}x{height} image has more pixels than a u32 index can address")]
    CanvasTooLarge { width: u32, height: u32 },

    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid view file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write image: {0}")]
    Image(#[from] image::ImageError),

    #[error("Renderer returned {actual} bytes for a {width}x{height} image")]
    BufferSize { actual: usize, width: u32, height: u32 },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let canvas_size = (cli.width, cli.height);
    let viewport = navigate(build_viewport(cli)?, cli, canvas_size)?;

    if let Some(path) = &cli.save_view {
        let json = serde_json::to_string_pretty(&viewport)?;
        fs::write(path, json).map_err(|source| io_error(path, source))?;
        info!("Saved view to {}", path.display());
    }

    let mut request = RenderRequest::from_viewport(&viewport, canvas_size, cli.iterations);
    request.force_high_precision = cli.force_high_precision;
    request.palette = build_palette(cli)?;

    if let Some(pixel) = &cli.inspect {
        let index = pixel_index(pixel, canvas_size)?;
        let inspection = inspect_pixel(&request, index)?;
        println!("{}", serde_json::to_string_pretty(&inspection)?);
        return Ok(());
    }

    let response = match cli.executor {
        ExecutorChoice::ParallelMap => {
            render_with(ParallelMapExecutor::default(), cli, &request, &NeverCancel)?
        }
        ExecutorChoice::Kernel => render_with(KernelExecutor::default(), cli, &request, &NeverCancel)?,
    };

    if cli.metadata {
        println!("{}", serde_json::to_string_pretty(&response.metadata)?);
    }

    save_png(&cli.output, response, canvas_size)
}

fn render_with<E, C>(
    executor: E,
    cli: &Cli,
    request: &RenderRequest,
    cancel: &C,
) -> Result<RenderResponse, RenderError>
where
    E: PixelExecutor,
    C: CancellationChecker + Sync,
{
    Renderer::new(executor)
        .with_sample_verification(MANDELBROT_CONFIG.verify_sample && !cli.no_verify)
        .render(request, cancel)
}

/// Starting view: a saved file or the default, with any coordinates given
/// on the command line replacing the matching parts.
fn build_viewport(cli: &Cli) -> Result<Viewport, CliError> {
    let base = match &cli.load_view {
        Some(path) => {
            let json = fs::read_to_string(path).map_err(|source| io_error(path, source))?;
            serde_json::from_str::<Viewport>(&json)?
        }
        None => MANDELBROT_CONFIG.default_viewport()?,
    };

    let re = parse_or(&cli.center_re, &base.center().re)?;
    let im = parse_or(&cli.center_im, &base.center().im)?;
    let width = parse_or(&cli.extent_width, base.width())?;
    let height = match (&cli.extent_height, &cli.extent_width) {
        (Some(h), _) => Decimal::from_string(h)?,
        // keep the pixels square when only the width was given
        (None, Some(_)) => width
            .mul(&Decimal::from_i64(cli.height as i64))
            .div_int(cli.width, width.decimal_places() as u32 + 10),
        (None, None) => base.height().clone(),
    };

    Ok(Viewport::new(DecimalComplex::new(re, im), width, height)?)
}

fn navigate(viewport: Viewport, cli: &Cli, canvas_size: (u32, u32)) -> Result<Viewport, CliError> {
    let mut viewport = viewport;
    if let Some(pixel) = &cli.zoom_at {
        let index = pixel_index(pixel, canvas_size)?;
        viewport = viewport.zoom_at_pixel(index, canvas_size, cli.zoom_factor)?;
        info!("Zoomed by {} at pixel {}", cli.zoom_factor, index);
    }
    if let Some(shift) = &cli.pan {
        viewport = viewport.pan_pixels(shift[0], shift[1], canvas_size);
    }
    Ok(viewport)
}

fn build_palette(cli: &Cli) -> Result<Palette, CliError> {
    let mut palette =
        Palette::by_name(&cli.palette).ok_or_else(|| CliError::UnknownPalette(cli.palette.clone()))?;
    if let Some(offset) = cli.palette_offset {
        palette.offset = offset;
    }
    Ok(palette)
}

fn parse_or(value: &Option<String>, fallback: &Decimal) -> Result<Decimal, CoreError> {
    match value {
        Some(text) => Decimal::from_string(text),
        None => Ok(fallback.clone()),
    }
}

fn pixel_index(pixel: &[u32], canvas_size: (u32, u32)) -> Result<u32, CliError> {
    let (col, row) = (pixel[0], pixel[1]);
    if col >= canvas_size.0 || row >= canvas_size.1 {
        return Err(CliError::PixelOutside {
            col,
            row,
            width: canvas_size.0,
            height: canvas_size.1,
        });
    }
    row.checked_mul(canvas_size.0)
        .and_then(|offset| offset.checked_add(col))
        .ok_or(CliError::CanvasTooLarge {
            width: canvas_size.0,
            height: canvas_size.1,
        })
}

fn save_png(path: &Path, response: RenderResponse, canvas_size: (u32, u32)) -> Result<(), CliError> {
    let actual = response.pixels.len();
    let image = image::RgbaImage::from_raw(canvas_size.0, canvas_size.1, response.pixels).ok_or(
        CliError::BufferSize {
            actual,
            width: canvas_size.0,
            height: canvas_size.1,
        },
    )?;
    image.save(path)?;
    info!("Wrote {}", path.display());
    Ok(())
}

fn io_error(path: &Path, source: std::io::Error) -> CliError {
    CliError::Io {
        path: path.to_path_buf(),
        source,
    }
}
