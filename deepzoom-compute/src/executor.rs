//! Executors that run a per-pixel kernel over a whole canvas.
//!
//! A kernel is a pure `Fn(u32) -> f64` from pixel index to escape value,
//! closing over read-only render state. Both executors produce the same
//! row-major buffer for the same kernel; they differ only in how work is
//! scheduled. Cancellation is checked between batches, and a cancelled
//! pass yields no buffer. A kernel panic surfaces as
//! [`RenderError::WorkerPanicked`] from either executor.

use crate::{CancellationChecker, RenderError};
use deepzoom_core::{generate_tiles, PixelRect};
use log::debug;
use rayon::prelude::*;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;

/// Runs a pixel kernel over every pixel of a canvas.
pub trait PixelExecutor {
    fn name(&self) -> &'static str;

    fn execute<K, C>(
        &self,
        canvas_size: (u32, u32),
        kernel: K,
        cancel: &C,
    ) -> Result<Vec<f64>, RenderError>
    where
        K: Fn(u32) -> f64 + Sync,
        C: CancellationChecker + Sync;
}

fn pixel_count(canvas_size: (u32, u32)) -> usize {
    canvas_size.0 as usize * canvas_size.1 as usize
}

/// Chunked parallel map on the rayon thread pool.
#[derive(Clone, Copy, Debug)]
pub struct ParallelMapExecutor {
    chunk_size: usize,
}

impl ParallelMapExecutor {
    pub const DEFAULT_CHUNK_SIZE: usize = 4096;

    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }
}

impl Default for ParallelMapExecutor {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CHUNK_SIZE)
    }
}

impl PixelExecutor for ParallelMapExecutor {
    fn name(&self) -> &'static str {
        "parallel-map"
    }

    fn execute<K, C>(
        &self,
        canvas_size: (u32, u32),
        kernel: K,
        cancel: &C,
    ) -> Result<Vec<f64>, RenderError>
    where
        K: Fn(u32) -> f64 + Sync,
        C: CancellationChecker + Sync,
    {
        let mut values = vec![0.0; pixel_count(canvas_size)];
        let chunk_size = self.chunk_size;

        values
            .par_chunks_mut(chunk_size)
            .enumerate()
            .try_for_each(|(chunk_index, chunk)| {
                if cancel.is_cancelled() {
                    return Err(RenderError::Cancelled);
                }
                let start = chunk_index * chunk_size;
                // a panicking kernel fails the pass instead of unwinding through rayon
                panic::catch_unwind(AssertUnwindSafe(|| {
                    for (offset, slot) in chunk.iter_mut().enumerate() {
                        *slot = kernel((start + offset) as u32);
                    }
                }))
                .map_err(|_| RenderError::WorkerPanicked)
            })?;

        Ok(values)
    }
}

/// Scoped worker threads pulling tiles from a shared atomic counter.
///
/// Each worker returns the tiles it finished; the calling thread is the
/// only one that writes the output buffer.
#[derive(Clone, Copy, Debug)]
pub struct KernelExecutor {
    workers: usize,
    tile_size: u32,
}

impl KernelExecutor {
    pub fn new(workers: usize, tile_size: u32) -> Self {
        Self {
            workers: workers.max(1),
            tile_size: tile_size.max(1),
        }
    }

    /// One worker per available core.
    pub fn with_tile_size(tile_size: u32) -> Self {
        let workers = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        Self::new(workers, tile_size)
    }
}

impl Default for KernelExecutor {
    fn default() -> Self {
        Self::with_tile_size(deepzoom_core::MANDELBROT_CONFIG.tile_size)
    }
}

type TileResult = (PixelRect, Vec<f64>);

impl PixelExecutor for KernelExecutor {
    fn name(&self) -> &'static str {
        "kernel"
    }

    fn execute<K, C>(
        &self,
        canvas_size: (u32, u32),
        kernel: K,
        cancel: &C,
    ) -> Result<Vec<f64>, RenderError>
    where
        K: Fn(u32) -> f64 + Sync,
        C: CancellationChecker + Sync,
    {
        let tiles = generate_tiles(canvas_size, self.tile_size);
        let next_tile = AtomicUsize::new(0);
        let cancelled = AtomicBool::new(false);
        let workers = self.workers.min(tiles.len()).max(1);

        debug!("Kernel executor: {} tiles on {} workers", tiles.len(), workers);

        let finished: Vec<Vec<TileResult>> = thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    scope.spawn(|| {
                        let mut done = Vec::new();
                        loop {
                            if cancel.is_cancelled() {
                                cancelled.store(true, Ordering::Relaxed);
                                break;
                            }
                            let tile_index = next_tile.fetch_add(1, Ordering::Relaxed);
                            let Some(tile) = tiles.get(tile_index) else {
                                break;
                            };
                            let values = tile.indices(canvas_size.0).map(&kernel).collect();
                            done.push((*tile, values));
                        }
                        done
                    })
                })
                .collect();

            // join every worker before reporting, so no panic escapes the scope
            let joined: Vec<_> = handles.into_iter().map(|handle| handle.join()).collect();
            joined
                .into_iter()
                .map(|result| result.map_err(|_| RenderError::WorkerPanicked))
                .collect::<Result<Vec<_>, _>>()
        })?;

        if cancelled.load(Ordering::Relaxed) {
            return Err(RenderError::Cancelled);
        }

        let mut values = vec![0.0; pixel_count(canvas_size)];
        for (tile, tile_values) in finished.into_iter().flatten() {
            for (index, value) in tile.indices(canvas_size.0).zip(tile_values) {
                values[index as usize] = value;
            }
        }
        Ok(values)
    }
}
