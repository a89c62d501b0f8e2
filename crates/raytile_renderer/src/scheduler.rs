//! Parallel frame rendering over tiles.
//!
//! The default [`Strategy::SlotPool`] keeps a fixed number of worker slots.
//! Tile `i` goes to slot `i % num_threads`; once every slot has been used,
//! the scheduler joins a slot's previous worker before launching the next
//! one there, so at most `num_threads` tiles are in flight. The frame is
//! complete only after every slot has been joined.

use crate::renderer::RenderContext;
use crate::tile::{render_tile, split_into_tiles, TileView, DEFAULT_TILE_SIZE};
use crate::{FrameBuffer, FrameError};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::thread::{self, Scope, ScopedJoinHandle};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors that abort a frame.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to spawn worker for tile {tile}: {source}")]
    Spawn {
        tile: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Worker rendering tile {tile} panicked")]
    WorkerPanicked { tile: usize },

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Frame(#[from] FrameError),
}

pub type RenderResult<T> = Result<T, RenderError>;

/// How tiles are distributed over threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Fixed OS-thread slots, reused round-robin.
    #[default]
    SlotPool,
    /// Rayon work stealing over a pool of the same size.
    WorkStealing,
}

/// Scheduler settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerOptions {
    /// Tile edge length in pixels
    pub tile_size: u32,
    /// Worker count; 0 picks twice the available hardware threads
    pub num_threads: usize,
    pub strategy: Strategy,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            num_threads: 0,
            strategy: Strategy::SlotPool,
        }
    }
}

/// Summary of a finished frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub tiles: usize,
    pub pixels_written: u64,
    pub threads: usize,
    pub elapsed: Duration,
}

/// Default worker count: twice the hardware concurrency.
pub fn default_thread_count() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
        * 2
}

/// Renders frames by splitting them into tiles.
pub struct TileScheduler {
    tile_size: u32,
    num_threads: usize,
    strategy: Strategy,
    pool: Option<rayon::ThreadPool>,
}

impl TileScheduler {
    /// Create a scheduler. Builds the rayon pool up front when needed.
    ///
    /// Panics if `tile_size` is zero.
    pub fn new(options: SchedulerOptions) -> RenderResult<Self> {
        assert!(options.tile_size > 0, "tile size must be positive");

        let num_threads = if options.num_threads == 0 {
            default_thread_count()
        } else {
            options.num_threads
        };

        let pool = match options.strategy {
            Strategy::SlotPool => None,
            Strategy::WorkStealing => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(num_threads)
                    .thread_name(|i| format!("raytile-worker-{i}"))
                    .build()?,
            ),
        };

        log::debug!(
            "Tile scheduler: {:?}, {} threads, {}px tiles",
            options.strategy,
            num_threads,
            options.tile_size
        );

        Ok(Self {
            tile_size: options.tile_size,
            num_threads,
            strategy: options.strategy,
            pool,
        })
    }

    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Render every tile of `frame` and wait for all of them.
    ///
    /// The frame is resized to the camera's resolution first. On error the
    /// frame contents are unspecified and must not be presented.
    pub fn render(&self, ctx: &RenderContext<'_>, frame: &mut FrameBuffer) -> RenderResult<FrameStats> {
        let (width, height) = (ctx.camera.image_width(), ctx.camera.image_height());
        if (frame.width(), frame.height()) != (width, height) {
            frame.reset(width, height)?;
        }

        let start = Instant::now();
        let views = split_into_tiles(frame, self.tile_size);
        let tiles = views.len();

        let pixels_written = match &self.pool {
            Some(pool) => pool.install(|| {
                views
                    .into_par_iter()
                    .map(|view| render_tile(ctx, view))
                    .sum::<u64>()
            }),
            None => thread::scope(|scope| self.run_slots(scope, ctx, views))?,
        };

        let stats = FrameStats {
            tiles,
            pixels_written,
            threads: self.num_threads,
            elapsed: start.elapsed(),
        };
        log::debug!(
            "Rendered {} tiles ({} px) in {:.2?}",
            stats.tiles,
            stats.pixels_written,
            stats.elapsed
        );
        Ok(stats)
    }

    fn run_slots<'scope, 'env>(
        &self,
        scope: &'scope Scope<'scope, 'env>,
        ctx: &'env RenderContext<'env>,
        views: Vec<TileView<'env>>,
    ) -> RenderResult<u64> {
        let mut slots: Vec<Option<(usize, ScopedJoinHandle<'scope, u64>)>> =
            (0..self.num_threads).map(|_| None).collect();
        let mut written = 0;
        let mut failure = None;

        for (i, view) in views.into_iter().enumerate() {
            let slot = i % self.num_threads;

            // Bound concurrency: wait for this slot's previous tile
            if let Some((tile, handle)) = slots[slot].take() {
                match join_worker(tile, handle) {
                    Ok(n) => written += n,
                    Err(e) => {
                        failure = Some(e);
                        break;
                    }
                }
            }

            let spawned = thread::Builder::new()
                .name(format!("raytile-tile-{i}"))
                .spawn_scoped(scope, move || render_tile(ctx, view));
            match spawned {
                Ok(handle) => slots[slot] = Some((i, handle)),
                Err(source) => {
                    failure = Some(RenderError::Spawn { tile: i, source });
                    break;
                }
            }
        }

        // Every started worker is joined here, so the scope never sees a
        // panicked thread on its own.
        for (tile, handle) in slots.into_iter().flatten() {
            match join_worker(tile, handle) {
                Ok(n) => written += n,
                Err(e) => {
                    failure.get_or_insert(e);
                }
            }
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(written),
        }
    }
}

fn join_worker(tile: usize, handle: ScopedJoinHandle<'_, u64>) -> RenderResult<u64> {
    handle
        .join()
        .map_err(|_| RenderError::WorkerPanicked { tile })
}
