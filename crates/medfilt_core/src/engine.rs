//! Iteration controller and worker loop.
//!
//! The controller owns the two matrix buffers and a [`PhaseBarrier`] shared
//! with a fixed pool of worker threads created once per run. Every iteration
//! follows the same two-phase protocol:
//!
//! 1. Workers filter their row ranges from the front buffer into the back
//!    buffer, then arrive at the barrier's first wait.
//! 2. The controller arrives too, flips the buffer roles while every worker
//!    is parked, and arrives at the second wait to release the next round.
//!
//! Both waits are load-bearing: with a single wait a fast worker could read
//! the front buffer mid-flip, or the controller could flip while a slow
//! worker is still writing. After the final iteration the workers run off
//! the end of their loop and the scope joins them.

use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info};
use ndarray::{Array2, ArrayView2};

use crate::barrier::PhaseBarrier;
use crate::error::{Error, Result};
use crate::grid::GridPair;
use crate::kernel::{window_median_with, WindowSpec};
use crate::partition::{partition_rows, RowRange};

/// Run configuration, passed in as an explicit immutable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterConfig {
    /// Odd window edge length, at most [`crate::MAX_WINDOW_SIZE`].
    pub window_size: usize,
    /// Number of filter passes applied in sequence.
    pub iterations: usize,
    /// Number of worker threads.
    pub workers: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            window_size: 3,
            iterations: 1,
            workers: 1,
        }
    }
}

impl FilterConfig {
    /// Validate the configuration, yielding the window spec.
    ///
    /// Runs before any buffer or thread is created.
    pub fn validate(&self) -> Result<WindowSpec> {
        if self.iterations == 0 {
            return Err(Error::Config("iteration count must be positive".into()));
        }
        if self.workers == 0 {
            return Err(Error::Config("worker count must be positive".into()));
        }
        WindowSpec::new(self.window_size)
    }
}

/// Result of a filter run.
#[derive(Debug, Clone)]
pub struct FilterRun {
    /// Filtered matrix, same shape as the input.
    pub output: Array2<i32>,
    /// Wall time spent filtering (excludes I/O).
    pub elapsed: Duration,
}

/// Apply the median filter `config.iterations` times to `input`.
///
/// `workers == 1` runs a single-threaded path with no barrier cost; it is
/// behaviourally identical to the parallel path and defines the reference
/// output. Any worker count produces byte-identical results.
pub fn median_filter(input: ArrayView2<i32>, config: &FilterConfig) -> Result<FilterRun> {
    let window = config.validate()?;
    let (height, width) = input.dim();
    if height == 0 || width == 0 {
        return Err(Error::Config(format!(
            "matrix must be non-empty, got {height}x{width}"
        )));
    }

    info!(
        "median filter: {}x{} matrix, window {}, {} iteration(s), {} worker(s)",
        height, width, window.size(), config.iterations, config.workers
    );

    let started = Instant::now();
    let output = if config.workers == 1 {
        filter_sequential(input, window, config.iterations)
    } else {
        filter_parallel(input, window, config.iterations, config.workers)?
    };
    let elapsed = started.elapsed();
    debug!("filter finished in {:.3} ms", elapsed.as_secs_f64() * 1e3);

    Ok(FilterRun { output, elapsed })
}

/// Single-threaded reference path: same ping-pong structure, no barrier.
fn filter_sequential(input: ArrayView2<i32>, window: WindowSpec, iterations: usize) -> Array2<i32> {
    let (height, width) = input.dim();
    let mut current = input.to_owned();
    let mut next = Array2::zeros((height, width));
    let mut samples = Vec::with_capacity(window.sample_capacity());

    for _ in 0..iterations {
        for row in 0..height {
            for col in 0..width {
                next[[row, col]] = window_median_with(current.view(), row, col, window, &mut samples);
            }
        }
        std::mem::swap(&mut current, &mut next);
    }
    current
}

fn filter_parallel(
    input: ArrayView2<i32>,
    window: WindowSpec,
    iterations: usize,
    workers: usize,
) -> Result<Array2<i32>> {
    let (height, _) = input.dim();
    let grids = GridPair::new(input.to_owned());
    // The controller counts as one party alongside the workers.
    let barrier = PhaseBarrier::new(workers + 1);
    let ranges = partition_rows(height, workers);

    thread::scope(|scope| -> Result<()> {
        let grids = &grids;
        let barrier = &barrier;

        for (worker, rows) in ranges.into_iter().enumerate() {
            let spawned = thread::Builder::new()
                .name(format!("medfilt-worker-{worker}"))
                .spawn_scoped(scope, move || {
                    worker_loop(grids, barrier, rows, window, iterations)
                });
            if let Err(source) = spawned {
                // Already-running workers are parked at (or heading for) the
                // barrier; aborting it wakes them so the scope can join every
                // thread before the error propagates.
                barrier.abort();
                return Err(Error::WorkerSpawn { worker, source });
            }
        }

        for iteration in 0..iterations {
            barrier.wait(); // every worker finished writing this round
            grids.flip();
            barrier.wait(); // release the next round (or termination)
            debug!("iteration {}/{} complete", iteration + 1, iterations);
        }
        Ok(())
    })?;

    Ok(grids.into_front())
}

fn worker_loop(
    grids: &GridPair,
    barrier: &PhaseBarrier,
    rows: RowRange,
    window: WindowSpec,
    iterations: usize,
) {
    let mut samples = Vec::with_capacity(window.sample_capacity());

    for _ in 0..iterations {
        let front = grids.front_index();
        let back = 1 - front;
        // SAFETY: between the previous round's release and this round's
        // first wait, nothing writes the front buffer, and rows
        // [rows.start, rows.end) of the back buffer belong to this worker
        // alone (partition ranges are disjoint).
        let src = unsafe { grids.read(front) };
        for row in rows.start..rows.end {
            for col in 0..src.ncols() {
                let value = window_median_with(src.view(), row, col, window, &mut samples);
                unsafe { grids.write_cell(back, row, col, value) };
            }
        }

        if barrier.wait().is_aborted() {
            return;
        }
        if barrier.wait().is_aborted() {
            return;
        }
    }
}
