//! Windowed order-statistic kernel.
//!
//! The kernel is a pure function of the source matrix, the target cell, and
//! the window size. Windows are clipped at matrix edges, so border cells see
//! fewer than `size * size` samples.

use ndarray::ArrayView2;

use crate::error::{Error, Result};

/// Largest supported window edge length.
pub const MAX_WINDOW_SIZE: usize = 25;

/// Validated square filter window. `size` is odd and at most
/// [`MAX_WINDOW_SIZE`]; immutable for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSpec {
    size: usize,
}

impl WindowSpec {
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::Config("window size must be positive".into()));
        }
        if size % 2 == 0 {
            return Err(Error::Config(format!(
                "window size must be odd, got {size}"
            )));
        }
        if size > MAX_WINDOW_SIZE {
            return Err(Error::Config(format!(
                "window size {size} exceeds maximum {MAX_WINDOW_SIZE}"
            )));
        }
        Ok(Self { size })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Cells extending outward from the centre in each direction.
    pub fn radius(&self) -> usize {
        self.size / 2
    }

    /// Sample count of an unclipped window.
    pub fn sample_capacity(&self) -> usize {
        self.size * self.size
    }
}

/// Median of the clipped window centred at `(row, col)`.
///
/// Collects every in-bounds neighbour within `radius`, sorts ascending, and
/// returns the element at zero-based index `count / 2`. For the even counts
/// that clipped windows can produce, this selects the upper of the two
/// central values.
pub fn window_median(src: ArrayView2<i32>, row: usize, col: usize, window: WindowSpec) -> i32 {
    let mut samples = Vec::with_capacity(window.sample_capacity());
    window_median_with(src, row, col, window, &mut samples)
}

/// Same as [`window_median`], reusing a caller-owned scratch buffer so the
/// per-cell loop does not allocate.
pub fn window_median_with(
    src: ArrayView2<i32>,
    row: usize,
    col: usize,
    window: WindowSpec,
    samples: &mut Vec<i32>,
) -> i32 {
    let (height, width) = src.dim();
    let radius = window.radius() as isize;

    samples.clear();
    for dy in -radius..=radius {
        let r = row as isize + dy;
        if r < 0 || r >= height as isize {
            continue;
        }
        for dx in -radius..=radius {
            let c = col as isize + dx;
            if c < 0 || c >= width as isize {
                continue;
            }
            samples.push(src[[r as usize, c as usize]]);
        }
    }

    // Never empty: the centre cell is always in bounds.
    samples.sort_unstable();
    samples[samples.len() / 2]
}
