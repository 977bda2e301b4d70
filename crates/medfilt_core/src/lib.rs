//! Iterative Median Filter Engine
//!
//! Applies a sliding-window median filter k times in sequence to an integer
//! matrix, with each iteration's rows statically partitioned across a fixed
//! pool of worker threads. The library combines:
//! - Windowed order-statistic kernel with edge clipping
//! - Static row partitioning across workers
//! - A reusable two-phase rendezvous barrier
//! - Ping-pong double buffering between iterations
//! - Matrix text-file I/O for the CLI wrapper

pub mod barrier;
pub mod engine;
pub mod error;
mod grid;
pub mod kernel;
pub mod matrix;
pub mod partition;

// Re-export commonly used types at the crate root
pub use engine::{median_filter, FilterConfig, FilterRun};
pub use error::{Error, Result};
pub use kernel::{window_median, WindowSpec, MAX_WINDOW_SIZE};
pub use matrix::{format_matrix, parse_matrix, read_matrix, write_matrix};
pub use partition::{partition_rows, RowRange};
