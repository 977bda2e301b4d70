//! Error taxonomy for the filter engine and its I/O collaborators.

use thiserror::Error;

/// Errors surfaced by the engine, configuration validation, and matrix I/O.
///
/// There are no recoverable errors inside the filtering loop itself; every
/// variant here is reported before or instead of producing an output matrix.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid run configuration. Rejected before any buffer or thread is
    /// created, never retried.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A worker thread could not be started mid-startup. Already-running
    /// workers are signalled to stop and joined before this propagates.
    #[error("failed to start worker thread {worker}: {source}")]
    WorkerSpawn {
        worker: usize,
        #[source]
        source: std::io::Error,
    },

    /// Matrix file could not be read or written.
    #[error("matrix I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed matrix text. `line` is 1-based.
    #[error("invalid matrix data at line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
