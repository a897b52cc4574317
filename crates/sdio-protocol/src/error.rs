//! Error types for capture export

use thiserror::Error;

/// Errors that can occur while writing an export stream
///
/// Rendering itself is total; the only failure path is the sink.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The output sink rejected a write
    #[error("export write failed: {0}")]
    Io(#[from] std::io::Error),
}
