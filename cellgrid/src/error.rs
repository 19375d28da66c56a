//! Error types for matrix operations and I/O

use cellgrid_core::StructuralError;

/// Errors raised by matrix operations and adapters.
///
/// Content interpretation failures are not errors: operations skip cells
/// they cannot interpret. Malformed input lines are collected separately by
/// the parsers in [`crate::io`].
#[derive(Debug, thiserror::Error)]
pub enum CellgridError {
    #[error(transparent)]
    Structural(#[from] StructuralError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("input is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("field `{field}` contains the separator `{separator}`")]
    Separator { field: String, separator: String },
    #[error("unable to build thread pool: {0}")]
    ThreadPoolBuild(#[from] rayon::ThreadPoolBuildError),
    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for cellgrid operations
pub type Result<T> = std::result::Result<T, CellgridError>;
