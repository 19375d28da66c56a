//! Error types for cell and position operations

use alloc::string::String;

use crate::model::Dimension;

/// Contract violations on positions and slices.
///
/// These are programming errors (a dimension that does not exist for the
/// arity, a malformed permutation) and are never recovered by the algebra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StructuralError {
    /// Dimension does not exist for the arity
    #[error("dimension {dimension} out of range for arity {arity}")]
    DimensionOutOfRange { dimension: Dimension, arity: usize },
    /// Permutation omits or repeats a dimension
    #[error("invalid permutation for arity {arity}")]
    InvalidPermutation { arity: usize },
    /// Melt source and target are the same dimension
    #[error("cannot melt dimension {dimension} into itself")]
    MeltIntoSelf { dimension: Dimension },
    /// Text does not name a dimension
    #[error("invalid dimension, expected 1 to 9 or `last`")]
    InvalidDimension,
    /// Number of coordinates does not match the position arity
    #[error("expected arity {expected}, found {found}")]
    ArityMismatch { expected: usize, found: usize },
}

/// Failures decoding or validating cell content.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    /// Text could not be decoded by the codec
    #[error("unable to decode `{text}` with codec {codec}")]
    Decode { text: String, codec: String },
    /// Value is outside the domain of its schema
    #[error("value `{value}` does not satisfy schema {schema}")]
    Validation { value: String, schema: String },
    /// Schema description could not be parsed
    #[error("invalid schema `{text}`")]
    Schema { text: String },
}

/// Result type for structural operations
pub type Result<T> = core::result::Result<T, StructuralError>;
