//! Permutation validation

use crate::error::{Result, StructuralError};
use crate::model::Dimension;

/// Resolve a dimension order into coordinate indices.
///
/// Every dimension of the arity must appear exactly once.
pub fn validate_permutation<const K: usize>(order: &[Dimension; K]) -> Result<[usize; K]> {
    let mut indices = [0usize; K];
    let mut seen = [false; K];

    for (slot, dimension) in order.iter().enumerate() {
        let index = dimension
            .index(K)
            .map_err(|_| StructuralError::InvalidPermutation { arity: K })?;
        if seen[index] {
            return Err(StructuralError::InvalidPermutation { arity: K });
        }
        seen[index] = true;
        indices[slot] = index;
    }

    Ok(indices)
}
