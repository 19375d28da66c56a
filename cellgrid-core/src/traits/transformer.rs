//! Per-cell transformation contracts

use alloc::vec::Vec;

use crate::model::Cell;

/// Map a `Cell<P>` to zero or more `Cell<Q>`
///
/// Content the transformer cannot interpret yields no cells.
pub trait Transformer<const P: usize, const Q: usize>: Send + Sync {
    fn transform(&self, cell: &Cell<P>) -> Vec<Cell<Q>>;
}

/// Map a `Cell<P>` to zero or more `Cell<Q>` using a broadcast value
///
/// The value is computed once and shared read-only by every invocation.
pub trait TransformerWithValue<const P: usize, const Q: usize>: Send + Sync {
    /// Auxiliary value, for example per-variable statistics
    type Value: Send + Sync;

    fn transform_with_value(&self, cell: &Cell<P>, value: &Self::Value) -> Vec<Cell<Q>>;
}
