//! Squash reducer contract

use crate::model::Cell;

/// Resolve two cells that collide once a dimension is removed
///
/// `index` is the zero-based coordinate index of the dimension being
/// squashed. The result must be one of the inputs or a combination of them;
/// implementations may prefer one side.
pub trait Squasher<const K: usize>: Send + Sync {
    fn reduce(&self, index: usize, left: Cell<K>, right: Cell<K>) -> Cell<K>;
}
