//! Reshape locator contract

use crate::model::{Cell, Position, Value};

/// Derive the new position of a cell during a reshape
///
/// `value` is the promoted value matched with the cell, or `None` when no
/// value was promoted for the cell's group. Returning `None` drops the cell.
pub trait Locator<const K: usize, const Q: usize>: Send + Sync {
    fn locate(&self, cell: &Cell<K>, value: Option<&Value>) -> Option<Position<Q>>;
}
