//! Partition label assignment contracts

use alloc::vec::Vec;
use core::hash::Hash;

use crate::model::Cell;

/// Assign zero or more labels to a cell.
///
/// A cell with no labels is dropped; a cell with several labels appears in
/// every one of those partitions.
pub trait Partitioner<const K: usize>: Send + Sync {
    type Label: Clone + Eq + Hash + Send + Sync;

    fn assign(&self, cell: &Cell<K>) -> Vec<Self::Label>;
}

/// Assign labels using a broadcast value
pub trait PartitionerWithValue<const K: usize>: Send + Sync {
    type Label: Clone + Eq + Hash + Send + Sync;
    type Value: Send + Sync;

    fn assign_with_value(&self, cell: &Cell<K>, value: &Self::Value) -> Vec<Self::Label>;
}
