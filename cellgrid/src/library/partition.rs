//! Partitioners
//!
//! Hash partitioners use [`stable_hash`], so a coordinate lands in the same
//! partition on every worker and in every run. Ranges are half open: a
//! label is assigned when `lower < x <= upper`.

use std::hash::Hash;

use cellgrid_core::{stable_hash, Cell, Dimension, Partitioner, PartitionerWithValue, Value};
use chrono::NaiveDateTime;
use hashbrown::HashMap;

/// Label every cell with its coordinate at a dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByCoordinate {
    dimension: Dimension,
}

impl ByCoordinate {
    pub fn new(dimension: Dimension) -> Self {
        Self { dimension }
    }
}

impl<const K: usize> Partitioner<K> for ByCoordinate {
    type Label = Value;

    fn assign(&self, cell: &Cell<K>) -> Vec<Value> {
        cell.position
            .get(self.dimension)
            .map(|value| vec![value.clone()])
            .unwrap_or_default()
    }
}

/// Bucket of the coordinate at `dimension`, in `0..base`
fn bucket<const K: usize>(cell: &Cell<K>, dimension: Dimension, base: u64) -> Option<u64> {
    let value = cell.position.get(dimension).ok()?;
    Some(stable_hash(value) % base.max(1))
}

/// Assign every label whose range `(lower, upper]` holds the hash bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashSplit<L> {
    dimension: Dimension,
    base: u64,
    ranges: Vec<(L, u64, u64)>,
}

impl<L> HashSplit<L> {
    /// `ranges` holds `(label, lower, upper)`; ranges may overlap
    pub fn new(dimension: Dimension, base: u64, ranges: Vec<(L, u64, u64)>) -> Self {
        Self {
            dimension,
            base,
            ranges,
        }
    }
}

impl<const K: usize, L> Partitioner<K> for HashSplit<L>
where
    L: Clone + Eq + Hash + Send + Sync,
{
    type Label = L;

    fn assign(&self, cell: &Cell<K>) -> Vec<L> {
        let Some(bucket) = bucket(cell, self.dimension, self.base) else {
            return Vec::new();
        };
        self.ranges
            .iter()
            .filter(|(_, lower, upper)| *lower < bucket && bucket <= *upper)
            .map(|(label, _, _)| label.clone())
            .collect()
    }
}

/// Two-way hash split: buckets up to `threshold` go left, the rest right
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryHashSplit {
    dimension: Dimension,
    base: u64,
    threshold: u64,
    left: String,
    right: String,
}

impl BinaryHashSplit {
    pub fn new(
        dimension: Dimension,
        base: u64,
        threshold: u64,
        left: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        Self {
            dimension,
            base,
            threshold,
            left: left.into(),
            right: right.into(),
        }
    }
}

impl<const K: usize> Partitioner<K> for BinaryHashSplit {
    type Label = String;

    fn assign(&self, cell: &Cell<K>) -> Vec<String> {
        match bucket(cell, self.dimension, self.base) {
            Some(bucket) if bucket <= self.threshold => vec![self.left.clone()],
            Some(_) => vec![self.right.clone()],
            None => Vec::new(),
        }
    }
}

/// Assign every label whose date range `(lower, upper]` holds the coordinate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateSplit<L> {
    dimension: Dimension,
    ranges: Vec<(L, NaiveDateTime, NaiveDateTime)>,
}

impl<L> DateSplit<L> {
    pub fn new(dimension: Dimension, ranges: Vec<(L, NaiveDateTime, NaiveDateTime)>) -> Self {
        Self { dimension, ranges }
    }
}

impl<const K: usize, L> Partitioner<K> for DateSplit<L>
where
    L: Clone + Eq + Hash + Send + Sync,
{
    type Label = L;

    fn assign(&self, cell: &Cell<K>) -> Vec<L> {
        let Some(date) = cell
            .position
            .get(self.dimension)
            .ok()
            .and_then(Value::as_date)
        else {
            return Vec::new();
        };
        self.ranges
            .iter()
            .filter(|(_, lower, upper)| *lower < date && date <= *upper)
            .map(|(label, _, _)| label.clone())
            .collect()
    }
}

/// Look the coordinate at `dimension` up in a broadcast label table.
///
/// Coordinates missing from the table are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookup {
    dimension: Dimension,
}

impl Lookup {
    pub fn new(dimension: Dimension) -> Self {
        Self { dimension }
    }
}

impl<const K: usize> PartitionerWithValue<K> for Lookup {
    type Label = String;
    type Value = HashMap<Value, Vec<String>>;

    fn assign_with_value(&self, cell: &Cell<K>, value: &Self::Value) -> Vec<String> {
        cell.position
            .get(self.dimension)
            .ok()
            .and_then(|coordinate| value.get(coordinate))
            .cloned()
            .unwrap_or_default()
    }
}
