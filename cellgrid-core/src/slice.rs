//! Slices
//!
//! A slice splits a position into a *selected* part, the key cells are
//! grouped by, and a *remainder*, which varies within a group. [`Over`]
//! selects a single dimension; [`Along`] selects every dimension but one.
//! Splitting and reassembling with the same slice reproduces the original
//! position.

use core::fmt::Debug;
use core::hash::Hash;

use crate::error::Result;
use crate::model::{Dimension, Expandable, Position, Reducible};

/// Requirements for group keys
pub trait Key: Clone + Ord + Hash + Debug + Send + Sync + 'static {}

impl<T> Key for T where T: Clone + Ord + Hash + Debug + Send + Sync + 'static {}

/// Strategy splitting a `Position<K>` into selected and remainder parts
pub trait Slice<const K: usize>: Clone + Send + Sync {
    /// Group key
    type Selected: Key;
    /// Varying part within a group
    type Remainder: Key;

    /// Dimension the slice is defined by
    fn dimension(&self) -> Dimension;

    fn selected(&self, position: &Position<K>) -> Result<Self::Selected>;

    fn remainder(&self, position: &Position<K>) -> Result<Self::Remainder>;

    fn split(&self, position: &Position<K>) -> Result<(Self::Selected, Self::Remainder)> {
        Ok((self.selected(position)?, self.remainder(position)?))
    }

    /// Inverse of [`split`](Slice::split)
    fn reassemble(
        &self,
        selected: &Self::Selected,
        remainder: &Self::Remainder,
    ) -> Result<Position<K>>;
}

/// Group by one dimension; the rest varies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Over(pub Dimension);

/// Group by all dimensions but one; that one varies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Along(pub Dimension);

fn single<const K: usize>(position: &Position<K>, dimension: Dimension) -> Result<Position<1>> {
    Ok(Position::new([position.get(dimension)?.clone()]))
}

impl<const K: usize> Slice<K> for Over
where
    Position<K>: Reducible,
    <Position<K> as Reducible>::Reduced: Key + Expandable<Expanded = Position<K>>,
{
    type Selected = Position<1>;
    type Remainder = <Position<K> as Reducible>::Reduced;

    fn dimension(&self) -> Dimension {
        self.0
    }

    fn selected(&self, position: &Position<K>) -> Result<Position<1>> {
        single(position, self.0)
    }

    fn remainder(&self, position: &Position<K>) -> Result<Self::Remainder> {
        position.remove(self.0)
    }

    fn reassemble(&self, selected: &Position<1>, remainder: &Self::Remainder) -> Result<Position<K>> {
        let [coordinate] = selected.coordinates();
        remainder.insert(self.0, coordinate.clone())
    }
}

impl<const K: usize> Slice<K> for Along
where
    Position<K>: Reducible,
    <Position<K> as Reducible>::Reduced: Key + Expandable<Expanded = Position<K>>,
{
    type Selected = <Position<K> as Reducible>::Reduced;
    type Remainder = Position<1>;

    fn dimension(&self) -> Dimension {
        self.0
    }

    fn selected(&self, position: &Position<K>) -> Result<Self::Selected> {
        position.remove(self.0)
    }

    fn remainder(&self, position: &Position<K>) -> Result<Position<1>> {
        single(position, self.0)
    }

    fn reassemble(&self, selected: &Self::Selected, remainder: &Position<1>) -> Result<Position<K>> {
        let [coordinate] = remainder.coordinates();
        selected.insert(self.0, coordinate.clone())
    }
}
