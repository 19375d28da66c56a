//! Pairwise operator contract

use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::model::{Cell, Entry, Position};

/// Which pairs of a group an operator is applied to.
///
/// Pairs are ordered by remainder; `Upper` and `Lower` avoid computing a
/// symmetric operator twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Comparer {
    /// Every ordered pair, including each entry with itself
    #[default]
    All,
    /// Pairs whose left remainder sorts before the right one
    Upper,
    /// Pairs whose left remainder sorts after the right one
    Lower,
    /// Each entry with itself
    Diagonal,
}

impl Comparer {
    /// Whether a pair whose remainders compare as `ordering` qualifies
    pub const fn keep(self, ordering: Ordering) -> bool {
        match self {
            Comparer::All => true,
            Comparer::Upper => matches!(ordering, Ordering::Less),
            Comparer::Lower => matches!(ordering, Ordering::Greater),
            Comparer::Diagonal => matches!(ordering, Ordering::Equal),
        }
    }
}

/// Compute output cells from a pair of entries of one group
pub trait Operator<const S: usize, const R: usize, const Q: usize>: Send + Sync {
    /// Called exactly once for every qualifying pair
    fn compute(&self, selected: &Position<S>, left: &Entry<R>, right: &Entry<R>) -> Vec<Cell<Q>>;
}
