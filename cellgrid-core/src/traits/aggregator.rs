//! Aggregation contract
//!
//! An aggregator summarises the cells of a group. Each cell is first
//! projected to an intermediate state, states are merged pairwise, and the
//! final state is presented as zero or more output cells at the group key.

use alloc::vec::Vec;

use crate::model::{Cell, Position};

/// Summarise groups of `Cell<K>` keyed by `Position<S>` into `Cell<Q>`
///
/// `reduce` must be associative and commutative: a runtime may merge
/// partial states of one group in any order and grouping.
pub trait Aggregator<const K: usize, const S: usize, const Q: usize>: Send + Sync {
    /// Intermediate state merged across the cells of a group
    type State: Clone + Send + Sync;

    /// Project a cell to a state.
    ///
    /// Returns `None` when the content cannot be interpreted by this
    /// aggregator; the cell is then skipped.
    fn prepare(&self, cell: &Cell<K>) -> Option<Self::State>;

    /// Merge two states of the same group
    fn reduce(&self, left: Self::State, right: Self::State) -> Self::State;

    /// Present the final state of the group keyed by `selected`
    fn present(&self, selected: &Position<S>, state: &Self::State) -> Vec<Cell<Q>>;
}

fn merge<const K: usize, const S: usize, const Q: usize, A>(
    aggregator: &A,
    left: Option<A::State>,
    right: Option<A::State>,
) -> Option<A::State>
where
    A: Aggregator<K, S, Q>,
{
    match (left, right) {
        (Some(left), Some(right)) => Some(aggregator.reduce(left, right)),
        (left, None) => left,
        (None, right) => right,
    }
}

// A tuple of aggregators is an aggregator whose outputs are unioned. Each
// member keeps its own optional state so a cell that one member skips still
// counts for the others.
macro_rules! aggregator_tuple {
    ($($member:ident $index:tt),+) => {
        impl<const K: usize, const S: usize, const Q: usize, $($member),+> Aggregator<K, S, Q>
            for ($($member,)+)
        where
            $($member: Aggregator<K, S, Q>,)+
        {
            type State = ($(Option<<$member as Aggregator<K, S, Q>>::State>,)+);

            fn prepare(&self, cell: &Cell<K>) -> Option<Self::State> {
                let state = ($(self.$index.prepare(cell),)+);
                if $(state.$index.is_none())&&+ {
                    None
                } else {
                    Some(state)
                }
            }

            fn reduce(&self, left: Self::State, right: Self::State) -> Self::State {
                ($(merge::<K, S, Q, $member>(&self.$index, left.$index, right.$index),)+)
            }

            fn present(&self, selected: &Position<S>, state: &Self::State) -> Vec<Cell<Q>> {
                let mut cells = Vec::new();
                $(
                    if let Some(member) = &state.$index {
                        cells.extend(self.$index.present(selected, member));
                    }
                )+
                cells
            }
        }
    };
}

aggregator_tuple!(A 0, B 1);
aggregator_tuple!(A 0, B 1, C 2);
aggregator_tuple!(A 0, B 1, C 2, D 3);
