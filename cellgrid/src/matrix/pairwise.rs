//! Pairwise operations within and across matrices

use cellgrid_core::{Comparer, Entry, Operator, Position, Runtime, Slice};
use tracing::debug;

use super::Matrix;
use crate::error::Result;

impl<R: Runtime, const K: usize> Matrix<R, K> {
    /// Apply `operator` to the qualifying pairs of every group.
    ///
    /// Entries of a group are ordered by remainder; `comparer` decides which
    /// ordered pairs qualify. The operator is called once per pair.
    pub fn pairwise<Sl, O, const S: usize, const M: usize, const Q: usize>(
        self,
        slice: Sl,
        comparer: Comparer,
        operator: O,
    ) -> Result<Matrix<R, Q>>
    where
        Sl: Slice<K, Selected = Position<S>, Remainder = Position<M>>,
        O: Operator<S, M, Q>,
    {
        slice.dimension().index(K)?;
        debug!(arity = K, ?comparer, "pairwise");

        let (runtime, cells, tuner) = self.into_parts();
        let keyed = runtime.flat_map(cells, |cell| {
            let (selected, remainder) = slice.split(&cell.position).ok()?;
            Some((selected, Entry::new(remainder, cell.content)))
        });

        let groups = runtime.group_by_key(keyed, &tuner);
        let sorted = runtime.sort_within(groups, |left, right| left.remainder.cmp(&right.remainder));

        let output = runtime.flat_map(sorted, |(selected, entries)| {
            let mut cells = Vec::new();
            for left in &entries {
                for right in &entries {
                    if comparer.keep(left.remainder.cmp(&right.remainder)) {
                        cells.extend(operator.compute(&selected, left, right));
                    }
                }
            }
            cells
        });

        Ok(Self::derived(runtime, output, tuner))
    }

    /// Apply `operator` to pairs drawn from this matrix and `other`.
    ///
    /// Cells are matched on their selected key; the pair qualifies when
    /// `comparer` keeps the ordering of the left and right remainders.
    pub fn pairwise_between<Sl, O, const S: usize, const M: usize, const Q: usize>(
        self,
        other: Matrix<R, K>,
        slice: Sl,
        comparer: Comparer,
        operator: O,
    ) -> Result<Matrix<R, Q>>
    where
        Sl: Slice<K, Selected = Position<S>, Remainder = Position<M>>,
        O: Operator<S, M, Q>,
    {
        slice.dimension().index(K)?;
        debug!(arity = K, ?comparer, "pairwise_between");

        let (runtime, cells, tuner) = self.into_parts();
        let keyed = |cell: cellgrid_core::Cell<K>| {
            let (selected, remainder) = slice.split(&cell.position).ok()?;
            Some((selected, Entry::new(remainder, cell.content)))
        };
        let left = runtime.flat_map(cells, keyed);
        let right = runtime.flat_map(other.cells, keyed);

        let joined = runtime.join(left, right, &tuner);
        let output = runtime.flat_map(joined, |(selected, (left, right))| {
            if comparer.keep(left.remainder.cmp(&right.remainder)) {
                operator.compute(&selected, &left, &right)
            } else {
                Vec::new()
            }
        });

        Ok(Self::derived(runtime, output, tuner))
    }
}
