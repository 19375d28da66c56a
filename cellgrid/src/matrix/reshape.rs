//! Promoting a coordinate into a new dimension

use cellgrid_core::{Cell, Dimension, Locator, Position, Reducible, Runtime, Value};
use tracing::debug;

use super::Matrix;
use crate::error::Result;

/// Member of a reshape group
enum Member<const K: usize> {
    /// Value of a cell carrying the promoted coordinate
    Promoted(Value),
    Kept(Cell<K>),
}

impl<R: Runtime, const K: usize> Matrix<R, K> {
    /// Turn the cells at `coordinate` of `dimension` into a new dimension.
    ///
    /// Cells whose coordinate at `dimension` equals `coordinate` are removed
    /// and their values promoted. Every other cell is matched with the
    /// promoted value of the cell that shares its position once `dimension`
    /// is removed, or `None` when there is no such cell, and `locator`
    /// derives its new position.
    pub fn reshape<Lc, const L: usize, const Q: usize>(
        self,
        dimension: Dimension,
        coordinate: impl Into<Value>,
        locator: Lc,
    ) -> Result<Matrix<R, Q>>
    where
        Position<K>: Reducible<Reduced = Position<L>>,
        Lc: Locator<K, Q>,
    {
        dimension.index(K)?;
        let coordinate = coordinate.into();
        debug!(arity = K, output = Q, %dimension, %coordinate, "reshape");

        let (runtime, cells, tuner) = self.into_parts();
        let keyed = runtime.flat_map(cells, |cell| {
            let reduced = cell.position.remove(dimension).ok()?;
            let promoted = cell.position.get(dimension).ok()? == &coordinate;
            let member = if promoted {
                let (_, value) = cell.content.into_parts();
                Member::Promoted(value)
            } else {
                Member::Kept(cell)
            };
            Some((reduced, member))
        });

        let groups = runtime.group_by_key(keyed, &tuner);
        let output = runtime.flat_map(groups, |(_, members)| {
            let mut promoted = None;
            let mut kept = Vec::with_capacity(members.len());
            for member in members {
                match member {
                    Member::Promoted(value) => promoted = Some(value),
                    Member::Kept(cell) => kept.push(cell),
                }
            }

            kept.into_iter()
                .filter_map(|cell| {
                    let position = locator.locate(&cell, promoted.as_ref())?;
                    Some(Cell::new(position, cell.content))
                })
                .collect::<Vec<_>>()
        });

        Ok(Self::derived(runtime, output, tuner))
    }
}
