//! Dimension removal

use cellgrid_core::{Cell, Dimension, Position, Reducible, Runtime, Squasher};
use tracing::debug;

use super::Matrix;
use crate::error::Result;

impl<R: Runtime, const K: usize> Matrix<R, K> {
    /// Remove `dimension`, resolving cells that collide with `squasher`.
    ///
    /// The result holds exactly one cell per distinct reduced position.
    pub fn squash<Sq, const L: usize>(self, dimension: Dimension, squasher: Sq) -> Result<Matrix<R, L>>
    where
        Position<K>: Reducible<Reduced = Position<L>>,
        Sq: Squasher<K>,
    {
        let index = dimension.index(K)?;
        debug!(arity = K, %dimension, "squash");

        let (runtime, cells, tuner) = self.into_parts();
        let keyed = runtime.flat_map(cells, |cell| {
            let reduced = cell.position.remove(dimension).ok()?;
            Some((reduced, cell))
        });

        let squashed = runtime.reduce_by_key(keyed, |left, right| squasher.reduce(index, left, right), &tuner);
        let output = runtime.map(squashed, |(reduced, cell)| Cell::new(reduced, cell.content));

        Ok(Self::derived(runtime, output, tuner))
    }
}
