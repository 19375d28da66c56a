//! Per-cell transformation

use cellgrid_core::{Runtime, Transformer, TransformerWithValue};
use tracing::debug;

use super::Matrix;

impl<R: Runtime, const K: usize> Matrix<R, K> {
    /// Map every cell to zero or more cells of arity `Q`
    pub fn transform<T, const Q: usize>(self, transformer: T) -> Matrix<R, Q>
    where
        T: Transformer<K, Q>,
    {
        debug!(arity = K, output = Q, "transform");
        let (runtime, cells, tuner) = self.into_parts();
        let output = runtime.flat_map(cells, |cell| transformer.transform(&cell));
        Self::derived(runtime, output, tuner)
    }

    /// Map every cell using a value broadcast to all workers
    pub fn transform_with_value<T, const Q: usize>(self, transformer: T, value: T::Value) -> Matrix<R, Q>
    where
        T: TransformerWithValue<K, Q>,
    {
        debug!(arity = K, output = Q, "transform_with_value");
        let (runtime, cells, tuner) = self.into_parts();
        let shared = runtime.broadcast(value);
        let output = runtime.flat_map(cells, |cell| transformer.transform_with_value(&cell, &shared));
        Self::derived(runtime, output, tuner)
    }
}
