//! Partitioning by label

use std::hash::Hash;

use cellgrid_core::{Cell, Partitioner, PartitionerWithValue, Runtime, Tuner};
use hashbrown::HashMap;
use tracing::debug;

use super::Matrix;

/// Cells of a matrix grouped by partition label
pub struct Partitions<R: Runtime, L, const K: usize> {
    runtime: R,
    tuner: Tuner,
    groups: HashMap<L, Vec<Cell<K>>>,
}

impl<R, L, const K: usize> Partitions<R, L, K>
where
    R: Runtime,
    L: Clone + Eq + Hash + Send,
{
    fn collect(runtime: R, tuner: Tuner, labelled: R::Collection<(L, Cell<K>)>) -> Self {
        let grouped = runtime.group_by_key(labelled, &tuner);
        let groups: HashMap<L, Vec<Cell<K>>> = runtime.materialize(grouped).into_iter().collect();
        debug!(partitions = groups.len(), "split");
        Self {
            runtime,
            tuner,
            groups,
        }
    }

    /// Labels with at least one cell, in no particular order
    pub fn labels(&self) -> Vec<L> {
        self.groups.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Cells assigned to `label`; empty when the label has none
    pub fn get(&self, label: &L) -> Matrix<R, K> {
        let cells = self.groups.get(label).cloned().unwrap_or_default();
        self.matrix(cells)
    }

    /// Call `f` with the matrix of each of `labels`, collecting the results
    pub fn for_each<T, F>(&self, labels: &[L], mut f: F) -> Vec<T>
    where
        F: FnMut(&L, Matrix<R, K>) -> T,
    {
        labels.iter().map(|label| f(label, self.get(label))).collect()
    }

    /// Consume the partitions, yielding every label with its matrix
    pub fn into_matrices(self) -> Vec<(L, Matrix<R, K>)> {
        let Self {
            runtime,
            tuner,
            groups,
        } = self;
        groups
            .into_iter()
            .map(|(label, cells)| {
                let cells = runtime.from_vec(cells);
                (label, Matrix::new(runtime.clone(), cells).with_tuner(tuner))
            })
            .collect()
    }

    fn matrix(&self, cells: Vec<Cell<K>>) -> Matrix<R, K> {
        let cells = self.runtime.from_vec(cells);
        Matrix::new(self.runtime.clone(), cells).with_tuner(self.tuner)
    }
}

impl<R: Runtime, const K: usize> Matrix<R, K> {
    /// Assign every cell to the partitions named by `partitioner`.
    ///
    /// A cell may land in several partitions or in none.
    pub fn split<P>(self, partitioner: P) -> Partitions<R, P::Label, K>
    where
        P: Partitioner<K>,
    {
        let (runtime, cells, tuner) = self.into_parts();
        let labelled = runtime.flat_map(cells, |cell| {
            partitioner
                .assign(&cell)
                .into_iter()
                .map(|label| (label, cell.clone()))
                .collect::<Vec<_>>()
        });
        Partitions::collect(runtime, tuner, labelled)
    }

    /// Assign every cell to partitions using a broadcast value
    pub fn split_with_value<P>(self, partitioner: P, value: P::Value) -> Partitions<R, P::Label, K>
    where
        P: PartitionerWithValue<K>,
    {
        let (runtime, cells, tuner) = self.into_parts();
        let shared = runtime.broadcast(value);
        let labelled = runtime.flat_map(cells, |cell| {
            partitioner
                .assign_with_value(&cell, &shared)
                .into_iter()
                .map(|label| (label, cell.clone()))
                .collect::<Vec<_>>()
        });
        Partitions::collect(runtime, tuner, labelled)
    }
}

#[cfg(test)]
mod tests {
    use crate::library::partition::{BinaryHashSplit, ByCoordinate};
    use crate::matrix::fixtures::*;
    use cellgrid_core::{position, Dimension, Value};

    #[test]
    fn test_split_by_coordinate() {
        let partitions = iris().split(ByCoordinate::new(Dimension::First));
        let mut labels = partitions.labels();
        labels.sort();
        assert_eq!(
            labels,
            vec![Value::from("iris-1"), Value::from("iris-2"), Value::from("iris-3")]
        );

        let iris_2 = partitions.get(&Value::from("iris-2")).to_sorted_vec();
        assert_eq!(iris_2.len(), 2);
        assert!(partitions.get(&Value::from("missing")).to_vec().is_empty());
    }

    #[test]
    fn test_for_each() {
        let partitions = iris().split(ByCoordinate::new(Dimension::First));
        let sizes = partitions.for_each(
            &[Value::from("iris-1"), Value::from("iris-3")],
            |_, m| m.to_vec().len(),
        );
        assert_eq!(sizes, vec![3, 2]);
    }

    #[test]
    fn test_binary_hash_split_covers_every_cell_once() {
        let cells = (0..200)
            .map(|i| cell(position![i, "f"], i as f64))
            .collect();
        let partitions = matrix(cells).split(BinaryHashSplit::new(Dimension::First, 10, 7, "train", "test"));

        let train = partitions.get(&"train".to_string()).to_vec().len();
        let test = partitions.get(&"test".to_string()).to_vec().len();
        assert_eq!(train + test, 200);
        assert!(train > test);
    }

    #[test]
    fn test_into_matrices() {
        let mut matrices = iris().split(ByCoordinate::new(Dimension::Second)).into_matrices();
        matrices.sort_by(|a, b| a.0.cmp(&b.0));
        let labels: Vec<_> = matrices.iter().map(|(label, _)| label.clone()).collect();
        assert_eq!(
            labels,
            vec![Value::from("petal"), Value::from("sepal"), Value::from("species")]
        );
    }
}
