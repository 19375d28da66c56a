//! Sparse labeled matrices
//!
//! A [`Matrix`] is a collection of cells held by a [`Runtime`], at most one
//! cell per position. Every operation consumes the matrix and returns a new
//! one; clone a matrix to use it twice.
//!
//! The operations are split by concern:
//!
//! - [`summarise`](Matrix::summarise) and [`states`](Matrix::states) reduce groups
//! - [`transform`](Matrix::transform) maps cells one by one
//! - [`slide`](Matrix::slide) scans groups in order
//! - [`pairwise`](Matrix::pairwise) combines pairs within or across matrices
//! - [`squash`](Matrix::squash) removes a dimension
//! - [`split`](Matrix::split) partitions cells by label
//! - [`reshape`](Matrix::reshape) promotes a coordinate into a new dimension
//! - [`fill_homogeneous`](Matrix::fill_homogeneous) and
//!   [`fill_heterogeneous`](Matrix::fill_heterogeneous) complete a domain
//! - [`which`](Matrix::which), [`select`](Matrix::select) and friends query

use std::fmt;

use cellgrid_core::{Cell, Runtime, Tuner};
use hashbrown::HashSet;
use tracing::debug;

mod fill;
mod pairwise;
mod partition;
mod query;
mod reshape;
mod slide;
mod squash;
mod summarise;
mod transform;

pub use partition::Partitions;

/// Cells of arity `K` held by runtime `R`
pub struct Matrix<R: Runtime, const K: usize> {
    runtime: R,
    cells: R::Collection<Cell<K>>,
    tuner: Tuner,
}

impl<R: Runtime, const K: usize> Matrix<R, K> {
    /// Wrap a runtime collection whose positions are already unique
    pub fn new(runtime: R, cells: R::Collection<Cell<K>>) -> Self {
        Self {
            runtime,
            cells,
            tuner: Tuner::default(),
        }
    }

    /// Distribute local cells; when a position repeats, its first cell wins
    pub fn from_cells(runtime: R, cells: Vec<Cell<K>>) -> Self {
        let total = cells.len();
        let mut seen = HashSet::with_capacity(total);
        let unique: Vec<Cell<K>> = cells
            .into_iter()
            .filter(|cell| seen.insert(cell.position.clone()))
            .collect();

        if unique.len() < total {
            debug!(
                dropped = total - unique.len(),
                "dropped cells with duplicate positions"
            );
        }

        let cells = runtime.from_vec(unique);
        Self::new(runtime, cells)
    }

    /// Set the execution hint used by shuffles of this and derived matrices
    pub fn with_tuner(mut self, tuner: Tuner) -> Self {
        self.tuner = tuner;
        self
    }

    pub fn tuner(&self) -> Tuner {
        self.tuner
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    pub fn into_cells(self) -> R::Collection<Cell<K>> {
        self.cells
    }

    /// Bring the cells back to the caller in no particular order
    pub fn to_vec(self) -> Vec<Cell<K>> {
        self.runtime.materialize(self.cells)
    }

    /// Bring the cells back to the caller ordered by position
    pub fn to_sorted_vec(self) -> Vec<Cell<K>> {
        let mut cells = self.to_vec();
        cells.sort_by(|left, right| left.position.cmp(&right.position));
        cells
    }

    fn into_parts(self) -> (R, R::Collection<Cell<K>>, Tuner) {
        (self.runtime, self.cells, self.tuner)
    }

    fn derived<const Q: usize>(runtime: R, cells: R::Collection<Cell<Q>>, tuner: Tuner) -> Matrix<R, Q> {
        Matrix {
            runtime,
            cells,
            tuner,
        }
    }
}

impl<R, const K: usize> Clone for Matrix<R, K>
where
    R: Runtime,
    R::Collection<Cell<K>>: Clone,
{
    fn clone(&self) -> Self {
        Self {
            runtime: self.runtime.clone(),
            cells: self.cells.clone(),
            tuner: self.tuner,
        }
    }
}

impl<R, const K: usize> fmt::Debug for Matrix<R, K>
where
    R: Runtime + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("arity", &K)
            .field("runtime", &self.runtime)
            .field("tuner", &self.tuner)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use cellgrid_core::{position, Cell, Content, Position};

    use crate::runtime::LocalRuntime;
    use crate::Matrix;

    /// Small instance x feature matrix with one nominal feature
    pub fn iris() -> Matrix<LocalRuntime, 2> {
        let numeric = [
            ("iris-1", "sepal", 5.1),
            ("iris-1", "petal", 1.4),
            ("iris-2", "sepal", 4.9),
            ("iris-2", "petal", 1.5),
            ("iris-3", "sepal", 6.3),
            ("iris-3", "petal", 4.9),
        ];
        let mut cells: Vec<Cell<2>> = numeric
            .iter()
            .map(|(instance, feature, value)| {
                Cell::new(position![*instance, *feature], Content::continuous(*value))
            })
            .collect();
        cells.push(Cell::new(position!["iris-1", "species"], Content::nominal("setosa")));
        Matrix::from_cells(LocalRuntime::new(), cells)
    }

    pub fn cell<const K: usize>(position: Position<K>, value: f64) -> Cell<K> {
        Cell::new(position, Content::continuous(value))
    }

    pub fn matrix<const K: usize>(cells: Vec<Cell<K>>) -> Matrix<LocalRuntime, K> {
        Matrix::from_cells(LocalRuntime::new(), cells)
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use cellgrid_core::{position, Content};

    #[test]
    fn test_from_cells_keeps_first_duplicate() {
        let m = matrix(vec![
            cell(position!["a"], 1.0),
            cell(position!["b"], 2.0),
            cell(position!["a"], 3.0),
        ]);
        assert_eq!(
            m.to_sorted_vec(),
            vec![cell(position!["a"], 1.0), cell(position!["b"], 2.0)]
        );
    }

    #[test]
    fn test_tuner_is_carried() {
        let m = iris().with_tuner(Tuner::Sequential);
        assert_eq!(m.tuner(), Tuner::Sequential);
        let transformed = m.transform(crate::library::transform::Indicator::new());
        assert_eq!(transformed.tuner(), Tuner::Sequential);
    }

    #[test]
    fn test_clone_is_independent() {
        let m = iris();
        let copy = m.clone();
        assert_eq!(m.to_sorted_vec(), copy.to_sorted_vec());
        assert_eq!(iris().to_vec().len(), 7);
        assert!(iris()
            .to_vec()
            .iter()
            .any(|c| c.content == Content::nominal("setosa")));
    }
}
