//! Queries over positions and coordinates

use cellgrid_core::validation::validate_permutation;
use cellgrid_core::{Cell, Dimension, Position, Runtime, Slice, Value};
use hashbrown::HashSet;
use tracing::debug;

use super::Matrix;
use crate::error::Result;

impl<R: Runtime, const K: usize> Matrix<R, K> {
    /// Positions of the cells satisfying `predicate`, in position order
    pub fn which<F>(self, predicate: F) -> Vec<Position<K>>
    where
        F: Fn(&Cell<K>) -> bool + Send + Sync,
    {
        let (runtime, cells, _) = self.into_parts();
        let matched = runtime.flat_map(cells, |cell| predicate(&cell).then_some(cell.position));
        let mut positions = runtime.materialize(matched);
        positions.sort();
        positions
    }

    /// Cells at the listed positions; positions without a cell are ignored
    pub fn get(self, positions: Vec<Position<K>>) -> Matrix<R, K> {
        let mut seen = HashSet::with_capacity(positions.len());
        let wanted: Vec<(Position<K>, ())> = positions
            .into_iter()
            .filter(|position| seen.insert(position.clone()))
            .map(|position| (position, ()))
            .collect();
        debug!(arity = K, positions = wanted.len(), "get");

        let (runtime, cells, tuner) = self.into_parts();
        let keyed = runtime.map(cells, |cell| (cell.position, cell.content));
        let joined = runtime.join(keyed, runtime.from_vec(wanted), &tuner);
        let output = runtime.map(joined, |(position, (content, ()))| Cell::new(position, content));

        Self::derived(runtime, output, tuner)
    }

    /// Keep, or with `keep == false` drop, the cells whose selected key is listed
    pub fn select<Sl>(self, slice: Sl, keep: bool, names: Vec<Sl::Selected>) -> Result<Matrix<R, K>>
    where
        Sl: Slice<K>,
    {
        slice.dimension().index(K)?;
        debug!(arity = K, keep, names = names.len(), "select");

        let (runtime, cells, tuner) = self.into_parts();
        let names = runtime.broadcast(names.into_iter().collect::<HashSet<_>>());
        let output = runtime.flat_map(cells, |cell| {
            let selected = slice.selected(&cell.position).ok()?;
            (names.contains(&selected) == keep).then_some(cell)
        });

        Ok(Self::derived(runtime, output, tuner))
    }

    /// Distinct selected keys, sorted
    pub fn names<Sl>(self, slice: Sl) -> Result<Vec<Sl::Selected>>
    where
        Sl: Slice<K>,
    {
        slice.dimension().index(K)?;

        let (runtime, cells, tuner) = self.into_parts();
        let keys = runtime.flat_map(cells, |cell| Some((slice.selected(&cell.position).ok()?, ())));
        let distinct = runtime.reduce_by_key(keys, |_, _| (), &tuner);

        let mut names: Vec<_> = runtime
            .materialize(distinct)
            .into_iter()
            .map(|(name, ())| name)
            .collect();
        names.sort();
        Ok(names)
    }

    /// Number of distinct coordinates at `dimension`
    pub fn size(self, dimension: Dimension) -> Result<usize> {
        let index = dimension.index(K)?;
        Ok(self.distinct_coordinates()[index].len())
    }

    /// Number of distinct coordinates of every dimension
    pub fn shape(self) -> [usize; K] {
        let distinct = self.distinct_coordinates();
        core::array::from_fn(|index| distinct[index].len())
    }

    pub fn count(self) -> usize {
        self.to_vec().len()
    }

    /// Cartesian product of the distinct coordinates of every dimension
    pub fn domain(self) -> Vec<Position<K>> {
        // The product over no dimensions is the empty position, present only with a cell
        if K == 0 {
            return self.to_vec().into_iter().map(|cell| cell.position).collect();
        }

        let distinct = self.distinct_coordinates();
        if distinct.iter().any(Vec::is_empty) {
            return Vec::new();
        }

        let total: usize = distinct.iter().map(Vec::len).product();
        let mut positions = Vec::with_capacity(total);
        let mut cursor = [0usize; K];
        loop {
            positions.push(Position::new(core::array::from_fn(|index| {
                distinct[index][cursor[index]].clone()
            })));

            // Advance like an odometer, last dimension fastest
            let mut index = K;
            loop {
                if index == 0 {
                    return positions;
                }
                index -= 1;
                cursor[index] += 1;
                if cursor[index] < distinct[index].len() {
                    break;
                }
                cursor[index] = 0;
            }
        }
    }

    /// Reorder the dimensions of every position
    pub fn permute(self, order: [Dimension; K]) -> Result<Matrix<R, K>> {
        validate_permutation(&order)?;
        debug!(arity = K, ?order, "permute");

        let (runtime, cells, tuner) = self.into_parts();
        let output = runtime.flat_map(cells, |cell| {
            let position = cell.position.permute(&order).ok()?;
            Some(Cell::new(position, cell.content))
        });

        Ok(Self::derived(runtime, output, tuner))
    }

    /// Sorted distinct coordinates per dimension
    fn distinct_coordinates(self) -> [Vec<Value>; K] {
        let (runtime, cells, tuner) = self.into_parts();
        let coordinates = runtime.flat_map(cells, |cell| {
            cell.position
                .into_coordinates()
                .into_iter()
                .enumerate()
                .map(|coordinate| (coordinate, ()))
                .collect::<Vec<_>>()
        });
        let distinct = runtime.reduce_by_key(coordinates, |_, _| (), &tuner);

        let mut per_dimension: [Vec<Value>; K] = core::array::from_fn(|_| Vec::new());
        for ((index, value), ()) in runtime.materialize(distinct) {
            per_dimension[index].push(value);
        }
        for values in &mut per_dimension {
            values.sort();
        }
        per_dimension
    }
}
