//! Group aggregation

use cellgrid_core::{Aggregator, Cell, Position, Runtime, Slice, Tuner};
use hashbrown::HashMap;
use tracing::debug;

use super::Matrix;
use crate::error::Result;

impl<R: Runtime, const K: usize> Matrix<R, K> {
    /// Aggregate the cells of every group selected by `slice`.
    ///
    /// Cells the aggregator cannot prepare are skipped; a group with no
    /// prepared cell produces no output.
    pub fn summarise<Sl, A, const S: usize, const Q: usize>(
        self,
        slice: Sl,
        aggregator: A,
    ) -> Result<Matrix<R, Q>>
    where
        Sl: Slice<K, Selected = Position<S>>,
        A: Aggregator<K, S, Q>,
    {
        slice.dimension().index(K)?;
        debug!(arity = K, selected = S, output = Q, "summarise");

        let (runtime, cells, tuner) = self.into_parts();
        let states = Self::reduce_groups::<Sl, A, S, Q>(&runtime, cells, &slice, &aggregator, &tuner);
        let output = runtime.flat_map(states, |(selected, state)| aggregator.present(&selected, &state));

        Ok(Self::derived(runtime, output, tuner))
    }

    /// Reduced aggregation state of every group, brought back to the caller.
    ///
    /// Useful to build broadcast values, for example per-feature moments
    /// for standardisation.
    pub fn states<Sl, A, const S: usize, const Q: usize>(
        self,
        slice: Sl,
        aggregator: A,
    ) -> Result<HashMap<Position<S>, A::State>>
    where
        Sl: Slice<K, Selected = Position<S>>,
        A: Aggregator<K, S, Q>,
    {
        slice.dimension().index(K)?;
        debug!(arity = K, selected = S, "states");

        let (runtime, cells, tuner) = self.into_parts();
        let states = Self::reduce_groups::<Sl, A, S, Q>(&runtime, cells, &slice, &aggregator, &tuner);
        Ok(runtime.materialize(states).into_iter().collect())
    }

    fn reduce_groups<Sl, A, const S: usize, const Q: usize>(
        runtime: &R,
        cells: R::Collection<Cell<K>>,
        slice: &Sl,
        aggregator: &A,
        tuner: &Tuner,
    ) -> R::Collection<(Position<S>, A::State)>
    where
        Sl: Slice<K, Selected = Position<S>>,
        A: Aggregator<K, S, Q>,
    {
        let prepared = runtime.flat_map(cells, |cell| {
            let selected = slice.selected(&cell.position).ok()?;
            let state = aggregator.prepare(&cell)?;
            Some((selected, state))
        });

        runtime.reduce_by_key(prepared, |left, right| aggregator.reduce(left, right), tuner)
    }
}

#[cfg(test)]
mod tests {
    use crate::library::aggregate::{Count, Mean, Sum};
    use crate::matrix::fixtures::*;
    use cellgrid_core::{
        position, Along, AppendName, Content, Dimension, Over, StructuralError, Value,
    };

    #[test]
    fn test_summarise_over_feature() {
        let sums = iris()
            .summarise(Over(Dimension::Second), Sum::new())
            .expect("valid slice")
            .to_sorted_vec();

        assert_eq!(sums.len(), 2);
        assert_eq!(sums[0].position, position!["petal"]);
        assert!((sums[0].content.numeric().unwrap_or_default() - 7.8).abs() < 1e-9);
        assert_eq!(sums[1].position, position!["sepal"]);
        assert!((sums[1].content.numeric().unwrap_or_default() - 16.3).abs() < 1e-9);
    }

    #[test]
    fn test_summarise_skips_uninterpretable_groups() {
        // "species" holds only nominal content, so Sum emits nothing for it
        let sums = iris()
            .summarise(Over(Dimension::Second), Sum::new())
            .expect("valid slice")
            .to_vec();
        assert!(sums.iter().all(|c| c.position != position!["species"]));

        // Count accepts every cell
        let counts = iris()
            .summarise(Over(Dimension::Second), Count::new())
            .expect("valid slice")
            .to_sorted_vec();
        assert_eq!(counts.len(), 3);
        assert_eq!(counts[2].position, position!["species"]);
        assert_eq!(counts[2].content, Content::discrete(1));
    }

    #[test]
    fn test_summarise_multiple_aggregators() {
        let summary = iris()
            .summarise(
                Along(Dimension::Second),
                (
                    Count::named(AppendName::new("count")),
                    Mean::named(AppendName::new("mean")),
                ),
            )
            .expect("valid slice")
            .to_sorted_vec();

        let iris_1: Vec<_> = summary
            .iter()
            .filter(|c| c.position.coordinates()[0] == Value::from("iris-1"))
            .collect();
        assert_eq!(iris_1.len(), 2);
        assert_eq!(iris_1[0].position, position!["iris-1", "count"]);
        assert_eq!(iris_1[0].content, Content::discrete(3));
        assert_eq!(iris_1[1].position, position!["iris-1", "mean"]);
        assert!((iris_1[1].content.numeric().unwrap_or_default() - 3.25).abs() < 1e-9);
    }

    #[test]
    fn test_summarise_rejects_missing_dimension() {
        let result = iris().summarise(Over(Dimension::Third), Sum::new());
        assert!(matches!(
            result,
            Err(crate::CellgridError::Structural(StructuralError::DimensionOutOfRange { .. }))
        ));
    }

    #[test]
    fn test_states() {
        let states = iris()
            .states(Over(Dimension::Second), Count::new())
            .expect("valid slice");
        assert_eq!(states.len(), 3);
        assert_eq!(states.get(&position!["sepal"]), Some(&3));
    }
}
