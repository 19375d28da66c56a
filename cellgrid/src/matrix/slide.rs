//! Sequential windows

use cellgrid_core::{Position, Runtime, Slice, Window};
use tracing::debug;

use super::Matrix;
use crate::error::Result;

impl<R: Runtime, const K: usize> Matrix<R, K> {
    /// Scan every group selected by `slice` in remainder order.
    ///
    /// Groups are sorted by remainder, ascending or descending, with ties
    /// broken by the full position. Cells the window cannot prepare are
    /// skipped before the scan.
    pub fn slide<Sl, W, const S: usize, const M: usize, const Q: usize>(
        self,
        slice: Sl,
        window: W,
        ascending: bool,
    ) -> Result<Matrix<R, Q>>
    where
        Sl: Slice<K, Selected = Position<S>, Remainder = Position<M>>,
        W: Window<K, S, M, Q>,
    {
        slice.dimension().index(K)?;
        debug!(arity = K, selected = S, remainder = M, ascending, "slide");

        let (runtime, cells, tuner) = self.into_parts();
        let prepared = runtime.flat_map(cells, |cell| {
            let (selected, remainder) = slice.split(&cell.position).ok()?;
            let input = window.prepare(&cell)?;
            Some((selected, (remainder, cell.position, input)))
        });

        let groups = runtime.group_by_key(prepared, &tuner);
        let sorted = runtime.sort_within(groups, |left, right| {
            let ordering = left.0.cmp(&right.0).then_with(|| left.1.cmp(&right.1));
            if ascending {
                ordering
            } else {
                ordering.reverse()
            }
        });

        let output = runtime.flat_map(sorted, |(selected, members)| {
            let mut emitted = Vec::new();
            let mut state = None;
            for (remainder, _, input) in members {
                let (next, outputs) = match state.take() {
                    None => window.initialise(&remainder, input),
                    Some(current) => window.update(&remainder, input, current),
                };
                state = Some(next);
                emitted.extend(outputs);
            }

            emitted
                .into_iter()
                .flat_map(|output| window.present(&selected, output))
                .collect::<Vec<_>>()
        });

        Ok(Self::derived(runtime, output, tuner))
    }
}

#[cfg(test)]
mod tests {
    use crate::library::window::{CumulativeSum, Difference, MovingAverage};
    use crate::matrix::fixtures::*;
    use cellgrid_core::{position, Along, Cell, Content, Dimension, Over, Position};

    fn series() -> Vec<Cell<2>> {
        vec![
            cell(position!["x", "r1"], 10.0),
            cell(position!["x", "r2"], 7.0),
            cell(position!["x", "r3"], 15.0),
        ]
    }

    fn values<const Q: usize>(cells: &[Cell<Q>]) -> Vec<(Position<Q>, f64)> {
        cells
            .iter()
            .map(|c| (c.position.clone(), c.content.numeric().unwrap_or(f64::NAN)))
            .collect()
    }

    #[test]
    fn test_difference_ascending() {
        let mut output = matrix(series())
            .slide(Over(Dimension::First), Difference::new(), true)
            .expect("valid slice")
            .to_vec();
        output.sort_by(|a, b| a.position.cmp(&b.position));

        assert_eq!(
            values(&output),
            vec![
                (position!["x", "r2-r1"], -3.0),
                (position!["x", "r3-r2"], 8.0),
            ]
        );
    }

    #[test]
    fn test_difference_descending() {
        let output = matrix(series())
            .slide(Over(Dimension::First), Difference::new(), false)
            .expect("valid slice")
            .to_vec();

        let mut found = values(&output);
        found.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(
            found,
            vec![
                (position!["x", "r1-r2"], 3.0),
                (position!["x", "r2-r3"], -8.0),
            ]
        );
    }

    #[test]
    fn test_windows_are_per_group() {
        let mut cells = series();
        cells.push(cell(position!["y", "r1"], 1.0));
        cells.push(cell(position!["y", "r2"], 2.0));

        let output = matrix(cells)
            .slide(Over(Dimension::First), CumulativeSum::new(), true)
            .expect("valid slice")
            .to_sorted_vec();

        assert_eq!(
            values(&output),
            vec![
                (position!["x", "r1"], 10.0),
                (position!["x", "r2"], 17.0),
                (position!["x", "r3"], 32.0),
                (position!["y", "r1"], 1.0),
                (position!["y", "r2"], 3.0),
            ]
        );
    }

    #[test]
    fn test_moving_average_warm_up() {
        let cells = (1..=5)
            .map(|day| cell(position![day, "temperature"], day as f64 * 2.0))
            .collect();

        let output = matrix(cells)
            .slide(Along(Dimension::First), MovingAverage::new(3), true)
            .expect("valid slice")
            .to_sorted_vec();

        // Nothing is emitted until three values have been seen
        assert_eq!(
            values(&output),
            vec![
                (position![3, "temperature"], 4.0),
                (position![4, "temperature"], 6.0),
                (position![5, "temperature"], 8.0),
            ]
        );
    }

    #[test]
    fn test_slide_skips_unprepared_cells() {
        let mut cells = series();
        cells.push(Cell::new(position!["x", "r0"], Content::nominal("n/a")));

        let output = matrix(cells)
            .slide(Over(Dimension::First), Difference::new(), true)
            .expect("valid slice")
            .to_vec();
        assert_eq!(output.len(), 2);
    }
}
