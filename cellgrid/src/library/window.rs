//! Windows
//!
//! [`Difference`] labels its output with the remainders it compares and
//! presents it at the group key. The running statistics emit one value per
//! cell at the cell's own position.

use std::collections::VecDeque;

use cellgrid_core::{Cell, Content, Expandable, Position, Window};

/// Current minus previous value, labelled `current-previous`
#[derive(Debug, Clone, Copy, Default)]
pub struct Difference;

impl Difference {
    pub fn new() -> Self {
        Self
    }
}

impl<const K: usize, const S: usize, const M: usize, const Q: usize> Window<K, S, M, Q> for Difference
where
    Position<S>: Expandable<Expanded = Position<Q>>,
{
    type Input = f64;
    /// Previous remainder and value
    type State = (Position<M>, f64);
    /// Label and difference
    type Output = (String, f64);

    fn prepare(&self, cell: &Cell<K>) -> Option<f64> {
        cell.content.numeric()
    }

    fn initialise(&self, remainder: &Position<M>, input: f64) -> (Self::State, Vec<Self::Output>) {
        ((remainder.clone(), input), Vec::new())
    }

    fn update(
        &self,
        remainder: &Position<M>,
        input: f64,
        (previous, value): Self::State,
    ) -> (Self::State, Vec<Self::Output>) {
        let label = format!(
            "{}-{}",
            remainder.to_short_string("|"),
            previous.to_short_string("|")
        );
        ((remainder.clone(), input), vec![(label, input - value)])
    }

    fn present(&self, selected: &Position<S>, (label, difference): Self::Output) -> Vec<Cell<Q>> {
        vec![Cell::new(selected.append(label), Content::continuous(difference))]
    }
}

/// Running total
#[derive(Debug, Clone, Copy, Default)]
pub struct CumulativeSum;

impl CumulativeSum {
    pub fn new() -> Self {
        Self
    }
}

impl<const K: usize, const S: usize, const M: usize> Window<K, S, M, K> for CumulativeSum {
    type Input = (Position<K>, f64);
    type State = f64;
    type Output = (Position<K>, f64);

    fn prepare(&self, cell: &Cell<K>) -> Option<Self::Input> {
        Some((cell.position.clone(), cell.content.numeric()?))
    }

    fn initialise(&self, _remainder: &Position<M>, input: Self::Input) -> (f64, Vec<Self::Output>) {
        (input.1, vec![input])
    }

    fn update(
        &self,
        _remainder: &Position<M>,
        (position, value): Self::Input,
        total: f64,
    ) -> (f64, Vec<Self::Output>) {
        let total = total + value;
        (total, vec![(position, total)])
    }

    fn present(&self, _selected: &Position<S>, (position, value): Self::Output) -> Vec<Cell<K>> {
        vec![Cell::new(position, Content::continuous(value))]
    }
}

/// Mean of the last `n` values; nothing is emitted before `n` values are seen
#[derive(Debug, Clone, Copy)]
pub struct MovingAverage {
    width: usize,
}

impl MovingAverage {
    /// A width of zero is treated as one
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(1),
        }
    }
}

impl<const K: usize, const S: usize, const M: usize> Window<K, S, M, K> for MovingAverage {
    type Input = (Position<K>, f64);
    type State = VecDeque<f64>;
    type Output = (Position<K>, f64);

    fn prepare(&self, cell: &Cell<K>) -> Option<Self::Input> {
        Some((cell.position.clone(), cell.content.numeric()?))
    }

    fn initialise(&self, remainder: &Position<M>, input: Self::Input) -> (Self::State, Vec<Self::Output>) {
        <Self as Window<K, S, M, K>>::update(self, remainder, input, VecDeque::with_capacity(self.width))
    }

    fn update(
        &self,
        _remainder: &Position<M>,
        (position, value): Self::Input,
        mut values: Self::State,
    ) -> (Self::State, Vec<Self::Output>) {
        if values.len() == self.width {
            values.pop_front();
        }
        values.push_back(value);

        let outputs = if values.len() == self.width {
            let mean = values.iter().sum::<f64>() / self.width as f64;
            vec![(position, mean)]
        } else {
            Vec::new()
        };
        (values, outputs)
    }

    fn present(&self, _selected: &Position<S>, (position, value): Self::Output) -> Vec<Cell<K>> {
        vec![Cell::new(position, Content::continuous(value))]
    }
}

/// Exponentially weighted average, `alpha * value + (1 - alpha) * previous`
#[derive(Debug, Clone, Copy)]
pub struct ExponentialMovingAverage {
    alpha: f64,
}

impl ExponentialMovingAverage {
    /// `alpha` is clamped to `[0, 1]`
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
        }
    }
}

impl<const K: usize, const S: usize, const M: usize> Window<K, S, M, K> for ExponentialMovingAverage {
    type Input = (Position<K>, f64);
    type State = f64;
    type Output = (Position<K>, f64);

    fn prepare(&self, cell: &Cell<K>) -> Option<Self::Input> {
        Some((cell.position.clone(), cell.content.numeric()?))
    }

    fn initialise(&self, _remainder: &Position<M>, input: Self::Input) -> (f64, Vec<Self::Output>) {
        (input.1, vec![input])
    }

    fn update(
        &self,
        _remainder: &Position<M>,
        (position, value): Self::Input,
        previous: f64,
    ) -> (f64, Vec<Self::Output>) {
        let average = self.alpha * value + (1.0 - self.alpha) * previous;
        (average, vec![(position, average)])
    }

    fn present(&self, _selected: &Position<S>, (position, value): Self::Output) -> Vec<Cell<K>> {
        vec![Cell::new(position, Content::continuous(value))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellgrid_core::position;

    /// Drive a window over `values` in order, as a scan over one group would
    fn scan<W>(window: &W, values: &[f64]) -> Vec<Cell<2>>
    where
        W: Window<2, 1, 1, 2>,
    {
        let mut state = None;
        let mut cells = Vec::new();
        for (index, value) in values.iter().enumerate() {
            let remainder = position![format!("r{}", index + 1)];
            let cell = Cell::new(
                position!["x", format!("r{}", index + 1)],
                Content::continuous(*value),
            );
            let Some(input) = window.prepare(&cell) else {
                continue;
            };
            let (next, outputs) = match state.take() {
                None => window.initialise(&remainder, input),
                Some(current) => window.update(&remainder, input, current),
            };
            state = Some(next);
            for output in outputs {
                cells.extend(window.present(&position!["x"], output));
            }
        }
        cells
    }

    fn numbers(cells: &[Cell<2>]) -> Vec<f64> {
        cells.iter().filter_map(|c| c.content.numeric()).collect()
    }

    #[test]
    fn test_difference_labels() {
        let cells = scan(&Difference::new(), &[10.0, 7.0, 15.0]);
        assert_eq!(cells[0].position, position!["x", "r2-r1"]);
        assert_eq!(cells[1].position, position!["x", "r3-r2"]);
        assert_eq!(numbers(&cells), vec![-3.0, 8.0]);
    }

    #[test]
    fn test_cumulative_sum() {
        let cells = scan(&CumulativeSum::new(), &[1.0, 2.0, 3.0]);
        assert_eq!(numbers(&cells), vec![1.0, 3.0, 6.0]);
        assert_eq!(cells[2].position, position!["x", "r3"]);
    }

    #[test]
    fn test_moving_average() {
        let cells = scan(&MovingAverage::new(2), &[1.0, 3.0, 5.0, 9.0]);
        assert_eq!(numbers(&cells), vec![2.0, 4.0, 7.0]);
        assert_eq!(cells[0].position, position!["x", "r2"]);

        // Width one echoes the input
        let cells = scan(&MovingAverage::new(0), &[4.0, 5.0]);
        assert_eq!(numbers(&cells), vec![4.0, 5.0]);
    }

    #[test]
    fn test_exponential_moving_average() {
        let cells = scan(&ExponentialMovingAverage::new(0.5), &[4.0, 8.0, 0.0]);
        assert_eq!(numbers(&cells), vec![4.0, 6.0, 3.0]);
    }
}
