//! Aggregators
//!
//! Numeric aggregators read continuous and discrete content and skip every
//! other cell. [`Count`] and [`DistinctCount`] accept any content.

use cellgrid_core::{Aggregator, Cell, Content, Overwrite, Placement, Position, Value};
use hashbrown::HashSet;


/// Count, mean and sum of squared deviations of a sample.
///
/// Partial moments merge with Chan's parallel update, so groups can be
/// reduced in any order.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Moments {
    pub count: u64,
    pub mean: f64,
    pub m2: f64,
}

impl Moments {
    pub fn from_value(value: f64) -> Self {
        Self {
            count: 1,
            mean: value,
            m2: 0.0,
        }
    }

    pub fn merge(self, other: Self) -> Self {
        if self.count == 0 {
            return other;
        }
        if other.count == 0 {
            return self;
        }

        let count = self.count + other.count;
        let (left, right, total) = (self.count as f64, other.count as f64, count as f64);
        let delta = other.mean - self.mean;
        Self {
            count,
            mean: self.mean + delta * right / total,
            m2: self.m2 + other.m2 + delta * delta * left * right / total,
        }
    }

    /// Population (`n`) or sample (`n - 1`) variance; `None` without enough values
    pub fn variance(&self, population: bool) -> Option<f64> {
        let denominator = if population {
            self.count
        } else {
            self.count.checked_sub(1)?
        };
        (denominator > 0).then(|| self.m2 / denominator as f64)
    }

    pub fn standard_deviation(&self, population: bool) -> Option<f64> {
        self.variance(population).map(f64::sqrt)
    }
}

/// Number of cells
#[derive(Debug, Clone, Copy)]
pub struct Count<P = Overwrite> {
    placement: P,
}

/// Sum of numeric values
#[derive(Debug, Clone, Copy)]
pub struct Sum<P = Overwrite> {
    placement: P,
}

/// Smallest numeric value
#[derive(Debug, Clone, Copy)]
pub struct Min<P = Overwrite> {
    placement: P,
}

/// Largest numeric value
#[derive(Debug, Clone, Copy)]
pub struct Max<P = Overwrite> {
    placement: P,
}

/// Largest absolute numeric value, the scale used by normalisation
#[derive(Debug, Clone, Copy)]
pub struct MaxAbs<P = Overwrite> {
    placement: P,
}

/// Arithmetic mean of numeric values
#[derive(Debug, Clone, Copy)]
pub struct Mean<P = Overwrite> {
    placement: P,
}

/// Number of distinct content values
#[derive(Debug, Clone, Copy)]
pub struct DistinctCount<P = Overwrite> {
    placement: P,
}

placed!(Count, Sum, Min, Max, MaxAbs, Mean, DistinctCount);

fn single<const S: usize, const Q: usize, P>(
    placement: &P,
    selected: &Position<S>,
    content: Content,
) -> Vec<Cell<Q>>
where
    P: Placement<S, Q>,
{
    vec![Cell::new(placement.place(selected), content)]
}

impl<const K: usize, const S: usize, const Q: usize, P> Aggregator<K, S, Q> for Count<P>
where
    P: Placement<S, Q>,
{
    type State = u64;

    fn prepare(&self, _cell: &Cell<K>) -> Option<u64> {
        Some(1)
    }

    fn reduce(&self, left: u64, right: u64) -> u64 {
        left + right
    }

    fn present(&self, selected: &Position<S>, state: &u64) -> Vec<Cell<Q>> {
        let count = i64::try_from(*state).unwrap_or(i64::MAX);
        single(&self.placement, selected, Content::discrete(count))
    }
}

impl<const K: usize, const S: usize, const Q: usize, P> Aggregator<K, S, Q> for Sum<P>
where
    P: Placement<S, Q>,
{
    type State = f64;

    fn prepare(&self, cell: &Cell<K>) -> Option<f64> {
        cell.content.numeric()
    }

    fn reduce(&self, left: f64, right: f64) -> f64 {
        left + right
    }

    fn present(&self, selected: &Position<S>, state: &f64) -> Vec<Cell<Q>> {
        single(&self.placement, selected, Content::continuous(*state))
    }
}

impl<const K: usize, const S: usize, const Q: usize, P> Aggregator<K, S, Q> for Min<P>
where
    P: Placement<S, Q>,
{
    type State = f64;

    fn prepare(&self, cell: &Cell<K>) -> Option<f64> {
        cell.content.numeric()
    }

    fn reduce(&self, left: f64, right: f64) -> f64 {
        left.min(right)
    }

    fn present(&self, selected: &Position<S>, state: &f64) -> Vec<Cell<Q>> {
        single(&self.placement, selected, Content::continuous(*state))
    }
}

impl<const K: usize, const S: usize, const Q: usize, P> Aggregator<K, S, Q> for Max<P>
where
    P: Placement<S, Q>,
{
    type State = f64;

    fn prepare(&self, cell: &Cell<K>) -> Option<f64> {
        cell.content.numeric()
    }

    fn reduce(&self, left: f64, right: f64) -> f64 {
        left.max(right)
    }

    fn present(&self, selected: &Position<S>, state: &f64) -> Vec<Cell<Q>> {
        single(&self.placement, selected, Content::continuous(*state))
    }
}

impl<const K: usize, const S: usize, const Q: usize, P> Aggregator<K, S, Q> for MaxAbs<P>
where
    P: Placement<S, Q>,
{
    type State = f64;

    fn prepare(&self, cell: &Cell<K>) -> Option<f64> {
        cell.content.numeric().map(f64::abs)
    }

    fn reduce(&self, left: f64, right: f64) -> f64 {
        left.max(right)
    }

    fn present(&self, selected: &Position<S>, state: &f64) -> Vec<Cell<Q>> {
        single(&self.placement, selected, Content::continuous(*state))
    }
}

impl<const K: usize, const S: usize, const Q: usize, P> Aggregator<K, S, Q> for Mean<P>
where
    P: Placement<S, Q>,
{
    /// Running sum and count
    type State = (f64, u64);

    fn prepare(&self, cell: &Cell<K>) -> Option<(f64, u64)> {
        cell.content.numeric().map(|value| (value, 1))
    }

    fn reduce(&self, left: (f64, u64), right: (f64, u64)) -> (f64, u64) {
        (left.0 + right.0, left.1 + right.1)
    }

    fn present(&self, selected: &Position<S>, state: &(f64, u64)) -> Vec<Cell<Q>> {
        let (sum, count) = *state;
        single(&self.placement, selected, Content::continuous(sum / count as f64))
    }
}

impl<const K: usize, const S: usize, const Q: usize, P> Aggregator<K, S, Q> for DistinctCount<P>
where
    P: Placement<S, Q>,
{
    type State = HashSet<Value>;

    fn prepare(&self, cell: &Cell<K>) -> Option<HashSet<Value>> {
        Some(HashSet::from_iter([cell.content.value().clone()]))
    }

    fn reduce(&self, left: HashSet<Value>, right: HashSet<Value>) -> HashSet<Value> {
        let (mut larger, smaller) = if left.len() >= right.len() {
            (left, right)
        } else {
            (right, left)
        };
        larger.extend(smaller);
        larger
    }

    fn present(&self, selected: &Position<S>, state: &HashSet<Value>) -> Vec<Cell<Q>> {
        let count = i64::try_from(state.len()).unwrap_or(i64::MAX);
        single(&self.placement, selected, Content::discrete(count))
    }
}

/// Standard deviation of numeric values
///
/// Population deviation by default; see [`StandardDeviation::sample`].
/// Sample deviation of a single value is undefined and emits nothing.
#[derive(Debug, Clone, Copy)]
pub struct StandardDeviation<P = Overwrite> {
    placement: P,
    population: bool,
}

impl StandardDeviation<Overwrite> {
    pub fn new() -> Self {
        Self::named(Overwrite)
    }
}

impl Default for StandardDeviation<Overwrite> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> StandardDeviation<P> {
    pub fn named(placement: P) -> Self {
        Self {
            placement,
            population: true,
        }
    }

    /// Divide by `n - 1` instead of `n`
    pub fn sample(mut self) -> Self {
        self.population = false;
        self
    }
}

impl<const K: usize, const S: usize, const Q: usize, P> Aggregator<K, S, Q> for StandardDeviation<P>
where
    P: Placement<S, Q>,
{
    type State = Moments;

    fn prepare(&self, cell: &Cell<K>) -> Option<Moments> {
        cell.content.numeric().map(Moments::from_value)
    }

    fn reduce(&self, left: Moments, right: Moments) -> Moments {
        left.merge(right)
    }

    fn present(&self, selected: &Position<S>, state: &Moments) -> Vec<Cell<Q>> {
        state
            .standard_deviation(self.population)
            .map(|deviation| single(&self.placement, selected, Content::continuous(deviation)))
            .unwrap_or_default()
    }
}
