//! Transformers
//!
//! All transformers read numeric content and drop other cells, except
//! [`Indicator`] which accepts anything. The `*WithValue` family expects
//! statistics keyed by the coordinate at their dimension, typically built
//! with [`Matrix::states`](crate::Matrix::states).

use cellgrid_core::{
    Cell, Content, Dimension, Overwrite, Placement, Position, Transformer, TransformerWithValue,
};
use hashbrown::HashMap;

use super::aggregate::Moments;

/// Replace every cell by a discrete `1`
#[derive(Debug, Clone, Copy)]
pub struct Indicator<P = Overwrite> {
    placement: P,
}

placed!(Indicator);

impl<const K: usize, const Q: usize, P> Transformer<K, Q> for Indicator<P>
where
    P: Placement<K, Q>,
{
    fn transform(&self, cell: &Cell<K>) -> Vec<Cell<Q>> {
        vec![Cell::new(self.placement.place(&cell.position), Content::discrete(1))]
    }
}

/// `1` for values above the threshold, `0` otherwise
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Binarise {
    threshold: f64,
}

impl Binarise {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl<const K: usize> Transformer<K, K> for Binarise {
    fn transform(&self, cell: &Cell<K>) -> Vec<Cell<K>> {
        cell.content
            .numeric()
            .map(|value| {
                let bit = i64::from(value > self.threshold);
                Cell::new(cell.position.clone(), Content::discrete(bit))
            })
            .into_iter()
            .collect()
    }
}

/// Limit values to `[lower, upper]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clamp {
    lower: f64,
    upper: f64,
}

impl Clamp {
    /// Bounds given in the wrong order are swapped
    pub fn new(lower: f64, upper: f64) -> Self {
        Self {
            lower: lower.min(upper),
            upper: lower.max(upper),
        }
    }
}

impl<const K: usize> Transformer<K, K> for Clamp {
    fn transform(&self, cell: &Cell<K>) -> Vec<Cell<K>> {
        cell.content
            .numeric()
            .map(|value| {
                let clamped = value.max(self.lower).min(self.upper);
                Cell::new(cell.position.clone(), Content::continuous(clamped))
            })
            .into_iter()
            .collect()
    }
}

/// Logarithm; values that are not strictly positive are dropped
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Log {
    base: f64,
}

impl Log {
    /// Natural logarithm
    pub fn new() -> Self {
        Self {
            base: std::f64::consts::E,
        }
    }

    pub fn with_base(base: f64) -> Self {
        Self { base }
    }
}

impl Default for Log {
    fn default() -> Self {
        Self::new()
    }
}

impl<const K: usize> Transformer<K, K> for Log {
    fn transform(&self, cell: &Cell<K>) -> Vec<Cell<K>> {
        cell.content
            .numeric()
            .filter(|value| *value > 0.0)
            .map(|value| Cell::new(cell.position.clone(), Content::continuous(value.log(self.base))))
            .into_iter()
            .collect()
    }
}

/// Coordinate at `dimension` as a group key
fn key<const K: usize>(cell: &Cell<K>, dimension: Dimension) -> Option<Position<1>> {
    Some(Position::new([cell.position.get(dimension).ok()?.clone()]))
}

/// Divide by the largest absolute value of the cell's variable.
///
/// Cells whose variable has no scale, or a zero scale, are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalise {
    dimension: Dimension,
}

impl Normalise {
    /// Variables are identified by the coordinate at `dimension`
    pub fn new(dimension: Dimension) -> Self {
        Self { dimension }
    }

    fn normalise<const K: usize>(&self, cell: &Cell<K>, scales: &HashMap<Position<1>, f64>) -> Option<f64> {
        let scale = *scales.get(&key(cell, self.dimension)?)?;
        let number = cell.content.numeric()?;
        (scale != 0.0).then(|| number / scale)
    }
}

impl<const K: usize> TransformerWithValue<K, K> for Normalise {
    type Value = HashMap<Position<1>, f64>;

    fn transform_with_value(&self, cell: &Cell<K>, value: &Self::Value) -> Vec<Cell<K>> {
        self.normalise(cell, value)
            .map(|number| Cell::new(cell.position.clone(), Content::continuous(number)))
            .into_iter()
            .collect()
    }
}

/// Subtract the mean and divide by the standard deviation of the cell's variable.
///
/// A variable with zero deviation standardises to `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Standardise {
    dimension: Dimension,
    population: bool,
}

impl Standardise {
    pub fn new(dimension: Dimension) -> Self {
        Self {
            dimension,
            population: true,
        }
    }

    /// Use the sample deviation
    pub fn sample(mut self) -> Self {
        self.population = false;
        self
    }

    fn standardise<const K: usize>(&self, cell: &Cell<K>, moments: &HashMap<Position<1>, Moments>) -> Option<f64> {
        let moments = moments.get(&key(cell, self.dimension)?)?;
        let deviation = moments.standard_deviation(self.population)?;
        let number = cell.content.numeric()?;
        if deviation == 0.0 {
            Some(0.0)
        } else {
            Some((number - moments.mean) / deviation)
        }
    }
}

impl<const K: usize> TransformerWithValue<K, K> for Standardise {
    type Value = HashMap<Position<1>, Moments>;

    fn transform_with_value(&self, cell: &Cell<K>, value: &Self::Value) -> Vec<Cell<K>> {
        self.standardise(cell, value)
            .map(|number| Cell::new(cell.position.clone(), Content::continuous(number)))
            .into_iter()
            .collect()
    }
}

/// Bin values by per-variable cut points.
///
/// Cut points `[c0, c1, .., cn]` define bins `(c0,c1]`, .., `(cn-1,cn]`;
/// the output is ordinal content naming the bin. Values outside every bin
/// are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cut {
    dimension: Dimension,
}

impl Cut {
    pub fn new(dimension: Dimension) -> Self {
        Self { dimension }
    }

    fn label<const K: usize>(&self, cell: &Cell<K>, cuts: &HashMap<Position<1>, Vec<f64>>) -> Option<String> {
        let cuts = cuts.get(&key(cell, self.dimension)?)?;
        let index = bin(cuts, cell.content.numeric()?)?;
        Some(format!("({},{}]", cuts[index], cuts[index + 1]))
    }
}

/// Index of the bin `(cuts[i], cuts[i + 1]]` holding `value`
fn bin(cuts: &[f64], value: f64) -> Option<usize> {
    cuts.windows(2)
        .position(|pair| pair[0] < value && value <= pair[1])
}

impl<const K: usize> TransformerWithValue<K, K> for Cut {
    /// Sorted cut points per variable
    type Value = HashMap<Position<1>, Vec<f64>>;

    fn transform_with_value(&self, cell: &Cell<K>, value: &Self::Value) -> Vec<Cell<K>> {
        self.label(cell, value)
            .map(|label| Cell::new(cell.position.clone(), Content::ordinal(label)))
            .into_iter()
            .collect()
    }
}
