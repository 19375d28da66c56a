//! Output position placement
//!
//! Aggregators and transformers present their results at a position derived
//! from their input. A placement decides whether that position keeps its
//! arity or gains a descriptive coordinate.

use crate::model::{Expandable, Position, Value};

/// Derive an output position of arity `Q` from a position of arity `S`
pub trait Placement<const S: usize, const Q: usize>: Clone + Send + Sync {
    /// Output position for `position`
    fn place(&self, position: &Position<S>) -> Position<Q>;
}

/// Keep the position as it is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overwrite;

impl<const S: usize> Placement<S, S> for Overwrite {
    fn place(&self, position: &Position<S>) -> Position<S> {
        position.clone()
    }
}

/// Append a descriptive coordinate such as `"mean"` or `"count"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendName(pub Value);

impl AppendName {
    pub fn new(name: impl Into<Value>) -> Self {
        Self(name.into())
    }
}

impl<const S: usize, const Q: usize> Placement<S, Q> for AppendName
where
    Position<S>: Expandable<Expanded = Position<Q>>,
{
    fn place(&self, position: &Position<S>) -> Position<Q> {
        position.append(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position;

    #[test]
    fn test_overwrite_keeps_position() {
        let p: Position<2> = position!["a", 1];
        assert_eq!(Overwrite.place(&p), p);
    }

    #[test]
    fn test_append_name() {
        let p: Position<1> = position!["a"];
        let placed: Position<2> = AppendName::new("mean").place(&p);
        assert_eq!(placed, position!["a", "mean"]);
    }
}
