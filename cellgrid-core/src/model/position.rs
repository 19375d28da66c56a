//! Fixed-arity positions
//!
//! A [`Position`] is an ordered tuple of `K` coordinate values. The arity is
//! part of the type: operations that add or drop a coordinate go through the
//! [`Expandable`] and [`Reducible`] traits, whose associated types name the
//! adjacent arity, so a `Position<3>` can only ever become a `Position<2>` or
//! a `Position<4>`.

use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;

use super::dimension::Dimension;
use super::value::Value;
use crate::error::{Result, StructuralError};
use crate::validation::validate_permutation;

/// Ordered tuple of `K` coordinate values.
///
/// Positions order lexicographically over their coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position<const K: usize> {
    coordinates: [Value; K],
}

impl<const K: usize> Position<K> {
    pub const ARITY: usize = K;

    pub fn new(coordinates: [Value; K]) -> Self {
        Self { coordinates }
    }

    pub const fn arity(&self) -> usize {
        K
    }

    pub fn coordinates(&self) -> &[Value; K] {
        &self.coordinates
    }

    pub fn into_coordinates(self) -> [Value; K] {
        self.coordinates
    }

    /// Coordinate at `dimension`
    pub fn get(&self, dimension: Dimension) -> Result<&Value> {
        Ok(&self.coordinates[dimension.index(K)?])
    }

    /// Copy of this position with the coordinate at `dimension` replaced
    pub fn update(&self, dimension: Dimension, value: impl Into<Value>) -> Result<Self> {
        let index = dimension.index(K)?;
        let mut coordinates = self.coordinates.clone();
        coordinates[index] = value.into();
        Ok(Self { coordinates })
    }

    /// Reorder coordinates; `order[i]` names the dimension that moves to slot `i`
    pub fn permute(&self, order: &[Dimension; K]) -> Result<Self> {
        let indices = validate_permutation(order)?;
        Ok(Self {
            coordinates: core::array::from_fn(|slot| self.coordinates[indices[slot]].clone()),
        })
    }

    /// Compare with a position of any arity; arity decides first
    pub fn compare_any<const M: usize>(&self, other: &Position<M>) -> Ordering {
        K.cmp(&M)
            .then_with(|| self.coordinates.iter().cmp(other.coordinates.iter()))
    }

    /// Coordinates joined by `separator`
    pub fn to_short_string(&self, separator: &str) -> String {
        let mut text = String::new();
        for (index, coordinate) in self.coordinates.iter().enumerate() {
            if index > 0 {
                text.push_str(separator);
            }
            text.push_str(&alloc::format!("{coordinate}"));
        }
        text
    }
}

impl<const K: usize> From<[Value; K]> for Position<K> {
    fn from(coordinates: [Value; K]) -> Self {
        Self::new(coordinates)
    }
}

impl<const K: usize> TryFrom<Vec<Value>> for Position<K> {
    type Error = StructuralError;

    fn try_from(coordinates: Vec<Value>) -> Result<Self> {
        let found = coordinates.len();
        coordinates
            .try_into()
            .map(Self::new)
            .map_err(|_| StructuralError::ArityMismatch { expected: K, found })
    }
}

/// Positions that can gain a coordinate
pub trait Expandable {
    /// Position with one more coordinate
    type Expanded;

    /// Add a coordinate after the last one
    fn append(&self, value: impl Into<Value>) -> Self::Expanded;

    /// Add a coordinate before the first one
    fn prepend(&self, value: impl Into<Value>) -> Self::Expanded;

    /// Add a coordinate so that it ends up at `dimension`; `Last` appends
    fn insert(&self, dimension: Dimension, value: impl Into<Value>) -> Result<Self::Expanded>;
}

/// Positions that can lose a coordinate
pub trait Reducible {
    /// Position with one less coordinate
    type Reduced;

    /// Drop the coordinate at `dimension`
    fn remove(&self, dimension: Dimension) -> Result<Self::Reduced>;

    /// Replace coordinate `into` with `merge(into, dimension)` and drop `dimension`
    fn melt<F>(&self, dimension: Dimension, into: Dimension, merge: F) -> Result<Self::Reduced>
    where
        F: FnOnce(&Value, &Value) -> Value;
}

fn insert_coordinate<const K: usize, const N: usize>(
    coordinates: &[Value; K],
    index: usize,
    value: Value,
) -> [Value; N] {
    core::array::from_fn(|slot| match slot.cmp(&index) {
        Ordering::Less => coordinates[slot].clone(),
        Ordering::Equal => value.clone(),
        Ordering::Greater => coordinates[slot - 1].clone(),
    })
}

fn remove_coordinate<const K: usize, const N: usize>(
    coordinates: &[Value; K],
    index: usize,
) -> [Value; N] {
    core::array::from_fn(|slot| {
        if slot < index {
            coordinates[slot].clone()
        } else {
            coordinates[slot + 1].clone()
        }
    })
}

macro_rules! adjacent_arity {
    ($($k:literal => $n:literal),* $(,)?) => {
        $(
            impl Expandable for Position<$k> {
                type Expanded = Position<$n>;

                fn append(&self, value: impl Into<Value>) -> Position<$n> {
                    Position::new(insert_coordinate(&self.coordinates, $k, value.into()))
                }

                fn prepend(&self, value: impl Into<Value>) -> Position<$n> {
                    Position::new(insert_coordinate(&self.coordinates, 0, value.into()))
                }

                fn insert(
                    &self,
                    dimension: Dimension,
                    value: impl Into<Value>,
                ) -> Result<Position<$n>> {
                    let index = dimension.insertion_index($k)?;
                    Ok(Position::new(insert_coordinate(&self.coordinates, index, value.into())))
                }
            }

            impl Reducible for Position<$n> {
                type Reduced = Position<$k>;

                fn remove(&self, dimension: Dimension) -> Result<Position<$k>> {
                    let index = dimension.index($n)?;
                    Ok(Position::new(remove_coordinate(&self.coordinates, index)))
                }

                fn melt<F>(
                    &self,
                    dimension: Dimension,
                    into: Dimension,
                    merge: F,
                ) -> Result<Position<$k>>
                where
                    F: FnOnce(&Value, &Value) -> Value,
                {
                    let index = dimension.index($n)?;
                    let target = into.index($n)?;
                    if index == target {
                        return Err(StructuralError::MeltIntoSelf { dimension });
                    }

                    let mut coordinates = self.coordinates.clone();
                    coordinates[target] = merge(&self.coordinates[target], &self.coordinates[index]);
                    Ok(Position::new(remove_coordinate(&coordinates, index)))
                }
            }
        )*
    };
}

adjacent_arity!(0 => 1, 1 => 2, 2 => 3, 3 => 4, 4 => 5, 5 => 6, 6 => 7, 7 => 8, 8 => 9);

/// Build a position from values convertible into [`Value`]
///
/// ```
/// use cellgrid_core::{position, Position, Value};
///
/// let p: Position<2> = position!["iris", 3];
/// assert_eq!(p.coordinates()[1], Value::Integer(3));
/// ```
#[macro_export]
macro_rules! position {
    ($($coordinate:expr),* $(,)?) => {
        $crate::Position::new([$($crate::Value::from($coordinate)),*])
    };
}

#[cfg(feature = "serde")]
impl<const K: usize> serde::Serialize for Position<K> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.coordinates.iter())
    }
}

#[cfg(feature = "serde")]
impl<'de, const K: usize> serde::Deserialize<'de> for Position<K> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let coordinates = <Vec<Value> as serde::Deserialize>::deserialize(deserializer)?;
        Position::try_from(coordinates).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position;
    use alloc::vec;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_value(rng: &mut StdRng) -> Value {
        match rng.gen_range(0..3) {
            0 => Value::Integer(rng.gen_range(-3..3)),
            1 => Value::Real(rng.gen_range(-2..2) as f64 * 0.5),
            _ => Value::from(["a", "b", "c"][rng.gen_range(0..3)]),
        }
    }

    fn random_position<const K: usize>(rng: &mut StdRng) -> Position<K> {
        Position::new(core::array::from_fn(|_| random_value(rng)))
    }

    #[test]
    fn test_get_and_update() {
        let p: Position<3> = position!["x", 2, 3.5];
        assert_eq!(p.get(Dimension::Second), Ok(&Value::from(2)));
        assert_eq!(p.get(Dimension::Last), Ok(&Value::from(3.5)));
        assert_eq!(
            p.get(Dimension::Fourth),
            Err(StructuralError::DimensionOutOfRange {
                dimension: Dimension::Fourth,
                arity: 3
            })
        );

        let updated = p.update(Dimension::First, "y").expect("in range");
        assert_eq!(updated, position!["y", 2, 3.5]);
        assert_eq!(p, position!["x", 2, 3.5]);
    }

    #[test]
    fn test_expand() {
        let p: Position<2> = position![1, 2];
        assert_eq!(p.append(3), position![1, 2, 3]);
        assert_eq!(p.prepend(0), position![0, 1, 2]);
        assert_eq!(p.insert(Dimension::Second, 9), Ok(position![1, 9, 2]));
        assert_eq!(p.insert(Dimension::Last, 9), Ok(position![1, 2, 9]));
        assert_eq!(p.insert(Dimension::Third, 9), Ok(position![1, 2, 9]));
        assert!(p.insert(Dimension::Fourth, 9).is_err());

        let unit: Position<0> = position![];
        assert_eq!(unit.append("only"), position!["only"]);
    }

    #[test]
    fn test_remove() {
        let p: Position<3> = position!["a", "b", "c"];
        assert_eq!(p.remove(Dimension::First), Ok(position!["b", "c"]));
        assert_eq!(p.remove(Dimension::Last), Ok(position!["a", "b"]));
        assert!(p.remove(Dimension::Ninth).is_err());
    }

    #[test]
    fn test_permute() {
        let p: Position<3> = position!["a", "b", "c"];
        let order = [Dimension::Third, Dimension::First, Dimension::Second];
        assert_eq!(p.permute(&order), Ok(position!["c", "a", "b"]));

        let repeated = [Dimension::First, Dimension::First, Dimension::Third];
        assert_eq!(
            p.permute(&repeated),
            Err(StructuralError::InvalidPermutation { arity: 3 })
        );
    }

    #[test]
    fn test_melt() {
        let p: Position<3> = position!["2024", "01", "sales"];
        let melted = p
            .melt(Dimension::Second, Dimension::First, |into, from| {
                Value::from(alloc::format!("{into}-{from}"))
            })
            .expect("distinct dimensions");
        assert_eq!(melted, position!["2024-01", "sales"]);

        assert_eq!(
            p.melt(Dimension::First, Dimension::First, |a, _| a.clone()),
            Err(StructuralError::MeltIntoSelf {
                dimension: Dimension::First
            })
        );
    }

    #[test]
    fn test_compare_any_arity_first() {
        let short: Position<1> = position!["z"];
        let long: Position<2> = position!["a", "a"];
        assert_eq!(short.compare_any(&long), Ordering::Less);
        assert_eq!(long.compare_any(&short), Ordering::Greater);
        assert_eq!(long.compare_any(&long.clone()), Ordering::Equal);
    }

    #[test]
    fn test_try_from_vec() {
        let p = Position::<2>::try_from(vec![Value::from(1), Value::from(2)]);
        assert_eq!(p, Ok(position![1, 2]));
        assert_eq!(
            Position::<2>::try_from(vec![Value::from(1)]),
            Err(StructuralError::ArityMismatch {
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_short_string() {
        let p: Position<3> = position!["a", 1, 2.5];
        assert_eq!(p.to_short_string("|"), "a|1|2.5");
        assert_eq!(position![].to_short_string("|"), "");
    }

    #[test]
    fn test_append_remove_last_round_trip() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let p: Position<4> = random_position(&mut rng);
            let v = random_value(&mut rng);
            assert_eq!(p.append(v).remove(Dimension::Last), Ok(p));
        }
    }

    #[test]
    fn test_order_is_total() {
        let mut rng = StdRng::seed_from_u64(11);
        let positions: Vec<Position<2>> = (0..40).map(|_| random_position(&mut rng)).collect();

        for p in &positions {
            for q in &positions {
                let forward = p.cmp(q);
                assert_eq!(forward.reverse(), q.cmp(p));
                assert_eq!(
                    forward == Ordering::Equal,
                    p.coordinates().iter().zip(q.coordinates()).all(|(a, b)| a == b)
                );
                for r in &positions {
                    if forward != Ordering::Greater && q.cmp(r) != Ordering::Greater {
                        assert_ne!(p.cmp(r), Ordering::Greater);
                    }
                }
            }
        }
    }
}
