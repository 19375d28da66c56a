//! Dimension identifiers
//!
//! Dimensions are numbered from one externally; `Last` always refers to the
//! final coordinate of whatever position it is resolved against.

use core::fmt;
use core::str::FromStr;

use crate::error::{Result, StructuralError};

/// A dimension of a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dimension {
    First,
    Second,
    Third,
    Fourth,
    Fifth,
    Sixth,
    Seventh,
    Eighth,
    Ninth,
    /// The final dimension of the position it is resolved against
    Last,
}

impl Dimension {
    /// The nine numbered dimensions in order
    pub const NUMBERED: [Dimension; 9] = [
        Dimension::First,
        Dimension::Second,
        Dimension::Third,
        Dimension::Fourth,
        Dimension::Fifth,
        Dimension::Sixth,
        Dimension::Seventh,
        Dimension::Eighth,
        Dimension::Ninth,
    ];

    /// One-based ordinal, `None` for `Last`
    pub const fn ordinal(self) -> Option<usize> {
        match self {
            Dimension::First => Some(1),
            Dimension::Second => Some(2),
            Dimension::Third => Some(3),
            Dimension::Fourth => Some(4),
            Dimension::Fifth => Some(5),
            Dimension::Sixth => Some(6),
            Dimension::Seventh => Some(7),
            Dimension::Eighth => Some(8),
            Dimension::Ninth => Some(9),
            Dimension::Last => None,
        }
    }

    /// Dimension for a one-based ordinal
    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        ordinal
            .checked_sub(1)
            .and_then(|index| Self::NUMBERED.get(index).copied())
    }

    /// Resolve to a zero-based coordinate index for a position of `arity`
    pub fn index(self, arity: usize) -> Result<usize> {
        let index = match self.ordinal() {
            Some(ordinal) => ordinal - 1,
            None => arity
                .checked_sub(1)
                .ok_or(StructuralError::DimensionOutOfRange {
                    dimension: self,
                    arity,
                })?,
        };

        if index >= arity {
            return Err(StructuralError::DimensionOutOfRange {
                dimension: self,
                arity,
            });
        }

        Ok(index)
    }

    /// Resolve to an insertion index for a position of `arity`.
    ///
    /// Insertion may target one past the final coordinate; `Last` appends.
    pub fn insertion_index(self, arity: usize) -> Result<usize> {
        let index = match self.ordinal() {
            Some(ordinal) => ordinal - 1,
            None => arity,
        };

        if index > arity {
            return Err(StructuralError::DimensionOutOfRange {
                dimension: self,
                arity,
            });
        }

        Ok(index)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ordinal() {
            Some(ordinal) => write!(f, "{ordinal}"),
            None => write!(f, "last"),
        }
    }
}

impl FromStr for Dimension {
    type Err = StructuralError;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("last") {
            return Ok(Dimension::Last);
        }

        s.parse::<usize>()
            .ok()
            .and_then(Dimension::from_ordinal)
            .ok_or(StructuralError::InvalidDimension)
    }
}
