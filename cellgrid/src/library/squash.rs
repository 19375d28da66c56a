//! Squashers

use cellgrid_core::{Cell, Squasher};

/// Keep the cell with the largest coordinate in the squashed dimension
#[derive(Debug, Clone, Copy, Default)]
pub struct PreservingMaxPosition;

impl PreservingMaxPosition {
    pub fn new() -> Self {
        Self
    }
}

impl<const K: usize> Squasher<K> for PreservingMaxPosition {
    fn reduce(&self, index: usize, left: Cell<K>, right: Cell<K>) -> Cell<K> {
        let (left_coordinate, right_coordinate) = (
            left.position.coordinates().get(index),
            right.position.coordinates().get(index),
        );
        if right_coordinate > left_coordinate {
            right
        } else {
            left
        }
    }
}

/// Keep the cell with the smallest coordinate in the squashed dimension
#[derive(Debug, Clone, Copy, Default)]
pub struct PreservingMinPosition;

impl PreservingMinPosition {
    pub fn new() -> Self {
        Self
    }
}

impl<const K: usize> Squasher<K> for PreservingMinPosition {
    fn reduce(&self, index: usize, left: Cell<K>, right: Cell<K>) -> Cell<K> {
        let (left_coordinate, right_coordinate) = (
            left.position.coordinates().get(index),
            right.position.coordinates().get(index),
        );
        if right_coordinate < left_coordinate {
            right
        } else {
            left
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellgrid_core::{position, Content};

    #[test]
    fn test_preserving_max_is_commutative() {
        let early = Cell::new(position!["a", 2020], Content::continuous(1.0));
        let late = Cell::new(position!["a", 2021], Content::continuous(2.0));

        let squasher = PreservingMaxPosition::new();
        assert_eq!(squasher.reduce(1, early.clone(), late.clone()), late);
        assert_eq!(squasher.reduce(1, late.clone(), early.clone()), late);

        let squasher = PreservingMinPosition::new();
        assert_eq!(squasher.reduce(1, early.clone(), late.clone()), early);
        assert_eq!(squasher.reduce(1, late, early.clone()), early);
    }
}
