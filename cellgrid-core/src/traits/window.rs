//! Sequential window contract
//!
//! A window scans the cells of one group in remainder order while carrying
//! an explicit state. The first cell initialises the state; every later cell
//! updates it. Both steps may emit outputs, which are presented as cells at
//! the group key once the scan is complete.

use alloc::vec::Vec;

use crate::model::{Cell, Position};

/// Scan groups of `Cell<K>` keyed by `Position<S>` with remainders
/// `Position<R>`, presenting `Cell<Q>`
///
/// Results depend on scan direction, so implementations may assume cells
/// arrive in a stable, total order.
pub trait Window<const K: usize, const S: usize, const R: usize, const Q: usize>:
    Send + Sync
{
    /// Projection of a cell fed to the scan
    type Input: Send;
    /// State carried between cells of a group
    type State: Send;
    /// Intermediate result emitted during the scan
    type Output: Send;

    /// Project a cell; `None` skips the cell before the scan
    fn prepare(&self, cell: &Cell<K>) -> Option<Self::Input>;

    /// Start the scan with the first cell of the group
    fn initialise(
        &self,
        remainder: &Position<R>,
        input: Self::Input,
    ) -> (Self::State, Vec<Self::Output>);

    /// Advance the scan with the next cell of the group
    fn update(
        &self,
        remainder: &Position<R>,
        input: Self::Input,
        state: Self::State,
    ) -> (Self::State, Vec<Self::Output>);

    /// Turn an emitted output into cells at the group key
    fn present(&self, selected: &Position<S>, output: Self::Output) -> Vec<Cell<Q>>;
}
