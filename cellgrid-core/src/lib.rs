#![no_std]

//! cellgrid core - cell, position and slice definitions
//!
//! This crate provides the data model and operation contracts for sparse,
//! multi-dimensional labeled matrices. Cells are addressed by fixed-arity
//! positions of typed coordinate values; a [`Slice`] splits a position into
//! a group key and a remainder, and the traits in [`traits`] describe the
//! aggregate, transform, window, pairwise, partition, squash and reshape
//! operations independently of how a collection runtime executes them.

extern crate alloc;

pub mod error;
pub mod hash;
pub mod model;
pub mod slice;
pub mod traits;
pub mod validation;

pub use error::*;
pub use hash::*;
pub use model::*;
pub use slice::*;
pub use traits::*;
