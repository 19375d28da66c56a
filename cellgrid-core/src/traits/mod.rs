//! Operation contracts for the cell algebra
//!
//! This module defines the operation objects consumed by matrix operations
//! and the collection runtime those operations are executed on. Traits are
//! pure interfaces; concrete implementations live in the `cellgrid` crate.

pub mod aggregator;
pub mod locator;
pub mod operator;
pub mod partitioner;
pub mod placement;
pub mod runtime;
pub mod squasher;
pub mod transformer;
pub mod window;

pub use aggregator::Aggregator;
pub use locator::Locator;
pub use operator::{Comparer, Operator};
pub use partitioner::{Partitioner, PartitionerWithValue};
pub use placement::{AppendName, Overwrite, Placement};
pub use runtime::{Runtime, Tuner};
pub use squasher::Squasher;
pub use transformer::{Transformer, TransformerWithValue};
pub use window::Window;
