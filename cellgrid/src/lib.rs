//! cellgrid - sparse labeled matrix algebra
//!
//! This library executes the cell algebra defined in `cellgrid-core` on a
//! local data-parallel runtime, and provides a library of ready-made
//! aggregators, transformers, windows and partitioners together with
//! delimited text I/O.
//!
//! ## Architecture
//!
//! cellgrid is split into a model crate and an execution crate:
//!
//! - **cellgrid-core**: values, positions, slices and the operation
//!   contracts (no I/O, `no_std`)
//! - **cellgrid**: the [`LocalRuntime`], the [`Matrix`] operations, the
//!   [`library`] of operation objects and the [`io`] adapters
//!
//! ## Quick Start
//!
//! ```rust
//! use cellgrid::library::aggregate::Mean;
//! use cellgrid::{position, Cell, Content, Dimension, LocalRuntime, Matrix, Over};
//!
//! fn example() -> cellgrid::Result<()> {
//!     let cells = vec![
//!         Cell::new(position!["iris-1", "sepal"], Content::continuous(5.1)),
//!         Cell::new(position!["iris-2", "sepal"], Content::continuous(4.9)),
//!     ];
//!     let matrix = Matrix::from_cells(LocalRuntime::new(), cells);
//!
//!     // Mean of every feature over all instances
//!     let means = matrix.summarise(Over(Dimension::Second), Mean::new())?;
//!     for cell in means.to_sorted_vec() {
//!         println!("{}", cell.to_short_string("|"));
//!     }
//!     Ok(())
//! }
//! # example().unwrap();
//! ```
//!
//! ## Features
//!
//! - **serde**: serde support for cells and configuration, JSON lines output
//! - **mmap**: memory-mapped reading of cell files
//! - **async**: tokio-based cell writer
//! - **cli**: command line example

// Re-export the data model and operation contracts
pub use cellgrid_core::{
    // Model
    codec_by_name, codec_for_kind, position, stable_hash, Cell, Classification, Codec, Content,
    DateCodec, Dimension, Entry, Expandable, IntegerCodec, Position, RealCodec, Record,
    RecordCodec, Reducible, Schema, TextCodec, Value, ValueKind, DEFAULT_DATE_FORMAT,
    // Slices
    Along, Key, Over, Slice,
    // Operation contracts
    Aggregator, AppendName, Comparer, Locator, Operator, Overwrite, Partitioner,
    PartitionerWithValue, Placement, Runtime, Squasher, Transformer, TransformerWithValue, Tuner,
    Window,
    // Errors
    ContentError, StructuralError,
};

pub mod error;
pub mod io;
pub mod library;
pub mod matrix;
pub mod runtime;

pub use error::{CellgridError, Result};
pub use matrix::{Matrix, Partitions};
pub use runtime::{LocalRuntime, RuntimeConfig};
