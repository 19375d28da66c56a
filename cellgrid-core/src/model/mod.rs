//! Cell data model
//!
//! This module contains the immutable value types that flow through every
//! stage of a pipeline: coordinate values and their codecs, schema-classified
//! content, fixed-arity positions and cells.

pub mod cell;
pub mod codec;
pub mod content;
pub mod dimension;
pub mod position;
pub mod value;

pub use cell::{Cell, Entry};
pub use codec::{
    codec_by_name, codec_for_kind, Codec, DateCodec, IntegerCodec, RealCodec, RecordCodec, TextCodec,
    DEFAULT_DATE_FORMAT,
};
pub use content::{Classification, Content, Schema};
pub use dimension::Dimension;
pub use position::{Expandable, Position, Reducible};
pub use value::{Record, Value, ValueKind};
