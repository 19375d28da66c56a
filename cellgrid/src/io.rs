//! Delimited text I/O
//!
//! Cells are stored one per line as `c1|..|cK|codec|schema|value`, the
//! format produced by [`Cell::to_short_string`](cellgrid_core::Cell::to_short_string).
//! A dictionary file (`name|codec|schema` per line) allows shorter cell
//! lines `c1|..|cK|value` whose schema is looked up by one coordinate.
//!
//! Parsing never stops at a malformed line: every failure is recorded as a
//! [`LineError`] next to the cells that did parse.

pub mod parse;
pub mod text;

pub use parse::{codecs, parse_cell, parse_lines, Dictionary, LineError, ParseError, Parsed};
pub use text::{load_cells, read_text, write_cells};

#[cfg(feature = "async")]
pub use text::write_cells_async;

#[cfg(feature = "serde")]
pub use text::{read_json_lines, write_json_lines};
