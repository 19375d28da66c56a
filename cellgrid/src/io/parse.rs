//! Line parsers

use std::sync::Arc;

use cellgrid_core::validation::parse_schema;
use cellgrid_core::{
    codec_by_name, codec_for_kind, Cell, Codec, Content, ContentError, Dimension, Position, Runtime,
    Schema, ValueKind,
};
use hashbrown::HashMap;
use rayon::iter::Either;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::Result;
use crate::Matrix;

/// Why a line could not be parsed
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("unable to decode coordinate {index} `{text}` with codec {codec}")]
    Coordinate {
        index: usize,
        text: String,
        codec: String,
    },
    #[error("unknown codec `{0}`")]
    UnknownCodec(String),
    #[error("variable `{0}` is not in the dictionary")]
    UnknownVariable(String),
    #[error(transparent)]
    Content(#[from] ContentError),
}

/// A line that failed to parse
#[derive(Debug, Clone, PartialEq)]
pub struct LineError {
    /// One-based line number
    pub line: usize,
    pub text: String,
    pub error: ParseError,
}

/// Cells parsed from a text, with the lines that failed
#[derive(Debug, Clone)]
pub struct Parsed<const K: usize> {
    pub cells: Vec<Cell<K>>,
    pub errors: Vec<LineError>,
}

impl<const K: usize> Parsed<K> {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Distribute the parsed cells; the errors are dropped
    pub fn into_matrix<R: Runtime>(self, runtime: R) -> Matrix<R, K> {
        if !self.errors.is_empty() {
            warn!(errors = self.errors.len(), "discarding unparsed lines");
        }
        Matrix::from_cells(runtime, self.cells)
    }
}

/// Default coordinate codecs for the given kinds
pub fn codecs<const K: usize>(kinds: [ValueKind; K]) -> [Arc<dyn Codec>; K] {
    kinds.map(codec_for_kind)
}

fn split_fields<'a>(line: &'a str, separator: &str, expected: usize) -> std::result::Result<Vec<&'a str>, ParseError> {
    let fields: Vec<&str> = line.splitn(expected, separator).collect();
    if fields.len() != expected {
        return Err(ParseError::FieldCount {
            expected,
            found: fields.len(),
        });
    }
    Ok(fields)
}

fn decode_position<const K: usize>(
    fields: &[&str],
    codecs: &[Arc<dyn Codec>; K],
) -> std::result::Result<Position<K>, ParseError> {
    let mut coordinates = Vec::with_capacity(K);
    for (index, (text, codec)) in fields.iter().zip(codecs).enumerate() {
        let value = codec.decode(text).ok_or_else(|| ParseError::Coordinate {
            index: index + 1,
            text: text.to_string(),
            codec: codec.name(),
        })?;
        coordinates.push(value);
    }
    Position::try_from(coordinates).map_err(|_| ParseError::FieldCount {
        expected: K,
        found: fields.len(),
    })
}

fn decode_content(codec: &dyn Codec, schema: Schema, text: &str) -> std::result::Result<Content, ParseError> {
    let value = codec.decode(text).ok_or_else(|| ContentError::Decode {
        text: text.to_string(),
        codec: codec.name(),
    })?;
    Ok(Content::new(schema, value)?)
}

/// Parse `c1|..|cK|codec|schema|value`, decoding coordinates with `codecs`.
///
/// The value is the remainder of the line and may contain the separator.
pub fn parse_cell<const K: usize>(
    line: &str,
    separator: &str,
    codecs: &[Arc<dyn Codec>; K],
) -> std::result::Result<Cell<K>, ParseError> {
    let fields = split_fields(line, separator, K + 3)?;
    let position = decode_position(&fields[..K], codecs)?;

    let codec = codec_by_name(fields[K]).ok_or_else(|| ParseError::UnknownCodec(fields[K].to_string()))?;
    let schema = parse_schema(fields[K + 1], codec.as_ref())?;
    let content = decode_content(codec.as_ref(), schema, fields[K + 2])?;

    Ok(Cell::new(position, content))
}

/// Parse every non-blank line in parallel
fn parse_all<const K: usize, F>(text: &str, parse: F) -> Parsed<K>
where
    F: Fn(&str) -> std::result::Result<Cell<K>, ParseError> + Send + Sync,
{
    let lines: Vec<&str> = text.lines().collect();
    let (cells, mut errors): (Vec<Cell<K>>, Vec<LineError>) = lines
        .par_iter()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .partition_map(|(index, line)| match parse(line) {
            Ok(cell) => Either::Left(cell),
            Err(error) => Either::Right(LineError {
                line: index + 1,
                text: line.to_string(),
                error,
            }),
        });
    errors.sort_by_key(|error| error.line);

    debug!(cells = cells.len(), errors = errors.len(), "parsed lines");
    Parsed { cells, errors }
}

/// Parse every line of `text` with [`parse_cell`]
pub fn parse_lines<const K: usize>(text: &str, separator: &str, codecs: &[Arc<dyn Codec>; K]) -> Parsed<K> {
    parse_all(text, |line| parse_cell(line, separator, codecs))
}

/// Codec and schema of named variables
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    variables: HashMap<String, (Arc<dyn Codec>, Schema)>,
}

impl Dictionary {
    /// Parse `name|codec|schema` lines; failed lines are returned separately
    pub fn parse(text: &str, separator: &str) -> (Self, Vec<LineError>) {
        let mut dictionary = Self::default();
        let mut errors = Vec::new();

        for (index, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match Self::parse_line(line, separator) {
                Ok((name, codec, schema)) => dictionary.insert(name, codec, schema),
                Err(error) => errors.push(LineError {
                    line: index + 1,
                    text: line.to_string(),
                    error,
                }),
            }
        }

        debug!(
            variables = dictionary.len(),
            errors = errors.len(),
            "parsed dictionary"
        );
        (dictionary, errors)
    }

    fn parse_line(line: &str, separator: &str) -> std::result::Result<(String, Arc<dyn Codec>, Schema), ParseError> {
        let fields = split_fields(line, separator, 3)?;
        let codec = codec_by_name(fields[1]).ok_or_else(|| ParseError::UnknownCodec(fields[1].to_string()))?;
        let schema = parse_schema(fields[2], codec.as_ref())?;
        Ok((fields[0].to_string(), codec, schema))
    }

    /// Add or replace a variable
    pub fn insert(&mut self, name: impl Into<String>, codec: Arc<dyn Codec>, schema: Schema) {
        self.variables.insert(name.into(), (codec, schema));
    }

    pub fn get(&self, name: &str) -> Option<(&Arc<dyn Codec>, &Schema)> {
        self.variables.get(name).map(|(codec, schema)| (codec, schema))
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Parse `c1|..|cK|value`; the coordinate at `dimension` names the variable
    pub fn parse_cell<const K: usize>(
        &self,
        line: &str,
        separator: &str,
        codecs: &[Arc<dyn Codec>; K],
        dimension: Dimension,
    ) -> Result<std::result::Result<Cell<K>, ParseError>> {
        let index = dimension.index(K)?;
        Ok(self.parse_cell_at(line, separator, codecs, index))
    }

    fn parse_cell_at<const K: usize>(
        &self,
        line: &str,
        separator: &str,
        codecs: &[Arc<dyn Codec>; K],
        index: usize,
    ) -> std::result::Result<Cell<K>, ParseError> {
        let fields = split_fields(line, separator, K + 1)?;
        let position = decode_position(&fields[..K], codecs)?;

        let name = position.coordinates()[index].to_string();
        let (codec, schema) = self
            .get(&name)
            .ok_or_else(|| ParseError::UnknownVariable(name))?;
        let content = decode_content(codec.as_ref(), schema.clone(), fields[K])?;

        Ok(Cell::new(position, content))
    }

    /// Parse every line of `text` with [`Dictionary::parse_cell`]
    pub fn parse_lines<const K: usize>(
        &self,
        text: &str,
        separator: &str,
        codecs: &[Arc<dyn Codec>; K],
        dimension: Dimension,
    ) -> Result<Parsed<K>> {
        let index = dimension.index(K)?;
        Ok(parse_all(text, |line| self.parse_cell_at(line, separator, codecs, index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellgrid_core::{position, Value};

    fn text_codecs() -> [Arc<dyn Codec>; 2] {
        codecs([ValueKind::Text; 2])
    }

    #[test]
    fn test_parse_cell() {
        let cell = parse_cell("iris-1|sepal|real|continuous|5.1", "|", &text_codecs()).expect("parses");
        assert_eq!(cell, Cell::new(position!["iris-1", "sepal"], Content::continuous(5.1)));
    }

    #[test]
    fn test_parse_cell_round_trips_short_string() {
        let cells = vec![
            Cell::new(position!["a", "b"], Content::discrete(4)),
            Cell::new(position!["a", "c"], Content::nominal("x|y")),
            Cell::new(
                position!["a", "d"],
                Content::new(
                    Schema::Discrete {
                        range: Some((1, 9)),
                        step: Some(2),
                    },
                    Value::from(5),
                )
                .expect("valid content"),
            ),
        ];

        for cell in cells {
            let line = cell.to_short_string("|");
            assert_eq!(parse_cell(&line, "|", &text_codecs()), Ok(cell));
        }
    }

    #[test]
    fn test_parse_errors() {
        let codecs = [Arc::new(cellgrid_core::IntegerCodec) as Arc<dyn Codec>];
        assert_eq!(
            parse_cell("1|real", "|", &codecs),
            Err(ParseError::FieldCount {
                expected: 4,
                found: 2
            })
        );
        assert!(matches!(
            parse_cell("x|real|continuous|1", "|", &codecs),
            Err(ParseError::Coordinate { index: 1, .. })
        ));
        assert_eq!(
            parse_cell("1|complex|continuous|1", "|", &codecs),
            Err(ParseError::UnknownCodec("complex".to_string()))
        );
        assert!(matches!(
            parse_cell("1|real|continuous|abc", "|", &codecs),
            Err(ParseError::Content(ContentError::Decode { .. }))
        ));
        assert!(matches!(
            parse_cell("1|integer|discrete(0..5)|9", "|", &codecs),
            Err(ParseError::Content(ContentError::Validation { .. }))
        ));
    }

    #[test]
    fn test_parse_cell_at_integer_bounds() {
        let codecs = codecs([ValueKind::Text]);
        let cell = parse_cell("a|integer|discrete(-1)|-9223372036854775808", "|", &codecs);
        assert_eq!(cell.map(|cell| cell.content.value().as_i64()), Ok(Some(i64::MIN)));

        let parsed = parse_lines(
            "a|integer|discrete(-1)|-9223372036854775808\nb|integer|discrete(0..5,-1)|9\n",
            "|",
            &codecs,
        );
        assert_eq!(parsed.cells.len(), 1);
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].line, 2);
    }

    #[test]
    fn test_parse_lines_collects_errors() {
        let text = "a|x|real|continuous|1.0\n\nb|x|real|continuous|oops\nc|x|integer|discrete|3\n";
        let parsed = parse_lines(text, "|", &text_codecs());

        assert_eq!(parsed.cells.len(), 2);
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].line, 3);
        assert_eq!(parsed.errors[0].text, "b|x|real|continuous|oops");
        assert!(!parsed.is_clean());
    }

    #[test]
    fn test_dictionary() {
        let (dictionary, errors) = Dictionary::parse(
            "sepal|real|continuous\nspecies|text|nominal(setosa,virginica)\nbroken|real\n",
            "|",
        );
        assert_eq!(dictionary.len(), 2);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line, 3);

        let text = "iris-1|sepal|5.1\niris-1|species|setosa\niris-2|species|unknown\niris-2|petal|1.4\n";
        let parsed = dictionary
            .parse_lines(text, "|", &text_codecs(), Dimension::Second)
            .expect("valid dimension");

        assert_eq!(parsed.cells.len(), 2);
        assert!(matches!(
            parsed.errors[0].error,
            ParseError::Content(ContentError::Validation { .. })
        ));
        assert_eq!(
            parsed.errors[1].error,
            ParseError::UnknownVariable("petal".to_string())
        );

        assert!(dictionary
            .parse_cell("a|sepal|1", "|", &text_codecs(), Dimension::Third)
            .is_err());
    }
}
