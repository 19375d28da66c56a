//! Parsing utilities for schema and record text
//!
//! This module provides pure parsing functions for the textual forms of
//! schemas, record values and codec argument lists.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use chrono::NaiveDateTime;

use crate::error::ContentError;
use crate::model::{Codec, DateCodec, Schema, Value};

/// Escape `\`, `;` and `=` in record names and values
pub fn escape_record_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        if matches!(character, '\\' | ';' | '=') {
            escaped.push('\\');
        }
        escaped.push(character);
    }
    escaped
}

/// Split record text `name=value;name=value` into unescaped pairs.
///
/// Empty text is an empty record. Returns `None` when a field has no
/// unescaped `=` or an escape is left dangling.
pub fn split_record_text(text: &str) -> Option<Vec<(String, String)>> {
    let mut fields = Vec::new();
    if text.is_empty() {
        return Some(fields);
    }

    let mut name = String::new();
    let mut value = String::new();
    let mut in_value = false;
    let mut chars = text.chars();

    while let Some(character) = chars.next() {
        let literal = match character {
            '\\' => chars.next()?,
            '=' if !in_value => {
                in_value = true;
                continue;
            }
            ';' => {
                if !in_value {
                    return None;
                }
                fields.push((core::mem::take(&mut name), core::mem::take(&mut value)));
                in_value = false;
                continue;
            }
            other => other,
        };
        if in_value {
            value.push(literal);
        } else {
            name.push(literal);
        }
    }

    if !in_value {
        return None;
    }
    fields.push((name, value));
    Some(fields)
}

/// Split `name:codec,name:codec` at top-level commas.
///
/// Commas and colons nested inside parentheses belong to the codec.
pub fn split_codec_arguments(arguments: &str) -> Option<Vec<(String, String)>> {
    split_top_level(arguments)
        .into_iter()
        .map(|argument| {
            let (name, codec) = argument.split_once(':')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), codec.trim().to_string()))
        })
        .collect()
}

/// Split at commas that are not enclosed in parentheses
fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (index, byte) in text.bytes().enumerate() {
        match byte {
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                parts.push(&text[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Parse the descriptive text of a schema.
///
/// Accepted forms are `continuous`, `continuous(LOW..HIGH)`, `discrete`,
/// `discrete(LOW..HIGH)`, `discrete(STEP)`, `discrete(LOW..HIGH,STEP)`,
/// `nominal`, `nominal(a,b,..)`, `ordinal(..)`, `date`, `date(LOW..HIGH)`
/// and `structured`. Domain elements are decoded with `codec`.
pub fn parse_schema(text: &str, codec: &dyn Codec) -> Result<Schema, ContentError> {
    let invalid = || ContentError::Schema {
        text: text.to_string(),
    };

    let trimmed = text.trim();
    let (head, arguments) = match trimmed.find('(') {
        Some(open) if trimmed.ends_with(')') => {
            (&trimmed[..open], Some(&trimmed[open + 1..trimmed.len() - 1]))
        }
        Some(_) => return Err(invalid()),
        None => (trimmed, None),
    };

    let schema = match (head.to_ascii_lowercase().as_str(), arguments) {
        ("continuous", None) => Schema::Continuous { range: None },
        ("continuous", Some(arguments)) => Schema::Continuous {
            range: Some(parse_bounds(arguments, |s| s.parse::<f64>().ok()).ok_or_else(invalid)?),
        },
        ("discrete", None) => Schema::Discrete {
            range: None,
            step: None,
        },
        ("discrete", Some(arguments)) => {
            let mut range = None;
            let mut step = None;
            for argument in split_top_level(arguments) {
                if argument.contains("..") {
                    range = Some(
                        parse_bounds(argument, |s| s.parse::<i64>().ok()).ok_or_else(invalid)?,
                    );
                } else {
                    step = Some(argument.trim().parse::<i64>().map_err(|_| invalid())?);
                }
            }
            Schema::Discrete { range, step }
        }
        ("nominal", None) => Schema::Nominal { domain: None },
        ("nominal", Some(arguments)) => Schema::Nominal {
            domain: Some(parse_domain(arguments, codec).ok_or_else(invalid)?),
        },
        ("ordinal", None) => Schema::Ordinal { domain: None },
        ("ordinal", Some(arguments)) => Schema::Ordinal {
            domain: Some(parse_domain(arguments, codec).ok_or_else(invalid)?),
        },
        ("date", None) => Schema::Date { range: None },
        ("date", Some(arguments)) => Schema::Date {
            range: Some(parse_bounds(arguments, |s| parse_date(s, codec)).ok_or_else(invalid)?),
        },
        ("structured", None) => Schema::Structured,
        _ => return Err(invalid()),
    };

    Ok(schema)
}

fn parse_bounds<T: PartialOrd>(text: &str, parse: impl Fn(&str) -> Option<T>) -> Option<(T, T)> {
    let (lower, upper) = text.split_once("..")?;
    let lower = parse(lower.trim())?;
    let upper = parse(upper.trim())?;
    if lower <= upper {
        Some((lower, upper))
    } else {
        None
    }
}

fn parse_domain(text: &str, codec: &dyn Codec) -> Option<Vec<Value>> {
    split_top_level(text)
        .into_iter()
        .map(|element| codec.decode(element.trim()))
        .collect()
}

// Range bounds render in the default layout, so accept it as a fallback
fn parse_date(text: &str, codec: &dyn Codec) -> Option<NaiveDateTime> {
    codec
        .decode(text)
        .and_then(|value| value.as_date())
        .or_else(|| DateCodec::default().decode(text).and_then(|value| value.as_date()))
}
