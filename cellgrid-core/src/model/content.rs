//! Schema-classified cell content

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use chrono::NaiveDateTime;

use super::value::{Record, Value};
use crate::error::ContentError;
use crate::validation::{validate_domain, validate_range, validate_step};

/// Broad class of a schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Classification {
    Continuous,
    Discrete,
    Nominal,
    Ordinal,
    Date,
    Structured,
}

impl Classification {
    pub const fn is_numeric(self) -> bool {
        matches!(self, Classification::Continuous | Classification::Discrete)
    }
}

/// Variable type of a content value.
///
/// Bounds, steps and domains are only consulted by [`Schema::validate`] and
/// the descriptive text form.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Schema {
    Continuous { range: Option<(f64, f64)> },
    Discrete { range: Option<(i64, i64)>, step: Option<i64> },
    Nominal { domain: Option<Vec<Value>> },
    Ordinal { domain: Option<Vec<Value>> },
    Date { range: Option<(NaiveDateTime, NaiveDateTime)> },
    Structured,
}

impl Schema {
    pub const fn classification(&self) -> Classification {
        match self {
            Schema::Continuous { .. } => Classification::Continuous,
            Schema::Discrete { .. } => Classification::Discrete,
            Schema::Nominal { .. } => Classification::Nominal,
            Schema::Ordinal { .. } => Classification::Ordinal,
            Schema::Date { .. } => Classification::Date,
            Schema::Structured => Classification::Structured,
        }
    }

    /// Check that `value` belongs to this schema
    pub fn validate(&self, value: &Value) -> Result<(), ContentError> {
        let valid = match (self, value) {
            (Schema::Continuous { range }, Value::Integer(_) | Value::Real(_)) => value
                .as_f64()
                .map(|number| validate_range(number, *range))
                .unwrap_or(false),
            (Schema::Discrete { range, step }, Value::Integer(number)) => {
                let origin = range.map(|(lower, _)| lower).unwrap_or(0);
                validate_range(*number, *range) && validate_step(*number, origin, *step)
            }
            (Schema::Nominal { .. } | Schema::Ordinal { .. }, Value::Record(_)) => false,
            (Schema::Nominal { domain } | Schema::Ordinal { domain }, _) => {
                validate_domain(value, domain.as_deref())
            }
            (Schema::Date { range }, Value::Date(date)) => validate_range(*date, *range),
            (Schema::Structured, Value::Record(_)) => true,
            _ => false,
        };

        if valid {
            Ok(())
        } else {
            Err(ContentError::Validation {
                value: value.to_string(),
                schema: self.to_string(),
            })
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schema::Continuous { range: None } => f.write_str("continuous"),
            Schema::Continuous {
                range: Some((lower, upper)),
            } => write!(f, "continuous({lower}..{upper})"),
            Schema::Discrete {
                range: None,
                step: None,
            } => f.write_str("discrete"),
            Schema::Discrete { range, step } => {
                f.write_str("discrete(")?;
                if let Some((lower, upper)) = range {
                    write!(f, "{lower}..{upper}")?;
                }
                if let Some(step) = step {
                    if range.is_some() {
                        f.write_str(",")?;
                    }
                    write!(f, "{step}")?;
                }
                f.write_str(")")
            }
            Schema::Nominal { domain } => write_domain(f, "nominal", domain.as_deref()),
            Schema::Ordinal { domain } => write_domain(f, "ordinal", domain.as_deref()),
            Schema::Date { range: None } => f.write_str("date"),
            Schema::Date {
                range: Some((lower, upper)),
            } => write!(f, "date({}..{})", Value::Date(*lower), Value::Date(*upper)),
            Schema::Structured => f.write_str("structured"),
        }
    }
}

fn write_domain(f: &mut fmt::Formatter<'_>, name: &str, domain: Option<&[Value]>) -> fmt::Result {
    f.write_str(name)?;
    if let Some(domain) = domain {
        f.write_str("(")?;
        for (index, value) in domain.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str(")")?;
    }
    Ok(())
}

/// A value classified by its schema
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Content {
    schema: Schema,
    value: Value,
}

impl Content {
    /// Content whose value has been validated against `schema`
    pub fn new(schema: Schema, value: Value) -> Result<Self, ContentError> {
        schema.validate(&value)?;
        Ok(Self { schema, value })
    }

    /// Content from a trusted source; no validation
    pub fn unchecked(schema: Schema, value: Value) -> Self {
        Self { schema, value }
    }

    pub fn continuous(value: f64) -> Self {
        Self::unchecked(Schema::Continuous { range: None }, Value::Real(value))
    }

    pub fn discrete(value: i64) -> Self {
        Self::unchecked(
            Schema::Discrete {
                range: None,
                step: None,
            },
            Value::Integer(value),
        )
    }

    pub fn nominal(value: impl Into<Value>) -> Self {
        Self::unchecked(Schema::Nominal { domain: None }, value.into())
    }

    pub fn ordinal(value: impl Into<Value>) -> Self {
        Self::unchecked(Schema::Ordinal { domain: None }, value.into())
    }

    pub fn date(value: NaiveDateTime) -> Self {
        Self::unchecked(Schema::Date { range: None }, Value::Date(value))
    }

    pub fn structured(value: Record) -> Self {
        Self::unchecked(Schema::Structured, Value::Record(value))
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn classification(&self) -> Classification {
        self.schema.classification()
    }

    /// Numeric view of continuous and discrete content
    pub fn numeric(&self) -> Option<f64> {
        if self.schema.classification().is_numeric() {
            self.value.as_f64()
        } else {
            None
        }
    }

    pub fn into_parts(self) -> (Schema, Value) {
        (self.schema, self.value)
    }

    /// Render as `codec|schema|value` with the given separator
    pub fn to_short_string(&self, separator: &str) -> String {
        alloc::format!(
            "{}{separator}{}{separator}{}",
            self.value.kind(),
            self.schema,
            self.value
        )
    }
}
