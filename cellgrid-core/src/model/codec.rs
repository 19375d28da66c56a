//! Value codecs
//!
//! A codec round-trips values of one kind to and from text and orders two
//! values of that kind. Codecs are chosen per coordinate and per content at
//! parse time; the algebra itself never consults them.

use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt::{self, Write};

use chrono::{NaiveDate, NaiveDateTime};

use super::value::{Record, Value, ValueKind};
use crate::validation::parsing::{split_codec_arguments, split_record_text};

/// Default text layout for date values
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Encode, decode and compare values of one kind
pub trait Codec: fmt::Debug + Send + Sync {
    /// Name used in delimited files
    fn name(&self) -> String;

    /// Kind of value this codec produces
    fn kind(&self) -> ValueKind;

    /// Decode a value from text
    fn decode(&self, text: &str) -> Option<Value>;

    /// Encode a value to text, `None` if it is not of this codec's kind
    fn encode(&self, value: &Value) -> Option<String>;

    /// Order two values of this codec's kind
    fn compare(&self, left: &Value, right: &Value) -> Option<Ordering> {
        if left.kind() == self.kind() && right.kind() == self.kind() {
            Some(left.cmp(right))
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntegerCodec;

impl Codec for IntegerCodec {
    fn name(&self) -> String {
        String::from("integer")
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Integer
    }

    fn decode(&self, text: &str) -> Option<Value> {
        text.trim().parse::<i64>().ok().map(Value::Integer)
    }

    fn encode(&self, value: &Value) -> Option<String> {
        value.as_i64().map(|value| value.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RealCodec;

impl Codec for RealCodec {
    fn name(&self) -> String {
        String::from("real")
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Real
    }

    fn decode(&self, text: &str) -> Option<Value> {
        text.trim().parse::<f64>().ok().map(Value::Real)
    }

    fn encode(&self, value: &Value) -> Option<String> {
        match value {
            Value::Real(value) => Some(value.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextCodec;

impl Codec for TextCodec {
    fn name(&self) -> String {
        String::from("text")
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Text
    }

    fn decode(&self, text: &str) -> Option<Value> {
        Some(Value::Text(String::from(text)))
    }

    fn encode(&self, value: &Value) -> Option<String> {
        value.as_str().map(String::from)
    }
}

/// Date codec with a `chrono` format string.
///
/// Text holding only a date is decoded at midnight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateCodec {
    format: String,
}

impl DateCodec {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }

    pub fn format(&self) -> &str {
        &self.format
    }
}

impl Default for DateCodec {
    fn default() -> Self {
        Self::new(DEFAULT_DATE_FORMAT)
    }
}

impl Codec for DateCodec {
    fn name(&self) -> String {
        if self.format == DEFAULT_DATE_FORMAT {
            String::from("date")
        } else {
            alloc::format!("date({})", self.format)
        }
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Date
    }

    fn decode(&self, text: &str) -> Option<Value> {
        let text = text.trim();
        NaiveDateTime::parse_from_str(text, &self.format)
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(text, &self.format)
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
            .map(Value::Date)
    }

    fn encode(&self, value: &Value) -> Option<String> {
        let date = value.as_date()?;
        let mut text = String::new();
        // An invalid format specifier surfaces as a formatting error
        write!(text, "{}", date.format(&self.format)).ok()?;
        Some(text)
    }
}

/// Record codec.
///
/// With declared fields every field in the text must be declared and is
/// decoded by its codec. Without declarations field types are inferred:
/// integer, then real, then date, then text.
#[derive(Debug, Clone, Default)]
pub struct RecordCodec {
    fields: Vec<(String, Arc<dyn Codec>)>,
}

impl RecordCodec {
    /// Codec that infers field types
    pub fn inferred() -> Self {
        Self::default()
    }

    /// Codec with declared field codecs
    pub fn with_fields<N: Into<String>>(fields: impl IntoIterator<Item = (N, Arc<dyn Codec>)>) -> Self {
        Self {
            fields: fields
                .into_iter()
                .map(|(name, codec)| (name.into(), codec))
                .collect(),
        }
    }

    fn field_codec(&self, name: &str) -> Option<&Arc<dyn Codec>> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, codec)| codec)
    }

    fn infer(text: &str) -> Value {
        IntegerCodec
            .decode(text)
            .or_else(|| RealCodec.decode(text))
            .or_else(|| DateCodec::default().decode(text))
            .unwrap_or_else(|| Value::Text(String::from(text)))
    }
}

impl Codec for RecordCodec {
    fn name(&self) -> String {
        if self.fields.is_empty() {
            return String::from("record");
        }

        let mut name = String::from("record(");
        for (index, (field, codec)) in self.fields.iter().enumerate() {
            if index > 0 {
                name.push(',');
            }
            name.push_str(field);
            name.push(':');
            name.push_str(&codec.name());
        }
        name.push(')');
        name
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Record
    }

    fn decode(&self, text: &str) -> Option<Value> {
        let mut fields = Vec::new();
        for (name, raw) in split_record_text(text)? {
            let value = if self.fields.is_empty() {
                Self::infer(&raw)
            } else {
                self.field_codec(&name)?.decode(&raw)?
            };
            fields.push((name, value));
        }
        Some(Value::Record(Record::new(fields)))
    }

    fn encode(&self, value: &Value) -> Option<String> {
        value.as_record().map(|record| record.to_string())
    }
}

/// Resolve a codec from its name.
///
/// Accepts `integer` (`int`, `long`), `real` (`double`, `float`), `text`
/// (`string`), `date`, `date(FORMAT)`, `record` and
/// `record(name:codec,...)` with flat field codecs.
pub fn codec_by_name(name: &str) -> Option<Arc<dyn Codec>> {
    let name = name.trim();
    let (head, arguments) = match name.find('(') {
        Some(open) if name.ends_with(')') => (&name[..open], Some(&name[open + 1..name.len() - 1])),
        Some(_) => return None,
        None => (name, None),
    };

    let codec: Arc<dyn Codec> = match (head.to_ascii_lowercase().as_str(), arguments) {
        ("integer" | "int" | "long", None) => Arc::new(IntegerCodec),
        ("real" | "double" | "float", None) => Arc::new(RealCodec),
        ("text" | "string", None) => Arc::new(TextCodec),
        ("date", None) => Arc::new(DateCodec::default()),
        ("date", Some(format)) => Arc::new(DateCodec::new(format)),
        ("record", None) => Arc::new(RecordCodec::inferred()),
        ("record", Some(arguments)) => {
            let mut fields: Vec<(String, Arc<dyn Codec>)> = Vec::new();
            for (field, codec) in split_codec_arguments(arguments)? {
                let codec = codec_by_name(&codec)?;
                if codec.kind() == ValueKind::Record {
                    return None;
                }
                fields.push((field, codec));
            }
            Arc::new(RecordCodec::with_fields(fields))
        }
        _ => return None,
    };

    Some(codec)
}

/// Default codec for a value kind
pub fn codec_for_kind(kind: ValueKind) -> Arc<dyn Codec> {
    match kind {
        ValueKind::Integer => Arc::new(IntegerCodec),
        ValueKind::Real => Arc::new(RealCodec),
        ValueKind::Text => Arc::new(TextCodec),
        ValueKind::Date => Arc::new(DateCodec::default()),
        ValueKind::Record => Arc::new(RecordCodec::inferred()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_round_trip_scalars() {
        let cases: Vec<(Arc<dyn Codec>, &str)> = vec![
            (Arc::new(IntegerCodec), "-17"),
            (Arc::new(RealCodec), "3.25"),
            (Arc::new(TextCodec), "north-east"),
            (Arc::new(DateCodec::default()), "2023-11-05 08:15:00"),
            (Arc::new(DateCodec::new("%Y%m%d")), "20231105"),
        ];

        for (codec, text) in cases {
            let value = codec.decode(text).expect("decodes");
            assert_eq!(value.kind(), codec.kind());
            assert_eq!(codec.encode(&value).as_deref(), Some(text));
        }
    }

    #[test]
    fn test_decode_failures() {
        assert_eq!(IntegerCodec.decode("1.5"), None);
        assert_eq!(RealCodec.decode("abc"), None);
        assert_eq!(DateCodec::default().decode("yesterday"), None);
    }

    #[test]
    fn test_date_only_text_decodes_at_midnight() {
        let value = DateCodec::new("%Y-%m-%d").decode("2020-02-29");
        let expected = NaiveDate::from_ymd_opt(2020, 2, 29)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(Value::Date);
        assert_eq!(value, expected);
    }

    #[test]
    fn test_encode_rejects_other_kinds() {
        assert_eq!(IntegerCodec.encode(&Value::from(1.0)), None);
        assert_eq!(TextCodec.encode(&Value::from(1)), None);
    }

    #[test]
    fn test_compare_across_kinds_fails() {
        assert_eq!(
            IntegerCodec.compare(&Value::from(1), &Value::from(2)),
            Some(Ordering::Less)
        );
        assert_eq!(IntegerCodec.compare(&Value::from(1), &Value::from("2")), None);
    }

    #[test]
    fn test_record_codec_inferred() {
        let codec = RecordCodec::inferred();
        let value = codec.decode("age=42;name=ada;score=9.5").expect("decodes");
        let record = value.as_record().expect("record");
        assert_eq!(record.get("age"), Some(&Value::from(42)));
        assert_eq!(record.get("name"), Some(&Value::from("ada")));
        assert_eq!(record.get("score"), Some(&Value::from(9.5)));
        assert_eq!(codec.encode(&value).as_deref(), Some("age=42;name=ada;score=9.5"));
    }

    #[test]
    fn test_record_codec_declared() {
        let codec = codec_by_name("record(id:text,count:int)").expect("codec");
        let value = codec.decode("id=007;count=3").expect("decodes");
        let record = value.as_record().expect("record");
        assert_eq!(record.get("id"), Some(&Value::from("007")));
        assert_eq!(record.get("count"), Some(&Value::from(3)));
        assert_eq!(codec.decode("id=1;unknown=2"), None);
    }

    #[test]
    fn test_codec_by_name() {
        assert_eq!(codec_by_name("long").map(|c| c.kind()), Some(ValueKind::Integer));
        assert_eq!(codec_by_name("DOUBLE").map(|c| c.kind()), Some(ValueKind::Real));
        assert_eq!(codec_by_name("string").map(|c| c.kind()), Some(ValueKind::Text));
        assert_eq!(
            codec_by_name("date(%d/%m/%Y)").map(|c| c.name()).as_deref(),
            Some("date(%d/%m/%Y)")
        );
        assert!(codec_by_name("complex").is_none());
        assert!(codec_by_name("date(%Y").is_none());
    }
}
