//! Runtime field values.
//!
//! [`FieldValue`] is what a record holds for each field. Values serialize untagged
//! (plain JSON scalars and arrays) and are read back loosely, then conformed to the
//! schema's [`ValueKind`] so a datetime stored as an RFC 3339 string comes back as
//! a datetime and not as text.

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Write as _};

use super::widget::ValueKind;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Text(String),
    Integer(i64),
    Float(f64),
    DateTime(DateTime<Utc>),
    List(Vec<String>),
}

impl FieldValue {
    /// The kind of this value, `None` for `Null`.
    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            FieldValue::Null => None,
            FieldValue::Bool(_) => Some(ValueKind::Bool),
            FieldValue::Text(_) => Some(ValueKind::Text),
            FieldValue::Integer(_) => Some(ValueKind::Integer),
            FieldValue::Float(_) => Some(ValueKind::Float),
            FieldValue::DateTime(_) => Some(ValueKind::DateTime),
            FieldValue::List(_) => Some(ValueKind::List),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind().map(|k| k.as_str()).unwrap_or("null")
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(v) => Some(v),
            _ => None,
        }
    }

    /// Numeric view used by range rules.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(v) => Some(*v as f64),
            FieldValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Converts this value to `kind` when a lossless conversion exists.
    ///
    /// - same kind: unchanged
    /// - `Null`: stays `Null` for every kind
    /// - integer → float
    /// - text → datetime (RFC 3339)
    /// - whole, finite float within `i64` range → integer
    pub fn coerce(self, kind: ValueKind) -> Option<FieldValue> {
        if self.kind().is_none() || self.kind() == Some(kind) {
            return Some(self);
        }
        match (self, kind) {
            (FieldValue::Integer(v), ValueKind::Float) => Some(FieldValue::Float(v as f64)),
            // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
            (FieldValue::Float(v), ValueKind::Integer)
                if v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 =>
            {
                Some(FieldValue::Integer(v as i64))
            }
            (FieldValue::Text(s), ValueKind::DateTime) => DateTime::parse_from_rfc3339(&s)
                .ok()
                .map(|dt| FieldValue::DateTime(dt.with_timezone(&Utc))),
            _ => None,
        }
    }

    /// Parses user input (e.g. a CLI `field=value` pair) as a value of `kind`.
    ///
    /// An empty string parses as `Null` for every kind except text. `NaN` and
    /// infinities are not floats here: JSON cannot store them.
    pub fn parse(kind: ValueKind, input: &str) -> Option<FieldValue> {
        let trimmed = input.trim();
        if trimmed.is_empty() && kind != ValueKind::Text {
            return Some(FieldValue::Null);
        }
        match kind {
            ValueKind::Bool => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Some(FieldValue::Bool(true)),
                "false" | "no" | "off" | "0" => Some(FieldValue::Bool(false)),
                _ => None,
            },
            ValueKind::Text => Some(FieldValue::Text(input.to_string())),
            ValueKind::Integer => trimmed.parse().ok().map(FieldValue::Integer),
            ValueKind::Float => trimmed
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(FieldValue::Float),
            ValueKind::DateTime => DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|dt| FieldValue::DateTime(dt.with_timezone(&Utc))),
            ValueKind::List => Some(FieldValue::List(
                trimmed
                    .split(',')
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect(),
            )),
        }
    }

    /// Reads a stored JSON value without schema knowledge.
    ///
    /// Strings stay text; [`FieldValue::coerce`] turns them into datetimes once the
    /// field's kind is known. Objects and nested arrays are not field values.
    pub fn from_json(value: &serde_json::Value) -> Option<FieldValue> {
        use serde_json::Value;
        match value {
            Value::Null => Some(FieldValue::Null),
            Value::Bool(b) => Some(FieldValue::Bool(*b)),
            Value::Number(n) => n
                .as_i64()
                .map(FieldValue::Integer)
                .or_else(|| n.as_f64().map(FieldValue::Float)),
            Value::String(s) => Some(FieldValue::Text(s.clone())),
            Value::Array(items) => items
                .iter()
                .map(|v| v.as_str().map(String::from))
                .collect::<Option<Vec<_>>>()
                .map(FieldValue::List),
            Value::Object(_) => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        // Serialization of FieldValue cannot fail: every variant maps to plain JSON.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Formats the value for display, rendering datetimes with `date_format`.
    ///
    /// A format chrono cannot apply falls back to RFC 3339.
    pub fn display_with(&self, date_format: &str) -> String {
        match self {
            FieldValue::DateTime(dt) => {
                let mut out = String::new();
                match write!(out, "{}", dt.format(date_format)) {
                    Ok(()) => out,
                    Err(_) => dt.to_rfc3339(),
                }
            }
            other => other.to_string(),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Null => serializer.serialize_none(),
            FieldValue::Bool(v) => serializer.serialize_bool(*v),
            FieldValue::Text(v) => serializer.serialize_str(v),
            FieldValue::Integer(v) => serializer.serialize_i64(*v),
            FieldValue::Float(v) => serializer.serialize_f64(*v),
            FieldValue::DateTime(v) => serializer.serialize_str(&v.to_rfc3339()),
            FieldValue::List(v) => v.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        FieldValue::from_json(&raw)
            .ok_or_else(|| D::Error::custom(format!("not a field value: {}", raw)))
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Bool(v) => write!(f, "{}", v),
            FieldValue::Text(v) => f.write_str(v),
            FieldValue::Integer(v) => write!(f, "{}", v),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::DateTime(v) => f.write_str(&v.to_rfc3339()),
            FieldValue::List(v) => f.write_str(&v.join(", ")),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Integer(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(v: DateTime<Utc>) -> Self {
        FieldValue::DateTime(v)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(v: Vec<String>) -> Self {
        FieldValue::List(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parse_bool_accepts_common_spellings() {
        for s in ["true", "YES", "on", "1"] {
            assert_eq!(FieldValue::parse(ValueKind::Bool, s), Some(true.into()));
        }
        for s in ["false", "No", "off", "0"] {
            assert_eq!(FieldValue::parse(ValueKind::Bool, s), Some(false.into()));
        }
        assert_eq!(FieldValue::parse(ValueKind::Bool, "maybe"), None);
    }

    #[test]
    fn parse_empty_is_null_except_for_text() {
        assert_eq!(
            FieldValue::parse(ValueKind::Integer, "  "),
            Some(FieldValue::Null)
        );
        assert_eq!(
            FieldValue::parse(ValueKind::Text, ""),
            Some(FieldValue::Text(String::new()))
        );
    }

    #[test]
    fn parse_list_splits_on_commas() {
        assert_eq!(
            FieldValue::parse(ValueKind::List, "admin, editor,,viewer"),
            Some(FieldValue::List(vec![
                "admin".into(),
                "editor".into(),
                "viewer".into()
            ]))
        );
    }

    #[test]
    fn parse_datetime_requires_rfc3339() {
        let parsed = FieldValue::parse(ValueKind::DateTime, "2024-05-01T10:00:00Z").unwrap();
        assert_eq!(
            parsed,
            FieldValue::DateTime(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap())
        );
        assert_eq!(FieldValue::parse(ValueKind::DateTime, "yesterday"), None);
    }

    #[test]
    fn coerce_text_to_datetime() {
        let value = FieldValue::Text("2024-05-01T10:00:00+00:00".into());
        assert_eq!(
            value.coerce(ValueKind::DateTime).and_then(|v| v.kind()),
            Some(ValueKind::DateTime)
        );
    }

    #[test]
    fn coerce_rejects_lossy_conversions() {
        assert_eq!(FieldValue::Float(1.5).coerce(ValueKind::Integer), None);
        assert_eq!(FieldValue::Bool(true).coerce(ValueKind::Text), None);
        assert_eq!(
            FieldValue::Integer(3).coerce(ValueKind::Float),
            Some(FieldValue::Float(3.0))
        );
        assert_eq!(
            FieldValue::Null.coerce(ValueKind::Bool),
            Some(FieldValue::Null)
        );
    }

    #[test]
    fn parse_float_rejects_non_finite() {
        for s in ["NaN", "inf", "-infinity"] {
            assert_eq!(FieldValue::parse(ValueKind::Float, s), None);
        }
        assert_eq!(
            FieldValue::parse(ValueKind::Float, "0.25"),
            Some(FieldValue::Float(0.25))
        );
    }

    #[test]
    fn coerce_float_to_integer_stays_in_range() {
        assert_eq!(FieldValue::Float(1e20).coerce(ValueKind::Integer), None);
        assert_eq!(FieldValue::Float(-1e20).coerce(ValueKind::Integer), None);
        assert_eq!(FieldValue::Float(f64::NAN).coerce(ValueKind::Integer), None);
        assert_eq!(
            FieldValue::Float(-42.0).coerce(ValueKind::Integer),
            Some(FieldValue::Integer(-42))
        );
    }

    #[test]
    fn display_with_bad_format_falls_back_to_rfc3339() {
        let dt = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let value = FieldValue::DateTime(dt);
        assert_eq!(value.display_with("%Y-%m-%d"), "2024-05-01");
        assert_eq!(value.display_with("%Q"), dt.to_rfc3339());
    }

    #[test]
    fn json_round_trip_is_untagged() {
        let value = FieldValue::List(vec!["a".into(), "b".into()]);
        assert_eq!(value.to_json(), serde_json::json!(["a", "b"]));
        assert_eq!(FieldValue::from_json(&value.to_json()), Some(value));
        assert_eq!(FieldValue::from_json(&serde_json::json!({"a": 1})), None);
    }

    #[test]
    fn deserialize_reads_plain_json() {
        let value: FieldValue = serde_json::from_str("42").unwrap();
        assert_eq!(value, FieldValue::Integer(42));
        assert!(serde_json::from_str::<FieldValue>("{\"a\": 1}").is_err());
    }

    #[test]
    fn display_formats_lists_and_null() {
        assert_eq!(FieldValue::List(vec!["a".into(), "b".into()]).to_string(), "a, b");
        assert_eq!(FieldValue::Null.to_string(), "");
    }
}
