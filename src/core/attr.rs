//! Attributes: the key-value pairs that make up a record
//!
//! This module provides:
//! - `AttrValue`: closed set of value kinds a rewrite step can match on
//! - `Attr`: a single key-value pair
//! - the reserved keys produced by the encoder and consumed by Cloud Logging

use super::level::Level;
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use opentelemetry::trace::SpanId;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;

/// Key of the built-in record time attribute.
pub const TIME_KEY: &str = "time";
/// Key of the built-in record level attribute.
pub const LEVEL_KEY: &str = "level";
/// Key of the built-in record message attribute.
pub const MESSAGE_KEY: &str = "msg";
/// Key of the built-in call-site attribute.
pub const SOURCE_KEY: &str = "source";

/// Cloud Logging field for the severity.
pub const SEVERITY_FIELD: &str = "severity";
/// Cloud Logging field for the message text.
pub const MESSAGE_FIELD: &str = "message";
/// Cloud Logging field for the fully-qualified trace resource name.
pub const TRACE_ID_KEY: &str = "logging.googleapis.com/trace";
/// Cloud Logging field for the span id.
pub const SPAN_ID_KEY: &str = "logging.googleapis.com/spanId";
/// Cloud Logging field for the trace sampling decision.
pub const TRACE_SAMPLED_KEY: &str = "logging.googleapis.com/trace_sampled";

/// Value of an attribute
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    String(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Time(DateTime<FixedOffset>),
    Level(Level),
    SpanId(SpanId),
    Group(Vec<Attr>),
    Null,
}

impl AttrValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_level(&self) -> Option<Level> {
        match self {
            AttrValue::Level(level) => Some(*level),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            AttrValue::Time(time) => Some(time),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&[Attr]> {
        match self {
            AttrValue::Group(attrs) => Some(attrs),
            _ => None,
        }
    }
}

/// Default text form of a time value: RFC 3339 with as many fractional
/// digits as needed.
pub(crate) fn format_time(time: &DateTime<FixedOffset>) -> String {
    time.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

impl Serialize for AttrValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AttrValue::String(s) => serializer.serialize_str(s),
            AttrValue::Int(i) => serializer.serialize_i64(*i),
            AttrValue::Uint(u) => serializer.serialize_u64(*u),
            AttrValue::Float(f) => serializer.serialize_f64(*f),
            AttrValue::Bool(b) => serializer.serialize_bool(*b),
            AttrValue::Time(t) => serializer.serialize_str(&format_time(t)),
            AttrValue::Level(level) => level.serialize(serializer),
            AttrValue::SpanId(id) => serializer.collect_str(id),
            AttrValue::Group(attrs) => {
                let mut map = serializer.serialize_map(Some(attrs.len()))?;
                for attr in attrs {
                    map.serialize_entry(&attr.key, &attr.value)?;
                }
                map.end()
            }
            AttrValue::Null => serializer.serialize_unit(),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::String(s) => write!(f, "{}", s),
            AttrValue::Int(i) => write!(f, "{}", i),
            AttrValue::Uint(u) => write!(f, "{}", u),
            AttrValue::Float(fl) => write!(f, "{}", fl),
            AttrValue::Bool(b) => write!(f, "{}", b),
            AttrValue::Time(t) => write!(f, "{}", format_time(t)),
            AttrValue::Level(level) => write!(f, "{}", level),
            AttrValue::SpanId(id) => write!(f, "{}", id),
            AttrValue::Group(attrs) => {
                f.write_str("[")?;
                for (idx, attr) in attrs.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", attr)?;
                }
                f.write_str("]")
            }
            AttrValue::Null => write!(f, "null"),
        }
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::String(s)
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::String(s.to_string())
    }
}

impl From<i64> for AttrValue {
    fn from(i: i64) -> Self {
        AttrValue::Int(i)
    }
}

impl From<i32> for AttrValue {
    fn from(i: i32) -> Self {
        AttrValue::Int(i64::from(i))
    }
}

impl From<u64> for AttrValue {
    fn from(u: u64) -> Self {
        AttrValue::Uint(u)
    }
}

impl From<u32> for AttrValue {
    fn from(u: u32) -> Self {
        AttrValue::Uint(u64::from(u))
    }
}

impl From<usize> for AttrValue {
    fn from(u: usize) -> Self {
        AttrValue::Uint(u as u64)
    }
}

impl From<f64> for AttrValue {
    fn from(f: f64) -> Self {
        AttrValue::Float(f)
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Bool(b)
    }
}

impl From<DateTime<Utc>> for AttrValue {
    fn from(t: DateTime<Utc>) -> Self {
        AttrValue::Time(t.into())
    }
}

impl From<DateTime<FixedOffset>> for AttrValue {
    fn from(t: DateTime<FixedOffset>) -> Self {
        AttrValue::Time(t)
    }
}

impl From<Level> for AttrValue {
    fn from(level: Level) -> Self {
        AttrValue::Level(level)
    }
}

impl From<SpanId> for AttrValue {
    fn from(id: SpanId) -> Self {
        AttrValue::SpanId(id)
    }
}

impl From<Vec<Attr>> for AttrValue {
    fn from(attrs: Vec<Attr>) -> Self {
        AttrValue::Group(attrs)
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(AttrValue::Null, Into::into)
    }
}

/// A single key-value pair
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    pub key: String,
    pub value: AttrValue,
}

impl Attr {
    pub fn new<K, V>(key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<AttrValue>,
    {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// A named group of attributes, encoded as a nested JSON object.
    pub fn group<K: Into<String>>(key: K, attrs: Vec<Attr>) -> Self {
        Self {
            key: key.into(),
            value: AttrValue::Group(attrs),
        }
    }

    /// The attribute a rewrite step returns to drop a field.
    pub fn empty() -> Self {
        Self {
            key: String::new(),
            value: AttrValue::Null,
        }
    }

    /// An attribute with an empty key is not written.
    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

impl<K: Into<String>, V: Into<AttrValue>> From<(K, V)> for Attr {
    fn from((key, value): (K, V)) -> Self {
        Attr::new(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_attr_creation() {
        let attr = Attr::new("user_id", 123);
        assert_eq!(attr.key, "user_id");
        assert_eq!(attr.value, AttrValue::Int(123));

        let attr: Attr = ("active", true).into();
        assert_eq!(attr.value, AttrValue::Bool(true));

        assert!(Attr::empty().is_empty());
    }

    #[test]
    fn test_value_json() {
        let json = |value: AttrValue| serde_json::to_value(&value).unwrap();
        let time = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(json(time.into()), serde_json::json!("2024-05-01T12:00:00Z"));
        assert_eq!(json(Level::new(5).into()), serde_json::json!("WARN+1"));
        assert_eq!(json(f64::NAN.into()), serde_json::Value::Null);
        assert_eq!(json(None::<i64>.into()), serde_json::Value::Null);
    }

    #[test]
    fn test_span_id_serializes_as_hex() {
        let id = SpanId::from_bytes([2, 0, 0, 0, 0, 0, 0, 0]);
        let json = serde_json::to_string(&AttrValue::from(id)).unwrap();
        assert_eq!(json, "\"0200000000000000\"");
    }

    #[test]
    fn test_group_serializes_as_object() {
        let value = AttrValue::Group(vec![
            Attr::new("method", "GET"),
            Attr::new("status", 200u32),
        ]);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"method":"GET","status":200}"#);
        assert_eq!(value.to_string(), "[method=GET status=200]");
    }

    #[test]
    fn test_reserved_keys_are_distinct() {
        let reserved = [TIME_KEY, LEVEL_KEY, MESSAGE_KEY, SEVERITY_FIELD, MESSAGE_FIELD];
        for key in [TRACE_ID_KEY, SPAN_ID_KEY, TRACE_SAMPLED_KEY] {
            assert!(!reserved.contains(&key));
        }
    }
}
