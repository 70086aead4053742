//! Log record structure

use super::attr::{Attr, AttrValue};
use super::level::Level;
use chrono::{DateTime, Utc};
use std::panic::Location;

/// Call site of a log statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Source {
    pub file: &'static str,
    pub line: u32,
}

impl Source {
    /// The location of the caller, through any `#[track_caller]` frames.
    #[track_caller]
    pub fn caller() -> Self {
        Location::caller().into()
    }

    pub(crate) fn to_attr(self, key: &str) -> Attr {
        Attr::group(
            key,
            vec![Attr::new("file", self.file), Attr::new("line", self.line)],
        )
    }
}

impl From<&'static Location<'static>> for Source {
    fn from(location: &'static Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
        }
    }
}

/// A log record as produced at the call site.
///
/// Attributes keep the order in which they were added; handlers append to
/// them but never reorder or remove.
#[derive(Debug, Clone)]
pub struct Record {
    pub time: Option<DateTime<Utc>>,
    pub level: Level,
    pub message: String,
    pub source: Option<Source>,
    attrs: Vec<Attr>,
}

impl Record {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            time: Some(Utc::now()),
            level,
            message: message.into(),
            source: None,
            attrs: Vec::new(),
        }
    }

    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }

    /// Records without a time omit the `time` attribute.
    pub fn without_time(mut self) -> Self {
        self.time = None;
        self
    }

    pub fn with_source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_attr<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<AttrValue>,
    {
        self.add(key, value);
        self
    }

    pub fn with_attrs<I>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = Attr>,
    {
        self.attrs.extend(attrs);
        self
    }

    /// Append an attribute
    pub fn add<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<AttrValue>,
    {
        self.attrs.push(Attr::new(key, value));
    }

    pub fn add_attr(&mut self, attr: Attr) {
        self.attrs.push(attr);
    }

    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }

    pub fn num_attrs(&self) -> usize {
        self.attrs.len()
    }

    /// First attribute with `key`, if any
    pub fn attr(&self, key: &str) -> Option<&AttrValue> {
        self.attrs
            .iter()
            .find(|attr| attr.key == key)
            .map(|attr| &attr.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_creation() {
        let record = Record::new(Level::WARNING, "disk almost full")
            .with_attr("mount", "/var")
            .with_attr("used_pct", 93);

        assert_eq!(record.level, Level::WARNING);
        assert_eq!(record.message, "disk almost full");
        assert!(record.time.is_some());
        assert_eq!(record.num_attrs(), 2);
        assert_eq!(record.attr("used_pct"), Some(&AttrValue::Int(93)));
    }

    #[test]
    fn test_add_preserves_order() {
        let mut record = Record::new(Level::INFO, "ordered");
        record.add("a", 1);
        record.add("b", 2);
        record.add_attr(Attr::new("c", 3));

        let keys: Vec<&str> = record.attrs().iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, ["a", "b", "c"]);
    }

    #[test]
    fn test_source_caller() {
        let source = Source::caller();
        assert!(source.file.ends_with("record.rs"));
        assert!(source.line > 0);

        let attr = source.to_attr("source");
        assert_eq!(attr.value.as_group().map(<[Attr]>::len), Some(2));
    }

    #[test]
    fn test_without_time() {
        let record = Record::new(Level::INFO, "no clock").without_time();
        assert!(record.time.is_none());
    }
}
