//! Cloud Logging severity mapping
//!
//! Severity names come from
//! <https://cloud.google.com/logging/docs/reference/v2/rest/v2/LogEntry#logseverity>.
//! The numeric values bound to them are this crate's [`Level`] constants and
//! do not match the numbers on that page; only the names reach the logs.

use super::level::Level;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Immutable mapping from well-known levels to severity names.
///
/// Build it once and share it; [`SeverityTable::global`] holds the
/// process-wide instance used by handlers.
#[derive(Debug, Clone)]
pub struct SeverityTable {
    names: HashMap<Level, &'static str>,
}

impl SeverityTable {
    /// Every well-known level and its severity name.
    pub const ENTRIES: [(Level, &'static str); 9] = [
        (Level::DEFAULT, "DEFAULT"),
        (Level::DEBUG, "DEBUG"),
        (Level::INFO, "INFO"),
        (Level::NOTICE, "NOTICE"),
        (Level::WARNING, "WARNING"),
        (Level::ERROR, "ERROR"),
        (Level::CRITICAL, "CRITICAL"),
        (Level::ALERT, "ALERT"),
        (Level::EMERGENCY, "EMERGENCY"),
    ];

    pub fn new() -> Self {
        Self {
            names: Self::ENTRIES.into_iter().collect(),
        }
    }

    /// The shared table, initialized on first use.
    pub fn global() -> &'static SeverityTable {
        Self::global_arc()
    }

    /// A handle to the shared table, for holders that keep it alive.
    pub fn shared() -> Arc<SeverityTable> {
        Arc::clone(Self::global_arc())
    }

    fn global_arc() -> &'static Arc<SeverityTable> {
        static TABLE: OnceLock<Arc<SeverityTable>> = OnceLock::new();
        TABLE.get_or_init(|| Arc::new(SeverityTable::new()))
    }

    /// Severity name for `level`.
    ///
    /// Unknown levels fall back to the generic level name (`INFO+1`,
    /// `DEBUG-6`), so the result is never empty.
    #[must_use]
    pub fn map(&self, level: Level) -> Cow<'static, str> {
        match self.names.get(&level) {
            Some(name) => Cow::Borrowed(*name),
            None => Cow::Owned(level.to_string()),
        }
    }

    /// Whether `level` has a dedicated severity name.
    pub fn contains(&self, level: Level) -> bool {
        self.names.contains_key(&level)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for SeverityTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps `level` through the global table.
#[must_use]
pub fn map_severity(level: Level) -> Cow<'static, str> {
    SeverityTable::global().map(level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_levels() {
        let table = SeverityTable::new();
        assert_eq!(table.map(Level::DEFAULT), "DEFAULT");
        assert_eq!(table.map(Level::DEBUG), "DEBUG");
        assert_eq!(table.map(Level::INFO), "INFO");
        assert_eq!(table.map(Level::NOTICE), "NOTICE");
        assert_eq!(table.map(Level::WARNING), "WARNING");
        assert_eq!(table.map(Level::ERROR), "ERROR");
        assert_eq!(table.map(Level::CRITICAL), "CRITICAL");
        assert_eq!(table.map(Level::ALERT), "ALERT");
        assert_eq!(table.map(Level::EMERGENCY), "EMERGENCY");
    }

    #[test]
    fn test_fallback() {
        assert_eq!(map_severity(Level::new(1)), "INFO+1");
        assert_eq!(map_severity(Level::new(7)), "WARN+3");
        assert_eq!(map_severity(Level::new(100)), "ERROR+92");
        assert_eq!(map_severity(Level::new(-10)), "DEBUG-6");
    }

    #[test]
    fn test_table_invariants() {
        let table = SeverityTable::global();
        assert_eq!(table.len(), SeverityTable::ENTRIES.len());
        for (level, name) in SeverityTable::ENTRIES {
            assert!(table.contains(level));
            assert!(!name.is_empty());
            assert_eq!(name, name.to_ascii_uppercase());
        }
    }

    #[test]
    fn test_shared_is_global() {
        let shared = SeverityTable::shared();
        assert!(std::ptr::eq(&*shared, SeverityTable::global()));
    }

    #[test]
    fn test_known_levels_are_borrowed() {
        assert!(matches!(map_severity(Level::ALERT), Cow::Borrowed("ALERT")));
        assert!(matches!(map_severity(Level::new(3)), Cow::Owned(_)));
    }
}
