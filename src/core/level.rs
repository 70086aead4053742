//! Log level definitions
//!
//! Levels are plain integers so that applications can log at any point of the
//! scale. The well-known constants follow the Cloud Logging severities; their
//! numeric values are internal and only their ordering matters.

use super::error::HandlerError;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Level(pub i32);

impl Level {
    pub const DEFAULT: Level = Level(-8);
    pub const DEBUG: Level = Level(-4);
    pub const INFO: Level = Level(0);
    pub const NOTICE: Level = Level(2);
    pub const WARNING: Level = Level(4);
    pub const ERROR: Level = Level(8);
    pub const CRITICAL: Level = Level(60);
    pub const ALERT: Level = Level(70);
    pub const EMERGENCY: Level = Level(80);

    /// Base levels used by the generic naming scheme, highest first.
    const BASES: [(&'static str, Level); 4] = [
        ("ERROR", Level::ERROR),
        ("WARN", Level::WARNING),
        ("INFO", Level::INFO),
        ("DEBUG", Level::DEBUG),
    ];

    #[must_use]
    pub const fn new(value: i32) -> Self {
        Level(value)
    }

    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Returns the level shifted by `offset`, saturating at the `i32` bounds.
    #[must_use]
    pub const fn offset(self, offset: i32) -> Self {
        Level(self.0.saturating_add(offset))
    }

    fn base(self) -> (&'static str, Level) {
        for (name, base) in Self::BASES {
            if self >= base {
                return (name, base);
            }
        }
        ("DEBUG", Level::DEBUG)
    }
}

/// Generic name: the nearest base at or below the level plus a signed offset,
/// e.g. `INFO`, `WARN+3`, `DEBUG-4`.
impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, base) = self.base();
        let delta = i64::from(self.0) - i64::from(base.0);
        if delta == 0 {
            f.write_str(name)
        } else {
            write!(f, "{}{:+}", name, delta)
        }
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<i32> for Level {
    fn from(value: i32) -> Self {
        Level(value)
    }
}

fn named_level(name: &str) -> Option<Level> {
    let level = match name.to_ascii_uppercase().as_str() {
        "DEFAULT" => Level::DEFAULT,
        "DEBUG" => Level::DEBUG,
        "INFO" => Level::INFO,
        "NOTICE" => Level::NOTICE,
        "WARN" | "WARNING" => Level::WARNING,
        "ERROR" => Level::ERROR,
        "CRITICAL" => Level::CRITICAL,
        "ALERT" => Level::ALERT,
        "EMERGENCY" => Level::EMERGENCY,
        _ => return None,
    };
    Some(level)
}

impl FromStr for Level {
    type Err = HandlerError;

    /// Accepts severity names (case-insensitive), `NAME+n` / `NAME-n`, and
    /// bare integers.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if let Ok(value) = text.parse::<i32>() {
            return Ok(Level(value));
        }

        let (name, offset) = match text.find(|c: char| c == '+' || c == '-') {
            Some(idx) => {
                let offset = text[idx..]
                    .parse::<i32>()
                    .map_err(|_| HandlerError::invalid_level(s))?;
                (&text[..idx], offset)
            }
            None => (text, 0),
        };

        named_level(name)
            .map(|level| level.offset(offset))
            .ok_or_else(|| HandlerError::invalid_level(s))
    }
}
