//! Attribute rewriting
//!
//! A [`RewriteChain`] is an ordered list of [`RewriteStep`]s. The encoder runs
//! every attribute of a record through the chain, each step receiving the
//! previous step's output. The built-in [`CloudLoggingRewrite`] step always
//! comes first, so a caller-supplied step sees the Cloud Logging field names
//! and can still override them.

use super::attr::{
    Attr, AttrValue, LEVEL_KEY, MESSAGE_FIELD, MESSAGE_KEY, SEVERITY_FIELD, TIME_KEY,
};
use super::severity::SeverityTable;
use chrono::SecondsFormat;
use std::fmt;
use std::sync::Arc;

/// One transformation applied to every attribute before it is encoded.
///
/// `groups` is the path of enclosing group keys, empty for top-level
/// attributes. Returning [`Attr::empty`] drops the attribute.
pub trait RewriteStep: Send + Sync {
    fn rewrite(&self, groups: &[&str], attr: Attr) -> Attr;
}

impl<F> RewriteStep for F
where
    F: Fn(&[&str], Attr) -> Attr + Send + Sync,
{
    fn rewrite(&self, groups: &[&str], attr: Attr) -> Attr {
        self(groups, attr)
    }
}

/// Renames and reformats the built-in attributes for Cloud Logging:
///
/// - `level` becomes `severity`, holding the mapped severity name
/// - `msg` becomes `message`
/// - `time` becomes RFC 3339 text with second precision
///
/// Only top-level attributes are touched; everything else passes through.
#[derive(Debug, Clone)]
pub struct CloudLoggingRewrite {
    table: Arc<SeverityTable>,
}

impl CloudLoggingRewrite {
    /// The step backed by the process-wide [`SeverityTable`].
    pub fn new() -> Self {
        Self::with_table(SeverityTable::shared())
    }

    pub fn with_table(table: Arc<SeverityTable>) -> Self {
        Self { table }
    }
}

impl Default for CloudLoggingRewrite {
    fn default() -> Self {
        Self::new()
    }
}

impl RewriteStep for CloudLoggingRewrite {
    fn rewrite(&self, groups: &[&str], mut attr: Attr) -> Attr {
        if !groups.is_empty() {
            return attr;
        }

        match (attr.key.as_str(), &attr.value) {
            (LEVEL_KEY, AttrValue::Level(level)) => {
                attr.value = AttrValue::String(self.table.map(*level).into_owned());
                attr.key = SEVERITY_FIELD.to_string();
            }
            (MESSAGE_KEY, _) => {
                attr.key = MESSAGE_FIELD.to_string();
            }
            (TIME_KEY, AttrValue::Time(time)) => {
                attr.value = AttrValue::String(time.to_rfc3339_opts(SecondsFormat::Secs, true));
            }
            _ => {}
        }
        attr
    }
}

/// Ordered composition of rewrite steps
#[derive(Clone)]
pub struct RewriteChain {
    steps: Vec<Arc<dyn RewriteStep>>,
}

impl RewriteChain {
    /// A chain holding only the built-in Cloud Logging step.
    pub fn new() -> Self {
        Self::starting_with(CloudLoggingRewrite::new())
    }

    /// A chain whose first step is `builtin`.
    pub fn starting_with<S: RewriteStep + 'static>(builtin: S) -> Self {
        Self {
            steps: vec![Arc::new(builtin)],
        }
    }

    /// A chain with no steps; attributes pass through unchanged.
    pub fn identity() -> Self {
        Self { steps: Vec::new() }
    }

    /// Append a step that runs after all current ones.
    pub fn then<S: RewriteStep + 'static>(mut self, step: S) -> Self {
        self.steps.push(Arc::new(step));
        self
    }

    /// Append an already shared step.
    pub fn then_shared(mut self, step: Arc<dyn RewriteStep>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run `attr` through every step in order.
    pub fn rewrite(&self, groups: &[&str], attr: Attr) -> Attr {
        self.steps
            .iter()
            .fold(attr, |attr, step| step.rewrite(groups, attr))
    }
}

impl Default for RewriteChain {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RewriteChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RewriteChain")
            .field("steps", &self.steps.len())
            .finish()
    }
}

impl RewriteStep for RewriteChain {
    fn rewrite(&self, groups: &[&str], attr: Attr) -> Attr {
        RewriteChain::rewrite(self, groups, attr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::Level;
    use chrono::{FixedOffset, TimeZone, Utc};

    #[test]
    fn test_level_becomes_severity() {
        let chain = RewriteChain::new();
        let attr = chain.rewrite(&[], Attr::new(LEVEL_KEY, Level::NOTICE));
        assert_eq!(attr.key, "severity");
        assert_eq!(attr.value, AttrValue::String("NOTICE".to_string()));

        let attr = chain.rewrite(&[], Attr::new(LEVEL_KEY, Level::new(3)));
        assert_eq!(attr.value, AttrValue::String("INFO+3".to_string()));
    }

    #[test]
    fn test_message_renamed() {
        let chain = RewriteChain::new();
        let attr = chain.rewrite(&[], Attr::new(MESSAGE_KEY, "hello"));
        assert_eq!(attr.key, "message");
        assert_eq!(attr.value.as_str(), Some("hello"));
    }

    #[test]
    fn test_time_reformatted() {
        let chain = RewriteChain::new();
        let time = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 15).unwrap()
            + chrono::Duration::milliseconds(250);
        let attr = chain.rewrite(&[], Attr::new(TIME_KEY, time));
        assert_eq!(attr.key, "time");
        assert_eq!(attr.value.as_str(), Some("2024-05-01T12:30:15Z"));

        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let local = offset.with_ymd_and_hms(2024, 5, 1, 14, 30, 15).unwrap();
        let attr = chain.rewrite(&[], Attr::new(TIME_KEY, local));
        assert_eq!(attr.value.as_str(), Some("2024-05-01T14:30:15+02:00"));
    }

    #[test]
    fn test_other_keys_pass_through() {
        let chain = RewriteChain::new();
        let attr = Attr::new("user", "alice");
        assert_eq!(chain.rewrite(&[], attr.clone()), attr);

        // A "level" text field is not a level value.
        let attr = Attr::new(LEVEL_KEY, "high");
        assert_eq!(chain.rewrite(&[], attr.clone()), attr);
    }

    #[test]
    fn test_nested_keys_untouched() {
        let chain = RewriteChain::new();
        let attr = Attr::new(MESSAGE_KEY, "inner");
        assert_eq!(chain.rewrite(&["request"], attr.clone()), attr);
    }

    #[test]
    fn test_caller_step_sees_builtin_output() {
        let chain = RewriteChain::new().then(|_: &[&str], mut attr: Attr| {
            if attr.key == MESSAGE_FIELD {
                attr.key = MESSAGE_KEY.to_string();
            }
            attr
        });

        let attr = chain.rewrite(&[], Attr::new(MESSAGE_KEY, "hello"));
        assert_eq!(attr.key, "msg");
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn test_caller_step_overrides_value() {
        let chain = RewriteChain::new().then(|_: &[&str], mut attr: Attr| {
            if attr.value.as_str() == Some("INFO") {
                attr.value = AttrValue::from("INFO+rewritten");
            }
            attr
        });

        let attr = chain.rewrite(&[], Attr::new(LEVEL_KEY, Level::INFO));
        assert_eq!(attr.key, "severity");
        assert_eq!(attr.value.as_str(), Some("INFO+rewritten"));
    }

    #[test]
    fn test_owned_table() {
        let table = Arc::new(SeverityTable::new());
        let chain =
            RewriteChain::starting_with(CloudLoggingRewrite::with_table(Arc::clone(&table)));
        drop(table);

        let attr = chain.rewrite(&[], Attr::new(LEVEL_KEY, Level::ALERT));
        assert_eq!(attr.value.as_str(), Some("ALERT"));
    }

    #[test]
    fn test_identity_chain() {
        let chain = RewriteChain::identity();
        assert!(chain.is_empty());
        let attr = Attr::new(LEVEL_KEY, Level::INFO);
        assert_eq!(chain.rewrite(&[], attr.clone()), attr);
    }
}
