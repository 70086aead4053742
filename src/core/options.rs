//! Handler configuration

use super::error::{HandlerError, Result};
use super::level::Level;
use super::rewrite::{RewriteChain, RewriteStep};
use std::fmt;
use std::sync::Arc;

/// Environment variable holding the Google Cloud project id
pub const PROJECT_ENV: &str = "GOOGLE_CLOUD_PROJECT";
/// Environment variable holding the minimum level, e.g. `debug` or `INFO+2`
pub const LEVEL_ENV: &str = "LOG_LEVEL";

/// Options for [`GcpHandler`](crate::GcpHandler)
///
/// # Example
///
/// ```
/// use gcp_log_handler::{HandlerOptions, Level};
///
/// let options = HandlerOptions::new()
///     .with_min_level(Level::DEBUG)
///     .with_project_id("my-project")
///     .with_add_source(true);
///
/// assert_eq!(options.project_id(), "my-project");
/// ```
#[derive(Clone, Default)]
pub struct HandlerOptions {
    /// Records below this level are not handled
    pub min_level: Level,

    /// Emit the call site as a `source` group
    pub add_source: bool,

    /// Caller rewrite step, run after the built-in Cloud Logging step
    pub replace_attr: Option<Arc<dyn RewriteStep>>,

    /// Project owning the traces; trace fields are only written when set
    pub project_id: Option<String>,
}

impl HandlerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options from `GOOGLE_CLOUD_PROJECT` and `LOG_LEVEL`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Options from an arbitrary variable lookup. Unset and empty variables
    /// keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::new();

        if let Some(level) = lookup(LEVEL_ENV).filter(|v| !v.trim().is_empty()) {
            options.min_level = level
                .parse()
                .map_err(|e: HandlerError| HandlerError::config(LEVEL_ENV, e.to_string()))?;
        }

        if let Some(project) = lookup(PROJECT_ENV).filter(|v| !v.trim().is_empty()) {
            options.project_id = Some(project.trim().to_string());
        }

        options.validate()?;
        Ok(options)
    }

    #[must_use]
    pub fn with_min_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    #[must_use]
    pub fn with_add_source(mut self, add_source: bool) -> Self {
        self.add_source = add_source;
        self
    }

    #[must_use]
    pub fn with_replace_attr<S: RewriteStep + 'static>(mut self, step: S) -> Self {
        self.replace_attr = Some(Arc::new(step));
        self
    }

    #[must_use]
    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// The configured project id, empty when unset
    pub fn project_id(&self) -> &str {
        self.project_id.as_deref().unwrap_or("")
    }

    /// Check that the project id can be embedded in a trace resource name
    pub fn validate(&self) -> Result<()> {
        let project = self.project_id();
        if project.contains('/') || project.chars().any(char::is_whitespace) {
            return Err(HandlerError::config(
                "project_id",
                format!("'{}' is not a valid project id", project),
            ));
        }
        Ok(())
    }

    /// The built-in Cloud Logging step followed by the caller's step, if any
    pub fn rewrite_chain(&self) -> RewriteChain {
        let chain = RewriteChain::new();
        match &self.replace_attr {
            Some(step) => chain.then_shared(Arc::clone(step)),
            None => chain,
        }
    }
}

impl fmt::Debug for HandlerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerOptions")
            .field("min_level", &self.min_level)
            .field("add_source", &self.add_source)
            .field("replace_attr", &self.replace_attr.is_some())
            .field("project_id", &self.project_id)
            .finish()
    }
}
