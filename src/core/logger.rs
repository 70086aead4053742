//! Logger frontend
//!
//! [`Logger`] builds records at the call site, checks the handler's minimum
//! level and hands them over. Handler failures are reported to stderr and
//! counted; use [`Logger::try_log_context`] to get the error instead.

use super::{
    attr::Attr,
    error::Result,
    handler::{GcpHandler, Handler},
    level::Level,
    metrics::LoggerMetrics,
    options::HandlerOptions,
    record::{Record, Source},
    rewrite::RewriteStep,
};
use opentelemetry::Context;
use std::io::{self, Write};
use std::sync::Arc;

#[derive(Clone)]
pub struct Logger {
    handler: Arc<dyn Handler>,
    metrics: Arc<LoggerMetrics>,
}

impl Logger {
    pub fn new(handler: Arc<dyn Handler>) -> Self {
        Self {
            handler,
            metrics: Arc::new(LoggerMetrics::new()),
        }
    }

    /// A logger writing Cloud Logging JSON lines to `writer`
    ///
    /// Fails when `options` do not pass [`HandlerOptions::validate`].
    pub fn gcp<W: Write + Send + 'static>(writer: W, options: HandlerOptions) -> Result<Self> {
        Ok(Self::new(Arc::new(GcpHandler::try_new(writer, options)?)))
    }

    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }

    /// Get the logger metrics
    ///
    /// Loggers derived with [`Logger::with`] share the same counters.
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn enabled(&self, level: Level) -> bool {
        self.handler.enabled(level)
    }

    /// A logger that adds `attrs` to every record
    #[must_use]
    pub fn with(&self, attrs: Vec<Attr>) -> Logger {
        Self {
            handler: self.handler.with_attrs(attrs),
            metrics: Arc::clone(&self.metrics),
        }
    }

    /// Log under the current OpenTelemetry context
    #[track_caller]
    pub fn log<I>(&self, level: Level, message: impl Into<String>, attrs: I)
    where
        I: IntoIterator<Item = Attr>,
    {
        self.log_context(&Context::current(), level, message, attrs);
    }

    /// Log under `cx`, whose active span (if any) correlates the record
    #[track_caller]
    pub fn log_context<I>(&self, cx: &Context, level: Level, message: impl Into<String>, attrs: I)
    where
        I: IntoIterator<Item = Attr>,
    {
        if let Err(e) = self.try_log_context(cx, level, message, attrs) {
            self.metrics.record_failed();
            eprintln!("[LOGGER ERROR] Handler failed: {}", e);
        }
    }

    /// Log under `cx` and return the handler's error, if any
    ///
    /// Records below the minimum level are skipped and return `Ok`.
    #[track_caller]
    pub fn try_log_context<I>(
        &self,
        cx: &Context,
        level: Level,
        message: impl Into<String>,
        attrs: I,
    ) -> Result<()>
    where
        I: IntoIterator<Item = Attr>,
    {
        if !self.handler.enabled(level) {
            self.metrics.record_filtered();
            return Ok(());
        }

        let record = Record::new(level, message)
            .with_source(Source::caller())
            .with_attrs(attrs);
        self.handler.handle(cx, record)?;
        self.metrics.record_logged();
        Ok(())
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(Level::DEBUG, message, None);
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.log(Level::INFO, message, None);
    }

    #[inline]
    #[track_caller]
    pub fn notice(&self, message: impl Into<String>) {
        self.log(Level::NOTICE, message, None);
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(Level::WARNING, message, None);
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.log(Level::ERROR, message, None);
    }

    #[inline]
    #[track_caller]
    pub fn critical(&self, message: impl Into<String>) {
        self.log(Level::CRITICAL, message, None);
    }

    #[inline]
    #[track_caller]
    pub fn alert(&self, message: impl Into<String>) {
        self.log(Level::ALERT, message, None);
    }

    #[inline]
    #[track_caller]
    pub fn emergency(&self, message: impl Into<String>) {
        self.log(Level::EMERGENCY, message, None);
    }
}

/// Builder for a [`Logger`] backed by a [`GcpHandler`]
///
/// Writes to stdout unless another writer is given.
pub struct LoggerBuilder {
    options: HandlerOptions,
    writer: Option<Box<dyn Write + Send>>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            options: HandlerOptions::new(),
            writer: None,
        }
    }

    /// Start from existing options, e.g. [`HandlerOptions::from_env`]
    pub fn options(mut self, options: HandlerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn min_level(mut self, level: Level) -> Self {
        self.options.min_level = level;
        self
    }

    pub fn project_id(mut self, project_id: impl Into<String>) -> Self {
        self.options.project_id = Some(project_id.into());
        self
    }

    pub fn add_source(mut self, add_source: bool) -> Self {
        self.options.add_source = add_source;
        self
    }

    pub fn replace_attr<S: RewriteStep + 'static>(mut self, step: S) -> Self {
        self.options = self.options.with_replace_attr(step);
        self
    }

    pub fn writer<W: Write + Send + 'static>(mut self, writer: W) -> Self {
        self.writer = Some(Box::new(writer));
        self
    }

    /// Build the logger, validating the options
    pub fn build(self) -> Result<Logger> {
        let writer = self
            .writer
            .unwrap_or_else(|| Box::new(io::stdout()) as Box<dyn Write + Send>);
        let handler = GcpHandler::try_new(writer, self.options)?;
        Ok(Logger::new(Arc::new(handler)))
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
