//! Record handlers
//!
//! [`Handler`] is the seam between the [`Logger`](crate::Logger) frontend and
//! whatever turns records into output. [`GcpHandler`] is the Cloud Logging
//! implementation: it adds trace correlation fields and writes JSON lines
//! through the Cloud Logging rewrite chain.

use super::attr::Attr;
use super::error::Result;
use super::level::Level;
use super::options::HandlerOptions;
use super::record::Record;
use super::rewrite::RewriteChain;
use super::trace;
use crate::encoder::JsonEncoder;
use opentelemetry::Context;
use std::io::Write;
use std::sync::Arc;

pub trait Handler: Send + Sync {
    /// Whether records at `level` should be handled at all
    fn enabled(&self, level: Level) -> bool;

    /// Handle one record logged under the execution context `cx`
    fn handle(&self, cx: &Context, record: Record) -> Result<()>;

    /// A handler that also writes `attrs` on every record
    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler>;
}

/// Handler producing output for Google Cloud structured logging.
///
/// See <https://cloud.google.com/logging/docs/structured-logging>.
///
/// # Example
///
/// ```
/// use gcp_log_handler::{GcpHandler, Handler, HandlerOptions, Level, Record};
/// use opentelemetry::Context;
///
/// let handler = GcpHandler::new(Vec::new(), HandlerOptions::new());
/// handler.handle(&Context::new(), Record::new(Level::NOTICE, "started")).unwrap();
///
/// let line = handler.with_writer(|out| String::from_utf8(out.clone()).unwrap());
/// assert!(line.contains("\"severity\":\"NOTICE\""));
/// assert!(line.contains("\"message\":\"started\""));
/// ```
pub struct GcpHandler<W> {
    encoder: JsonEncoder<W>,
    chain: Arc<RewriteChain>,
    min_level: Level,
    project_id: Arc<str>,
    base_attrs: Arc<[Attr]>,
}

impl<W> Clone for GcpHandler<W> {
    fn clone(&self) -> Self {
        Self {
            encoder: self.encoder.clone(),
            chain: Arc::clone(&self.chain),
            min_level: self.min_level,
            project_id: Arc::clone(&self.project_id),
            base_attrs: Arc::clone(&self.base_attrs),
        }
    }
}

impl<W: Write + Send> GcpHandler<W> {
    /// Build a handler without validating `options`.
    ///
    /// A project id holding `/` or whitespace is written into the trace
    /// resource name as is; use [`GcpHandler::try_new`] to reject it.
    pub fn new(writer: W, options: HandlerOptions) -> Self {
        Self {
            encoder: JsonEncoder::new(writer).with_add_source(options.add_source),
            chain: Arc::new(options.rewrite_chain()),
            min_level: options.min_level,
            project_id: Arc::from(options.project_id()),
            base_attrs: Arc::from(Vec::new()),
        }
    }

    /// Like [`GcpHandler::new`], rejecting options that fail validation
    pub fn try_new(writer: W, options: HandlerOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self::new(writer, options))
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn min_level(&self) -> Level {
        self.min_level
    }

    pub fn rewrite_chain(&self) -> &RewriteChain {
        &self.chain
    }

    /// A handler sharing this one's sink that writes `attrs` after the
    /// built-in fields of every record.
    #[must_use]
    pub fn with_base_attrs(&self, attrs: Vec<Attr>) -> Self {
        let mut handler = self.clone();
        if !attrs.is_empty() {
            let mut base = self.base_attrs.to_vec();
            base.extend(attrs);
            handler.base_attrs = Arc::from(base);
        }
        handler
    }

    pub fn flush(&self) -> Result<()> {
        self.encoder.flush()
    }

    /// Run `f` with the sink locked
    pub fn with_writer<R>(&self, f: impl FnOnce(&mut W) -> R) -> R {
        self.encoder.with_writer(f)
    }
}

impl<W: Write + Send + 'static> Handler for GcpHandler<W> {
    fn enabled(&self, level: Level) -> bool {
        level >= self.min_level
    }

    fn handle(&self, cx: &Context, mut record: Record) -> Result<()> {
        trace::enrich(&mut record, cx, &self.project_id);
        self.encoder.encode(&record, &self.base_attrs, &self.chain)
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler> {
        Arc::new(self.with_base_attrs(attrs))
    }
}
