//! Core record types and the Cloud Logging transformation pipeline

pub mod attr;
pub mod error;
pub mod handler;
pub mod level;
pub mod logger;
pub mod metrics;
pub mod options;
pub mod record;
pub mod rewrite;
pub mod severity;
pub mod trace;

pub use attr::{Attr, AttrValue};
pub use error::{HandlerError, Result};
pub use handler::{GcpHandler, Handler};
pub use level::Level;
pub use logger::{Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use options::HandlerOptions;
pub use record::{Record, Source};
pub use rewrite::{CloudLoggingRewrite, RewriteChain, RewriteStep};
pub use severity::{map_severity, SeverityTable};
pub use trace::TraceContext;
