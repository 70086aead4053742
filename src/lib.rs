//! # GCP Log Handler
//!
//! Structured logging for Google Cloud. Records are written as JSON lines in
//! the shape Cloud Logging expects from stdout of Cloud Run, GKE and App
//! Engine workloads.
//!
//! ## Features
//!
//! - **Severity mapping**: levels become `DEFAULT` .. `EMERGENCY` severities
//! - **Field rewriting**: `msg` becomes `message`, times are RFC 3339, and a
//!   custom rewrite step can adjust any attribute afterwards
//! - **Trace correlation**: records logged inside an OpenTelemetry span carry
//!   `logging.googleapis.com/trace`, `spanId` and `trace_sampled`
//! - **Thread Safe**: handlers are immutable and share one locked sink
//!
//! ## Example
//!
//! ```
//! use gcp_log_handler::prelude::*;
//!
//! let logger = Logger::builder()
//!     .project_id("my-project")
//!     .writer(std::io::sink())
//!     .build()
//!     .unwrap();
//!
//! logger.notice("service started");
//! logger.log(Level::WARNING, "slow request", vec![Attr::new("latency_ms", 1200)]);
//! ```

pub mod core;
pub mod encoder;
pub mod macros;

pub mod prelude {
    pub use crate::core::{
        map_severity, Attr, AttrValue, CloudLoggingRewrite, GcpHandler, Handler, HandlerError,
        HandlerOptions, Level, Logger, LoggerBuilder, LoggerMetrics, Record, Result,
        RewriteChain, RewriteStep, SeverityTable, Source, TraceContext,
    };
    pub use crate::encoder::JsonEncoder;
}

pub use crate::core::trace::{context_from_cloud_trace_header, context_from_traceparent};
pub use crate::core::{
    map_severity, Attr, AttrValue, CloudLoggingRewrite, GcpHandler, Handler, HandlerError,
    HandlerOptions, Level, Logger, LoggerBuilder, LoggerMetrics, Record, Result, RewriteChain,
    RewriteStep, SeverityTable, Source, TraceContext,
};
pub use encoder::JsonEncoder;
