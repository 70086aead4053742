//! Trace correlation for Cloud Logging
//!
//! When a record is logged inside an OpenTelemetry span and a project id is
//! configured, the record gets the three `logging.googleapis.com/*` fields
//! that let Cloud Logging link the entry to its trace. See
//! <https://cloud.google.com/logging/docs/structured-logging#special-payload-fields>.

use super::attr::{Attr, AttrValue, SPAN_ID_KEY, TRACE_ID_KEY, TRACE_SAMPLED_KEY};
use super::record::Record;
use opentelemetry::trace::{
    SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState,
};
use opentelemetry::Context;

/// Trace identifiers of the active span, qualified by the project that owns
/// the trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceContext {
    pub project_id: String,
    pub trace_id: TraceId,
    pub span_id: SpanId,
    pub sampled: bool,
}

impl TraceContext {
    /// Looks up the active span in `cx`.
    ///
    /// Returns `None` when `project_id` is empty or `cx` carries no valid
    /// trace id.
    pub fn from_context(cx: &Context, project_id: &str) -> Option<Self> {
        if project_id.is_empty() {
            return None;
        }

        let span = cx.span();
        let span_context = span.span_context();
        if span_context.trace_id() == TraceId::INVALID {
            return None;
        }

        Some(Self {
            project_id: project_id.to_string(),
            trace_id: span_context.trace_id(),
            span_id: span_context.span_id(),
            sampled: span_context.is_sampled(),
        })
    }

    /// `projects/<project>/traces/<trace id in lowercase hex>`
    pub fn resource_name(&self) -> String {
        format!("projects/{}/traces/{}", self.project_id, self.trace_id)
    }

    /// The attributes added to a record, in the order they are written.
    pub fn to_attrs(&self) -> [Attr; 3] {
        [
            Attr::new(TRACE_ID_KEY, self.resource_name()),
            Attr::new(SPAN_ID_KEY, AttrValue::SpanId(self.span_id)),
            Attr::new(TRACE_SAMPLED_KEY, self.sampled),
        ]
    }
}

/// Appends the trace fields to `record` when `project_id` is set and `cx`
/// holds an active trace. Returns whether anything was added.
///
/// `trace_sampled` is written whenever a trace is active, whatever its value.
pub fn enrich(record: &mut Record, cx: &Context, project_id: &str) -> bool {
    match TraceContext::from_context(cx, project_id) {
        Some(trace) => {
            for attr in trace.to_attrs() {
                record.add_attr(attr);
            }
            true
        }
        None => false,
    }
}

fn remote_context(trace_id: TraceId, span_id: SpanId, flags: TraceFlags) -> Option<Context> {
    if trace_id == TraceId::INVALID {
        return None;
    }
    let span_context = SpanContext::new(trace_id, span_id, flags, true, TraceState::default());
    Some(Context::new().with_remote_span_context(span_context))
}

fn is_lower_hex(text: &str, len: usize) -> bool {
    text.len() == len
        && text
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// Parses a W3C `traceparent` header value, e.g.
/// `00-0af7651916cd43dd8448eb211c80319c-b7ad6b7169203331-01`.
///
/// Returns `None` for malformed values and all-zero ids.
pub fn context_from_traceparent(header: &str) -> Option<Context> {
    let mut parts = header.trim().split('-');
    let version = parts.next()?;
    let trace_id = parts.next()?;
    let span_id = parts.next()?;
    let flags = parts.next()?;

    if !is_lower_hex(version, 2) || version == "ff" {
        return None;
    }
    // Version 00 has exactly four fields; later versions may append more.
    if version == "00" && parts.next().is_some() {
        return None;
    }
    if !is_lower_hex(trace_id, 32) || !is_lower_hex(span_id, 16) || !is_lower_hex(flags, 2) {
        return None;
    }

    let span_id = SpanId::from_hex(span_id).ok()?;
    if span_id == SpanId::INVALID {
        return None;
    }
    let flags = u8::from_str_radix(flags, 16).ok()?;

    remote_context(
        TraceId::from_hex(trace_id).ok()?,
        span_id,
        TraceFlags::new(flags & TraceFlags::SAMPLED.to_u8()),
    )
}

/// Parses a legacy `X-Cloud-Trace-Context` header value,
/// `TRACE_ID/SPAN_ID;o=OPTIONS`, where the span id is decimal and `o=1`
/// marks the trace as sampled.
pub fn context_from_cloud_trace_header(header: &str) -> Option<Context> {
    let (trace_id, rest) = header.trim().split_once('/')?;
    let (span_id, options) = match rest.split_once(';') {
        Some((span_id, options)) => (span_id, Some(options)),
        None => (rest, None),
    };

    if trace_id.len() != 32 || !trace_id.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let span_id: u64 = span_id.parse().ok()?;
    let sampled = matches!(options, Some(o) if o.trim() == "o=1");
    let flags = if sampled {
        TraceFlags::SAMPLED
    } else {
        TraceFlags::default()
    };

    remote_context(
        TraceId::from_hex(&trace_id.to_ascii_lowercase()).ok()?,
        SpanId::from_bytes(span_id.to_be_bytes()),
        flags,
    )
}
