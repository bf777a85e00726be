//! Span data model: trace identity, the recordable payload, and the handle
//! installed as the current server span.

mod annotation;
mod endpoint;

pub use annotation::{Annotation, AnnotationValue, BinaryAnnotation};
pub use endpoint::Endpoint;

use serde::Serialize;
use std::sync::{Arc, Mutex};

/// Identity of a span within its trace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpanIdentity {
    /// Identifier shared by every span of the trace.
    pub trace_id: u64,
    /// Identifier of this span.
    pub span_id: u64,
    /// Identifier of the parent span; absent for root spans.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_span_id: Option<u64>,
    /// Span name, e.g. the request operation.
    pub name: String,
    /// Whether this trace is recorded and forwarded.
    pub sampled: bool,
}

/// Recordable payload of a sampled span: identity fields plus accumulated
/// annotations. This is what a [`SpanCollector`](crate::SpanCollector)
/// receives when the span finishes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpanRecord {
    /// Identifier shared by every span of the trace.
    pub trace_id: u64,
    /// Identifier of this span.
    pub span_id: u64,
    /// Identifier of the parent span; absent for root spans.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_span_id: Option<u64>,
    /// Span name.
    pub name: String,
    /// Timestamped events, in submission order.
    pub annotations: Vec<Annotation>,
    /// Key/value tags, in submission order.
    pub binary_annotations: Vec<BinaryAnnotation>,
}

/// Span installed as the current server span of a request.
///
/// The identity is immutable. The record is present exactly when the span is
/// sampled, and is shared between clones, so annotation writes through one
/// handle are visible through every other.
#[derive(Clone, Debug)]
pub struct ServerSpan {
    identity: SpanIdentity,
    record: Option<Arc<Mutex<SpanRecord>>>,
}

impl ServerSpan {
    /// Root span of a new trace.
    ///
    /// A single identifier serves as both the trace and span id; there is no
    /// parent. This identity convention marks the span as the root of the
    /// trace.
    pub fn new_root(id: u64, name: impl Into<String>) -> Self {
        Self::recording(SpanIdentity {
            trace_id: id,
            span_id: id,
            parent_span_id: None,
            name: name.into(),
            sampled: true,
        })
    }

    /// Span adopting identity propagated by the caller. Always sampled.
    pub fn from_identity(
        trace_id: u64,
        span_id: u64,
        parent_span_id: Option<u64>,
        name: impl Into<String>,
    ) -> Self {
        Self::recording(SpanIdentity {
            trace_id,
            span_id,
            parent_span_id,
            name: name.into(),
            sampled: true,
        })
    }

    /// Span for a trace that is not recorded.
    ///
    /// Carries no record, so every instrumentation call on it gates into a
    /// no-op.
    pub fn not_sampled() -> Self {
        ServerSpan {
            identity: SpanIdentity {
                trace_id: 0,
                span_id: 0,
                parent_span_id: None,
                name: String::new(),
                sampled: false,
            },
            record: None,
        }
    }

    fn recording(identity: SpanIdentity) -> Self {
        let record = SpanRecord {
            trace_id: identity.trace_id,
            span_id: identity.span_id,
            parent_span_id: identity.parent_span_id,
            name: identity.name.clone(),
            annotations: Vec::new(),
            binary_annotations: Vec::new(),
        };
        ServerSpan {
            identity,
            record: Some(Arc::new(Mutex::new(record))),
        }
    }

    /// Identity of this span.
    pub fn identity(&self) -> &SpanIdentity {
        &self.identity
    }

    /// `true` if this span carries a record to annotate and collect.
    pub fn is_recording(&self) -> bool {
        self.record.is_some()
    }

    /// Run `f` on the mutable record, if one is present.
    pub fn with_record<T>(&self, f: impl FnOnce(&mut SpanRecord) -> T) -> Option<T> {
        self.record
            .as_ref()
            .and_then(|record| record.lock().ok().map(|mut guard| f(&mut guard)))
    }

    /// Snapshot of the record, if one is present.
    pub fn record_snapshot(&self) -> Option<SpanRecord> {
        self.with_record(|record| record.clone())
    }
}

impl PartialEq for ServerSpan {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity && self.record_snapshot() == other.record_snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_span_reuses_one_id() {
        let span = ServerSpan::new_root(7, "op");
        assert_eq!(span.identity().trace_id, 7);
        assert_eq!(span.identity().span_id, 7);
        assert_eq!(span.identity().parent_span_id, None);
        assert!(span.identity().sampled);
        assert!(span.is_recording());
    }

    #[test]
    fn adopted_span_uses_supplied_identity() {
        let span = ServerSpan::from_identity(1, 2, Some(3), "op");
        assert_eq!(span.identity().trace_id, 1);
        assert_eq!(span.identity().span_id, 2);
        assert_eq!(span.identity().parent_span_id, Some(3));
        assert!(span.identity().sampled);
        assert!(span.is_recording());
    }

    #[test]
    fn not_sampled_span_has_no_record() {
        let span = ServerSpan::not_sampled();
        assert!(!span.identity().sampled);
        assert!(!span.is_recording());
        assert_eq!(span.with_record(|_| ()), None);
        assert_eq!(span.record_snapshot(), None);
    }

    #[test]
    fn clones_share_the_record() {
        let span = ServerSpan::new_root(7, "op");
        let clone = span.clone();
        span.with_record(|record| {
            record.annotations.push(
                Annotation::builder()
                    .timestamp(1)
                    .value("sr")
                    .build(),
            );
        });
        let snapshot = clone.record_snapshot().unwrap();
        assert_eq!(snapshot.annotations.len(), 1);
        assert_eq!(snapshot.annotations[0].value, "sr");
    }

    #[test]
    fn record_serializes_camel_case() {
        let span = ServerSpan::from_identity(1, 2, None, "op");
        let record = span.record_snapshot().unwrap();
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            "{\"traceId\":1,\"spanId\":2,\"name\":\"op\",\"annotations\":[],\"binaryAnnotations\":[]}",
        );
    }
}
