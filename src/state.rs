use crate::model::{Endpoint, ServerSpan};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

/// Storage for the span state of one in-flight request.
///
/// The tracer holds no span state of its own; the current span, the local
/// endpoint, and the accumulated thread-processing time all live here.
/// Implementations must isolate concurrent requests from each other: one
/// logical instance per request, unless the caller deliberately propagates
/// state across execution contexts.
pub trait ServerSpanState: Send + Sync + fmt::Debug {
    /// Span currently installed for this request, if any.
    fn current_server_span(&self) -> Option<ServerSpan>;

    /// Install `span` as the current span, or clear it with `None`.
    fn set_current_server_span(&self, span: Option<ServerSpan>);

    /// Network identity to stamp on annotations, when known.
    fn endpoint(&self) -> Option<Endpoint>;

    /// Processing time accumulated for this request so far, in milliseconds.
    /// The tracer only ever reads this value.
    fn thread_duration_ms(&self) -> i64;
}

/// Explicit per-request [`ServerSpanState`].
///
/// The caller creates one per request and threads it through the handler,
/// which rules out span state leaking between requests. Sharing the same
/// instance across execution contexts is how deliberate propagation is
/// expressed.
#[derive(Debug, Default)]
pub struct RequestScopedState {
    span: Mutex<Option<ServerSpan>>,
    endpoint: Option<Endpoint>,
    thread_duration_ms: AtomicI64,
}

impl RequestScopedState {
    /// Create state for one request served from `endpoint`.
    pub fn new(endpoint: Option<Endpoint>) -> Self {
        RequestScopedState {
            span: Mutex::new(None),
            endpoint,
            thread_duration_ms: AtomicI64::new(0),
        }
    }

    /// Add `ms` to the processing time accumulated for this request.
    pub fn record_thread_duration(&self, ms: i64) {
        self.thread_duration_ms.fetch_add(ms, Ordering::Relaxed);
    }
}

impl ServerSpanState for RequestScopedState {
    fn current_server_span(&self) -> Option<ServerSpan> {
        self.span.lock().ok().and_then(|guard| guard.clone())
    }

    fn set_current_server_span(&self, span: Option<ServerSpan>) {
        if let Ok(mut guard) = self.span.lock() {
            *guard = span;
        }
    }

    fn endpoint(&self) -> Option<Endpoint> {
        self.endpoint.clone()
    }

    fn thread_duration_ms(&self) -> i64 {
        self.thread_duration_ms.load(Ordering::Relaxed)
    }
}
