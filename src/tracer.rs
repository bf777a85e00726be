use crate::collector::SpanCollector;
use crate::conventions;
use crate::error::ConfigurationError;
use crate::filter::TraceFilter;
use crate::id_generator::IdGenerator;
use crate::model::{AnnotationValue, Endpoint, ServerSpan, SpanRecord};
use crate::state::ServerSpanState;
use crate::submitter::AnnotationSubmitter;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Orchestrates the server-side span lifecycle for inbound requests.
///
/// The tracer composes five injected collaborators — span state, collector,
/// trace filters, id generator, and annotation submitter — into the request
/// lifecycle: one state-establishing call on arrival
/// ([`set_state_current_trace`](Self::set_state_current_trace),
/// [`set_state_unknown`](Self::set_state_unknown), or
/// [`set_state_no_tracing`](Self::set_state_no_tracing)), any number of
/// gated annotation calls while the request is handled, and one terminating
/// [`set_server_send`](Self::set_server_send).
///
/// The tracer holds no mutable state of its own; everything per-request
/// lives in the [`ServerSpanState`]. Cloning a tracer is cheap and yields a
/// handle to the same collaborators.
///
/// Annotation calls are gated on the sampling decision: when the current
/// span is absent or not sampled they return without touching any other
/// collaborator. Collaborator failures are not caught or translated here;
/// they surface unchanged to the caller.
#[derive(Clone, Debug)]
pub struct ServerTracer {
    inner: Arc<ServerTracerInner>,
}

struct ServerTracerInner {
    state: Arc<dyn ServerSpanState>,
    collector: Box<dyn SpanCollector>,
    filters: Vec<Box<dyn TraceFilter>>,
    id_generator: Box<dyn IdGenerator>,
    submitter: Box<dyn AnnotationSubmitter>,
}

impl fmt::Debug for ServerTracerInner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerTracer")
            .field("trace_filters", &self.filters.len())
            .finish()
    }
}

impl ServerTracer {
    /// Create a new [`ServerTracerBuilder`].
    pub fn builder() -> ServerTracerBuilder {
        ServerTracerBuilder::default()
    }

    /// Decide via the filter chain whether this request roots a new trace.
    ///
    /// Filters run strictly in the order supplied; the first `false` ends
    /// evaluation and installs a non-sampled span without drawing an id. If
    /// every filter approves, a single drawn identifier serves as both the
    /// trace and span id of the new root span. The resulting span becomes
    /// the current span.
    pub fn set_state_unknown(&self, name: &str) {
        for filter in &self.inner.filters {
            if !filter.trace(name) {
                self.inner
                    .state
                    .set_current_server_span(Some(ServerSpan::not_sampled()));
                return;
            }
        }
        let id = self.inner.id_generator.next_id();
        self.inner
            .state
            .set_current_server_span(Some(ServerSpan::new_root(id, name)));
    }

    /// Adopt trace identity propagated by the caller.
    ///
    /// The span is always sampled and is built from exactly the supplied
    /// identifiers; neither the filter chain nor the id generator is
    /// consulted. Whatever span was previously current is overwritten.
    pub fn set_state_current_trace(
        &self,
        trace_id: u64,
        span_id: u64,
        parent_span_id: Option<u64>,
        name: &str,
    ) {
        let span = ServerSpan::from_identity(trace_id, span_id, parent_span_id, name);
        self.inner.state.set_current_server_span(Some(span));
    }

    /// Force tracing off for this request, regardless of filters.
    pub fn set_state_no_tracing(&self) {
        self.inner
            .state
            .set_current_server_span(Some(ServerSpan::not_sampled()));
    }

    /// Clear the current span without collecting it.
    pub fn clear_current_span(&self) {
        self.inner.state.set_current_server_span(None);
    }

    /// Attach an annotation stamped with the current time to the current
    /// span. Gated: a no-op when the current span is absent or not sampled.
    pub fn submit_annotation(&self, value: &str) {
        self.with_current_record(|submitter, record, endpoint| {
            submitter.submit_annotation(record, endpoint, value);
        });
    }

    /// Attach an annotation covering the interval from `start_micros` to
    /// `end_micros` (microseconds since the Unix epoch) to the current span.
    /// Gated: a no-op when the current span is absent or not sampled.
    pub fn submit_timed_annotation(&self, value: &str, start_micros: u64, end_micros: u64) {
        self.with_current_record(|submitter, record, endpoint| {
            submitter.submit_timed_annotation(record, endpoint, value, start_micros, end_micros);
        });
    }

    /// Attach a key/value tag to the current span. Gated: a no-op when the
    /// current span is absent or not sampled.
    pub fn submit_binary_annotation(&self, key: &str, value: impl Into<AnnotationValue>) {
        let value = value.into();
        self.with_current_record(|submitter, record, endpoint| {
            submitter.submit_binary_annotation(record, endpoint, key, value);
        });
    }

    /// Mark the instant this server received the request.
    /// Gated: a no-op when the current span is absent or not sampled.
    pub fn set_server_received(&self) {
        self.submit_annotation(conventions::SERVER_RECV);
    }

    /// Mark the response as sent and finish the span.
    ///
    /// Gated like every annotation call. On a sampled span this runs, in
    /// order: the "server sent" annotation, a thread-duration tag when the
    /// accumulated duration is strictly positive (stamped with a freshly
    /// re-read endpoint), exactly one hand-off to the collector, and always
    /// last, clearing the current span.
    pub fn set_server_send(&self) {
        let Some(span) = self.inner.state.current_server_span() else {
            return;
        };
        if !span.is_recording() {
            return;
        }

        let endpoint = self.inner.state.endpoint();
        span.with_record(|record| {
            self.inner.submitter.submit_annotation(
                record,
                endpoint.as_ref(),
                conventions::SERVER_SEND,
            );
        });

        let duration_ms = self.inner.state.thread_duration_ms();
        if duration_ms > 0 {
            // Re-read rather than reused from the send annotation above.
            let endpoint = self.inner.state.endpoint();
            span.with_record(|record| {
                self.inner.submitter.submit_binary_annotation(
                    record,
                    endpoint.as_ref(),
                    conventions::THREAD_DURATION,
                    AnnotationValue::from(duration_ms.to_string()),
                );
            });
        }

        if let Some(record) = span.record_snapshot() {
            debug!(
                name: "ServerTracer.Collect",
                trace_id = record.trace_id,
                span_id = record.span_id
            );
            self.inner.collector.collect(record);
        }

        self.inner.state.set_current_server_span(None);
    }

    /// Processing time accumulated for this request so far, in milliseconds.
    ///
    /// A plain passthrough read of the span state; valid whether or not a
    /// current span is installed.
    pub fn thread_duration_ms(&self) -> i64 {
        self.inner.state.thread_duration_ms()
    }

    /// Shared gate for annotation calls: read the current span exactly once,
    /// skip everything when it is absent or carries no record, otherwise
    /// resolve the endpoint and run `f`.
    fn with_current_record(
        &self,
        f: impl FnOnce(&dyn AnnotationSubmitter, &mut SpanRecord, Option<&Endpoint>),
    ) {
        let Some(span) = self.inner.state.current_server_span() else {
            return;
        };
        if !span.is_recording() {
            return;
        }
        let endpoint = self.inner.state.endpoint();
        span.with_record(|record| f(self.inner.submitter.as_ref(), record, endpoint.as_ref()));
    }
}

/// Builder for [`ServerTracer`].
///
/// All five collaborators are mandatory; [`build`](Self::build) reports the
/// first missing one as a [`ConfigurationError`] rather than deferring the
/// failure to the first request.
#[derive(Debug, Default)]
pub struct ServerTracerBuilder {
    state: Option<Arc<dyn ServerSpanState>>,
    collector: Option<Box<dyn SpanCollector>>,
    filters: Option<Vec<Box<dyn TraceFilter>>>,
    id_generator: Option<Box<dyn IdGenerator>>,
    submitter: Option<Box<dyn AnnotationSubmitter>>,
}

impl ServerTracerBuilder {
    /// Assign the per-request span state.
    ///
    /// The caller usually keeps a handle to the same state to accumulate
    /// thread-processing time, hence the shared pointer.
    pub fn with_state(mut self, state: Arc<dyn ServerSpanState>) -> Self {
        self.state = Some(state);
        self
    }

    /// Assign the sink that receives finished spans.
    pub fn with_collector<C: SpanCollector + 'static>(mut self, collector: C) -> Self {
        self.collector = Some(Box::new(collector));
        self
    }

    /// Assign the ordered trace filter list. An empty list is valid and
    /// samples every trace.
    pub fn with_trace_filters(mut self, filters: Vec<Box<dyn TraceFilter>>) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Append one trace filter, after any filters already assigned.
    pub fn with_trace_filter<F: TraceFilter + 'static>(mut self, filter: F) -> Self {
        self.filters
            .get_or_insert_with(Vec::new)
            .push(Box::new(filter));
        self
    }

    /// Assign the identifier source for new root spans.
    pub fn with_id_generator<G: IdGenerator + 'static>(mut self, id_generator: G) -> Self {
        self.id_generator = Some(Box::new(id_generator));
        self
    }

    /// Assign the annotation submitter.
    pub fn with_annotation_submitter<S: AnnotationSubmitter + 'static>(
        mut self,
        submitter: S,
    ) -> Self {
        self.submitter = Some(Box::new(submitter));
        self
    }

    /// Assemble the tracer, failing on the first missing collaborator.
    pub fn build(self) -> Result<ServerTracer, ConfigurationError> {
        let state = self.state.ok_or(ConfigurationError::MissingState)?;
        let collector = self.collector.ok_or(ConfigurationError::MissingCollector)?;
        let filters = self.filters.ok_or(ConfigurationError::MissingTraceFilters)?;
        let id_generator = self
            .id_generator
            .ok_or(ConfigurationError::MissingIdGenerator)?;
        let submitter = self
            .submitter
            .ok_or(ConfigurationError::MissingAnnotationSubmitter)?;

        debug!(name: "ServerTracer.Build", trace_filters = filters.len() as u64);

        Ok(ServerTracer {
            inner: Arc::new(ServerTracerInner {
                state,
                collector,
                filters,
                id_generator,
                submitter,
            }),
        })
    }
}
