use crate::model::SpanRecord;
use std::fmt;
use std::sync::{Arc, Mutex};

/// Destination that receives finished spans for durable storage or
/// transport.
///
/// Collection is fire-and-forget from the tracer's point of view: no return
/// value is consumed, and buffering, delivery failures, and any retry policy
/// are the sink's own concern.
pub trait SpanCollector: Send + Sync + fmt::Debug {
    /// Take ownership of a finished span.
    fn collect(&self, span: SpanRecord);
}

/// A [`SpanCollector`] that stores finished spans in memory.
///
/// Useful for tests and debugging. Clones share the same storage, so a clone
/// handed to the tracer can be inspected through the original. Real
/// deployments forward spans to a transport-backed sink instead.
#[derive(Clone, Debug, Default)]
pub struct InMemorySpanCollector {
    spans: Arc<Mutex<Vec<SpanRecord>>>,
}

/// Builder for [`InMemorySpanCollector`].
#[derive(Clone, Debug, Default)]
pub struct InMemorySpanCollectorBuilder {}

impl InMemorySpanCollectorBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {}
    }

    /// Create a new [`InMemorySpanCollector`].
    pub fn build(&self) -> InMemorySpanCollector {
        InMemorySpanCollector::default()
    }
}

impl InMemorySpanCollector {
    /// Finished spans, in collection order.
    pub fn finished_spans(&self) -> Vec<SpanRecord> {
        self.spans
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Clear the stored spans.
    pub fn reset(&self) {
        let _ = self.spans.lock().map(|mut guard| guard.clear());
    }
}

impl SpanCollector for InMemorySpanCollector {
    fn collect(&self, span: SpanRecord) {
        if let Ok(mut guard) = self.spans.lock() {
            guard.push(span);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ServerSpan;

    fn test_record(id: u64) -> SpanRecord {
        ServerSpan::new_root(id, "op").record_snapshot().unwrap()
    }

    #[test]
    fn collects_in_order() {
        let collector = InMemorySpanCollectorBuilder::new().build();
        collector.collect(test_record(1));
        collector.collect(test_record(2));

        let spans = collector.finished_spans();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].trace_id, 1);
        assert_eq!(spans[1].trace_id, 2);
    }

    #[test]
    fn clones_share_storage() {
        let collector = InMemorySpanCollector::default();
        let clone = collector.clone();
        clone.collect(test_record(1));
        assert_eq!(collector.finished_spans().len(), 1);
    }

    #[test]
    fn reset_clears_storage() {
        let collector = InMemorySpanCollector::default();
        collector.collect(test_record(1));
        collector.reset();
        assert!(collector.finished_spans().is_empty());
    }
}
