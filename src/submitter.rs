use crate::model::{Annotation, AnnotationValue, BinaryAnnotation, Endpoint, SpanRecord};
use std::fmt;
use std::time::{Duration, SystemTime};

/// Attaches annotations to a span record on behalf of the tracer.
///
/// The tracer resolves the gate (a current span carrying a record) and the
/// endpoint before delegating here; implementations only decide how a
/// submission is represented on the record.
pub trait AnnotationSubmitter: Send + Sync + fmt::Debug {
    /// Attach an annotation stamped with the current time.
    fn submit_annotation(&self, record: &mut SpanRecord, endpoint: Option<&Endpoint>, value: &str);

    /// Attach an annotation covering the interval from `start_micros` to
    /// `end_micros`, both in microseconds since the Unix epoch.
    fn submit_timed_annotation(
        &self,
        record: &mut SpanRecord,
        endpoint: Option<&Endpoint>,
        value: &str,
        start_micros: u64,
        end_micros: u64,
    );

    /// Attach a key/value tag.
    fn submit_binary_annotation(
        &self,
        record: &mut SpanRecord,
        endpoint: Option<&Endpoint>,
        key: &str,
        value: AnnotationValue,
    );
}

/// Default [`AnnotationSubmitter`] stamping annotations with wall-clock
/// time.
#[derive(Clone, Debug, Default)]
pub struct SystemClockSubmitter {
    _private: (),
}

impl SystemClockSubmitter {
    /// Create a new system-clock submitter.
    pub fn new() -> Self {
        Self::default()
    }
}

fn epoch_micros(time: SystemTime) -> u64 {
    time.duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_secs(0))
        .as_micros() as u64
}

impl AnnotationSubmitter for SystemClockSubmitter {
    fn submit_annotation(&self, record: &mut SpanRecord, endpoint: Option<&Endpoint>, value: &str) {
        record.annotations.push(Annotation {
            timestamp: epoch_micros(SystemTime::now()),
            value: value.to_owned(),
            duration: None,
            endpoint: endpoint.cloned(),
        });
    }

    fn submit_timed_annotation(
        &self,
        record: &mut SpanRecord,
        endpoint: Option<&Endpoint>,
        value: &str,
        start_micros: u64,
        end_micros: u64,
    ) {
        record.annotations.push(Annotation {
            timestamp: start_micros,
            value: value.to_owned(),
            duration: Some(end_micros.saturating_sub(start_micros)),
            endpoint: endpoint.cloned(),
        });
    }

    fn submit_binary_annotation(
        &self,
        record: &mut SpanRecord,
        endpoint: Option<&Endpoint>,
        key: &str,
        value: AnnotationValue,
    ) {
        record.binary_annotations.push(BinaryAnnotation {
            key: key.to_owned(),
            value,
            endpoint: endpoint.cloned(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ServerSpan;

    fn test_endpoint() -> Endpoint {
        Endpoint::new("frontend".to_string(), None)
    }

    fn test_record() -> SpanRecord {
        ServerSpan::new_root(7, "op").record_snapshot().unwrap()
    }

    #[test]
    fn annotation_is_stamped_with_wall_clock_time() {
        let submitter = SystemClockSubmitter::new();
        let endpoint = test_endpoint();
        let mut record = test_record();

        submitter.submit_annotation(&mut record, Some(&endpoint), "sr");

        assert_eq!(record.annotations.len(), 1);
        let annotation = &record.annotations[0];
        assert_eq!(annotation.value, "sr");
        assert!(annotation.timestamp > 0);
        assert_eq!(annotation.duration, None);
        assert_eq!(annotation.endpoint.as_ref(), Some(&endpoint));
    }

    #[test]
    fn timed_annotation_covers_the_interval() {
        let submitter = SystemClockSubmitter::new();
        let mut record = test_record();

        submitter.submit_timed_annotation(&mut record, None, "query", 10_000, 10_250);

        let annotation = &record.annotations[0];
        assert_eq!(annotation.timestamp, 10_000);
        assert_eq!(annotation.duration, Some(250));
        assert_eq!(annotation.endpoint, None);
    }

    #[test]
    fn timed_annotation_saturates_on_inverted_interval() {
        let submitter = SystemClockSubmitter::new();
        let mut record = test_record();

        submitter.submit_timed_annotation(&mut record, None, "query", 10_000, 10);

        assert_eq!(record.annotations[0].duration, Some(0));
    }

    #[test]
    fn binary_annotation_is_appended_verbatim() {
        let submitter = SystemClockSubmitter::new();
        let endpoint = test_endpoint();
        let mut record = test_record();

        submitter.submit_binary_annotation(
            &mut record,
            Some(&endpoint),
            "thread.duration",
            AnnotationValue::from("13"),
        );

        assert_eq!(record.binary_annotations.len(), 1);
        let tag = &record.binary_annotations[0];
        assert_eq!(tag.key, "thread.duration");
        assert_eq!(tag.value, AnnotationValue::Str("13".to_owned()));
        assert_eq!(tag.endpoint.as_ref(), Some(&endpoint));
    }
}
