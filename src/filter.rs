use std::fmt;

/// Decides whether a trace with the given span name is recorded.
///
/// Filters are evaluated in the order they were supplied to the
/// [`ServerTracer`](crate::ServerTracer). Evaluation stops at the first
/// filter returning `false`, so later filters can assume every earlier
/// filter already approved the name. Implementations are stateless
/// predicates; the tracer assumes no side effects.
pub trait TraceFilter: Send + Sync + fmt::Debug {
    /// Returns `true` if a trace for `name` should be recorded.
    fn trace(&self, name: &str) -> bool;
}

/// Built-in filters with a fixed decision.
///
/// For more involved strategies (rate limiting, name allow-lists) implement
/// [`TraceFilter`] directly.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum FixedTraceFilter {
    /// Record every trace.
    On,
    /// Record no trace.
    Off,
}

impl TraceFilter for FixedTraceFilter {
    fn trace(&self, _name: &str) -> bool {
        matches!(self, FixedTraceFilter::On)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_filter_decisions() {
        assert!(FixedTraceFilter::On.trace("any"));
        assert!(!FixedTraceFilter::Off.trace("any"));
    }
}
