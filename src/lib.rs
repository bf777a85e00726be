//! # Zipkin Server Tracer
//!
//! Server-side span lifecycle for Zipkin-style distributed tracing. For each
//! inbound request the [`ServerTracer`] decides whether the request's trace
//! is sampled, establishes or adopts a trace identity, gates every
//! instrumentation call on that decision, and hands the completed span to a
//! [`SpanCollector`] exactly once.
//!
//! Wire encoding of spans, transport to the collection backend, and parsing
//! of propagated trace headers are out of scope: they live behind the
//! [`SpanCollector`] and caller boundaries and are supplied by the embedding
//! application.
//!
//! ## Request lifecycle
//!
//! A request arrival triggers exactly one state-establishing call:
//!
//! * [`ServerTracer::set_state_current_trace`] adopts identity propagated by
//!   the caller,
//! * [`ServerTracer::set_state_unknown`] runs the [`TraceFilter`] chain and
//!   roots a new trace when every filter approves, or
//! * [`ServerTracer::set_state_no_tracing`] forces tracing off.
//!
//! Zero or more gated annotation calls follow, and exactly one terminating
//! [`ServerTracer::set_server_send`] reads the accumulated state, reports
//! thread time when present, collects the span, and clears the request
//! state.
//!
//! ## Quickstart
//!
//! ```
//! use std::sync::Arc;
//! use zipkin_server_tracer::{
//!     Endpoint, InMemorySpanCollector, RandomIdGenerator, RequestScopedState,
//!     ServerTracer, SystemClockSubmitter,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let state = Arc::new(RequestScopedState::new(Some(Endpoint::new(
//!     "frontend".to_string(),
//!     None,
//! ))));
//! let collector = InMemorySpanCollector::default();
//!
//! let tracer = ServerTracer::builder()
//!     .with_state(state.clone())
//!     .with_collector(collector.clone())
//!     .with_trace_filters(Vec::new())
//!     .with_id_generator(RandomIdGenerator::default())
//!     .with_annotation_submitter(SystemClockSubmitter::new())
//!     .build()?;
//!
//! tracer.set_state_unknown("get /orders");
//! tracer.set_server_received();
//! // ... handle the request ...
//! tracer.set_server_send();
//!
//! assert_eq!(collector.finished_spans().len(), 1);
//! # Ok(())
//! # }
//! ```
#![warn(
    future_incompatible,
    missing_debug_implementations,
    missing_docs,
    nonstandard_style,
    rust_2018_idioms,
    unreachable_pub,
    unused
)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[macro_use]
extern crate typed_builder;

pub mod conventions;

mod collector;
mod error;
mod filter;
mod id_generator;
mod model;
mod state;
mod submitter;
mod tracer;

pub use collector::{InMemorySpanCollector, InMemorySpanCollectorBuilder, SpanCollector};
pub use error::ConfigurationError;
pub use filter::{FixedTraceFilter, TraceFilter};
#[cfg(any(test, feature = "testing"))]
#[cfg_attr(docsrs, doc(cfg(feature = "testing")))]
pub use id_generator::IncrementIdGenerator;
pub use id_generator::{IdGenerator, RandomIdGenerator};
pub use model::{
    Annotation, AnnotationValue, BinaryAnnotation, Endpoint, ServerSpan, SpanIdentity, SpanRecord,
};
pub use state::{RequestScopedState, ServerSpanState};
pub use submitter::{AnnotationSubmitter, SystemClockSubmitter};
pub use tracer::{ServerTracer, ServerTracerBuilder};
