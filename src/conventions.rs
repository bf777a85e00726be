//! Well-known annotation values and tag keys.
//!
//! These are the Zipkin core constants the server lifecycle emits; backends
//! key timeline rendering and dependency analysis off these exact strings.

/// Annotation value marking the instant a server received a request.
pub const SERVER_RECV: &str = "sr";

/// Annotation value marking the instant a server sent its response.
pub const SERVER_SEND: &str = "ss";

/// Tag key under which accumulated thread processing time is reported, in
/// milliseconds rendered as a decimal string.
pub const THREAD_DURATION: &str = "thread.duration";
