use thiserror::Error;

/// Errors raised while assembling a [`ServerTracer`](crate::ServerTracer).
///
/// Every collaborator is mandatory. A missing one fails construction
/// immediately with the variant naming it, rather than deferring the failure
/// to the first request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// No server span state was supplied.
    #[error("server span state is required")]
    MissingState,

    /// No span collector was supplied.
    #[error("span collector is required")]
    MissingCollector,

    /// No trace filter list was supplied.
    #[error("trace filters are required")]
    MissingTraceFilters,

    /// No id generator was supplied.
    #[error("id generator is required")]
    MissingIdGenerator,

    /// No annotation submitter was supplied.
    #[error("annotation submitter is required")]
    MissingAnnotationSubmitter,
}
