//! Span builder helpers for request instrumentation.

/// Create the span a single inbound request is handled in.
///
/// Usage: `next.run(req).instrument(request_span!(correlation_id, method, path))`
///
/// Every event emitted while the span is entered carries `correlation_id`,
/// which is how log lines of one request are grouped. `status` is recorded
/// once the downstream handler has produced a response.
#[macro_export]
macro_rules! request_span {
    ($correlation_id:expr, $method:expr, $path:expr) => {
        tracing::info_span!(
            "request",
            correlation_id = %$correlation_id,
            method = %$method,
            path = %$path,
            status = tracing::field::Empty,
        )
    };
}
