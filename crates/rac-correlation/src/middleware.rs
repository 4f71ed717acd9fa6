//! Correlation id middleware.
//!
//! For every inbound request:
//!
//! 1. Read the `RacCorrelationId` header and log what was observed
//! 2. Adopt it, or generate a UUID v4 when it is absent or blank
//! 3. Bind the id into the request's [`LogContext`]
//! 4. Run the rest of the chain inside a `request` span carrying the id
//! 5. Log and remove the binding, whatever way the downstream future ends
//!
//! Install with `axum::middleware::from_fn_with_state`:
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/", get(handler))
//!     .layer(from_fn_with_state(Arc::new(CorrelationSettings::default()), correlation_id));
//! ```

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::{Instrument, Level, Span};

use crate::context::LogContext;
use crate::correlation::{
    self, CorrelationId, CORRELATION_ID_HEADER, CORRELATION_ID_HEADER_NAME, CORRELATION_ID_KEY,
};

/// Emit an event at a level picked at runtime.
macro_rules! diagnostic {
    ($level:expr, $($arg:tt)+) => {
        match $level {
            Level::TRACE => tracing::trace!($($arg)+),
            Level::DEBUG => tracing::debug!($($arg)+),
            Level::INFO => tracing::info!($($arg)+),
            Level::WARN => tracing::warn!($($arg)+),
            _ => tracing::error!($($arg)+),
        }
    };
}

/// Runtime settings of the middleware.
#[derive(Debug, Clone)]
pub struct CorrelationSettings {
    /// Level of the per-request diagnostic lines (observed, created, removed).
    pub log_level: Level,
    /// Copy the id into the `RacCorrelationId` response header.
    pub echo_response_header: bool,
}

impl Default for CorrelationSettings {
    fn default() -> Self {
        Self {
            log_level: Level::INFO,
            echo_response_header: false,
        }
    }
}

/// Marks a request the middleware has already handled.
#[derive(Debug, Clone, Copy)]
struct CorrelationApplied;

/// Holds the correlation id binding for the lifetime of one request.
///
/// Dropping it logs and removes the binding, so cleanup also happens on
/// panics and when the request future is cancelled.
struct Binding {
    context: LogContext,
    level: Level,
    span: Span,
}

impl Binding {
    fn bind(context: LogContext, correlation_id: &CorrelationId, level: Level, span: Span) -> Self {
        context.put(CORRELATION_ID_KEY, correlation_id.as_str());
        Self {
            context,
            level,
            span,
        }
    }
}

impl Drop for Binding {
    fn drop(&mut self) {
        let _entered = self.span.enter();
        let bound = self.context.get(CORRELATION_ID_KEY);
        diagnostic!(self.level, correlation_id = ?bound, "Removing correlation id");
        self.context.remove(CORRELATION_ID_KEY);
    }
}

/// Tag the request with a correlation id and scope it into the logging
/// context while the rest of the chain runs.
///
/// Runs at most once per request: a request that already went through this
/// middleware (nested routers, repeated layers) is passed straight through
/// with its existing id. Downstream responses, including error responses,
/// are returned unchanged apart from the optional echo header.
pub async fn correlation_id(
    State(settings): State<Arc<CorrelationSettings>>,
    mut request: Request,
    next: Next,
) -> Response {
    if request.extensions().get::<CorrelationApplied>().is_some() {
        return next.run(request).await;
    }

    let level = settings.log_level;
    let correlation_id = {
        let observed = correlation::header_value(request.headers());
        diagnostic!(
            level,
            header = CORRELATION_ID_HEADER,
            value = ?observed,
            "Observed correlation id header"
        );

        match observed.as_deref().and_then(CorrelationId::adopt) {
            Some(id) => id,
            None => {
                let id = CorrelationId::generate();
                diagnostic!(level, correlation_id = %id, "Correlation id created");
                id
            }
        }
    };

    // Reuse a context an outer layer already attached so its other keys survive.
    let log_context = request
        .extensions()
        .get::<LogContext>()
        .cloned()
        .unwrap_or_default();

    let span = rac_tracing::request_span!(correlation_id, request.method(), request.uri().path());
    let binding = Binding::bind(log_context.clone(), &correlation_id, level, span.clone());

    let extensions = request.extensions_mut();
    extensions.insert(CorrelationApplied);
    extensions.insert(correlation_id.clone());
    extensions.insert(log_context.clone());

    let mut response = log_context
        .scope(next.run(request))
        .instrument(span.clone())
        .await;

    span.record("status", response.status().as_u16());

    if settings.echo_response_header
        && !response.headers().contains_key(&CORRELATION_ID_HEADER_NAME)
    {
        if let Some(value) = correlation_id.to_header_value() {
            response.headers_mut().insert(CORRELATION_ID_HEADER_NAME, value);
        }
    }

    drop(binding);
    response
}
