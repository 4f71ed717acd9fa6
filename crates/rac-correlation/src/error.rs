//! Error type for configuration and extraction failures.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors raised outside the request hot path.
///
/// The middleware itself never fails a request: downstream errors pass
/// through untouched. These cover loading settings and handlers asking for
/// request data the middleware was not installed to provide.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid correlation log level `{0}`, expected one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("failed to load configuration: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("{0} missing from request extensions; is the correlation id middleware installed?")]
    MissingExtension(&'static str),
}

impl From<figment::Error> for Error {
    fn from(e: figment::Error) -> Self {
        Error::Config(Box::new(e))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Rejecting request");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
