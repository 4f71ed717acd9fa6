//! Axum HTTP server: router, listener, graceful shutdown.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::middleware::from_fn_with_state;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::context::LogContext;
use crate::correlation::{CorrelationId, CORRELATION_ID_KEY};
use crate::middleware::{correlation_id, CorrelationSettings};

/// Build the application router with the correlation id middleware outermost,
/// so request tracing and handlers all run inside the correlated span.
pub fn router(settings: CorrelationSettings) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/correlation", get(handle_correlation))
        .layer(TraceLayer::new_for_http())
        .layer(from_fn_with_state(Arc::new(settings), correlation_id))
}

/// Build and run the HTTP server.
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let settings = config.correlation.settings()?;
    let listen_addr = config.server.listen_address.clone();

    let app = router(settings);

    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    tracing::info!(address = %listen_addr, "rac-correlation listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("rac-correlation shut down gracefully");
    Ok(())
}

/// GET /correlation — report the id bound in the request's logging context.
async fn handle_correlation(correlation_id: CorrelationId, log_context: LogContext) -> Response {
    tracing::debug!(correlation_id = %correlation_id, "Reporting bound correlation id");
    axum::Json(serde_json::json!({
        "correlation_id": log_context.get(CORRELATION_ID_KEY),
    }))
    .into_response()
}

/// Health check endpoint.
async fn handle_health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Wait for SIGINT (Ctrl+C) for graceful shutdown.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::correlation::{CORRELATION_ID_HEADER, CORRELATION_ID_HEADER_NAME};

    async fn get_json(app: Router, request: Request<Body>) -> (Response, serde_json::Value) {
        let response = app.oneshot(request).await.unwrap();
        let (parts, body) = response.into_parts();
        let bytes = body.collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap();
        (Response::from_parts(parts, Body::empty()), value)
    }

    #[tokio::test]
    async fn test_health() {
        let app = router(CorrelationSettings::default());
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_correlation_route_reports_supplied_id() {
        let app = router(CorrelationSettings {
            echo_response_header: true,
            ..CorrelationSettings::default()
        });
        let request = Request::builder()
            .uri("/correlation")
            .header(CORRELATION_ID_HEADER, "abc-123")
            .body(Body::empty())
            .unwrap();

        let (response, body) = get_json(app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body["correlation_id"], "abc-123");
        assert_eq!(
            response.headers().get(&CORRELATION_ID_HEADER_NAME).unwrap(),
            "abc-123"
        );
    }

    #[tokio::test]
    async fn test_correlation_route_reports_generated_id() {
        let app = router(CorrelationSettings::default());
        let request = Request::builder()
            .uri("/correlation")
            .body(Body::empty())
            .unwrap();

        let (_, body) = get_json(app, request).await;

        let id = body["correlation_id"].as_str().unwrap();
        assert!(uuid::Uuid::parse_str(id).is_ok());
    }
}
