//! Axum extractors for the values the middleware attaches to a request.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::context::LogContext;
use crate::correlation::CorrelationId;
use crate::error::Error;

impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CorrelationId>()
            .cloned()
            .ok_or(Error::MissingExtension("CorrelationId"))
    }
}

impl<S> FromRequestParts<S> for LogContext
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<LogContext>()
            .cloned()
            .ok_or(Error::MissingExtension("LogContext"))
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn test_extractors_reject_without_middleware() {
        let app = Router::new()
            .route("/id", get(|id: CorrelationId| async move { id.into_inner() }))
            .route("/ctx", get(|ctx: LogContext| async move { ctx.len().to_string() }));

        for uri in ["/id", "/ctx"] {
            let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[tokio::test]
    async fn test_extractors_read_request_extensions() {
        let app = Router::new().route(
            "/",
            get(|id: CorrelationId, ctx: LogContext| async move {
                format!("{id}:{}", ctx.get("k").unwrap_or_default())
            }),
        );

        let ctx = LogContext::new();
        ctx.put("k", "v");
        let mut request = Request::builder().uri("/").body(Body::empty()).unwrap();
        request
            .extensions_mut()
            .insert(CorrelationId::adopt("abc-123").unwrap());
        request.extensions_mut().insert(ctx);

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"abc-123:v");
    }
}
