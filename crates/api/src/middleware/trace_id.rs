//! Request tracing middleware.
//!
//! Tags every request with an `X-Request-ID` and runs it inside a span.

use axum::{
    body::Body,
    http::{header::HeaderName, Extensions, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

/// Header name for request ID.
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Request ID stored in request extensions.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// The `request` span opened by [`trace_id`], stored in request extensions.
/// Spans opened by inner layers do not declare `user_id`.
#[derive(Debug, Clone)]
pub struct RequestSpan(pub tracing::Span);

impl RequestSpan {
    /// Records the authenticated caller on the request span.
    pub fn record_user(&self, user_id: Uuid) {
        self.0.record("user_id", tracing::field::display(user_id));
    }
}

/// Middleware that reuses the caller's `X-Request-ID` or generates one, stores
/// it in extensions, echoes it on the response and opens the request span.
/// Authentication fills the span's `user_id` once the caller is known.
pub async fn trace_id(mut req: Request<Body>, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %req.method(),
        path = %req.uri().path(),
        user_id = tracing::field::Empty,
    );

    req.extensions_mut().insert(RequestId(request_id.clone()));
    req.extensions_mut().insert(RequestSpan(span.clone()));

    let start = std::time::Instant::now();
    let mut response = next.run(req).instrument(span.clone()).await;

    let _entered = span.enter();
    let duration_ms = start.elapsed().as_millis();
    let status = response.status().as_u16();

    tracing::info!(
        request_id = %request_id,
        status = status,
        duration_ms = duration_ms,
        "Request completed"
    );

    if let Ok(header_value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static("x-request-id"), header_value);
    }

    response
}

/// Request ID from extensions, or `"unknown"` outside the middleware.
pub fn get_request_id(extensions: &Extensions) -> String {
    extensions
        .get::<RequestId>()
        .map(|r| r.0.clone())
        .unwrap_or_else(|| "unknown".to_string())
}
