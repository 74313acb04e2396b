use std::time::Instant;

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use tracing::Instrument;

use rolegate_observability::request::{new_request_id, request_span, REQUEST_ID_HEADER};

/// Wrap each request in a span keyed by a fresh request id, log its outcome
/// and echo the id back in `x-request-id`.
pub async fn request_logging(req: Request, next: Next) -> Response {
    let request_id = new_request_id();
    let span = request_span(request_id, req.method().as_str(), req.uri().path());
    let started = Instant::now();

    let mut response = next.run(req).instrument(span.clone()).await;

    let status = response.status();
    let latency_ms = started.elapsed().as_millis() as u64;
    span.in_scope(|| {
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), latency_ms, "request failed");
        } else {
            tracing::info!(status = status.as_u16(), latency_ms, "request completed");
        }
    });

    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
