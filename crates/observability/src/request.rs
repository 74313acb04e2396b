use tracing::Span;
use uuid::Uuid;

/// Header carrying the correlation id back to the client.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Fresh, time-ordered correlation id.
pub fn new_request_id() -> Uuid {
    Uuid::now_v7()
}

/// Span wrapping one HTTP request; every event logged while handling the
/// request carries these fields.
pub fn request_span(request_id: Uuid, method: &str, path: &str) -> Span {
    tracing::info_span!("request", %request_id, method, path)
}
