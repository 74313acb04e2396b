//! Tracing and request correlation shared by the binary and its tests.

/// Initialize process-wide structured logging.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::DEFAULT_DIRECTIVE);
}

/// Tracing configuration (filters, layers).
pub mod tracing;

/// Per-request correlation ids and spans.
pub mod request;
