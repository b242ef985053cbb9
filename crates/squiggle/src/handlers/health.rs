//! Liveness probe.

/// GET /api/health - Basic liveness probe.
///
/// Returns 200 with a fixed acknowledgement. Does not touch the store.
pub async fn health() -> &'static str {
    "OK"
}
