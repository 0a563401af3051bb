use axum::extract::State;
use axum::response::{IntoResponse, Json, Response};
use std::sync::Arc;
use std::time::Instant;

use super::state::AppState;

// ─── GET /api/news ───────────────────────────────────────────────

/// Live dataset, or the fallback set while nothing has been resolved.
/// Always 200.
pub async fn news(State(state): State<Arc<AppState>>) -> Response {
    let start = Instant::now();
    let snapshot = state.store.snapshot();

    let (items, source) = if snapshot.is_empty() {
        (state.fallback.as_slice(), "fallback")
    } else {
        (snapshot.as_slice(), "live")
    };

    let response = Json(items).into_response();

    tracing::info!(
        source,
        items = items.len(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "GET /api/news"
    );

    response
}
