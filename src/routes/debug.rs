use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

/// GET /debug/health - Report history size and geocode cache state
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let mut status = json!({
        "status": "ok",
        "checks": {
            "history_size": state.history.len().await,
        }
    });

    if let Some(ref cache) = state.geocode_cache {
        status["checks"]["geocode_cache"] = json!(cache.stats());
    }

    Json(status)
}
