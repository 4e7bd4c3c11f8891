use crate::error::{AppError, Result};
use crate::models::loop_record::{
    HistoryQuery, HistoryResponse, LoopDisplay, LoopRequest, LoopResponse, NavigationResponse,
};
use crate::models::{loops_feature_collection, Loop};
use crate::services::navigation::export_stops;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use geojson::FeatureCollection;
use std::sync::Arc;
use uuid::Uuid;

fn loop_response(state: &AppState, record: Loop) -> LoopResponse {
    LoopResponse {
        display: LoopDisplay {
            target: record.target_label(),
            distance: record.distance_label(),
            duration: record.duration_label(),
        },
        bounds: record.bounds(),
        navigation_url: state.navigation.deep_link(&record),
        record,
    }
}

/// POST /loops
/// Generate a loop from an address and a distance or duration target
pub async fn create_loop(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoopRequest>,
) -> Result<(StatusCode, Json<LoopResponse>)> {
    tracing::info!(
        address = %request.address,
        value = request.value,
        unit = %request.unit,
        "Loop request: '{}', {} {}",
        request.address,
        request.value,
        request.unit
    );

    let record = state.loop_generator.generate(&request).await?;

    Ok((StatusCode::CREATED, Json(loop_response(&state, record))))
}

/// GET /loops?limit=N
/// Most recent loops, oldest first
pub async fn list_loops(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>> {
    let limit = query.limit.unwrap_or(state.visible_loops);
    let recent = state.history.recent(limit).await;

    Ok(Json(HistoryResponse {
        loops: recent
            .into_iter()
            .map(|record| loop_response(&state, record))
            .collect(),
        total: state.history.len().await,
    }))
}

/// GET /loops/geojson?limit=N
pub async fn loops_geojson(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> Json<FeatureCollection> {
    let limit = query.limit.unwrap_or(state.visible_loops);
    let recent = state.history.recent(limit).await;
    Json(loops_feature_collection(&recent))
}

/// GET /loops/{id}
pub async fn get_loop(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<LoopResponse>> {
    let record = state
        .history
        .get(id)
        .await
        .ok_or(AppError::LoopNotFound(id))?;

    Ok(Json(loop_response(&state, record)))
}

/// GET /loops/{id}/navigation
pub async fn loop_navigation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<NavigationResponse>> {
    let record = state
        .history
        .get(id)
        .await
        .ok_or(AppError::LoopNotFound(id))?;

    Ok(Json(NavigationResponse {
        url: state.navigation.deep_link(&record),
        stops: export_stops(&record.path),
    }))
}
