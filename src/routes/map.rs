use crate::error::{AppError, Result};
use crate::models::loop_record::{MapClickRequest, MapClickResponse};
use crate::models::Coordinates;
use crate::services::geocoding::reverse_label;
use crate::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;

/// POST /map/click
/// Label a clicked point so it can be used as a loop start
pub async fn map_click(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MapClickRequest>,
) -> Result<Json<MapClickResponse>> {
    let coords = Coordinates::new(request.lat, request.lng).map_err(AppError::InvalidRequest)?;

    let label = reverse_label(state.geocoder.as_ref(), coords).await;
    tracing::debug!(lat = coords.lat, lng = coords.lng, "Map click labeled '{}'", label);

    Ok(Json(MapClickResponse {
        lat: coords.lat,
        lng: coords.lng,
        label,
    }))
}
