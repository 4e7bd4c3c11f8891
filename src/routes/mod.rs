pub mod debug;
pub mod loops;
pub mod map;

use axum::{routing::{get, post}, Router};
use std::sync::Arc;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/loops", post(loops::create_loop).get(loops::list_loops))
        .route("/loops/geojson", get(loops::loops_geojson))
        .route("/loops/{id}", get(loops::get_loop))
        .route("/loops/{id}/navigation", get(loops::loop_navigation))
        .route("/map/click", post(map::map_click))
        .route("/debug/health", get(debug::health_check))
        .with_state(state)
}
