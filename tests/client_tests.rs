//! Geocoding and routing clients against a local stand-in server
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use easyloop::config::RetryPolicy;
use easyloop::error::AppError;
use easyloop::models::{Coordinates, LoopAnchors};
use easyloop::services::geocoding::{reverse_label, Geocoder, NominatimClient};
use easyloop::services::routing::{materialize, OsrmClient, RoutingService};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};

const USER_AGENT: &str = "easyloop-tests/1.0";

#[derive(Default)]
struct ServerState {
    route_calls: AtomicUsize,
}

async fn search(
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    if headers.get("user-agent").and_then(|v| v.to_str().ok()) != Some(USER_AGENT) {
        return (StatusCode::FORBIDDEN, Json(json!([])));
    }
    assert_eq!(params.get("format").map(String::as_str), Some("jsonv2"));

    match params.get("q").map(String::as_str) {
        Some("Paris") => (
            StatusCode::OK,
            Json(json!([{
                "lat": "48.8588897",
                "lon": "2.3200410",
                "display_name": "Paris, Île-de-France, France"
            }])),
        ),
        Some("broken") => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!([]))),
        _ => (StatusCode::OK, Json(json!([]))),
    }
}

async fn reverse(Query(params): Query<HashMap<String, String>>) -> Json<serde_json::Value> {
    if params.get("lat").map(String::as_str) == Some("48.8606") {
        Json(json!({"display_name": "Louvre Museum, Paris"}))
    } else {
        Json(json!({"error": "Unable to geocode"}))
    }
}

fn osrm_ok(coordinates: &str) -> serde_json::Value {
    let points: Vec<[f64; 2]> = coordinates
        .split(';')
        .map(|pair| {
            let (lng, lat) = pair.split_once(',').unwrap();
            [lng.parse().unwrap(), lat.parse().unwrap()]
        })
        .collect();

    json!({
        "code": "Ok",
        "routes": [{
            "distance": 5236.4,
            "duration": 3900.0,
            "geometry": {"type": "LineString", "coordinates": points}
        }]
    })
}

async fn route(
    State(state): State<Arc<ServerState>>,
    Path(coordinates): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let call = state.route_calls.fetch_add(1, Ordering::SeqCst);
    assert_eq!(params.get("geometries").map(String::as_str), Some("geojson"));
    assert_eq!(params.get("overview").map(String::as_str), Some("full"));

    // Far-point latitudes 10, 20, 30 and 40 select the error cases below
    if coordinates.contains(",10") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"code": "NoRoute", "message": "Impossible route between points"})),
        );
    }
    if coordinates.contains(",20") && call == 0 {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"code": "Busy"})),
        );
    }
    if coordinates.contains(",40") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"code": "InvalidQuery", "message": "Query string malformed"})),
        );
    }
    if coordinates.contains(",30") {
        return (StatusCode::OK, Json(json!({"code": "Ok", "routes": []})));
    }

    (StatusCode::OK, Json(osrm_ok(&coordinates)))
}

async fn spawn_server() -> (String, Arc<ServerState>) {
    let state = Arc::new(ServerState::default());
    let app = Router::new()
        .route("/search", get(search))
        .route("/reverse", get(reverse))
        .route("/route/v1/foot/{coordinates}", get(route))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), state)
}

fn fast_retry(max_retries: usize) -> RetryPolicy {
    RetryPolicy {
        max_retries,
        base_backoff: Duration::from_millis(10),
        timeout: Duration::from_secs(5),
    }
}

fn geocoder(base: &str) -> NominatimClient {
    NominatimClient::with_config(base.to_string(), USER_AGENT.to_string(), fast_retry(0))
}

fn router(base: &str, max_retries: usize) -> OsrmClient {
    OsrmClient::with_config(
        format!("{}/route/v1", base),
        USER_AGENT.to_string(),
        fast_retry(max_retries),
    )
}

fn anchors(far_lat: f64) -> LoopAnchors {
    LoopAnchors::there_and_back(
        Coordinates::new(0.0, 0.0).unwrap(),
        Coordinates::new(far_lat, 0.5).unwrap(),
    )
}

#[tokio::test]
async fn test_nominatim_resolves_first_match() {
    let (base, _) = spawn_server().await;

    let coords = assert_ok!(geocoder(&base).resolve("Paris").await);
    assert!((coords.lat - 48.8588897).abs() < 1e-9);
    assert!((coords.lng - 2.3200410).abs() < 1e-9);
}

#[tokio::test]
async fn test_nominatim_no_match_is_address_not_found() {
    let (base, _) = spawn_server().await;

    let error = assert_err!(geocoder(&base).resolve("Nowhere at all").await);
    assert!(matches!(error, AppError::AddressNotFound(ref a) if a == "Nowhere at all"));
}

#[tokio::test]
async fn test_nominatim_server_error_is_geocoding_api_error() {
    let (base, _) = spawn_server().await;

    let error = assert_err!(geocoder(&base).resolve("broken").await);
    assert!(matches!(error, AppError::GeocodingApi(_)));
}

#[tokio::test]
async fn test_nominatim_unreachable_is_geocoding_api_error() {
    // Nothing listens on port 9 locally
    let client = geocoder("http://127.0.0.1:9");
    let error = assert_err!(client.resolve("Paris").await);
    assert!(matches!(error, AppError::GeocodingApi(_)));
}

#[tokio::test]
async fn test_nominatim_reverse_label() {
    let (base, _) = spawn_server().await;
    let client = geocoder(&base);

    let louvre = Coordinates::new(48.8606, 2.3376).unwrap();
    assert_eq!(reverse_label(&client, louvre).await, "Louvre Museum, Paris");

    let sea = Coordinates::new(40.0, -30.0).unwrap();
    assert_eq!(assert_ok!(client.reverse(sea).await), None);
    assert_eq!(reverse_label(&client, sea).await, "40.0000, -30.0000");
}

#[tokio::test]
async fn test_osrm_route_materializes() {
    let (base, _) = spawn_server().await;

    let route = assert_ok!(materialize(&router(&base, 0), &anchors(0.03)).await);

    assert_eq!(route.distance_km.as_km(), 5.24);
    // Computed from the distance, not OSRM's 3900 seconds
    assert_eq!(route.duration_min, 63);
    assert_eq!(route.path.len(), 3);
    assert_eq!(route.path[1].lat, 0.03);
    assert_eq!(route.path[1].lng, 0.5);
}

#[tokio::test]
async fn test_osrm_no_route_is_unroutable() {
    let (base, state) = spawn_server().await;

    let error = assert_err!(router(&base, 2).foot_route(&anchors(10.0)).await);
    assert!(matches!(error, AppError::Unroutable(_)));
    // A 400 answer is final
    assert_eq!(state.route_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_osrm_empty_routes_is_unroutable() {
    let (base, _) = spawn_server().await;

    let error = assert_err!(router(&base, 0).foot_route(&anchors(30.0)).await);
    assert!(matches!(error, AppError::Unroutable(_)));
}

#[tokio::test]
async fn test_osrm_retries_transient_failure() {
    let (base, state) = spawn_server().await;

    let directions = assert_ok!(router(&base, 2).foot_route(&anchors(20.0)).await);
    assert_eq!(directions.distance_meters, 5236.4);
    assert_eq!(state.route_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_osrm_transient_failure_without_retry() {
    let (base, state) = spawn_server().await;

    let error = assert_err!(router(&base, 0).foot_route(&anchors(20.0)).await);
    assert!(matches!(error, AppError::RoutingApi(_)));
    assert_eq!(state.route_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_osrm_rejected_coordinates_are_unroutable() {
    let (base, state) = spawn_server().await;

    let error = assert_err!(router(&base, 2).foot_route(&anchors(40.0)).await);
    assert!(matches!(error, AppError::Unroutable(_)));
    assert_eq!(state.route_calls.load(Ordering::SeqCst), 1);
}
