use crate::config::RetryPolicy;
use crate::error::{AppError, Result};
use crate::models::{Coordinates, DistanceKm, DistanceMeters, LoopAnchors, MaterializedRoute};
use crate::services::http::send_with_retry;
use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// OSRM codes meaning the anchors cannot be routed, including far points
/// that fell outside valid coordinates
const UNROUTABLE_CODES: &[&str] = &["NoRoute", "NoSegment", "InvalidQuery", "InvalidValue"];

/// External foot-routing service
#[async_trait]
pub trait RoutingService: Send + Sync {
    /// Walking route through the anchors with full geometry.
    /// Returns `Unroutable` when the service finds no route.
    async fn foot_route(&self, anchors: &LoopAnchors) -> Result<DirectionsResponse>;
}

/// Route the anchors and normalize the result for display.
pub async fn materialize(
    router: &dyn RoutingService,
    anchors: &LoopAnchors,
) -> Result<MaterializedRoute> {
    let directions = router.foot_route(anchors).await?;
    directions.materialize()
}

/// Client for an OSRM-compatible routing API
#[derive(Clone)]
pub struct OsrmClient {
    client: Client,
    base_url: String,
    user_agent: String,
    retry: RetryPolicy,
}

impl OsrmClient {
    pub fn with_config(base_url: String, user_agent: String, retry: RetryPolicy) -> Self {
        OsrmClient {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent,
            retry,
        }
    }

    fn route_url(&self, anchors: &LoopAnchors) -> String {
        // Format coordinates as "lng,lat;lng,lat;..."
        let coordinates_str = anchors
            .positions()
            .iter()
            .map(|[lng, lat]| format!("{},{}", lng, lat))
            .collect::<Vec<_>>()
            .join(";");

        format!("{}/foot/{}", self.base_url, coordinates_str)
    }
}

#[async_trait]
impl RoutingService for OsrmClient {
    async fn foot_route(&self, anchors: &LoopAnchors) -> Result<DirectionsResponse> {
        let url = self.route_url(anchors);

        tracing::debug!(
            waypoints = anchors.as_slice().len(),
            "Routing API request: {}",
            url
        );

        let response = send_with_retry(&self.retry, "Routing API", || {
            self.client
                .get(&url)
                .header(USER_AGENT, &self.user_agent)
                .query(&[
                    ("overview", "full"),
                    ("geometries", "geojson"),
                    ("steps", "false"),
                ])
        })
        .await
        .map_err(AppError::RoutingApi)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::RoutingApi(format!("Failed to read response: {}", e)))?;

        // OSRM reports NoRoute with HTTP 400 and a JSON body, so parse before
        // looking at the status
        let parsed: Option<OsrmRouteResponse> = serde_json::from_str(&body).ok();

        let directions = match parsed {
            Some(api) if UNROUTABLE_CODES.contains(&api.code.as_str()) => {
                tracing::warn!(
                    code = %api.code,
                    far_lat = anchors.far().lat,
                    far_lng = anchors.far().lng,
                    "Routing API found no route: {}",
                    api.message.as_deref().unwrap_or("")
                );
                return Err(AppError::Unroutable(
                    api.message.unwrap_or_else(|| api.code.clone()),
                ));
            }
            Some(api) if status.is_success() && api.code == "Ok" => api,
            Some(api) => {
                tracing::warn!(status = %status, code = %api.code, "Routing API error {}", status);
                return Err(AppError::RoutingApi(format!(
                    "HTTP {}: {} {}",
                    status,
                    api.code,
                    api.message.unwrap_or_default()
                )));
            }
            None if !status.is_success() => {
                tracing::warn!(status = %status, "Routing API HTTP error {}: {}", status, body);
                return Err(AppError::RoutingApi(format!("HTTP {}: {}", status, body)));
            }
            None => {
                return Err(AppError::RoutingApi(
                    "Failed to parse response".to_string(),
                ));
            }
        };

        let route = directions.routes.into_iter().next().ok_or_else(|| {
            tracing::warn!("Routing API returned 0 routes for loop anchors");
            AppError::Unroutable("No routes found".to_string())
        })?;

        tracing::debug!(
            distance_km = %format!("{:.2}", route.distance / 1000.0),
            path_points = route.geometry.coordinates.len(),
            "Routing response: {:.2}km, {} path points",
            route.distance / 1000.0,
            route.geometry.coordinates.len()
        );

        Ok(DirectionsResponse {
            distance_meters: route.distance,
            duration_seconds: route.duration,
            geometry: route.geometry.coordinates,
        })
    }
}

// OSRM API response types

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64, // meters
    #[serde(default)]
    duration: f64, // seconds
    geometry: OsrmGeometry,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>, // [lng, lat] pairs
}

// Our simplified response type

#[derive(Debug, Clone, Serialize)]
pub struct DirectionsResponse {
    pub distance_meters: f64,
    /// The service's own estimate. Loops use a fixed local pace instead.
    pub duration_seconds: f64,
    /// GeoJSON coordinates as [lng, lat] pairs
    pub geometry: Vec<[f64; 2]>,
}

impl DirectionsResponse {
    /// Reported distance in kilometers, rounded to two decimals
    pub fn distance_km(&self) -> DistanceKm {
        DistanceMeters(self.distance_meters).to_km().round_centi()
    }

    /// Convert GeoJSON coordinates to our `(lat, lng)` Coordinates type
    pub fn to_coordinates(&self) -> Vec<Coordinates> {
        self.geometry
            .iter()
            .map(|position| Coordinates::from_position(*position))
            .collect()
    }

    /// Normalize into a displayable route. The duration is always derived
    /// from the rounded distance at the fixed walking pace.
    pub fn materialize(&self) -> Result<MaterializedRoute> {
        if self.geometry.len() < 2 {
            return Err(AppError::Unroutable(format!(
                "Route geometry has {} point(s)",
                self.geometry.len()
            )));
        }

        let distance_km = self.distance_km();

        Ok(MaterializedRoute {
            path: self.to_coordinates(),
            distance_km,
            duration_min: distance_km.walking_minutes(),
        })
    }
}
