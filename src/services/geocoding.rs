use crate::config::RetryPolicy;
use crate::error::{AppError, Result};
use crate::models::Coordinates;
use crate::services::http::send_with_retry;
use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use serde::Deserialize;

/// Free-text address <-> coordinates lookups
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// First match for `text`, or `AddressNotFound` when the service has none
    async fn resolve(&self, text: &str) -> Result<Coordinates>;

    /// Human-readable name for a point, `None` when the service has no name for it
    async fn reverse(&self, coords: Coordinates) -> Result<Option<String>>;
}

/// Label for a clicked map point, falling back to `"lat, lng"` with four
/// decimals when the service has no name or is unreachable.
pub async fn reverse_label(geocoder: &dyn Geocoder, coords: Coordinates) -> String {
    match geocoder.reverse(coords).await {
        Ok(Some(name)) if !name.trim().is_empty() => name,
        Ok(_) => coords.label(),
        Err(e) => {
            tracing::warn!(
                lat = coords.lat,
                lng = coords.lng,
                error = %e,
                "Reverse geocoding failed, using numeric label"
            );
            coords.label()
        }
    }
}

/// Client for a Nominatim-compatible geocoding API
#[derive(Clone)]
pub struct NominatimClient {
    client: Client,
    base_url: String,
    user_agent: String,
    retry: RetryPolicy,
}

impl NominatimClient {
    pub fn with_config(base_url: String, user_agent: String, retry: RetryPolicy) -> Self {
        NominatimClient {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent,
            retry,
        }
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);

        let response = send_with_retry(&self.retry, "Geocoding API", || {
            self.client
                .get(&url)
                .header(USER_AGENT, &self.user_agent)
                .query(query)
        })
        .await
        .map_err(AppError::GeocodingApi)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(status = %status, "Geocoding API HTTP error {}: {}", status, error_text);
            return Err(AppError::GeocodingApi(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::GeocodingApi(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn resolve(&self, text: &str) -> Result<Coordinates> {
        tracing::debug!(address = text, "Geocoding request");

        let places: Vec<NominatimPlace> = self
            .get_json(
                "search",
                &[
                    ("q", text.to_string()),
                    ("format", "jsonv2".to_string()),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;

        let place = places
            .into_iter()
            .next()
            .ok_or_else(|| AppError::AddressNotFound(text.to_string()))?;

        let coords = place.coordinates()?;
        tracing::debug!(
            lat = coords.lat,
            lng = coords.lng,
            "Geocoded '{}' to ({:.5}, {:.5})",
            text,
            coords.lat,
            coords.lng
        );
        Ok(coords)
    }

    async fn reverse(&self, coords: Coordinates) -> Result<Option<String>> {
        tracing::debug!(lat = coords.lat, lng = coords.lng, "Reverse geocoding request");

        let place: NominatimReverse = self
            .get_json(
                "reverse",
                &[
                    ("lat", coords.lat.to_string()),
                    ("lon", coords.lng.to_string()),
                    ("format", "jsonv2".to_string()),
                ],
            )
            .await?;

        if let Some(ref error) = place.error {
            tracing::debug!("Reverse geocoding returned no place: {}", error);
        }

        Ok(place.display_name)
    }
}

// Nominatim API response types

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    // Nominatim encodes coordinates as strings
    lat: String,
    lon: String,
    #[allow(dead_code)]
    display_name: Option<String>,
}

impl NominatimPlace {
    fn coordinates(&self) -> Result<Coordinates> {
        let lat: f64 = self
            .lat
            .parse()
            .map_err(|_| AppError::GeocodingApi(format!("Invalid latitude '{}'", self.lat)))?;
        let lng: f64 = self
            .lon
            .parse()
            .map_err(|_| AppError::GeocodingApi(format!("Invalid longitude '{}'", self.lon)))?;
        Coordinates::new(lat, lng).map_err(AppError::GeocodingApi)
    }
}

#[derive(Debug, Deserialize)]
struct NominatimReverse {
    display_name: Option<String>,
    error: Option<String>,
}
