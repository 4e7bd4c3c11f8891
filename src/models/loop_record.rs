use crate::constants::{LOOP_PALETTE, WALKING_SPEED_KM_PER_MIN};
use crate::models::distance::DistanceKm;
use crate::models::Coordinates;
use geo::{BoundingRect, LineString};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;
use uuid::Uuid;

/// What the user's target number measures
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TargetUnit {
    #[default]
    Distance,
    Duration,
}

impl fmt::Display for TargetUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetUnit::Distance => write!(f, "distance"),
            TargetUnit::Duration => write!(f, "duration"),
        }
    }
}

impl FromStr for TargetUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "distance" | "km" => Ok(TargetUnit::Distance),
            "duration" | "min" | "minutes" => Ok(TargetUnit::Duration),
            _ => Err(format!("Invalid target unit: '{}'", s)),
        }
    }
}

/// A validated user target: a finite, strictly positive distance (km) or
/// duration (minutes).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopTarget {
    value: f64,
    unit: TargetUnit,
}

impl LoopTarget {
    pub fn new(value: f64, unit: TargetUnit) -> Result<Self, String> {
        if !value.is_finite() || value <= 0.0 {
            return Err(format!("{} must be a positive number, got {}", unit, value));
        }
        Ok(LoopTarget { value, unit })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> TargetUnit {
        self.unit
    }

    /// Total loop distance to aim for. Durations convert at the fixed walking pace.
    pub fn distance(&self) -> DistanceKm {
        match self.unit {
            TargetUnit::Distance => DistanceKm(self.value),
            TargetUnit::Duration => DistanceKm(self.value * WALKING_SPEED_KM_PER_MIN),
        }
    }
}

/// Routing anchors of a candidate loop: origin, far point, origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopAnchors([Coordinates; 3]);

impl LoopAnchors {
    pub fn there_and_back(origin: Coordinates, far: Coordinates) -> Self {
        LoopAnchors([origin, far, origin])
    }

    pub fn origin(&self) -> Coordinates {
        self.0[0]
    }

    pub fn far(&self) -> Coordinates {
        self.0[1]
    }

    pub fn as_slice(&self) -> &[Coordinates] {
        &self.0
    }

    /// `[lng, lat]` pairs, the order the routing service expects
    pub fn positions(&self) -> [[f64; 2]; 3] {
        self.0.map(Coordinates::to_position)
    }
}

/// A routed path normalized for display: the path in `(lat, lng)` order,
/// reported distance rounded to two decimals, and a local duration estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterializedRoute {
    pub path: Vec<Coordinates>,
    pub distance_km: DistanceKm,
    pub duration_min: u32,
}

/// Map viewport box enclosing a loop's path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

/// Palette color for the loop at `index` in the history
pub fn palette_color(index: usize) -> &'static str {
    LOOP_PALETTE[index % LOOP_PALETTE.len()]
}

/// One generated loop. Immutable once it is in the history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Loop {
    pub id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub address: String,
    pub requested_value: f64,
    pub requested_unit: TargetUnit,
    pub actual_distance_km: f64,
    pub actual_duration_min: u32,
    pub color: String,
    pub path: Vec<Coordinates>,
    /// `[lng, lat]` anchors sent to the routing service
    pub anchors: [[f64; 2]; 3],
}

impl Loop {
    /// Assemble the record that will sit at `index` in the history
    pub fn new(
        index: usize,
        address: String,
        target: LoopTarget,
        anchors: &LoopAnchors,
        route: MaterializedRoute,
    ) -> Self {
        Loop {
            id: Uuid::now_v7(),
            created_at: OffsetDateTime::now_utc(),
            address,
            requested_value: target.value(),
            requested_unit: target.unit(),
            actual_distance_km: route.distance_km.as_km(),
            actual_duration_min: route.duration_min,
            color: palette_color(index).to_string(),
            path: route.path,
            anchors: anchors.positions(),
        }
    }

    pub fn target_label(&self) -> String {
        match self.requested_unit {
            TargetUnit::Distance => format!("{:.1} km", self.requested_value),
            TargetUnit::Duration => format!("{:.0} min", self.requested_value),
        }
    }

    pub fn distance_label(&self) -> String {
        format!("{:.2} km", self.actual_distance_km)
    }

    pub fn duration_label(&self) -> String {
        format!("{} min", self.actual_duration_min)
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let line: LineString<f64> = self.path.iter().map(|c| (c.lng, c.lat)).collect();
        line.bounding_rect().map(|rect| Bounds {
            south: rect.min().y,
            west: rect.min().x,
            north: rect.max().y,
            east: rect.max().x,
        })
    }

    /// GeoJSON LineString feature for the map layer
    pub fn to_feature(&self) -> Feature {
        let coordinates = self.path.iter().map(|c| vec![c.lng, c.lat]).collect();

        let mut properties = JsonObject::new();
        properties.insert("id".to_string(), JsonValue::from(self.id.to_string()));
        properties.insert("address".to_string(), JsonValue::from(self.address.clone()));
        properties.insert("color".to_string(), JsonValue::from(self.color.clone()));
        properties.insert(
            "distance_km".to_string(),
            JsonValue::from(self.actual_distance_km),
        );

        Feature {
            geometry: Some(Geometry::new(geojson::Value::LineString(coordinates))),
            properties: Some(properties),
            id: None,
            bbox: None,
            foreign_members: None,
        }
    }
}

pub fn loops_feature_collection(loops: &[Loop]) -> FeatureCollection {
    FeatureCollection {
        features: loops.iter().map(Loop::to_feature).collect(),
        bbox: None,
        foreign_members: None,
    }
}

// Request/Response types for API endpoints

#[derive(Debug, Clone, Deserialize)]
pub struct LoopRequest {
    pub address: String,
    /// Missing or non-numeric values become NaN and fail target validation
    #[serde(default = "missing_value", deserialize_with = "lenient_number")]
    pub value: f64,
    #[serde(default)]
    pub unit: TargetUnit,
    /// Known start point (map click). Skips forward geocoding when present.
    #[serde(default)]
    pub origin: Option<Coordinates>,
}

fn missing_value() -> f64 {
    f64::NAN
}

/// Accepts a JSON number or a numeric string. Anything else yields NaN.
fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = JsonValue::deserialize(deserializer)?;
    Ok(match value {
        JsonValue::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        JsonValue::String(s) => s.trim().parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    })
}

#[derive(Debug, Serialize)]
pub struct LoopDisplay {
    pub target: String,
    pub distance: String,
    pub duration: String,
}

#[derive(Debug, Serialize)]
pub struct LoopResponse {
    #[serde(flatten)]
    pub record: Loop,
    pub display: LoopDisplay,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
    pub navigation_url: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub loops: Vec<LoopResponse>,
    pub total: usize,
}

#[derive(Debug, Deserialize, Default)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct NavigationResponse {
    pub url: String,
    pub stops: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct MapClickRequest {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Serialize)]
pub struct MapClickResponse {
    pub lat: f64,
    pub lng: f64,
    pub label: String,
}
