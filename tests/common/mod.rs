use async_trait::async_trait;
use easyloop::error::{AppError, Result};
use easyloop::models::{Coordinates, LoopAnchors};
use easyloop::services::geocoding::Geocoder;
use easyloop::services::loop_generator::FixedBearing;
use easyloop::services::navigation::NavigationExporter;
use easyloop::services::routing::{DirectionsResponse, RoutingService};
use easyloop::AppState;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[allow(dead_code)]
pub const NAVIGATION_BASE_URL: &str = "https://maps.example/dir/";

#[allow(dead_code)]
pub fn paris() -> Coordinates {
    Coordinates::new(48.8566, 2.3522).unwrap()
}

/// Geocoder answering from a fixed table
#[derive(Default)]
pub struct FakeGeocoder {
    places: HashMap<String, Coordinates>,
    place_name: Option<String>,
    pub calls: AtomicUsize,
}

#[allow(dead_code)]
impl FakeGeocoder {
    pub fn with_place(text: &str, coords: Coordinates) -> Self {
        let mut places = HashMap::new();
        places.insert(text.to_string(), coords);
        FakeGeocoder {
            places,
            ..Default::default()
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.place_name = Some(name.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn resolve(&self, text: &str) -> Result<Coordinates> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.places
            .get(text)
            .copied()
            .ok_or_else(|| AppError::AddressNotFound(text.to_string()))
    }

    async fn reverse(&self, _coords: Coordinates) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.place_name.clone())
    }
}

#[allow(dead_code)]
#[derive(Clone, Copy)]
pub enum RouterMode {
    /// Route straight out to the far point and back
    Route { distance_meters: f64, points: usize },
    Unroutable,
    Unavailable,
}

/// Routing service that records the anchors it was asked for
pub struct FakeRouter {
    mode: RouterMode,
    pub calls: AtomicUsize,
    pub last_anchors: Mutex<Option<LoopAnchors>>,
}

#[allow(dead_code)]
impl FakeRouter {
    pub fn new(mode: RouterMode) -> Self {
        FakeRouter {
            mode,
            calls: AtomicUsize::new(0),
            last_anchors: Mutex::new(None),
        }
    }

    pub fn routing(distance_meters: f64, points: usize) -> Self {
        Self::new(RouterMode::Route {
            distance_meters,
            points,
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_anchors(&self) -> Option<LoopAnchors> {
        *self.last_anchors.lock().unwrap()
    }
}

#[async_trait]
impl RoutingService for FakeRouter {
    async fn foot_route(&self, anchors: &LoopAnchors) -> Result<DirectionsResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_anchors.lock().unwrap() = Some(*anchors);

        match self.mode {
            RouterMode::Route {
                distance_meters,
                points,
            } => {
                let origin = anchors.origin();
                let far = anchors.far();
                let half = points / 2;
                let geometry = (0..points)
                    .map(|i| {
                        // 0 → half goes out, half → end comes back
                        let t = if i <= half {
                            i as f64 / half.max(1) as f64
                        } else {
                            (points - 1 - i) as f64 / (points - 1 - half).max(1) as f64
                        };
                        [
                            origin.lng + (far.lng - origin.lng) * t,
                            origin.lat + (far.lat - origin.lat) * t,
                        ]
                    })
                    .collect();

                Ok(DirectionsResponse {
                    distance_meters,
                    // Deliberately unrelated to the distance
                    duration_seconds: 1.0,
                    geometry,
                })
            }
            RouterMode::Unroutable => Err(AppError::Unroutable("NoRoute".to_string())),
            RouterMode::Unavailable => Err(AppError::RoutingApi("HTTP 503".to_string())),
        }
    }
}

/// App state around fakes, bearing fixed due east
#[allow(dead_code)]
pub fn test_state(geocoder: Arc<FakeGeocoder>, router: Arc<FakeRouter>) -> Arc<AppState> {
    Arc::new(AppState::with_services(
        geocoder,
        router,
        Arc::new(FixedBearing(0.0)),
        NavigationExporter::new(NAVIGATION_BASE_URL.to_string()),
        6,
    ))
}
