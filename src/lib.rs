// Library exports for testing and reusability

pub mod cache;
pub mod config;
pub mod constants;
pub mod error;
pub mod history;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use error::{AppError, Result};

use cache::CachedGeocoder;
use config::Config;
use history::HistoryStore;
use services::geocoding::{Geocoder, NominatimClient};
use services::loop_generator::{BearingSource, LoopGenerator, RandomBearing};
use services::navigation::NavigationExporter;
use services::routing::{OsrmClient, RoutingService};
use std::sync::Arc;

// App state for sharing across the application
pub struct AppState {
    pub loop_generator: LoopGenerator,
    pub history: Arc<HistoryStore>,
    pub geocoder: Arc<dyn Geocoder>,
    pub geocode_cache: Option<Arc<CachedGeocoder>>,
    pub navigation: NavigationExporter,
    pub visible_loops: usize,
}

impl AppState {
    /// Wire the real geocoding and routing clients from configuration
    pub fn from_config(config: &Config) -> Self {
        let nominatim = NominatimClient::with_config(
            config.geocoder_base_url.clone(),
            config.user_agent.clone(),
            config.retry.clone(),
        );
        let cache = Arc::new(CachedGeocoder::new(
            Arc::new(nominatim),
            config.geocode_cache_ttl,
            config.geocode_cache_max_entries,
        ));
        let router: Arc<dyn RoutingService> = Arc::new(OsrmClient::with_config(
            config.router_base_url.clone(),
            config.user_agent.clone(),
            config.retry.clone(),
        ));
        let bearings: Arc<dyn BearingSource> = match config.bearing_seed {
            Some(seed) => Arc::new(RandomBearing::seeded(seed)),
            None => Arc::new(RandomBearing::from_entropy()),
        };

        let mut state = Self::with_services(
            cache.clone(),
            router,
            bearings,
            NavigationExporter::new(config.navigation_base_url.clone()),
            config.visible_loops,
        );
        state.geocode_cache = Some(cache);
        state
    }

    /// Build state around arbitrary collaborators, with a fresh history
    pub fn with_services(
        geocoder: Arc<dyn Geocoder>,
        router: Arc<dyn RoutingService>,
        bearings: Arc<dyn BearingSource>,
        navigation: NavigationExporter,
        visible_loops: usize,
    ) -> Self {
        let history = Arc::new(HistoryStore::new());
        let loop_generator =
            LoopGenerator::new(geocoder.clone(), router, bearings, history.clone());

        AppState {
            loop_generator,
            history,
            geocoder,
            geocode_cache: None,
            navigation,
            visible_loops,
        }
    }
}
