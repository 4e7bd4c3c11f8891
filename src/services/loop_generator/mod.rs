pub mod synthesis;

use crate::error::{AppError, Result};
use crate::history::HistoryStore;
use crate::models::loop_record::LoopRequest;
use crate::models::{Coordinates, Loop, LoopTarget};
use crate::services::geocoding::Geocoder;
use crate::services::routing::{materialize, RoutingService};
use std::sync::Arc;

pub use synthesis::{synthesize, BearingSource, FixedBearing, RandomBearing};

/// Runs one loop generation: resolve → synthesize → materialize → record.
///
/// Each stage short-circuits the rest on failure, and the history is only
/// touched once every stage has succeeded.
pub struct LoopGenerator {
    geocoder: Arc<dyn Geocoder>,
    router: Arc<dyn RoutingService>,
    bearings: Arc<dyn BearingSource>,
    history: Arc<HistoryStore>,
}

impl LoopGenerator {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        router: Arc<dyn RoutingService>,
        bearings: Arc<dyn BearingSource>,
        history: Arc<HistoryStore>,
    ) -> Self {
        LoopGenerator {
            geocoder,
            router,
            bearings,
            history,
        }
    }

    pub async fn generate(&self, request: &LoopRequest) -> Result<Loop> {
        let target =
            LoopTarget::new(request.value, request.unit).map_err(AppError::InvalidTarget)?;

        let origin = match request.origin {
            Some(origin) => {
                Coordinates::new(origin.lat, origin.lng).map_err(AppError::InvalidRequest)?
            }
            None => self.geocoder.resolve(&request.address).await?,
        };

        let address = if request.address.trim().is_empty() {
            origin.label()
        } else {
            request.address.clone()
        };

        let target_distance = target.distance();
        let anchors = synthesize(origin, target_distance, self.bearings.next_bearing());
        let route = materialize(self.router.as_ref(), &anchors).await?;

        let record = self
            .history
            .append_with(|index| Loop::new(index, address, target, &anchors, route))
            .await;

        tracing::info!(
            id = %record.id,
            target = %record.target_label(),
            target_distance = %target_distance,
            actual_km = record.actual_distance_km,
            duration_min = record.actual_duration_min,
            "Loop generated: {} requested, {} routed",
            record.target_label(),
            record.distance_label()
        );

        Ok(record)
    }
}
