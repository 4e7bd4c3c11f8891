use crate::constants::KM_PER_DEGREE;
use crate::models::{Coordinates, DistanceKm, LoopAnchors};
use rand::distr::{Distribution, StandardUniform};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::f64::consts::TAU;
use std::sync::{Mutex, PoisonError};

/// Source of bearings (radians, `[0, 2π)`) for placing the far point
pub trait BearingSource: Send + Sync {
    fn next_bearing(&self) -> f64;
}

/// Uniformly random bearings from a seedable generator
pub struct RandomBearing {
    rng: Mutex<StdRng>,
}

impl RandomBearing {
    pub fn seeded(seed: u64) -> Self {
        RandomBearing {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn from_entropy() -> Self {
        Self::seeded(rand::random())
    }
}

impl BearingSource for RandomBearing {
    fn next_bearing(&self) -> f64 {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let unit: f64 = StandardUniform.sample(&mut *rng);
        unit * TAU
    }
}

/// Always the same bearing
#[derive(Debug, Clone, Copy)]
pub struct FixedBearing(pub f64);

impl BearingSource for FixedBearing {
    fn next_bearing(&self) -> f64 {
        self.0
    }
}

/// Place a there-and-back candidate loop of `target_total` length.
///
/// The far point sits half the target away along `bearing` using a flat-earth
/// approximation (1° ≈ 111 km on both axes). Longitude is not scaled by
/// cos(latitude), so east-west legs come out longer than intended away from
/// the equator.
pub fn synthesize(origin: Coordinates, target_total: DistanceKm, bearing: f64) -> LoopAnchors {
    let one_way_km = target_total.one_way().as_km();
    let offset_deg = one_way_km / KM_PER_DEGREE;

    let far = Coordinates {
        lat: origin.lat + offset_deg * bearing.sin(),
        lng: origin.lng + offset_deg * bearing.cos(),
    };

    tracing::debug!(
        bearing_rad = bearing,
        one_way_km = one_way_km,
        far_lat = far.lat,
        far_lng = far.lng,
        "Synthesized far point {:.2}km out at bearing {:.3}rad",
        one_way_km,
        bearing
    );

    LoopAnchors::there_and_back(origin, far)
}
