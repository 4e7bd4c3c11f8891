use crate::constants::MINUTES_PER_KM;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kilometers. Loop targets and routed lengths are carried in this unit.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct DistanceKm(pub f64);

impl DistanceKm {
    pub fn as_km(self) -> f64 {
        self.0
    }

    /// Length of one leg of a there-and-back loop
    pub fn one_way(self) -> Self {
        DistanceKm(self.0 / 2.0)
    }

    /// Round to two decimals, the precision loops are reported with
    pub fn round_centi(self) -> Self {
        DistanceKm((self.0 * 100.0).round() / 100.0)
    }

    /// Walking time at the fixed assumed pace, whole minutes
    pub fn walking_minutes(self) -> u32 {
        (self.0 * MINUTES_PER_KM).round() as u32
    }
}

impl fmt::Display for DistanceKm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} km", self.0)
    }
}

/// Meters, as reported by the routing service
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct DistanceMeters(pub f64);

impl DistanceMeters {
    pub fn to_km(self) -> DistanceKm {
        DistanceKm(self.0 / 1000.0)
    }
}
