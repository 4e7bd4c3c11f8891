pub mod coordinates;
pub mod distance;
pub mod loop_record;

pub use coordinates::Coordinates;
pub use distance::{DistanceKm, DistanceMeters};
pub use loop_record::{
    loops_feature_collection, palette_color, Bounds, Loop, LoopAnchors, LoopTarget,
    MaterializedRoute, TargetUnit,
};
