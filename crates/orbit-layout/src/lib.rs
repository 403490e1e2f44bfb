pub mod api;
pub mod config;
pub mod core;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::engine::{LayoutEngine, layout_objects};
pub use api::error::{EngineResult, LayoutError};
pub use api::types::{
    AnnularOrbit, BeltGeometry, CelestialObject, Classification, LayoutMap, LayoutResult,
    ObjectId, Orbit, PhysicalProperties, PointOrbit,
};
pub use config::policy::{DistanceMode, FixedSizeTable, PolicyConfig, PolicyId, PolicyTable};
pub use crate::core::cache::{Fingerprint, LayoutCache};
pub use crate::core::forest::Forest;
pub use systems::animation::{animation_speed, BASE_SPEED, REFERENCE_PERIOD_DAYS};
pub use systems::placement::{effective_radius, scaled_distance, seed_distance, Placement, MAX_SCALED_DISTANCE};
