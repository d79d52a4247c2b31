//! Physics module
//!
//! Built on top of rapier3d

mod query;
mod world;

pub use query::{MAX_RAY_HITS, RayHits, RaycastHit, SpatialQuery, nearest_hit, resolve_ray};
pub use world::{ColliderHandle, Physics, RigidBodyHandle};
