//! Bounded raycast queries
//!
//! Every probe the companion fires (wander obstacle check, foot probes)
//! goes through [`resolve_ray`]: collect at most [`MAX_RAY_HITS`] hits along
//! the ray, then keep the nearest one that is not the companion's own body.

use glam::Vec3;
use smallvec::SmallVec;

use super::world::ColliderHandle;

/// Hit buffer capacity; hits past this count are dropped
pub const MAX_RAY_HITS: usize = 16;

/// Fixed-capacity hit buffer
pub type RayHits = SmallVec<[RaycastHit; MAX_RAY_HITS]>;

/// Result of a raycast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// The collider that was hit
    pub collider: ColliderHandle,
    /// The point of intersection
    pub point: Vec3,
    /// Distance from ray origin
    pub distance: f32,
}

/// A world that can answer ray queries.
pub trait SpatialQuery {
    /// Push every hit along the ray into `hits`, stopping once the buffer
    /// holds [`MAX_RAY_HITS`] entries.
    ///
    /// `direction` is unit length; hit distances are world units along it.
    fn ray_hits(&self, origin: Vec3, direction: Vec3, max_distance: f32, hits: &mut RayHits);
}

/// Nearest hit whose collider is not `exclude`.
///
/// Exact distance ties keep whichever hit came first.
#[must_use]
pub fn nearest_hit(hits: &[RaycastHit], exclude: Option<ColliderHandle>) -> Option<RaycastHit> {
    let mut best: Option<RaycastHit> = None;
    for hit in hits {
        if Some(hit.collider) == exclude {
            continue;
        }
        if best.is_none_or(|b| hit.distance < b.distance) {
            best = Some(*hit);
        }
    }
    best
}

/// Cast a ray and resolve it to the nearest hit not belonging to `exclude`.
///
/// Returns `None` for a zero direction, a non-positive range, or when
/// nothing but `exclude` lies along the ray.
pub fn resolve_ray<S: SpatialQuery + ?Sized>(
    space: &S,
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
    exclude: Option<ColliderHandle>,
) -> Option<RaycastHit> {
    let direction = direction.try_normalize()?;
    if !(max_distance > 0.0) {
        return None;
    }

    let mut hits = RayHits::new();
    space.ray_hits(origin, direction, max_distance, &mut hits);
    hits.truncate(MAX_RAY_HITS);
    nearest_hit(&hits, exclude)
}
