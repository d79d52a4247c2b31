//! Wander target selection
//!
//! A wander target is a random point around the actor, measured in the
//! actor's own frame, then pulled in short of the first obstacle between
//! the companion and that point.

use glam::{Quat, Vec3};
use rand::Rng;

use super::ports::ReferenceActor;
use crate::core::CompanionConfig;
use crate::physics::{ColliderHandle, SpatialQuery, resolve_ray};

/// One random draw for a wander target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WanderDraw {
    /// Bearing around the actor in degrees, 0 = straight ahead of it
    pub bearing_degrees: f32,
    /// Distance from the actor
    pub distance: f32,
}

impl WanderDraw {
    /// Draw a bearing in [0, 360) and a distance in
    /// [`personal_space`, `max_follow_distance`).
    pub fn random<R: Rng + ?Sized>(rng: &mut R, config: &CompanionConfig) -> Self {
        Self {
            bearing_degrees: uniform(rng, 0.0, 360.0),
            distance: uniform(rng, config.personal_space, config.max_follow_distance),
        }
    }

    /// The drawn point in the actor's local frame
    #[must_use]
    pub fn local_offset(&self) -> Vec3 {
        Quat::from_rotation_y(self.bearing_degrees.to_radians()) * (Vec3::NEG_Z * self.distance)
    }
}

/// Uniform value in `[min, max)`, or `min` when the range is empty.
pub(crate) fn uniform<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}

/// Turn a draw into a reachable destination.
///
/// The drawn point is placed around the actor. A single ray is cast toward
/// it from `obstacle_probe_height` above the companion, ignoring `body`. If
/// anything is hit first, the destination is pulled back along the same
/// line to `personal_space` short of the hit (never behind the companion).
pub fn resolve_wander_target<S: SpatialQuery + ?Sized>(
    position: Vec3,
    actor: &dyn ReferenceActor,
    draw: WanderDraw,
    space: &S,
    body: Option<ColliderHandle>,
    config: &CompanionConfig,
) -> Vec3 {
    let target = actor.transform_point(draw.local_offset());

    let to_target = target - position;
    let move_distance = to_target.length();
    let origin = position + Vec3::Y * config.obstacle_probe_height;

    let Some(hit) = resolve_ray(space, origin, to_target, move_distance, body) else {
        return target;
    };

    let clear_distance = (hit.distance - config.personal_space).max(0.0);
    log::debug!(
        "Wander target blocked at {:.2}m, shortened from {:.2}m to {:.2}m",
        hit.distance,
        move_distance,
        clear_distance
    );
    position + to_target.normalize_or_zero() * clear_distance
}
