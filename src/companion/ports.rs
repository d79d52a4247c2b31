//! Seams between the behavior loop and the host
//!
//! The loop reads the actor it follows and writes two animation values per
//! tick. Both go through these traits so the loop runs without a renderer
//! or animation system attached.

use glam::{Quat, Vec3};

use crate::ecs::Transform;

/// The actor a companion follows (usually the player). Read-only.
pub trait ReferenceActor {
    /// World-space position
    fn position(&self) -> Vec3;

    /// World-space orientation
    fn orientation(&self) -> Quat;

    /// Transform a point from the actor's local space to world space
    fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position() + self.orientation() * local
    }
}

/// A fixed actor pose, for hosts that snapshot the actor each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorPose {
    /// World-space position
    pub position: Vec3,
    /// World-space orientation
    pub orientation: Quat,
}

impl ActorPose {
    /// Pose at a position, facing the default forward
    #[must_use]
    pub const fn at(position: Vec3) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
        }
    }
}

impl Default for ActorPose {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

impl ReferenceActor for ActorPose {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn orientation(&self) -> Quat {
        self.orientation
    }
}

impl ReferenceActor for Transform {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn orientation(&self) -> Quat {
        self.rotation
    }
}

/// Animation output of a companion.
///
/// Written once per moving tick (and on stop); read by "prepare for move"
/// to wait out the clip that is currently playing.
pub trait AnimationPort {
    /// Drive the "moving" trigger
    fn set_moving(&mut self, moving: bool);

    /// Drive the normalized playback speed
    fn set_speed_multiplier(&mut self, multiplier: f32);

    /// Seconds until the current clip cycle completes
    fn remaining_cycle_time(&self) -> f32;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_point_uses_facing() {
        let actor = ActorPose {
            position: Vec3::new(1.0, 0.0, 0.0),
            orientation: Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
        };

        // Local forward (-Z) turned a quarter left ends up along -X
        let world = actor.transform_point(Vec3::NEG_Z * 2.0);
        assert!((world - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-5);
    }
}
