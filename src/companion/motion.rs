//! Speed smoothing and steering helpers
//!
//! Small, pure building blocks for the motion step: a critically damped
//! smoother for speed, the sprint hysteresis latch, and rate-limited
//! turning.

use glam::{Mat3, Quat, Vec3};

/// Animation speed never drops below this while moving, so the walk cycle
/// doesn't freeze at very low speeds.
pub const MIN_ANIM_SPEED: f32 = 0.1;

/// Remove the component of `vector` along the unit `normal`.
#[must_use]
pub fn project_on_plane(vector: Vec3, normal: Vec3) -> Vec3 {
    vector - normal * vector.dot(normal)
}

/// Squared distance between two points on the ground plane.
#[must_use]
pub fn planar_distance_squared(from: Vec3, to: Vec3) -> f32 {
    project_on_plane(to - from, Vec3::Y).length_squared()
}

/// Critically damped approach of `current` toward `target`.
///
/// `velocity` carries the rate of change between calls and must be reset
/// to zero whenever the value is forced. `smooth_time` is roughly the time
/// needed to reach the target. A step that would cross the target lands on
/// it instead.
#[must_use]
pub fn smooth_damp(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    dt: f32,
) -> f32 {
    if !(dt > 0.0) {
        return current;
    }

    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;
    let mut output = target + (change + temp) * decay;

    // Clamp when the step would carry past the target
    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = (output - target) / dt;
    }

    output
}

/// Normalized animation speed for a movement speed.
///
/// Exactly 1.0 at rest; otherwise `speed * scale`, floored at
/// [`MIN_ANIM_SPEED`].
#[must_use]
pub fn animation_speed(speed: f32, scale: f32) -> f32 {
    if speed == 0.0 {
        1.0
    } else {
        (speed * scale).max(MIN_ANIM_SPEED)
    }
}

/// Rotation whose forward (-Z) points along `forward` and whose up is as
/// close to `up` as possible.
///
/// Returns `None` for a zero `forward`.
#[must_use]
pub fn look_rotation(forward: Vec3, up: Vec3) -> Option<Quat> {
    let forward = forward.try_normalize()?;
    let Some(right) = forward.cross(up).try_normalize() else {
        // Looking straight along `up`; any roll will do
        return Some(Quat::from_rotation_arc(Vec3::NEG_Z, forward));
    };
    let up = right.cross(forward);

    let basis = Mat3::from_cols(right, up, -forward);
    Some(Quat::from_mat3(&basis).normalize())
}

/// Rotate `from` toward `to` by at most `max_radians`.
#[must_use]
pub fn rotate_towards(from: Quat, to: Quat, max_radians: f32) -> Quat {
    if !(max_radians > 0.0) {
        return from;
    }

    let angle = from.angle_between(to);
    if angle <= max_radians {
        return to;
    }
    from.slerp(to, max_radians / angle).normalize()
}

/// Two-threshold sprint switch.
///
/// Sprinting starts only once the squared distance exceeds the upper
/// threshold and stops only once it falls below the lower one; in between
/// the previous decision holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SprintLatch {
    sprinting: bool,
}

impl SprintLatch {
    /// Whether the latch is set
    #[must_use]
    pub const fn is_sprinting(&self) -> bool {
        self.sprinting
    }

    /// Feed a new squared distance, returning the latch state
    pub fn update(&mut self, distance_squared: f32, walk_below: f32, sprint_above: f32) -> bool {
        if distance_squared > sprint_above {
            self.sprinting = true;
        } else if distance_squared < walk_below {
            self.sprinting = false;
        }
        self.sprinting
    }
}
