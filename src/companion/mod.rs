//! Companion behavior
//!
//! The per-tick state machine that follows the actor, wanders around it,
//! and keeps the body on the ground, plus the registry that owns the
//! active companion.

mod behavior;
mod controller;
mod motion;
mod ports;
mod registry;
mod surface;
mod wander;

pub use behavior::{Behavior, BehaviorState, ControlMode, TickOutcome};
pub use controller::{Companion, TickContext};
pub use motion::{
    MIN_ANIM_SPEED, SprintLatch, animation_speed, look_rotation, planar_distance_squared,
    project_on_plane, rotate_towards, smooth_damp,
};
pub use ports::{ActorPose, AnimationPort, ReferenceActor};
pub use registry::{CompanionHandle, CompanionRegistry, SpawnRequest};
pub use surface::{ProbeKind, ProbeMarker, SurfaceContact, SurfaceProbe, sample_surface};
pub use wander::{WanderDraw, resolve_wander_target};
