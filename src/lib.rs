//! Companion creature controller
//!
//! A small autonomous pet that follows a reference actor around a 3D level:
//! - Follows the actor when left behind, sprinting when far
//! - Wanders to random points around the actor when idle
//! - Avoids obstacles with a single raycast
//! - Conforms to the ground with two foot probes
//!
//! Level geometry queries run on rapier3d and companions live in a hecs
//! world owned by [`companion::CompanionRegistry`].

pub mod animation;
pub mod assets;
pub mod companion;
pub mod core;
pub mod ecs;
pub mod physics;

// Re-exports for convenience
pub use glam;
pub use hecs;
pub use rapier3d;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::animation::CompanionAnimator;
    pub use crate::assets::{Appearance, AppearanceCatalog};
    pub use crate::companion::{
        ActorPose, AnimationPort, BehaviorState, Companion, CompanionHandle, CompanionRegistry,
        ControlMode, ReferenceActor, SpawnRequest, TickOutcome,
    };
    pub use crate::core::{CompanionConfig, CompanionEvent, ConfigError, EventQueue, SpawnError};
    pub use crate::ecs::{Name, Transform, World};
    pub use crate::physics::{ColliderHandle, Physics, SpatialQuery};
    pub use glam::{Quat, Vec3};
}
