//! Behavior states
//!
//! The destination lives inside the states that move, so a companion can
//! only hold a destination while it is `Following` or `MoveTowardPoint`,
//! and only an idle companion has a countdown.

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// How the companion picks where to go, fixed at spawn time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControlMode {
    /// Follow the actor on foot and wander around it when close.
    #[default]
    GroundFollow,
    /// Ride along in a vehicle; never runs after the actor and has no
    /// wander policy, so it stays put.
    CarWander,
}

/// Behavior state with its state-specific data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Behavior {
    /// Standing still until the countdown runs out.
    Idle {
        /// Seconds left before picking a new wander target
        countdown: f32,
    },
    /// Catching up with the actor.
    Following {
        /// Last known actor position
        target: Vec3,
    },
    /// Walking to a wander target.
    MoveTowardPoint {
        /// Wander target
        target: Vec3,
    },
}

impl Behavior {
    /// Data-free view of this state
    #[must_use]
    pub const fn state(&self) -> BehaviorState {
        match self {
            Self::Idle { .. } => BehaviorState::Idle,
            Self::Following { .. } => BehaviorState::Following,
            Self::MoveTowardPoint { .. } => BehaviorState::MoveTowardPoint,
        }
    }

    /// Current destination, if this state has one
    #[must_use]
    pub const fn destination(&self) -> Option<Vec3> {
        match self {
            Self::Idle { .. } => None,
            Self::Following { target } | Self::MoveTowardPoint { target } => Some(*target),
        }
    }

    /// State name for debugging and logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.state().name()
    }
}

/// Behavior state without its data, for queries and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BehaviorState {
    /// See [`Behavior::Idle`]
    Idle,
    /// See [`Behavior::Following`]
    Following,
    /// See [`Behavior::MoveTowardPoint`]
    MoveTowardPoint,
}

impl BehaviorState {
    /// State name for debugging and logging.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Following => "Following",
            Self::MoveTowardPoint => "MoveTowardPoint",
        }
    }
}

impl fmt::Display for BehaviorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a single tick did.
///
/// A tick that changes state stops there; motion resumes on the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing to do this tick (idle countdown running, or a zero-length tick).
    Waiting,
    /// State changed; the rest of the tick was skipped.
    Transitioned {
        /// State before the tick
        from: BehaviorState,
        /// State after the tick
        to: BehaviorState,
    },
    /// A destination is set but the movement block is still running.
    Blocked,
    /// The companion moved toward its destination.
    Moved,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_only_in_moving_states() {
        assert_eq!(Behavior::Idle { countdown: 3.0 }.destination(), None);

        let target = Vec3::new(1.0, 0.0, 2.0);
        assert_eq!(Behavior::Following { target }.destination(), Some(target));
        assert_eq!(
            Behavior::MoveTowardPoint { target }.destination(),
            Some(target)
        );
    }

    #[test]
    fn test_state_names() {
        assert_eq!(Behavior::Idle { countdown: 0.0 }.name(), "Idle");
        assert_eq!(
            Behavior::Following { target: Vec3::ZERO }.state(),
            BehaviorState::Following
        );
        assert_eq!(
            BehaviorState::MoveTowardPoint.to_string(),
            "MoveTowardPoint"
        );
    }

    #[test]
    fn test_default_mode_follows_on_foot() {
        assert_eq!(ControlMode::default(), ControlMode::GroundFollow);
    }
}
