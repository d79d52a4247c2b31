//! Companion tunables
//!
//! Every value the behavior loop reads lives here. Configs can be built in
//! code with the `with_*` setters or loaded from RON/JSON; storing them is
//! up to the host.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::assets::Appearance;
use crate::core::ConfigError;

/// Companion configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanionConfig {
    /// Visual model used when spawning
    pub appearance: Appearance,
    /// Planar distance beyond which the companion runs after the actor.
    /// Also the outer radius for wander targets.
    pub max_follow_distance: f32,
    /// Clearance kept from obstacles and the actor when picking a target
    pub personal_space: f32,
    /// Squared planar distance at which a destination counts as reached
    pub arrival_radius_squared: f32,
    /// Shortest idle pause in seconds
    pub min_idle_time: f32,
    /// Longest idle pause in seconds
    pub max_idle_time: f32,
    /// Walking speed in m/s
    pub walk_speed: f32,
    /// Sprinting speed in m/s
    pub sprint_speed: f32,
    /// Speed smoothing constant; smooth time is this times the tick length
    pub speed_smoothing: f32,
    /// Movement speed to animation speed factor
    pub anim_speed_scale: f32,
    /// Largest rotation applied in a single tick, in degrees
    pub max_turn_degrees: f32,
    /// Height of the foot probe origins above the companion
    pub surface_probe_height: f32,
    /// Distance of the front and rear foot probes from the body center
    pub foot_offset: f32,
    /// Length of the downward foot probe rays
    pub ground_probe_depth: f32,
    /// Height of the obstacle ray origin used when picking wander targets
    pub obstacle_probe_height: f32,
    /// Radius of the companion's own collision volume
    pub body_radius: f32,
    /// A teleport respawns the companion once its squared distance to the
    /// actor exceeds this many times `max_follow_distance²`
    pub teleport_respawn_factor: f32,
    /// Seed for wander and idle draws; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            appearance: Appearance::GrayTabbyCat,
            max_follow_distance: 20.0,
            personal_space: 0.5,
            arrival_radius_squared: 0.1,
            min_idle_time: 1.0,
            max_idle_time: 20.0,
            walk_speed: 1.6,
            sprint_speed: 4.0,
            speed_smoothing: 25.0,
            anim_speed_scale: 0.75,
            max_turn_degrees: 10.0,
            surface_probe_height: 1.0,
            foot_offset: 0.15,
            ground_probe_depth: 10.0,
            obstacle_probe_height: 0.5,
            body_radius: 0.2,
            teleport_respawn_factor: 16.0,
            seed: None,
        }
    }
}

impl CompanionConfig {
    /// Set the appearance
    #[must_use]
    pub fn with_appearance(mut self, appearance: Appearance) -> Self {
        self.appearance = appearance;
        self
    }

    /// Set walk and sprint speeds
    #[must_use]
    pub fn with_speeds(mut self, walk: f32, sprint: f32) -> Self {
        self.walk_speed = walk;
        self.sprint_speed = sprint;
        self
    }

    /// Set the idle pause range
    #[must_use]
    pub fn with_idle_range(mut self, min: f32, max: f32) -> Self {
        self.min_idle_time = min;
        self.max_idle_time = max;
        self
    }

    /// Use a fixed seed for random draws
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Squared follow distance (`D_max²`)
    #[must_use]
    pub fn max_follow_distance_squared(&self) -> f32 {
        self.max_follow_distance * self.max_follow_distance
    }

    /// Squared distance above which sprinting starts
    #[must_use]
    pub fn sprint_distance_squared(&self) -> f32 {
        4.0 * self.max_follow_distance_squared()
    }

    /// Squared distance from the actor past which a teleport respawns the
    /// companion
    #[must_use]
    pub fn teleport_distance_squared(&self) -> f32 {
        self.teleport_respawn_factor * self.max_follow_distance_squared()
    }

    /// Per-tick turn limit in radians
    #[must_use]
    pub fn max_turn_radians(&self) -> f32 {
        self.max_turn_degrees.to_radians()
    }

    /// Check that every value is in range
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the first bad field
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("max_follow_distance", self.max_follow_distance),
            ("walk_speed", self.walk_speed),
            ("sprint_speed", self.sprint_speed),
            ("speed_smoothing", self.speed_smoothing),
            ("max_turn_degrees", self.max_turn_degrees),
            ("ground_probe_depth", self.ground_probe_depth),
            ("surface_probe_height", self.surface_probe_height),
            ("body_radius", self.body_radius),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be positive",
                });
            }
        }

        if self.personal_space < 0.0 || self.personal_space >= self.max_follow_distance {
            return Err(ConfigError::Invalid {
                field: "personal_space",
                reason: "must be in [0, max_follow_distance)",
            });
        }
        if self.arrival_radius_squared < 0.0 {
            return Err(ConfigError::Invalid {
                field: "arrival_radius_squared",
                reason: "must not be negative",
            });
        }
        if self.min_idle_time < 0.0 || self.min_idle_time > self.max_idle_time {
            return Err(ConfigError::Invalid {
                field: "min_idle_time",
                reason: "must be in [0, max_idle_time]",
            });
        }
        if self.foot_offset < 0.0 || self.obstacle_probe_height < 0.0 {
            return Err(ConfigError::Invalid {
                field: "foot_offset",
                reason: "probe offsets must not be negative",
            });
        }

        Ok(())
    }

    /// Parse and validate a config from a RON string
    ///
    /// # Errors
    ///
    /// Returns an error if parsing or validation fails
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a config from a JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if parsing or validation fails
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_ron_str(&content)
    }

    /// Save the config to a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let ron_string = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        fs::write(path, ron_string).map_err(|e| ConfigError::Io(e.to_string()))?;
        Ok(())
    }
}
