//! Animation clips
//!
//! The companion never samples bone data itself; a clip only carries what
//! playback timing needs.

use serde::{Deserialize, Serialize};

/// A named animation clip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    /// Clip name
    pub name: String,
    /// Duration of one cycle in seconds
    pub duration: f32,
}

impl AnimationClip {
    /// Create a clip with the given cycle length
    #[must_use]
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration: duration.max(0.0),
        }
    }

    /// Whether the clip has no playable length
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.duration <= 0.0
    }
}
