//! Animation module
//!
//! Clip playback and the companion's animation output port.

mod animator;
mod clip;
mod player;

pub use animator::CompanionAnimator;
pub use clip::AnimationClip;
pub use player::{AnimationPlayer, PlaybackState};
