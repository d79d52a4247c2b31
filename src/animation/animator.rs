//! Companion animator
//!
//! Maps the two per-tick outputs of the behavior loop onto clip playback:
//! `moving` picks between the idle and move clips, and the speed multiplier
//! sets the playback rate.

use super::clip::AnimationClip;
use super::player::AnimationPlayer;
use crate::assets::CreatureModel;
use crate::companion::AnimationPort;

/// Animation state of one companion
#[derive(Debug)]
pub struct CompanionAnimator {
    player: AnimationPlayer,
    idle_clip: AnimationClip,
    move_clip: AnimationClip,
    moving: bool,
    speed_multiplier: f32,
}

impl CompanionAnimator {
    /// Create an animator playing the idle clip
    #[must_use]
    pub fn new(idle_clip: AnimationClip, move_clip: AnimationClip) -> Self {
        let mut player = AnimationPlayer::new();
        player.set_looping(true);
        player.set_clip(idle_clip.clone());
        player.play();

        Self {
            player,
            idle_clip,
            move_clip,
            moving: false,
            speed_multiplier: 1.0,
        }
    }

    /// Create an animator from a model's clips
    #[must_use]
    pub fn for_model(model: &CreatureModel) -> Self {
        Self::new(model.idle_clip.clone(), model.move_clip.clone())
    }

    /// Advance playback (call each frame)
    pub fn update(&mut self, delta_time: f32) {
        self.player.update(delta_time);
    }

    /// Current value of the "moving" trigger
    #[must_use]
    pub const fn is_moving(&self) -> bool {
        self.moving
    }

    /// Current speed multiplier
    #[must_use]
    pub const fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    /// Name of the clip being played
    #[must_use]
    pub fn current_clip(&self) -> Option<&str> {
        self.player.clip().map(|clip| clip.name.as_str())
    }

    /// Underlying player
    #[must_use]
    pub const fn player(&self) -> &AnimationPlayer {
        &self.player
    }
}

impl AnimationPort for CompanionAnimator {
    fn set_moving(&mut self, moving: bool) {
        if self.moving == moving {
            return;
        }

        self.moving = moving;
        let clip = if moving {
            self.move_clip.clone()
        } else {
            self.idle_clip.clone()
        };
        self.player.set_clip(clip);
        self.player.play();
    }

    fn set_speed_multiplier(&mut self, multiplier: f32) {
        self.speed_multiplier = multiplier;
        self.player.set_speed(multiplier);
    }

    fn remaining_cycle_time(&self) -> f32 {
        self.player.remaining_cycle_time()
    }
}
