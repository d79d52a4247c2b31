//! Animation playback control
//!
//! Provides animation player for controlling clip playback.

use super::clip::AnimationClip;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Animation is playing
    Playing,
    /// Animation has stopped
    #[default]
    Stopped,
}

/// Animation player for controlling playback
#[derive(Debug)]
pub struct AnimationPlayer {
    /// Currently playing clip
    clip: Option<AnimationClip>,
    /// Current playback time in seconds
    current_time: f32,
    /// Playback speed multiplier
    speed: f32,
    /// Whether to loop the animation
    looping: bool,
    /// Current playback state
    state: PlaybackState,
}

impl AnimationPlayer {
    /// Create a new animation player
    #[must_use]
    pub fn new() -> Self {
        Self {
            clip: None,
            current_time: 0.0,
            speed: 1.0,
            looping: true,
            state: PlaybackState::Stopped,
        }
    }

    /// Set the animation clip to play
    pub fn set_clip(&mut self, clip: AnimationClip) {
        self.clip = Some(clip);
        self.current_time = 0.0;
    }

    /// Start or resume playback
    pub fn play(&mut self) {
        if self.clip.is_some() {
            self.state = PlaybackState::Playing;
        }
    }

    /// Update playback (call each frame)
    pub fn update(&mut self, delta_time: f32) {
        if self.state != PlaybackState::Playing {
            return;
        }

        if let Some(clip) = &self.clip {
            // Avoid division/modulo by zero for empty clips
            if clip.is_empty() {
                self.current_time = 0.0;
                if !self.looping {
                    self.state = PlaybackState::Stopped;
                }
                return;
            }

            self.current_time += delta_time * self.speed;

            if self.current_time >= clip.duration {
                if self.looping {
                    self.current_time %= clip.duration;
                } else {
                    self.current_time = clip.duration;
                    self.state = PlaybackState::Stopped;
                }
            }

            if self.current_time < 0.0 {
                if self.looping {
                    self.current_time = clip.duration + self.current_time % clip.duration;
                } else {
                    self.current_time = 0.0;
                    self.state = PlaybackState::Stopped;
                }
            }
        }
    }

    /// Get current playback time
    #[must_use]
    pub const fn current_time(&self) -> f32 {
        self.current_time
    }

    /// Get playback state
    #[must_use]
    pub const fn state(&self) -> PlaybackState {
        self.state
    }

    /// Check if currently playing
    #[must_use]
    pub const fn is_playing(&self) -> bool {
        matches!(self.state, PlaybackState::Playing)
    }

    /// Get playback speed
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Set playback speed (can be negative for reverse)
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// Set looping
    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Get the current clip (if any)
    #[must_use]
    pub fn clip(&self) -> Option<&AnimationClip> {
        self.clip.as_ref()
    }

    /// Real time, in seconds, until the current cycle of the clip ends.
    ///
    /// Returns 0.0 if no clip is loaded, the clip is empty, or playback
    /// is stopped or not moving forward.
    #[must_use]
    pub fn remaining_cycle_time(&self) -> f32 {
        let Some(clip) = &self.clip else {
            return 0.0;
        };
        if self.state != PlaybackState::Playing || clip.is_empty() || self.speed <= 0.0 {
            return 0.0;
        }

        let cycle_time = if self.looping {
            self.current_time % clip.duration
        } else {
            self.current_time.min(clip.duration)
        };
        (clip.duration - cycle_time).max(0.0) / self.speed
    }
}

impl Default for AnimationPlayer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_animation_player_playback() {
        let mut player = AnimationPlayer::new();
        player.set_clip(AnimationClip::new("test", 1.0));
        player.play();

        assert!(player.is_playing());
        assert_eq!(player.current_time(), 0.0);

        // Update by 0.5 seconds
        player.update(0.5);
        assert!((player.current_time() - 0.5).abs() < 0.01);

        // Update past end with looping
        player.update(0.8);
        assert!(player.current_time() < 0.5); // Should have looped
    }

    #[test]
    fn test_non_looping_stops_at_end() {
        let mut player = AnimationPlayer::new();
        player.set_clip(AnimationClip::new("once", 1.0));
        player.set_looping(false);
        player.play();

        player.update(2.0);
        assert_eq!(player.state(), PlaybackState::Stopped);
        assert_eq!(player.current_time(), 1.0);
        assert_eq!(player.remaining_cycle_time(), 0.0);
    }

    #[test]
    fn test_remaining_cycle_time() {
        let mut player = AnimationPlayer::new();
        assert_eq!(player.remaining_cycle_time(), 0.0);

        player.set_clip(AnimationClip::new("idle", 2.0));
        player.play();
        player.update(0.5);
        assert!((player.remaining_cycle_time() - 1.5).abs() < 1e-5);

        // Double speed halves the real time left
        player.set_speed(2.0);
        assert!((player.remaining_cycle_time() - 0.75).abs() < 1e-5);
    }

    #[test]
    fn test_stopped_player_does_not_advance() {
        let mut player = AnimationPlayer::new();
        player.set_clip(AnimationClip::new("idle", 2.0));
        player.update(1.0);

        assert_eq!(player.state(), PlaybackState::Stopped);
        assert_eq!(player.current_time(), 0.0);
        assert_eq!(player.remaining_cycle_time(), 0.0);
    }

    #[test]
    fn test_non_looping_remaining_time_counts_down() {
        let mut player = AnimationPlayer::new();
        player.set_clip(AnimationClip::new("once", 1.0));
        player.set_looping(false);
        player.play();

        player.update(0.75);
        assert!((player.remaining_cycle_time() - 0.25).abs() < 1e-5);
    }
}
