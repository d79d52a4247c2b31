//! Lifecycle events for the companion owner
//!
//! Session start, teleports, unloads, and settings changes arrive from the
//! host as messages instead of callbacks into the behavior loop. The host
//! pushes them into an [`EventQueue`] whenever they happen; the registry
//! drains the queue at a frame boundary of its choosing, so the simulation
//! cadence stays independent of the event cadence.
//!
//! # Example
//!
//! ```ignore
//! // Host side
//! queue.push(CompanionEvent::TeleportFinished);
//!
//! // Frame boundary
//! queue.swap();
//! registry.process_events(&mut physics, &player, &mut queue);
//! ```

use std::collections::VecDeque;

use crate::core::CompanionConfig;

// ============================================================================
// Event Types
// ============================================================================

/// Host notifications the companion owner reacts to.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum CompanionEvent {
    /// A play session started; spawn next to the actor.
    SessionStarted,

    /// The actor finished teleporting; respawn if left far behind.
    TeleportFinished,

    /// The world is being unloaded; tear the companion down.
    UnloadRequested,

    /// Settings were edited; respawn in place with the new values.
    SettingsChanged(CompanionConfig),
}

impl CompanionEvent {
    /// Event name for logging
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SessionStarted => "SessionStarted",
            Self::TeleportFinished => "TeleportFinished",
            Self::UnloadRequested => "UnloadRequested",
            Self::SettingsChanged(_) => "SettingsChanged",
        }
    }
}

// ============================================================================
// Event Queue
// ============================================================================

/// Double-buffered event queue.
///
/// Events pushed during frame N are available for reading during frame N+1.
#[derive(Debug)]
pub struct EventQueue {
    /// Events being written this frame
    pending: VecDeque<CompanionEvent>,
    /// Events from previous frame, ready for processing
    processing: VecDeque<CompanionEvent>,
}

impl EventQueue {
    /// Default initial capacity for event queues.
    const DEFAULT_CAPACITY: usize = 8;

    /// Create a new event queue with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a new event queue with specified initial capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pending: VecDeque::with_capacity(capacity),
            processing: VecDeque::with_capacity(capacity),
        }
    }

    /// Push an event to be processed next frame.
    #[inline]
    pub fn push(&mut self, event: CompanionEvent) {
        self.pending.push_back(event);
    }

    /// Swap the pending and processing queues.
    ///
    /// Call this once per frame. Unprocessed events from the previous
    /// frame are dropped.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.pending, &mut self.processing);
        self.pending.clear();
    }

    /// Iterate over events from the previous frame.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &CompanionEvent> {
        self.processing.iter()
    }

    /// Drain all events from the previous frame.
    #[inline]
    pub fn drain(&mut self) -> impl Iterator<Item = CompanionEvent> + '_ {
        self.processing.drain(..)
    }

    /// Check if there are any events to process.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.processing.is_empty()
    }

    /// Get the number of events ready for processing.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.processing.len()
    }

    /// Get the number of events pending for next frame.
    #[must_use]
    #[inline]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Clear all events (both pending and processing).
    pub fn clear(&mut self) {
        self.pending.clear();
        self.processing.clear();
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_visible_after_swap() {
        let mut queue = EventQueue::new();
        queue.push(CompanionEvent::SessionStarted);

        assert!(queue.is_empty());
        assert_eq!(queue.pending_count(), 1);

        queue.swap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pending_count(), 0);
    }

    #[test]
    fn test_drain_preserves_order() {
        let mut queue = EventQueue::new();
        queue.push(CompanionEvent::TeleportFinished);
        queue.push(CompanionEvent::UnloadRequested);
        queue.swap();

        let names: Vec<_> = queue.drain().map(|e| e.name()).collect();
        assert_eq!(names, ["TeleportFinished", "UnloadRequested"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_second_swap_drops_stale_events() {
        let mut queue = EventQueue::new();
        queue.push(CompanionEvent::SessionStarted);
        queue.swap();
        queue.swap();

        assert!(queue.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut queue = EventQueue::new();
        queue.push(CompanionEvent::SessionStarted);
        queue.swap();
        queue.push(CompanionEvent::UnloadRequested);

        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.pending_count(), 0);
    }
}
