//! Global hitstop counter.
//!
//! While the clock is frozen the whole simulation tick is skipped. The
//! counter itself still runs down once per real tick, so a freeze of `n`
//! swallows exactly `n` ticks.

use serde::{Deserialize, Serialize};

/// Freeze gate shared by every fighter in a simulation.
///
/// # Example
///
/// ```
/// use warp_core::clock::WorldClock;
///
/// let mut clock = WorldClock::new();
/// clock.freeze(2);
/// assert!(clock.consume_tick()); // skipped
/// assert!(clock.consume_tick()); // skipped
/// assert!(!clock.consume_tick()); // runs
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldClock {
    freeze_frames_remaining: u32,
}

impl WorldClock {
    /// Creates an unfrozen clock.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            freeze_frames_remaining: 0,
        }
    }

    /// Sets the freeze counter to `frames`, replacing any remaining freeze.
    pub fn freeze(&mut self, frames: u32) {
        tracing::debug!(
            frames,
            previous = self.freeze_frames_remaining,
            "world clock frozen"
        );
        self.freeze_frames_remaining = frames;
    }

    /// Returns true if the next tick will be skipped.
    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        self.freeze_frames_remaining > 0
    }

    /// Frames of freeze left.
    #[must_use]
    pub const fn freeze_frames_remaining(&self) -> u32 {
        self.freeze_frames_remaining
    }

    /// Advances the clock by one real tick.
    ///
    /// Returns true if this tick is frozen and the simulation must skip it.
    pub fn consume_tick(&mut self) -> bool {
        if self.freeze_frames_remaining == 0 {
            return false;
        }
        self.freeze_frames_remaining -= 1;
        if self.freeze_frames_remaining == 0 {
            tracing::debug!("world clock resumed");
        }
        true
    }
}
