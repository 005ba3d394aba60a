//! Save/restore pair for visual position offsets.
//!
//! A lunge moves the fighter's root forward while the hurtboxes stay where
//! they were in world space: the root moves by `d` and every hurtbox offset
//! moves by `-d`. Undo snaps the root back to the saved baseline, dropping
//! any motion integrated while adjusted, and shifts the hurtboxes by `+d`.

use glam::Vec2;

use super::Fighter;

impl Fighter {
    /// Offsets the root by `delta` while keeping hurtboxes fixed in world
    /// space. A no-op if an adjustment is already in place.
    pub fn adjust_transform(&mut self, delta: Vec2) {
        if self.adjusted {
            return;
        }
        self.baseline = self.body.position;
        self.adjusted = true;
        self.adjustment = delta;
        self.body.position += delta;
        self.hurtboxes.shift(-delta);
        tracing::trace!(dx = delta.x, dy = delta.y, "transform adjusted");
    }

    /// Snaps the root back to the baseline and restores the hurtbox offsets.
    ///
    /// A no-op when nothing is adjusted, so calling it twice is safe.
    pub fn undo_adjust_transform(&mut self) {
        if !self.adjusted {
            return;
        }
        let delta = self.adjustment;
        self.body.position = self.baseline;
        self.hurtboxes.shift(delta);
        self.adjusted = false;
        self.adjustment = Vec2::ZERO;
        tracing::trace!(x = self.baseline.x, y = self.baseline.y, "transform restored");
    }

    /// Moves the root and the baseline together. Hurtboxes travel with the
    /// root, and a pending adjustment is carried along.
    pub fn translate(&mut self, delta: Vec2) {
        self.body.position += delta;
        self.baseline += delta;
    }

    /// Returns true while an adjustment is pending.
    #[must_use]
    pub fn is_adjusted(&self) -> bool {
        self.adjusted
    }

    /// Position the fighter returns to on undo.
    #[must_use]
    pub fn baseline_position(&self) -> Vec2 {
        self.baseline
    }
}
