//! Damageable regions owned by a fighter.
//!
//! A [`HurtboxSet`] never exists on its own: it is created with its fighter
//! and dropped with it. Offsets are kept in the fighter's local frame, so a
//! facing flip mirrors them and a transform adjustment shifts them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Body region a hurtbox covers.
///
/// Only [`HurtRegion::Head`] is singled out by attack data (head-invulnerable
/// attacks); the other regions are treated alike.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HurtRegion {
    /// Upper body. Ignored during head-invulnerable attacks.
    Head,
    /// Torso.
    Body,
    /// Legs and feet.
    Legs,
}

/// One damageable rectangle.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hurtbox {
    /// Region tag.
    pub region: HurtRegion,
    /// Local-frame rectangle.
    pub rect: Rect,
    /// Per-box enable flag.
    pub enabled: bool,
}

impl Hurtbox {
    /// Creates an enabled hurtbox.
    #[must_use]
    pub const fn new(region: HurtRegion, rect: Rect) -> Self {
        Self {
            region,
            rect,
            enabled: true,
        }
    }
}

/// Which hurtboxes the current attack shields.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shield {
    /// Head hurtboxes are ignored.
    pub head: bool,
    /// Every hurtbox is ignored.
    pub all: bool,
}

impl Shield {
    /// Returns true if a hurtbox in `region` is shielded.
    #[must_use]
    pub fn covers(self, region: HurtRegion) -> bool {
        self.all || (self.head && region == HurtRegion::Head)
    }
}

/// Ordered hurtboxes with a global switch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HurtboxSet {
    boxes: Vec<Hurtbox>,
    active: bool,
}

impl HurtboxSet {
    /// Creates a switched-on set.
    #[must_use]
    pub fn new(boxes: Vec<Hurtbox>) -> Self {
        Self {
            boxes,
            active: true,
        }
    }

    /// Switches every hurtbox off, e.g. for an invulnerability window.
    pub fn turn_off(&mut self) {
        if self.active {
            tracing::trace!("hurtboxes off");
        }
        self.active = false;
    }

    /// Switches the set back on.
    pub fn turn_on(&mut self) {
        if !self.active {
            tracing::trace!("hurtboxes on");
        }
        self.active = true;
    }

    /// Returns true unless the set has been switched off.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Enables or disables a single hurtbox. Returns false for a bad index.
    pub fn set_enabled(&mut self, index: usize, enabled: bool) -> bool {
        match self.boxes.get_mut(index) {
            Some(hurtbox) => {
                hurtbox.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Negates every x offset. Applying it twice is the identity.
    pub fn mirror(&mut self) {
        for hurtbox in &mut self.boxes {
            hurtbox.rect = hurtbox.rect.mirrored();
        }
    }

    /// Moves every offset by `delta`.
    pub fn shift(&mut self, delta: Vec2) {
        for hurtbox in &mut self.boxes {
            hurtbox.rect = hurtbox.rect.translated(delta);
        }
    }

    /// All hurtboxes, enabled or not.
    #[must_use]
    pub fn boxes(&self) -> &[Hurtbox] {
        &self.boxes
    }

    /// Local offsets in order. Handy for alignment checks.
    #[must_use]
    pub fn offsets(&self) -> Vec<Vec2> {
        self.boxes.iter().map(|hurtbox| hurtbox.rect.offset).collect()
    }

    /// Number of hurtboxes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// World-space rectangles that can currently be hit, with their index.
    ///
    /// Nothing is yielded while the set is switched off.
    pub fn hittable(&self, origin: Vec2) -> impl Iterator<Item = (usize, Rect)> + '_ {
        self.boxes
            .iter()
            .enumerate()
            .filter(move |(_, hurtbox)| self.active && hurtbox.enabled)
            .map(move |(index, hurtbox)| (index, hurtbox.rect.at(origin)))
    }

    /// Returns true if the hurtbox at `index` is hittable under `shield`.
    #[must_use]
    pub fn accepts_hit(&self, index: usize, shield: Shield) -> bool {
        self.active
            && self
                .boxes
                .get(index)
                .is_some_and(|hurtbox| hurtbox.enabled && !shield.covers(hurtbox.region))
    }
}
