//! The single live hitbox a fighter can own.
//!
//! Damage, hitstun and knockback are copied out of the attack table when the
//! hitbox is activated and are never re-read while it is out. Each activation
//! carries its own set of defenders already struck, so one activation damages
//! a given defender at most once no matter how many ticks the overlap lasts.

use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::attack::{Attack, AttackId};
use crate::entity::EntityId;
use crate::geometry::{Facing, Rect};

/// What a hitbox does to a defender, frozen at activation.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitPayload {
    /// HP to remove.
    pub damage: u32,
    /// Hitstun to set.
    pub hitstun_frames: u32,
    /// Impulse, already mirrored by the attacker's facing.
    pub knockback: Vec2,
}

impl HitPayload {
    /// Snapshots `attack`, mirroring knockback for `facing`.
    #[must_use]
    pub fn snapshot(attack: &Attack, facing: Facing) -> Self {
        Self {
            damage: attack.damage,
            hitstun_frames: attack.hitstun_frames,
            knockback: facing.mirror(attack.knockback),
        }
    }
}

/// A live hitbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveHitbox {
    /// Attack that produced it.
    pub attack: AttackId,
    /// Monotonic per-owner activation number.
    pub activation: u64,
    /// Local-frame rectangle, already mirrored.
    pub rect: Rect,
    /// Effect on hit.
    pub payload: HitPayload,
    struck: BTreeSet<EntityId>,
}

impl ActiveHitbox {
    /// Creates a hitbox that has not struck anyone yet.
    #[must_use]
    pub fn new(attack: AttackId, activation: u64, rect: Rect, payload: HitPayload) -> Self {
        Self {
            attack,
            activation,
            rect,
            payload,
            struck: BTreeSet::new(),
        }
    }

    /// World-space rectangle for an owner at `origin`.
    #[must_use]
    pub fn world_rect(&self, origin: Vec2) -> Rect {
        self.rect.at(origin)
    }

    /// Records a hit on `defender`.
    ///
    /// Returns false if this activation already struck them.
    pub fn register_hit(&mut self, defender: EntityId) -> bool {
        self.struck.insert(defender)
    }

    /// Returns true if this activation already struck `defender`.
    #[must_use]
    pub fn has_struck(&self, defender: EntityId) -> bool {
        self.struck.contains(&defender)
    }

    /// Defenders struck so far, in id order.
    pub fn struck(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.struck.iter().copied()
    }
}
