//! Read-only snapshots for a renderer.
//!
//! A [`PresentationFrame`] carries what a sprite or animation picker needs
//! from one fighter for one tick. Nothing flows back: the renderer never
//! drives gameplay.

use serde::{Deserialize, Serialize};

use crate::attack::AttackId;
use crate::entity::EntityId;
use crate::fighter::{Fighter, Phase};
use crate::geometry::Facing;

/// One fighter's visible state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationFrame {
    /// The fighter.
    pub entity: EntityId,
    /// Coarse state.
    pub phase: Phase,
    /// Attack in progress, if any.
    pub attack: Option<AttackId>,
    /// Facing.
    pub facing: Facing,
    /// True while stunned.
    pub hitstun_active: bool,
    /// Ticks since the attack started.
    pub frame_index: u32,
}

impl PresentationFrame {
    /// Snapshot of `fighter`.
    #[must_use]
    pub fn of(entity: EntityId, fighter: &Fighter) -> Self {
        Self {
            entity,
            phase: fighter.phase(),
            attack: fighter.current_attack(),
            facing: fighter.facing(),
            hitstun_active: fighter.hitstun_frames() > 0,
            frame_index: fighter.frame_index(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attack::AttackTable;
    use crate::fighter::FighterProfile;
    use glam::Vec2;

    #[test]
    fn snapshot_reflects_fighter() {
        let table = AttackTable::standard();
        let mut fighter = Fighter::spawn(&FighterProfile::player(), Vec2::ZERO, Facing::Left);
        fighter.start_attack(AttackId::STAND_N, &table);
        fighter.apply_hitstun(4);

        let frame = PresentationFrame::of(EntityId::new(3), &fighter);
        assert_eq!(frame.entity, EntityId::new(3));
        assert_eq!(frame.phase, Phase::Startup);
        assert_eq!(frame.attack, Some(AttackId::STAND_N));
        assert_eq!(frame.facing, Facing::Left);
        assert!(frame.hitstun_active);
        assert_eq!(frame.frame_index, 0);
    }

    #[test]
    fn idle_fighter() {
        let fighter = Fighter::spawn(&FighterProfile::hund(), Vec2::ZERO, Facing::Right);
        let frame = PresentationFrame::of(EntityId::new(0), &fighter);
        assert_eq!(frame.phase, Phase::Idle);
        assert_eq!(frame.attack, None);
        assert!(!frame.hitstun_active);
    }
}
