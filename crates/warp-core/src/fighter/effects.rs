//! Gameplay side effects keyed by attack id.
//!
//! Frame data lives in the attack table; the behaviours below are what an
//! attack does to its own fighter while it runs. The hook is applied after
//! the active countdown and before the recovery countdown of every tick.

use bitflags::bitflags;
use glam::Vec2;

use crate::attack::AttackId;
use crate::entity::{EntityId, FighterFlags};
use crate::output::Command;

use super::{Fighter, Phase, ProjectileKind, WorldContext};

/// Guard keeps hurtboxes off up to and including this frame index.
pub const GUARD_INVULNERABLE_FRAMES: u32 = 32;

/// Volley fires when `active_remaining % VOLLEY_PERIOD == 1`.
pub const VOLLEY_PERIOD: u32 = 4;

bitflags! {
    /// Continuous effects an attack applies while it runs.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AttackEffects: u8 {
        /// Visual forward offset during the active window.
        const LUNGE = 1 << 0;
        /// Aimed repositioning during the active window.
        const TELEPORT = 1 << 1;
        /// Hurtboxes off for the early frames.
        const GUARD = 1 << 2;
        /// Periodic player projectiles during the active window.
        const VOLLEY = 1 << 3;
        /// Lift and forward travel during startup.
        const POUNCE = 1 << 4;
        /// The body is pinned until recovery ends.
        const LOCKS_MOVEMENT = 1 << 5;
    }
}

impl AttackEffects {
    /// Effects attached to `id`.
    #[must_use]
    pub fn of(id: AttackId) -> Self {
        match id {
            AttackId::STAND_N
            | AttackId::STAND_NN
            | AttackId::STAND_NNN
            | AttackId::FORWARD_N
            | AttackId::FORWARD_NN
            | AttackId::FORWARD_NNN => Self::LUNGE,
            AttackId::STAND_S => Self::TELEPORT | Self::LOCKS_MOVEMENT,
            AttackId::CROUCH_S => Self::GUARD | Self::LOCKS_MOVEMENT,
            AttackId::FORWARD_S => Self::VOLLEY | Self::LUNGE | Self::LOCKS_MOVEMENT,
            AttackId::HUND_POUNCE => Self::POUNCE,
            _ => Self::empty(),
        }
    }
}

/// Peer entity spawned in place of a hitbox when startup ends.
#[must_use]
pub fn spawn_on_activation(id: AttackId) -> Option<ProjectileKind> {
    match id {
        AttackId::SHROOM_SPORE => Some(ProjectileKind::SporeCloud),
        AttackId::BB_FIRE => Some(ProjectileKind::HandShot),
        _ => None,
    }
}

impl Fighter {
    /// Runs the per-tick effect of the current attack.
    pub(super) fn apply_attack_effects(&mut self, id: EntityId, ctx: &mut WorldContext<'_>) {
        let Some(attack) = self.current_attack else {
            return;
        };
        let effects = AttackEffects::of(attack);
        if effects.is_empty() {
            return;
        }
        let config = ctx.config;
        let sign = self.facing.sign();

        if effects.contains(AttackEffects::LUNGE) && self.active_remaining > 0 {
            self.adjust_transform(Vec2::new(sign * config.lunge_distance, 0.0));
        }

        if effects.contains(AttackEffects::TELEPORT) && self.active_remaining > 0 {
            let step = self.aim * config.teleport_distance;
            if step != Vec2::ZERO {
                tracing::debug!(entity = %id, dx = step.x, dy = step.y, "teleport");
                self.translate(step);
            }
        }

        if effects.contains(AttackEffects::GUARD) {
            if self.frame_index <= GUARD_INVULNERABLE_FRAMES {
                self.hurtboxes.turn_off();
            } else {
                self.hurtboxes.turn_on();
            }
        }

        if effects.contains(AttackEffects::VOLLEY)
            && self.active_remaining > 0
            && self.active_remaining % VOLLEY_PERIOD == 1
        {
            let position =
                self.body.position + Vec2::new(sign * config.projectile_spawn_offset, 0.0);
            ctx.emit(Command::SpawnProjectile {
                source: id,
                position,
                facing: self.facing,
                player_owned: self.profile.is_player(),
                kind: ProjectileKind::PlayerShot,
            });
        }

        if effects.contains(AttackEffects::POUNCE) && self.phase == Phase::Startup {
            self.adjust_transform(Vec2::new(0.0, config.pounce_lift));
            self.translate(Vec2::new(sign * config.pounce_step, 0.0));
        }
    }

    /// Pins the body if the attack locks movement.
    pub(super) fn lock_movement_for(&mut self, attack: AttackId) {
        if AttackEffects::of(attack).contains(AttackEffects::LOCKS_MOVEMENT) {
            self.flags.insert(FighterFlags::MOVEMENT_LOCKED);
        }
    }
}
