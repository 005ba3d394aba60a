//! Physics resolver for velocity and impulse requests.
//!
//! The `PhysicsResolver` handles:
//! - `SetVelocity` commands: replace a body's velocity
//! - `SetHorizontalVelocity` commands: replace only the x component
//! - `ApplyImpulse` commands: knockback, routed through the fighter's
//!   mutation contract
//! - `FreezeBody` commands: make a body static
//!
//! Integration itself belongs to the physics adapter.

use glam::Vec2;

use crate::arena::Arena;
use crate::entity::EntityId;
use crate::output::{Command, Output, OutputKind};

use super::Resolver;

/// Resolver for movement requests.
///
/// Requests aimed at static bodies or missing entities are dropped.
///
/// # Example
///
/// ```
/// use warp_core::output::OutputKind;
/// use warp_core::resolver::{PhysicsResolver, Resolver};
///
/// let resolver = PhysicsResolver::new();
/// assert!(resolver.handles().contains(&OutputKind::Command));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PhysicsResolver;

impl PhysicsResolver {
    /// Creates a new physics resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn set_velocity(arena: &mut Arena, target: EntityId, velocity: Vec2) {
        if let Some(entity) = arena.get_mut(target) {
            let body = entity.body_mut();
            if !body.is_static {
                body.velocity = velocity;
            }
        }
    }

    fn set_horizontal_velocity(arena: &mut Arena, target: EntityId, vx: f32) {
        if let Some(entity) = arena.get_mut(target) {
            let body = entity.body_mut();
            if !body.is_static {
                body.set_horizontal_velocity(vx);
            }
        }
    }

    fn apply_impulse(arena: &mut Arena, target: EntityId, impulse: Vec2) {
        let Some(entity) = arena.get_mut(target) else {
            return;
        };
        if let Some(fighter) = entity.as_fighter_mut() {
            fighter.apply_knockback(impulse);
        } else {
            let body = entity.body_mut();
            if !body.is_static {
                body.velocity += impulse;
            }
        }
    }

    fn freeze(arena: &mut Arena, target: EntityId) {
        if let Some(entity) = arena.get_mut(target) {
            let body = entity.body_mut();
            body.is_static = true;
            body.velocity = Vec2::ZERO;
            tracing::trace!(entity = %target, "body frozen");
        }
    }
}

impl Resolver for PhysicsResolver {
    fn handles(&self) -> &[OutputKind] {
        &[OutputKind::Command]
    }

    fn resolve(&self, outputs: &[&Output], arena: &mut Arena, _follow_up: &mut Vec<Output>) {
        for output in outputs {
            let Some(command) = output.as_command() else {
                continue;
            };
            match command {
                Command::SetVelocity { target, velocity } => {
                    Self::set_velocity(arena, *target, *velocity);
                }
                Command::SetHorizontalVelocity { target, vx } => {
                    Self::set_horizontal_velocity(arena, *target, *vx);
                }
                Command::ApplyImpulse { target, impulse } => {
                    Self::apply_impulse(arena, *target, *impulse);
                }
                Command::FreezeBody { target } => Self::freeze(arena, *target),
                // Handled by the spawn resolver and the simulation clock.
                Command::SpawnProjectile { .. }
                | Command::SpawnPickup { .. }
                | Command::Despawn { .. }
                | Command::Hitstop { .. } => {}
            }
        }
    }
}
