//! Spawn resolver for projectiles, pickups and removals.
//!
//! Projectiles are fighters: a one-attack profile with no brain that starts
//! its attack on its first tick. Pickups are launched upwards from where the
//! enemy died.

use glam::Vec2;

use crate::arena::Arena;
use crate::config::SimConfig;
use crate::entity::{EntityId, EntityTag, Faction, Pickup};
use crate::fighter::{Fighter, ProjectileKind};
use crate::geometry::Facing;
use crate::output::{Command, Event, Output, OutputKind};

use super::Resolver;

/// Resolver for spawn and despawn requests.
///
/// # Example
///
/// ```
/// use warp_core::config::SimConfig;
/// use warp_core::output::OutputKind;
/// use warp_core::resolver::{Resolver, SpawnResolver};
///
/// let resolver = SpawnResolver::new(SimConfig::default());
/// assert!(resolver.handles().contains(&OutputKind::Command));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SpawnResolver {
    projectile_speed: f32,
    pickup_launch_velocity: Vec2,
}

impl SpawnResolver {
    /// Creates a spawn resolver using the launch speeds in `config`.
    #[must_use]
    pub fn new(config: SimConfig) -> Self {
        Self {
            projectile_speed: config.projectile_speed,
            pickup_launch_velocity: config.pickup_launch_velocity,
        }
    }

    fn spawn_projectile(
        &self,
        arena: &mut Arena,
        source: EntityId,
        position: Vec2,
        facing: Facing,
        player_owned: bool,
        kind: ProjectileKind,
    ) -> EntityId {
        let faction = if player_owned {
            Faction::Player
        } else {
            arena
                .fighter(source)
                .map_or(Faction::Neutral, Fighter::faction)
        };
        let mut projectile = Fighter::spawn(&kind.profile(faction), position, facing);
        if kind.moves() {
            projectile.body_mut().velocity = Vec2::new(facing.sign() * self.projectile_speed, 0.0);
        }
        let id = arena.spawn_fighter(projectile);
        tracing::debug!(entity = %id, %source, %kind, %faction, "projectile spawned");
        id
    }

    fn spawn_pickup(&self, arena: &mut Arena, source: EntityId, position: Vec2) -> EntityId {
        let id = arena.spawn_pickup(Pickup::launched(position, self.pickup_launch_velocity));
        tracing::debug!(entity = %id, %source, "pickup spawned");
        id
    }
}

impl Resolver for SpawnResolver {
    fn handles(&self) -> &[OutputKind] {
        &[OutputKind::Command]
    }

    fn resolve(&self, outputs: &[&Output], arena: &mut Arena, follow_up: &mut Vec<Output>) {
        for output in outputs {
            let Some(command) = output.as_command() else {
                continue;
            };
            match command {
                Command::SpawnProjectile {
                    source,
                    position,
                    facing,
                    player_owned,
                    kind,
                } => {
                    let entity = self.spawn_projectile(
                        arena,
                        *source,
                        *position,
                        *facing,
                        *player_owned,
                        *kind,
                    );
                    follow_up.push(
                        Event::Spawned {
                            entity,
                            tag: EntityTag::Projectile,
                            source: *source,
                        }
                        .into(),
                    );
                }
                Command::SpawnPickup { source, position } => {
                    let entity = self.spawn_pickup(arena, *source, *position);
                    follow_up.push(
                        Event::Spawned {
                            entity,
                            tag: EntityTag::Pickup,
                            source: *source,
                        }
                        .into(),
                    );
                }
                Command::Despawn { target } => {
                    arena.despawn(*target);
                }
                _ => {}
            }
        }
    }
}
