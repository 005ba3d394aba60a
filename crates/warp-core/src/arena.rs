//! Entity storage for the combat simulation.
//!
//! The Arena owns every entity in a level. It provides:
//! - Entity storage with deterministic iteration order (`BTreeMap`)
//! - Entity lifecycle management (spawn/despawn)
//! - Lookups the tick needs: the player, live fighters, pickups
//!
//! # Determinism
//!
//! Entity ids are handed out monotonically and stored in a `BTreeMap`, so
//! iterating the arena always visits entities in spawn order. The simulation
//! ticks fighters in exactly that order.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use warp_core::arena::Arena;
//! use warp_core::fighter::{Fighter, FighterProfile};
//! use warp_core::geometry::Facing;
//!
//! let mut arena = Arena::new();
//! let player = arena.spawn_fighter(Fighter::spawn(
//!     &FighterProfile::player(),
//!     Vec2::ZERO,
//!     Facing::Right,
//! ));
//! let hund = arena.spawn_fighter(Fighter::spawn(
//!     &FighterProfile::hund(),
//!     Vec2::new(4.0, 0.0),
//!     Facing::Left,
//! ));
//!
//! let ids: Vec<_> = arena.entity_ids_sorted().collect();
//! assert_eq!(ids, vec![player, hund]);
//! assert_eq!(arena.player_id(), Some(player));
//! ```

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityId, EntityInner, EntityTag, Pickup};
use crate::error::{CombatError, Result};
use crate::fighter::Fighter;

/// Container for all simulation entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    /// Monotonically increasing entity id counter.
    next_id: u64,
    /// Entity storage with deterministic iteration order.
    entities: BTreeMap<EntityId, Entity>,
    /// Current simulation tick.
    tick: u64,
}

impl Arena {
    /// Creates an empty arena at tick 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 0,
            entities: BTreeMap::new(),
            tick: 0,
        }
    }

    /// Spawns an entity and returns its id.
    pub fn spawn(&mut self, tag: EntityTag, inner: EntityInner) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        self.entities.insert(id, Entity::new(id, tag, inner));
        tracing::trace!(entity = %id, %tag, "spawned");
        id
    }

    /// Spawns a fighter, tagging projectile profiles as projectiles.
    pub fn spawn_fighter(&mut self, fighter: Fighter) -> EntityId {
        let tag = if fighter.profile().is_projectile() {
            EntityTag::Projectile
        } else {
            EntityTag::Fighter
        };
        self.spawn(tag, EntityInner::Fighter(Box::new(fighter)))
    }

    /// Spawns a gem.
    pub fn spawn_pickup(&mut self, pickup: Pickup) -> EntityId {
        self.spawn(EntityTag::Pickup, EntityInner::Pickup(pickup))
    }

    /// Removes an entity. Returns it if it existed.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let removed = self.entities.remove(&id);
        if removed.is_some() {
            tracing::trace!(entity = %id, "despawned");
        }
        removed
    }

    /// Returns an entity by id.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Returns a mutable entity by id.
    #[must_use]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Returns the fighter state of `id`.
    #[must_use]
    pub fn fighter(&self, id: EntityId) -> Option<&Fighter> {
        self.get(id).and_then(Entity::as_fighter)
    }

    /// Returns the mutable fighter state of `id`.
    #[must_use]
    pub fn fighter_mut(&mut self, id: EntityId) -> Option<&mut Fighter> {
        self.get_mut(id).and_then(Entity::as_fighter_mut)
    }

    /// Like [`Arena::fighter_mut`] but fails with
    /// [`CombatError::UnknownEntity`].
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is not a live fighter.
    pub fn require_fighter_mut(&mut self, id: EntityId) -> Result<&mut Fighter> {
        self.fighter_mut(id).ok_or(CombatError::UnknownEntity(id))
    }

    /// Returns the first live player-controlled fighter.
    #[must_use]
    pub fn player_id(&self) -> Option<EntityId> {
        self.entities
            .values()
            .find(|entity| {
                entity.is_fighter()
                    && entity
                        .as_fighter()
                        .is_some_and(|fighter| fighter.profile().is_player())
            })
            .map(Entity::id)
    }

    /// Position of the player, while it is alive.
    #[must_use]
    pub fn player_position(&self) -> Option<Vec2> {
        self.player_id()
            .and_then(|id| self.fighter(id))
            .filter(|fighter| fighter.is_alive())
            .map(Fighter::position)
    }

    /// Returns entity ids in deterministic (sorted) order.
    pub fn entity_ids_sorted(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys().copied()
    }

    /// Returns entities in deterministic (sorted by id) order.
    pub fn entities_sorted(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.values()
    }

    /// Returns mutable entities in deterministic order.
    pub fn entities_sorted_mut(&mut self) -> impl Iterator<Item = &mut Entity> + '_ {
        self.entities.values_mut()
    }

    /// Ids of every fighter and projectile, sorted.
    #[must_use]
    pub fn fighter_ids(&self) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|entity| entity.as_fighter().is_some())
            .map(Entity::id)
            .collect()
    }

    /// Ids of every pickup, sorted.
    #[must_use]
    pub fn pickup_ids(&self) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|entity| entity.is_pickup())
            .map(Entity::id)
            .collect()
    }

    /// Number of entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if the arena has no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Current simulation tick.
    #[must_use]
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Advances the tick counter.
    pub fn advance_tick(&mut self) {
        self.tick += 1;
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
