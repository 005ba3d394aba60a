//! Entity identity and storage.
//!
//! Every simulated object is an [`Entity`]: an id, a tag saying how the
//! simulation treats it, and the inner state.
//!
//! - [`EntityTag::Fighter`]: the player and enemies, driven by input or AI.
//! - [`EntityTag::Projectile`]: shots and spore clouds. These are fighters
//!   too, with a single self-starting attack and no brain.
//! - [`EntityTag::Pickup`]: portal gems.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use warp_core::entity::{Entity, EntityId, EntityInner, EntityTag, Pickup};
//!
//! let gem = Entity::new(
//!     EntityId::new(7),
//!     EntityTag::Pickup,
//!     EntityInner::Pickup(Pickup::launched(Vec2::ZERO, Vec2::new(0.0, 5.0))),
//! );
//! assert!(gem.is_pickup());
//! assert!(gem.as_fighter().is_none());
//! ```

pub mod components;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use components::{Body, ContactReport, Faction, FighterFlags, Pickup};

use crate::fighter::Fighter;

/// Unique identifier for an entity.
///
/// Ids are handed out in increasing order by the arena, so id order is spawn
/// order. The simulation relies on that for its per-tick processing order.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Wraps a raw id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// How the simulation treats an entity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityTag {
    /// Player or enemy.
    Fighter,
    /// Self-starting attack carrier.
    Projectile,
    /// Collectable gem.
    Pickup,
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fighter => write!(f, "Fighter"),
            Self::Projectile => write!(f, "Projectile"),
            Self::Pickup => write!(f, "Pickup"),
        }
    }
}

/// Entity state.
///
/// Fighters and projectiles share [`EntityInner::Fighter`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityInner {
    /// Fighter state machine.
    Fighter(Box<Fighter>),
    /// Gem state.
    Pickup(Pickup),
}

/// A simulated object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    tag: EntityTag,
    inner: EntityInner,
}

impl Entity {
    /// Creates an entity.
    #[must_use]
    pub fn new(id: EntityId, tag: EntityTag, inner: EntityInner) -> Self {
        Self { id, tag, inner }
    }

    /// The entity's id.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// The entity's tag.
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        self.tag
    }

    /// Inner state.
    #[must_use]
    pub const fn inner(&self) -> &EntityInner {
        &self.inner
    }

    /// Fighter state, for fighters and projectiles.
    #[must_use]
    pub fn as_fighter(&self) -> Option<&Fighter> {
        match &self.inner {
            EntityInner::Fighter(fighter) => Some(fighter),
            EntityInner::Pickup(_) => None,
        }
    }

    /// Mutable fighter state.
    #[must_use]
    pub fn as_fighter_mut(&mut self) -> Option<&mut Fighter> {
        match &mut self.inner {
            EntityInner::Fighter(fighter) => Some(fighter),
            EntityInner::Pickup(_) => None,
        }
    }

    /// Pickup state.
    #[must_use]
    pub fn as_pickup(&self) -> Option<&Pickup> {
        match &self.inner {
            EntityInner::Pickup(pickup) => Some(pickup),
            EntityInner::Fighter(_) => None,
        }
    }

    /// Mutable pickup state.
    #[must_use]
    pub fn as_pickup_mut(&mut self) -> Option<&mut Pickup> {
        match &mut self.inner {
            EntityInner::Pickup(pickup) => Some(pickup),
            EntityInner::Fighter(_) => None,
        }
    }

    /// Physical body, whatever the entity is.
    #[must_use]
    pub fn body(&self) -> &Body {
        match &self.inner {
            EntityInner::Fighter(fighter) => fighter.body(),
            EntityInner::Pickup(pickup) => &pickup.body,
        }
    }

    /// Mutable physical body.
    ///
    /// Intended for the physics adapter. Combat state is not reachable
    /// through it.
    #[must_use]
    pub fn body_mut(&mut self) -> &mut Body {
        match &mut self.inner {
            EntityInner::Fighter(fighter) => fighter.body_mut(),
            EntityInner::Pickup(pickup) => &mut pickup.body,
        }
    }

    /// Returns true for the player and enemies.
    #[must_use]
    pub fn is_fighter(&self) -> bool {
        self.tag == EntityTag::Fighter
    }

    /// Returns true for shots and spores.
    #[must_use]
    pub fn is_projectile(&self) -> bool {
        self.tag == EntityTag::Projectile
    }

    /// Returns true for gems.
    #[must_use]
    pub fn is_pickup(&self) -> bool {
        self.tag == EntityTag::Pickup
    }
}
