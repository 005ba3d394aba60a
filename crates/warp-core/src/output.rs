//! Outputs emitted during a tick.
//!
//! Fighters never reach into the world directly. During their tick they emit
//! outputs, and resolvers turn those into state changes afterwards:
//!
//! - [`Command`]: requests to the physics and spawn side (`SetVelocity`,
//!   `SpawnProjectile`, `Hitstop`, ...)
//! - [`Contact`]: overlap reports from the physics adapter
//! - [`Event`]: notifications of things that happened, kept for the host
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use warp_core::entity::EntityId;
//! use warp_core::output::{Command, Output, OutputKind};
//!
//! let output = Output::from(Command::ApplyImpulse {
//!     target: EntityId::new(2),
//!     impulse: Vec2::new(-6.0, 0.3),
//! });
//! assert_eq!(output.kind(), OutputKind::Command);
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::attack::AttackId;
use crate::entity::{EntityId, EntityTag};
use crate::fighter::ProjectileKind;
use crate::geometry::Facing;

// =============================================================================
// Commands
// =============================================================================

/// Requests issued to the physics and spawn resolvers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Replace an entity's velocity.
    SetVelocity {
        /// Entity to modify
        target: EntityId,
        /// New velocity
        velocity: Vec2,
    },
    /// Replace the horizontal velocity, keeping the vertical one.
    SetHorizontalVelocity {
        /// Entity to modify
        target: EntityId,
        /// New horizontal velocity
        vx: f32,
    },
    /// Add an instantaneous impulse.
    ApplyImpulse {
        /// Entity to push
        target: EntityId,
        /// Impulse, already mirrored
        impulse: Vec2,
    },
    /// Make a body static and stop it.
    FreezeBody {
        /// Entity to pin
        target: EntityId,
    },
    /// Create a projectile peer.
    SpawnProjectile {
        /// Shooter
        source: EntityId,
        /// Spawn position
        position: Vec2,
        /// Travel direction
        facing: Facing,
        /// True if the player fired it
        player_owned: bool,
        /// Which projectile archetype to build
        kind: ProjectileKind,
    },
    /// Drop a pickup.
    SpawnPickup {
        /// Entity that dropped it
        source: EntityId,
        /// Spawn position
        position: Vec2,
    },
    /// Remove an entity at the end of the tick.
    Despawn {
        /// Entity to remove
        target: EntityId,
    },
    /// Freeze the world clock.
    Hitstop {
        /// Frames to freeze
        frames: u32,
    },
}

impl Command {
    /// Returns the entity this command acts on, if any.
    #[must_use]
    pub const fn target(&self) -> Option<EntityId> {
        match self {
            Self::SetVelocity { target, .. }
            | Self::SetHorizontalVelocity { target, .. }
            | Self::ApplyImpulse { target, .. }
            | Self::FreezeBody { target }
            | Self::Despawn { target } => Some(*target),
            Self::SpawnProjectile { .. } | Self::SpawnPickup { .. } | Self::Hitstop { .. } => None,
        }
    }
}

// =============================================================================
// Contacts
// =============================================================================

/// Overlaps reported by the physics adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Contact {
    /// An active hitbox overlaps a hittable hurtbox.
    Hit {
        /// Hitbox owner
        attacker: EntityId,
        /// Hurtbox owner
        defender: EntityId,
        /// Index of the hurtbox within the defender's set
        hurtbox: usize,
    },
    /// A pickup touches a fighter's push box.
    Touch {
        /// The pickup
        pickup: EntityId,
        /// The fighter touching it
        toucher: EntityId,
    },
}

// =============================================================================
// Events
// =============================================================================

/// Why the combat resolver dropped an overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterReason {
    /// Attacker and defender are the same entity.
    SelfHit,
    /// Both belong to the same faction.
    SameFaction,
    /// The exemption table forbids this pairing.
    Exempt,
    /// This hitbox activation already struck the defender.
    AlreadyStruck,
    /// The defender's hurtbox is off or shielded.
    Invulnerable,
    /// One side is gone or no longer has a live hitbox.
    Stale,
}

impl fmt::Display for FilterReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::SelfHit => "self hit",
            Self::SameFaction => "same faction",
            Self::Exempt => "exempt pairing",
            Self::AlreadyStruck => "already struck",
            Self::Invulnerable => "invulnerable",
            Self::Stale => "stale",
        };
        f.write_str(text)
    }
}

/// Notifications recorded for the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// An attack was accepted.
    AttackStarted {
        /// Attacker
        source: EntityId,
        /// Attack id
        attack: AttackId,
    },
    /// A hitbox came out.
    HitboxActivated {
        /// Owner
        source: EntityId,
        /// Attack id
        attack: AttackId,
        /// Owner-local activation number
        activation: u64,
    },
    /// A hitbox was withdrawn.
    HitboxDeactivated {
        /// Owner
        source: EntityId,
        /// Attack id
        attack: AttackId,
    },
    /// A hit was applied.
    HitLanded {
        /// Hitbox owner
        attacker: EntityId,
        /// Hurtbox owner
        defender: EntityId,
        /// Attack id
        attack: AttackId,
        /// Damage applied
        damage: u32,
        /// Defender HP afterwards
        hp_after: u32,
    },
    /// An overlap was ignored.
    HitFiltered {
        /// Hitbox owner
        attacker: EntityId,
        /// Hurtbox owner
        defender: EntityId,
        /// Reason
        reason: FilterReason,
    },
    /// A fighter entered its death sequence.
    Died {
        /// The fighter
        entity: EntityId,
    },
    /// A death sequence reached its terminal frame.
    DeathSequenceComplete {
        /// The fighter
        entity: EntityId,
    },
    /// An entity was added by a spawn request.
    Spawned {
        /// The new entity
        entity: EntityId,
        /// Its tag
        tag: EntityTag,
        /// Who asked for it
        source: EntityId,
    },
    /// A pickup was collected.
    PickupCollected {
        /// The pickup
        pickup: EntityId,
        /// The collector
        collector: EntityId,
        /// Collector's total afterwards
        total: u32,
    },
    /// The world clock was frozen.
    HitstopStarted {
        /// Frames of freeze
        frames: u32,
    },
    /// An entity dropped below the playfield.
    FellOut {
        /// The entity
        entity: EntityId,
        /// True if it was moved back instead of killed
        respawned: bool,
    },
    /// The player asked to leave with enough gems.
    ExitReached {
        /// The player
        entity: EntityId,
    },
}

impl Event {
    /// Returns the entity the event is mainly about, if any.
    #[must_use]
    pub const fn primary_entity(&self) -> Option<EntityId> {
        match self {
            Self::AttackStarted { source, .. }
            | Self::HitboxActivated { source, .. }
            | Self::HitboxDeactivated { source, .. } => Some(*source),
            Self::HitLanded { defender, .. } | Self::HitFiltered { defender, .. } => {
                Some(*defender)
            }
            Self::Died { entity }
            | Self::DeathSequenceComplete { entity }
            | Self::Spawned { entity, .. }
            | Self::FellOut { entity, .. }
            | Self::ExitReached { entity } => Some(*entity),
            Self::PickupCollected { collector, .. } => Some(*collector),
            Self::HitstopStarted { .. } => None,
        }
    }
}

// =============================================================================
// Top-Level Output Enum
// =============================================================================

/// Output kind for resolver routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputKind {
    /// Physics and spawn requests
    Command,
    /// Overlap reports
    Contact,
    /// Notifications
    Event,
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command => write!(f, "Command"),
            Self::Contact => write!(f, "Contact"),
            Self::Event => write!(f, "Event"),
        }
    }
}

/// Anything emitted during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Output {
    /// A request
    Command(Command),
    /// An overlap report
    Contact(Contact),
    /// A notification
    Event(Event),
}

impl Output {
    /// Returns the kind of this output for resolver routing.
    #[must_use]
    pub const fn kind(&self) -> OutputKind {
        match self {
            Self::Command(_) => OutputKind::Command,
            Self::Contact(_) => OutputKind::Contact,
            Self::Event(_) => OutputKind::Event,
        }
    }

    /// Returns the command if this is one.
    #[must_use]
    pub const fn as_command(&self) -> Option<&Command> {
        match self {
            Self::Command(cmd) => Some(cmd),
            _ => None,
        }
    }

    /// Returns the contact if this is one.
    #[must_use]
    pub const fn as_contact(&self) -> Option<&Contact> {
        match self {
            Self::Contact(contact) => Some(contact),
            _ => None,
        }
    }

    /// Returns the event if this is one.
    #[must_use]
    pub const fn as_event(&self) -> Option<&Event> {
        match self {
            Self::Event(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Command> for Output {
    fn from(cmd: Command) -> Self {
        Self::Command(cmd)
    }
}

impl From<Contact> for Output {
    fn from(contact: Contact) -> Self {
        Self::Contact(contact)
    }
}

impl From<Event> for Output {
    fn from(e: Event) -> Self {
        Self::Event(e)
    }
}
