//! Plain-data components shared by fighters and pickups.

use std::fmt;

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};

// =============================================================================
// Fighter Flags
// =============================================================================

bitflags! {
    /// Boolean status of a fighter.
    ///
    /// Contact flags are written from the physics adapter's contact report;
    /// the rest are owned by the fighter state machine.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct FighterFlags: u16 {
        /// An attack is in progress.
        const ATTACKING = 1 << 0;
        /// The fighter is walking or drifting.
        const MOVING = 1 << 1;
        /// Crouch is held.
        const CROUCHING = 1 << 2;
        /// Jump is held.
        const JUMPING = 1 << 3;
        /// Standing on ground.
        const GROUNDED = 1 << 4;
        /// Pressed against a wall on the left.
        const WALL_LEFT = 1 << 5;
        /// Pressed against a wall on the right.
        const WALL_RIGHT = 1 << 6;
        /// A special move has pinned the body in place.
        const MOVEMENT_LOCKED = 1 << 7;
        /// The fighter has entered its death sequence.
        const DEAD = 1 << 8;
    }
}

// =============================================================================
// Faction
// =============================================================================

/// Team tag used to filter friendly fire.
///
/// Fighters of the same faction never damage each other. Spawned projectiles
/// inherit their shooter's faction.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Faction {
    /// The player and the player's projectiles.
    Player,
    /// HUND packs.
    Hund,
    /// Shrooms and their spores.
    Shroom,
    /// BB-Hands, both hands and the hands' projectiles.
    BbHands,
    /// Training dummies and other unaligned targets.
    Neutral,
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => write!(f, "Player"),
            Self::Hund => write!(f, "HUND"),
            Self::Shroom => write!(f, "Shroom"),
            Self::BbHands => write!(f, "BB-Hands"),
            Self::Neutral => write!(f, "Neutral"),
        }
    }
}

// =============================================================================
// Body
// =============================================================================

/// Contact points reported by the physics adapter for one tick.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactReport {
    /// Points touching from below.
    pub below: u32,
    /// Points touching on the left side.
    pub left: u32,
    /// Points touching on the right side.
    pub right: u32,
}

/// Physical state of an entity.
///
/// The physics adapter integrates `position` from `velocity`. The combat core
/// only writes velocity through resolver requests, plus the explicit position
/// moves of transform adjustment and teleports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// World position of the root.
    pub position: Vec2,
    /// Current velocity in units per second.
    pub velocity: Vec2,
    /// Push box size, used for pickup touches.
    pub size: Vec2,
    /// Multiplier on gravity. Projectiles use zero.
    pub gravity_scale: f32,
    /// Static bodies are never integrated.
    pub is_static: bool,
    /// Latest contact report.
    pub contacts: ContactReport,
}

impl Body {
    /// A dynamic body at `position` with the given push box.
    #[must_use]
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            size,
            gravity_scale: 1.0,
            is_static: false,
            contacts: ContactReport::default(),
        }
    }

    /// Same body with a different gravity scale.
    #[must_use]
    pub fn with_gravity_scale(mut self, gravity_scale: f32) -> Self {
        self.gravity_scale = gravity_scale;
        self
    }

    /// Same body with an initial velocity.
    #[must_use]
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Replaces the horizontal velocity, keeping the vertical one.
    pub fn set_horizontal_velocity(&mut self, vx: f32) {
        self.velocity.x = vx;
    }
}

// =============================================================================
// Pickup
// =============================================================================

/// A portal gem dropped by a defeated enemy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    /// Physical state.
    pub body: Body,
    collected: bool,
}

impl Pickup {
    /// Default push box for a gem.
    pub const SIZE: Vec2 = Vec2::new(0.4, 0.4);

    /// A fresh gem launched with `velocity`.
    #[must_use]
    pub fn launched(position: Vec2, velocity: Vec2) -> Self {
        Self {
            body: Body::new(position, Self::SIZE).with_velocity(velocity),
            collected: false,
        }
    }

    /// Marks the gem collected. Returns false if it already was.
    pub fn collect(&mut self) -> bool {
        !std::mem::replace(&mut self.collected, true)
    }

    /// Returns true once the gem has been picked up.
    #[must_use]
    pub fn is_collected(&self) -> bool {
        self.collected
    }
}
