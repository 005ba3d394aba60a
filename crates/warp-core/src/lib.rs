//! # Warp Core
//!
//! Frame-exact combat simulation for Project Warp.
//!
//! This crate provides the deterministic combat core of a 2D action game:
//! attack frame data, hit and hurt geometry, the per-fighter state machine,
//! enemy AI, hit resolution and the hitstop clock. Rendering, audio and
//! physics engines stay outside; the core talks to them through outputs,
//! a [`physics::PhysicsAdapter`] and [`presentation::PresentationFrame`]s.
//!
//! ## Architecture
//!
//! - **Fighters**: the player, enemies and projectiles share one state
//!   machine with a seven-step tick
//! - **Outputs**: fighters never touch each other; they emit commands,
//!   contacts and events
//! - **Resolvers**: physics, spawn, combat and pickup resolution apply those
//!   outputs to the arena in a fixed order
//!
//! ## Usage
//!
//! ```
//! use glam::Vec2;
//! use warp_core::{Facing, FighterProfile, InputEvent, Simulation};
//!
//! let mut sim = Simulation::new(7);
//! let player = sim.spawn_player(Vec2::new(0.0, 0.8));
//! sim.spawn_fighter(&FighterProfile::shroom(), Vec2::new(6.0, 0.5), Facing::Left);
//!
//! sim.push_input(InputEvent::NormalAttackPressed)?;
//! sim.run(30);
//! assert!(sim.fighter(player).is_some());
//! # Ok::<(), warp_core::CombatError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

// Data
pub mod attack;
pub mod config;
pub mod geometry;
pub mod hitbox;
pub mod hurtbox;

// State
pub mod arena;
pub mod clock;
pub mod entity;
pub mod error;
pub mod fighter;

// Decisions
pub mod ai;
pub mod input;

// Resolution
pub mod output;
pub mod physics;
pub mod presentation;
pub mod resolver;
pub mod simulation;

#[cfg(test)]
mod tests;

pub use arena::Arena;
pub use attack::{Attack, AttackId, AttackTable};
pub use clock::WorldClock;
pub use config::SimConfig;
pub use entity::{EntityId, EntityTag, Faction};
pub use error::{CombatError, Result};
pub use fighter::{Fighter, FighterProfile, Phase};
pub use geometry::{Facing, HitGeometry, Rect};
pub use input::InputEvent;
pub use output::{Command, Contact, Event, Output};
pub use simulation::Simulation;
