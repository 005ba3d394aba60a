//! Physics adapter boundary.
//!
//! The combat core does not own rigid-body simulation. It needs three things
//! from whatever does: bodies that move, ground and wall contact counts, and
//! overlap reports between hitboxes and hurtboxes. [`PhysicsAdapter`] is that
//! seam; [`KinematicPhysics`] is a small reference implementation good enough
//! for tests, benchmarks and headless runs.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use warp_core::arena::Arena;
//! use warp_core::fighter::{Fighter, FighterProfile};
//! use warp_core::geometry::Facing;
//! use warp_core::physics::{KinematicPhysics, PhysicsAdapter};
//!
//! let mut arena = Arena::new();
//! let id = arena.spawn_fighter(Fighter::spawn(
//!     &FighterProfile::hund(),
//!     Vec2::new(0.0, 3.0),
//!     Facing::Left,
//! ));
//!
//! let mut physics = KinematicPhysics::new(-20.0).with_floor(0.0);
//! for _ in 0..60 {
//!     physics.integrate(&mut arena, 1.0 / 30.0);
//! }
//! let body = arena.get(id).unwrap().body();
//! assert!(body.contacts.below >= 2);
//! ```

use crate::arena::Arena;
use crate::entity::{Body, ContactReport, Entity, EntityId};
use crate::geometry::Rect;
use crate::output::Contact;

/// Contact points reported along an axis while touching a surface.
pub const SURFACE_CONTACT_POINTS: u32 = 2;

/// What the simulation needs from a physics engine.
pub trait PhysicsAdapter: Send {
    /// Advances every non-static body by `dt` seconds and refreshes its
    /// contact counts.
    fn integrate(&mut self, arena: &mut Arena, dt: f32);

    /// Reports current overlaps: hitboxes against hurtboxes, and pickups
    /// against fighters.
    fn contacts(&self, arena: &Arena) -> Vec<Contact>;
}

// =============================================================================
// Overlap queries
// =============================================================================

/// Push box of a body, centred on its position.
#[must_use]
pub fn push_box(body: &Body) -> Rect {
    Rect {
        offset: body.position,
        size: body.size,
    }
}

/// Every hitbox/hurtbox and pickup/fighter overlap in the arena.
///
/// Reports come out in id order: attackers, then defenders, then hurtbox
/// index. A fighter's own hitbox is never reported against itself. Projectile
/// fighters never collect pickups.
#[must_use]
pub fn overlap_contacts(arena: &Arena) -> Vec<Contact> {
    let mut contacts = Vec::new();
    let fighters: Vec<(EntityId, &Entity)> = arena
        .entities_sorted()
        .filter(|entity| entity.as_fighter().is_some())
        .map(|entity| (entity.id(), entity))
        .collect();

    for (attacker, attacker_entity) in &fighters {
        let Some(fighter) = attacker_entity.as_fighter() else {
            continue;
        };
        let Some(hitbox) = fighter.hitbox() else {
            continue;
        };
        let strike = hitbox.world_rect(fighter.position());
        for (defender, defender_entity) in &fighters {
            if defender == attacker {
                continue;
            }
            let Some(target) = defender_entity.as_fighter() else {
                continue;
            };
            for (index, rect) in target.hurtboxes().hittable(target.position()) {
                if strike.overlaps(&rect) {
                    contacts.push(Contact::Hit {
                        attacker: *attacker,
                        defender: *defender,
                        hurtbox: index,
                    });
                }
            }
        }
    }

    for pickup in arena.entities_sorted().filter(|entity| entity.is_pickup()) {
        let collected = pickup.as_pickup().is_some_and(|gem| gem.is_collected());
        if collected {
            continue;
        }
        let gem = push_box(pickup.body());
        for (toucher, entity) in &fighters {
            if entity.is_projectile() {
                continue;
            }
            if gem.overlaps(&push_box(entity.body())) {
                contacts.push(Contact::Touch {
                    pickup: pickup.id(),
                    toucher: *toucher,
                });
            }
        }
    }

    contacts
}

// =============================================================================
// KinematicPhysics
// =============================================================================

/// Explicit-Euler bodies over an optional flat floor and side walls.
///
/// Surfaces report [`SURFACE_CONTACT_POINTS`] contacts along their axis while
/// a body rests against them, and zero otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicPhysics {
    gravity: f32,
    floor: Option<f32>,
    walls: Option<(f32, f32)>,
}

impl KinematicPhysics {
    /// Open space with the given vertical gravity.
    #[must_use]
    pub fn new(gravity: f32) -> Self {
        Self {
            gravity,
            floor: None,
            walls: None,
        }
    }

    /// Adds a floor surface at height `y`.
    #[must_use]
    pub fn with_floor(mut self, y: f32) -> Self {
        self.floor = Some(y);
        self
    }

    /// Adds walls at `left` and `right`.
    #[must_use]
    pub fn with_walls(mut self, left: f32, right: f32) -> Self {
        self.walls = Some((left.min(right), left.max(right)));
        self
    }

    /// Floor height, if any.
    #[must_use]
    pub fn floor(&self) -> Option<f32> {
        self.floor
    }

    fn step_body(&self, body: &mut Body, dt: f32) {
        if body.is_static {
            return;
        }
        body.velocity.y += self.gravity * body.gravity_scale * dt;
        body.position += body.velocity * dt;

        let half = body.size * 0.5;
        let mut contacts = ContactReport::default();

        if let Some(floor) = self.floor {
            // Bodies with no gravity (shots, homing hands) fly over pits.
            if body.gravity_scale != 0.0 && body.position.y - half.y <= floor {
                body.position.y = floor + half.y;
                body.velocity.y = body.velocity.y.max(0.0);
                contacts.below = SURFACE_CONTACT_POINTS;
            }
        }

        if let Some((left, right)) = self.walls {
            if body.position.x - half.x <= left {
                body.position.x = left + half.x;
                body.velocity.x = body.velocity.x.max(0.0);
                contacts.left = SURFACE_CONTACT_POINTS;
            } else if body.position.x + half.x >= right {
                body.position.x = right - half.x;
                body.velocity.x = body.velocity.x.min(0.0);
                contacts.right = SURFACE_CONTACT_POINTS;
            }
        }

        body.contacts = contacts;
    }
}

impl Default for KinematicPhysics {
    fn default() -> Self {
        Self::new(-20.0).with_floor(0.0)
    }
}

impl PhysicsAdapter for KinematicPhysics {
    fn integrate(&mut self, arena: &mut Arena, dt: f32) {
        for entity in arena.entities_sorted_mut() {
            self.step_body(entity.body_mut(), dt);
        }
    }

    fn contacts(&self, arena: &Arena) -> Vec<Contact> {
        overlap_contacts(arena)
    }
}

/// Physics that never moves anything. Useful to drive the combat core with
/// hand-placed fighters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StaticPhysics;

impl PhysicsAdapter for StaticPhysics {
    fn integrate(&mut self, _arena: &mut Arena, _dt: f32) {}

    fn contacts(&self, arena: &Arena) -> Vec<Contact> {
        overlap_contacts(arena)
    }
}
