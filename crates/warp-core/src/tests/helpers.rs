//! Test helper functions for setting up simulations and fighters.

use glam::Vec2;

use crate::entity::EntityId;
use crate::fighter::{Fighter, FighterProfile};
use crate::geometry::Facing;
use crate::output::Event;
use crate::physics::StaticPhysics;
use crate::simulation::Simulation;

// =============================================================================
// Setup
// =============================================================================

/// Installs a test-writer subscriber so `tracing` output shows up under
/// `cargo test -- --nocapture`. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// A simulation whose bodies never move on their own.
///
/// Scenario tests use this so that positions stay exactly where they were
/// placed and only resolver commands change velocities.
pub fn still_sim(seed: u64) -> Simulation {
    init_tracing();
    Simulation::new(seed).with_physics(Box::new(StaticPhysics))
}

/// Spawns an inert training dummy with `hp` hit points.
pub fn spawn_dummy(sim: &mut Simulation, position: Vec2, hp: u32) -> EntityId {
    sim.spawn_fighter(&FighterProfile::dummy().with_max_hp(hp), position, Facing::Left)
}

/// Starts `attack` on `id` directly, bypassing brains.
///
/// # Panics
///
/// Panics if `id` is not a fighter or refuses the attack.
pub fn force_attack(sim: &mut Simulation, id: EntityId, attack: crate::attack::AttackId) {
    let table = sim.table().clone();
    let fighter = sim.arena_mut().fighter_mut(id).expect("fighter exists");
    assert!(fighter.start_attack(attack, &table), "attack refused");
}

// =============================================================================
// Stepping & Queries
// =============================================================================

/// Steps until `done` holds or `max_ticks` have run.
///
/// Returns the number of steps taken if `done` became true.
pub fn run_until(
    sim: &mut Simulation,
    max_ticks: u64,
    mut done: impl FnMut(&Simulation) -> bool,
) -> Option<u64> {
    for taken in 1..=max_ticks {
        sim.step();
        if done(sim) {
            return Some(taken);
        }
    }
    None
}

/// Fighter state of `id`.
///
/// # Panics
///
/// Panics if `id` is gone.
pub fn fighter(sim: &Simulation, id: EntityId) -> &Fighter {
    sim.fighter(id).expect("fighter exists")
}

/// Hit points of `id`.
pub fn hp(sim: &Simulation, id: EntityId) -> u32 {
    fighter(sim, id).hp()
}

/// Drains the log, keeping only the events.
pub fn drain_events(sim: &Simulation) -> Vec<Event> {
    sim.take_events().into_iter().map(|e| e.event).collect()
}

/// Counts events matching `pred`.
pub fn count_events(events: &[Event], pred: impl Fn(&Event) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}
