//! Simulation module with the fixed-order tick.
//!
//! The `Simulation` struct owns the arena and drives one deterministic step
//! per host frame:
//!
//! 1. **CLOCK**: a frozen world clock swallows the whole tick
//! 2. **FIGHTERS**: every fighter runs its seven-step tick, in id order
//! 3. **RESOLUTION**: outputs are routed to resolvers until none remain
//! 4. **PHYSICS**: bodies integrate, then overlaps are reported and resolved
//! 5. **CLEANUP**: fallen pickups return to the player; finished deaths,
//!    expended projectiles and spent projectiles leave the arena
//!
//! # Determinism
//!
//! - Fighters are ticked in id order (via `BTreeMap`)
//! - Outputs are resolved in emission order
//! - All AI randomness comes from one `ChaCha8Rng` seeded with the master
//!   seed
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use warp_core::fighter::FighterProfile;
//! use warp_core::geometry::Facing;
//! use warp_core::input::InputEvent;
//! use warp_core::simulation::Simulation;
//!
//! let mut sim = Simulation::new(42);
//! sim.spawn_player(Vec2::new(0.0, 0.8));
//! sim.spawn_fighter(&FighterProfile::hund(), Vec2::new(4.0, 0.5), Facing::Left);
//!
//! sim.push_input(InputEvent::NormalAttackPressed).unwrap();
//! for _ in 0..10 {
//!     sim.step();
//! }
//! assert_eq!(sim.tick(), 10);
//! ```

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::arena::Arena;
use crate::attack::AttackTable;
use crate::clock::WorldClock;
use crate::config::SimConfig;
use crate::entity::{Entity, EntityId, EntityInner};
use crate::error::{CombatError, Result};
use crate::fighter::{Fighter, FighterProfile, WorldContext};
use crate::geometry::{Facing, HitGeometry};
use crate::input::InputEvent;
use crate::output::{Command, Event, Output};
use crate::physics::{KinematicPhysics, PhysicsAdapter};
use crate::presentation::PresentationFrame;
use crate::resolver::{
    CombatResolver, EventResolver, HitRules, PhysicsResolver, PickupResolver, Resolver,
    SpawnResolver, TickEvent,
};

/// Upper bound on resolve/follow-up rounds within one phase.
///
/// Follow-ups only ever go one or two levels deep (hit, then impulse and
/// events). Hitting the bound means a resolver is feeding itself.
pub const MAX_RESOLUTION_ROUNDS: usize = 8;

// =============================================================================
// Simulation
// =============================================================================

/// The main simulation orchestrator.
///
/// `Simulation` manages:
/// - The arena of fighters, projectiles and pickups
/// - The world clock (hitstop)
/// - Shared attack data and hit geometry
/// - The physics adapter
/// - Resolvers for output processing and the event log
/// - The seeded random source for AI decisions
pub struct Simulation {
    arena: Arena,
    clock: WorldClock,
    config: SimConfig,
    table: AttackTable,
    geometry: HitGeometry,
    rules: HitRules,
    physics: Box<dyn PhysicsAdapter>,
    resolvers: Vec<Box<dyn Resolver>>,
    events: EventResolver,
    rng: ChaCha8Rng,
    master_seed: u64,
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("arena", &self.arena)
            .field("clock", &self.clock)
            .field("config", &self.config)
            .field("resolvers", &format!("[{} resolvers]", self.resolvers.len()))
            .field("master_seed", &self.master_seed)
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Creates a simulation with default tuning, the standard attack table
    /// and a flat floor at `y = 0`.
    ///
    /// # Example
    ///
    /// ```
    /// use warp_core::simulation::Simulation;
    ///
    /// let sim = Simulation::new(12345);
    /// assert_eq!(sim.tick(), 0);
    /// assert_eq!(sim.seed(), 12345);
    /// ```
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::build(seed, SimConfig::default())
    }

    /// Creates a simulation with custom tuning.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::InvalidConfig`] if `config` fails validation.
    pub fn with_config(seed: u64, config: SimConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(seed, config))
    }

    fn build(seed: u64, config: SimConfig) -> Self {
        let rules = HitRules::default();
        let physics = KinematicPhysics::new(config.gravity).with_floor(0.0);
        Self {
            arena: Arena::new(),
            clock: WorldClock::new(),
            resolvers: Self::default_resolvers(&config, &rules),
            config,
            table: AttackTable::standard(),
            geometry: HitGeometry::standard(),
            rules,
            physics: Box::new(physics),
            events: EventResolver::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            master_seed: seed,
        }
    }

    fn default_resolvers(config: &SimConfig, rules: &HitRules) -> Vec<Box<dyn Resolver>> {
        vec![
            Box::new(PhysicsResolver::new()),
            Box::new(SpawnResolver::new(config.clone())),
            Box::new(CombatResolver::new(rules.clone()).with_hitstop(config.hitstop_frames)),
            Box::new(PickupResolver::new()),
        ]
    }

    /// Replaces the physics adapter.
    #[must_use]
    pub fn with_physics(mut self, physics: Box<dyn PhysicsAdapter>) -> Self {
        self.physics = physics;
        self
    }

    /// Replaces the faction rules used by combat resolution.
    #[must_use]
    pub fn with_hit_rules(mut self, rules: HitRules) -> Self {
        self.resolvers = Self::default_resolvers(&self.config, &rules);
        self.rules = rules;
        self
    }

    /// Replaces the attack table. Fighters already mid-swing keep the
    /// payload they snapshotted.
    pub fn set_attack_table(&mut self, table: AttackTable) {
        self.table = table;
    }

    /// Replaces the hitbox geometry.
    pub fn set_hit_geometry(&mut self, geometry: HitGeometry) {
        self.geometry = geometry;
    }

    /// Adds a custom resolver. It runs after the built-in ones.
    pub fn add_resolver(&mut self, resolver: Box<dyn Resolver>) {
        self.resolvers.push(resolver);
    }

    // -------------------------------------------------------------------------
    // Setup
    // -------------------------------------------------------------------------

    /// Spawns a fighter from `profile`.
    pub fn spawn_fighter(
        &mut self,
        profile: &FighterProfile,
        position: Vec2,
        facing: Facing,
    ) -> EntityId {
        let id = self
            .arena
            .spawn_fighter(Fighter::spawn(profile, position, facing));
        tracing::debug!(
            entity = %id,
            fighter = %profile.name,
            x = position.x,
            y = position.y,
            "fighter spawned"
        );
        id
    }

    /// Spawns the player facing right.
    pub fn spawn_player(&mut self, position: Vec2) -> EntityId {
        self.spawn_fighter(&FighterProfile::player(), position, Facing::Right)
    }

    /// Ties `fighter`'s hitstun to `anchor`'s.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::UnknownEntity`] if either id is not a fighter.
    pub fn anchor(&mut self, fighter: EntityId, anchor: EntityId) -> Result<()> {
        if self.arena.fighter(anchor).is_none() {
            return Err(CombatError::UnknownEntity(anchor));
        }
        self.arena.require_fighter_mut(fighter)?.set_anchor(Some(anchor));
        Ok(())
    }

    /// Feeds a player input edge. Presses are consumed by the player's next
    /// dispatch, or dropped if the player is in hitstun.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::NoPlayer`] if no player has been spawned.
    pub fn push_input(&mut self, event: InputEvent) -> Result<()> {
        let id = self.arena.player_id().ok_or(CombatError::NoPlayer)?;
        let player = self.arena.require_fighter_mut(id)?;
        player.push_input(event);
        tracing::trace!(?event, "input queued");
        Ok(())
    }

    /// Freezes the world for `frames` ticks, as a landed hit would.
    pub fn freeze(&mut self, frames: u32) {
        self.clock.freeze(frames);
    }

    // -------------------------------------------------------------------------
    // Step
    // -------------------------------------------------------------------------

    /// Executes one simulation tick.
    ///
    /// A frozen clock consumes the tick: nothing but the tick counter
    /// changes.
    pub fn step(&mut self) {
        let tick = self.arena.current_tick();
        if self.clock.consume_tick() {
            tracing::trace!(tick, remaining = self.clock.freeze_frames_remaining(), "tick frozen");
            self.arena.advance_tick();
            return;
        }

        let outputs = self.tick_fighters();
        self.dispatch(outputs);

        self.physics.integrate(&mut self.arena, self.config.dt());
        let contacts: Vec<Output> = self
            .physics
            .contacts(&self.arena)
            .into_iter()
            .map(Output::from)
            .collect();
        self.dispatch(contacts);

        let recovered = self.recover_fallen_pickups();
        self.dispatch(recovered);
        self.sweep();

        self.arena.advance_tick();
    }

    /// Runs `ticks` steps.
    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.step();
        }
    }

    fn tick_fighters(&mut self) -> Vec<Output> {
        let mut outputs = Vec::new();
        for id in self.arena.fighter_ids() {
            let target = self.arena.player_position();
            let anchor_hitstun = self
                .arena
                .fighter(id)
                .and_then(Fighter::anchor)
                .and_then(|anchor| self.arena.fighter(anchor))
                .map(Fighter::hitstun_frames);
            let Some(fighter) = self.arena.fighter_mut(id) else {
                continue;
            };
            let mut ctx = WorldContext {
                table: &self.table,
                geometry: &self.geometry,
                config: &self.config,
                target,
                anchor_hitstun,
                rng: &mut self.rng,
                outputs: &mut outputs,
            };
            fighter.tick(id, &mut ctx);
        }
        outputs
    }

    /// Routes outputs to resolvers, then routes what they produce, until
    /// nothing is left.
    fn dispatch(&mut self, outputs: Vec<Output>) {
        let mut pending = outputs;
        let mut rounds = 0;
        while !pending.is_empty() {
            if rounds == MAX_RESOLUTION_ROUNDS {
                tracing::warn!(dropped = pending.len(), "resolution did not settle");
                break;
            }
            rounds += 1;

            let mut follow_up = Vec::new();
            self.apply_hitstop(&pending, &mut follow_up);
            for resolver in &self.resolvers {
                let relevant: Vec<&Output> = pending
                    .iter()
                    .filter(|output| resolver.handles().contains(&output.kind()))
                    .collect();
                if !relevant.is_empty() {
                    resolver.resolve(&relevant, &mut self.arena, &mut follow_up);
                }
            }
            let events: Vec<&Output> = pending
                .iter()
                .filter(|output| self.events.handles().contains(&output.kind()))
                .collect();
            if !events.is_empty() {
                self.events.resolve(&events, &mut self.arena, &mut follow_up);
            }
            pending = follow_up;
        }
    }

    fn apply_hitstop(&mut self, outputs: &[Output], follow_up: &mut Vec<Output>) {
        let frames = outputs
            .iter()
            .filter_map(|output| match output.as_command() {
                Some(Command::Hitstop { frames }) => Some(*frames),
                _ => None,
            })
            .max();
        if let Some(frames) = frames.filter(|frames| *frames > 0) {
            self.clock.freeze(frames);
            follow_up.push(Event::HitstopStarted { frames }.into());
        }
    }

    fn recover_fallen_pickups(&mut self) -> Vec<Output> {
        let mut outputs = Vec::new();
        let Some(player) = self.arena.player_position() else {
            return outputs;
        };
        for id in self.arena.pickup_ids() {
            let Some(entity) = self.arena.get_mut(id) else {
                continue;
            };
            let body = entity.body_mut();
            if body.position.y < self.config.fall_out_y {
                body.position = player;
                body.velocity = Vec2::ZERO;
                tracing::debug!(pickup = %id, "pickup fell out, returned to player");
                outputs.push(
                    Event::FellOut {
                        entity: id,
                        respawned: true,
                    }
                    .into(),
                );
            }
        }
        outputs
    }

    fn sweep(&mut self) {
        let finished: Vec<EntityId> = self
            .arena
            .entities_sorted()
            .filter(|entity| Self::is_finished(entity))
            .map(Entity::id)
            .collect();
        for id in finished {
            tracing::debug!(entity = %id, "removed");
            self.arena.despawn(id);
        }
    }

    fn is_finished(entity: &Entity) -> bool {
        match entity.inner() {
            EntityInner::Fighter(fighter) => {
                (fighter.death_complete() && !fighter.profile().is_player())
                    || fighter.is_expended()
                    || fighter.is_spent()
            }
            EntityInner::Pickup(pickup) => pickup.is_collected(),
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Drains the event log.
    pub fn take_events(&self) -> Vec<TickEvent> {
        self.events.take_events()
    }

    /// What a renderer needs for every fighter, in id order.
    #[must_use]
    pub fn presentation(&self) -> Vec<PresentationFrame> {
        self.arena
            .entities_sorted()
            .filter_map(|entity| {
                entity
                    .as_fighter()
                    .map(|fighter| PresentationFrame::of(entity.id(), fighter))
            })
            .collect()
    }

    /// Hash over the full simulation state.
    ///
    /// Equal hashes after equal inputs are how determinism is checked.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.arena.current_tick().hash(&mut hasher);
        self.clock.freeze_frames_remaining().hash(&mut hasher);
        for entity in self.arena.entities_sorted() {
            entity.id().hash(&mut hasher);
            entity.tag().hash(&mut hasher);
            let body = entity.body();
            hash_vec2(body.position, &mut hasher);
            hash_vec2(body.velocity, &mut hasher);
            if let Some(fighter) = entity.as_fighter() {
                fighter.hp().hash(&mut hasher);
                fighter.hitstun_frames().hash(&mut hasher);
                fighter.phase().hash(&mut hasher);
                fighter.facing().hash(&mut hasher);
                fighter.current_attack().hash(&mut hasher);
                fighter.startup_remaining().hash(&mut hasher);
                fighter.active_remaining().hash(&mut hasher);
                fighter.recovery_remaining().hash(&mut hasher);
                fighter.can_attack().hash(&mut hasher);
                fighter.gems().hash(&mut hasher);
                fighter.flags().bits().hash(&mut hasher);
                if let Some(state) = fighter.ai_policy().map(|policy| policy.state()) {
                    state.wait_frames().hash(&mut hasher);
                    state.action_frames().hash(&mut hasher);
                }
            }
        }
        hasher.finish()
    }

    /// The arena.
    #[must_use]
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Mutable arena, for level setup between steps.
    #[must_use]
    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    /// Fighter state of `id`.
    #[must_use]
    pub fn fighter(&self, id: EntityId) -> Option<&Fighter> {
        self.arena.fighter(id)
    }

    /// The player's id, if one is in the arena.
    #[must_use]
    pub fn player(&self) -> Option<EntityId> {
        self.arena.player_id()
    }

    /// Ticks elapsed, frozen ones included.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.arena.current_tick()
    }

    /// The world clock.
    #[must_use]
    pub fn clock(&self) -> &WorldClock {
        &self.clock
    }

    /// Tuning values.
    #[must_use]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Attack data.
    #[must_use]
    pub fn table(&self) -> &AttackTable {
        &self.table
    }

    /// Hitbox geometry.
    #[must_use]
    pub fn geometry(&self) -> &HitGeometry {
        &self.geometry
    }

    /// Faction rules.
    #[must_use]
    pub fn hit_rules(&self) -> &HitRules {
        &self.rules
    }

    /// Master seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.master_seed
    }

    /// Number of resolvers, event log excluded.
    #[must_use]
    pub fn resolver_count(&self) -> usize {
        self.resolvers.len()
    }
}

fn hash_vec2(v: Vec2, hasher: &mut impl Hasher) {
    v.x.to_bits().hash(hasher);
    v.y.to_bits().hash(hasher);
}

// =============================================================================
// Tests
// =============================================================================
