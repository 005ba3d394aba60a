//! The per-entity attack state machine.
//!
//! Every combatant runs the same [`Fighter`] machine: the player, each enemy
//! archetype, and the projectiles they spawn. What differs is the
//! [`FighterProfile`] and the brain that feeds it decisions.
//!
//! # Tick order
//!
//! [`Fighter::tick`] runs these steps in a fixed order:
//!
//! 1. **Death**: at zero hit points enter `Dead` once, run the death
//!    sequence, drop a pickup on its terminal frame, and do nothing else.
//! 2. **Hitstun**: decrement it; while stunned no decisions or movement
//!    requests are issued, but attack counters keep running.
//! 3. **Completion**: when every counter is zero the current attack ends.
//! 4. **Dispatch**: the brain may move, turn and request an attack.
//! 5. **Startup**: at zero the hitbox comes out with a payload snapshot.
//! 6. **Active**: at zero the hitbox is withdrawn and recovery begins.
//! 7. **Recovery**: at zero any transform adjustment is undone.
//!
//! Attack side effects (lunges, teleports, guard windows, volleys) run
//! between steps 6 and 7.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use warp_core::attack::{AttackId, AttackTable};
//! use warp_core::fighter::{Fighter, FighterProfile, Phase};
//! use warp_core::geometry::Facing;
//!
//! let table = AttackTable::standard();
//! let mut hund = Fighter::spawn(&FighterProfile::hund(), Vec2::ZERO, Facing::Left);
//!
//! assert!(hund.start_attack(AttackId::HUND_BITE, &table));
//! assert_eq!(hund.phase(), Phase::Startup);
//! assert_eq!(hund.startup_remaining(), 7);
//!
//! // A second request is rejected until the first attack ends.
//! assert!(!hund.start_attack(AttackId::HUND_POUNCE, &table));
//! assert_eq!(hund.current_attack(), Some(AttackId::HUND_BITE));
//! ```

pub mod effects;
mod profile;
mod transform;

pub use profile::{BrainKind, FallOutRule, FighterProfile, ProjectileKind};

use std::fmt;

use glam::Vec2;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::ai::{AiPolicy, AiState, AiView};
use crate::attack::{AttackId, AttackTable};
use crate::config::SimConfig;
use crate::entity::{Body, EntityId, Faction, FighterFlags};
use crate::geometry::{Facing, HitGeometry};
use crate::hitbox::{ActiveHitbox, HitPayload};
use crate::hurtbox::{HurtboxSet, Shield};
use crate::input::{InputEvent, PlayerInput, PlayerView};
use crate::output::{Command, Event, Output};

/// Ticks from entering `Dead` to the terminal death frame.
pub const DEATH_FRAMES: u32 = 8;

// =============================================================================
// Phase
// =============================================================================

/// Coarse state of a fighter.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// No attack is current.
    #[default]
    Idle,
    /// Counting down to the hitbox.
    Startup,
    /// The hitbox is (or would be) out.
    Active,
    /// End lag.
    Recovery,
    /// Terminal. Entered once when hit points reach zero.
    Dead,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Startup => write!(f, "Startup"),
            Self::Active => write!(f, "Active"),
            Self::Recovery => write!(f, "Recovery"),
            Self::Dead => write!(f, "Dead"),
        }
    }
}

// =============================================================================
// Intent
// =============================================================================

/// Velocity request shape.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Movement {
    /// Leave velocity alone.
    #[default]
    Keep,
    /// Set horizontal velocity, keep vertical.
    Horizontal(f32),
    /// Set both components.
    Full(Vec2),
}

/// One tick's decision from a brain.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Intent {
    /// Velocity request.
    pub movement: Movement,
    /// Desired facing. Ignored during attacks.
    pub facing: Option<Facing>,
    /// Attack to start.
    pub attack: Option<AttackId>,
    /// Jump this tick.
    pub jump: bool,
    /// Held direction, used by aimed specials.
    pub aim: Vec2,
    /// Leave the level.
    pub exit: bool,
}

impl Intent {
    /// An intent that only moves.
    #[must_use]
    pub fn moving(movement: Movement) -> Self {
        Self {
            movement,
            ..Self::default()
        }
    }
}

// =============================================================================
// World Context
// =============================================================================

/// Everything a fighter may read or emit to during its tick.
///
/// Built by the simulation for each fighter; nothing is looked up globally.
#[derive(Debug)]
pub struct WorldContext<'a> {
    /// Shared attack data.
    pub table: &'a AttackTable,
    /// Shared hitbox shapes.
    pub geometry: &'a HitGeometry,
    /// Tuning values.
    pub config: &'a SimConfig,
    /// Position of the player, if one is alive.
    pub target: Option<Vec2>,
    /// Hitstun of the fighter this one is anchored to.
    pub anchor_hitstun: Option<u32>,
    /// Simulation random source.
    pub rng: &'a mut ChaCha8Rng,
    /// Output sink.
    pub outputs: &'a mut Vec<Output>,
}

impl WorldContext<'_> {
    /// Queues an output for the resolvers.
    pub fn emit(&mut self, output: impl Into<Output>) {
        self.outputs.push(output.into());
    }
}

// =============================================================================
// Fighter
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Brain {
    Player(PlayerInput),
    Ai(AiPolicy),
    Projectile { attack: AttackId, started: bool },
    Inert,
}

impl Brain {
    fn from_kind(kind: &BrainKind) -> Self {
        match kind {
            BrainKind::Player => Self::Player(PlayerInput::new()),
            BrainKind::Ai(profile) => Self::Ai(AiPolicy::new(profile.clone())),
            BrainKind::Projectile { attack } => Self::Projectile {
                attack: *attack,
                started: false,
            },
            BrainKind::Inert => Self::Inert,
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct DeathSequence {
    frame: u32,
    complete: bool,
}

/// A combatant and its attack state machine.
///
/// Other components mutate a fighter only through [`Fighter::reduce_hp`],
/// [`Fighter::apply_hitstun`] and [`Fighter::apply_knockback`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fighter {
    profile: FighterProfile,
    hp: u32,
    hitstun_frames: u32,
    facing: Facing,
    body: Body,
    phase: Phase,
    current_attack: Option<AttackId>,
    can_attack: bool,
    startup_remaining: u32,
    active_remaining: u32,
    recovery_remaining: u32,
    active_frames: u32,
    recovery_frames: u32,
    frame_index: u32,
    baseline: Vec2,
    adjusted: bool,
    adjustment: Vec2,
    aim: Vec2,
    hurtboxes: HurtboxSet,
    hitbox: Option<ActiveHitbox>,
    activations: u64,
    shield: Shield,
    flags: FighterFlags,
    brain: Brain,
    anchor: Option<EntityId>,
    death: DeathSequence,
    gems: u32,
    expended: bool,
}

impl Fighter {
    /// Creates a fighter from `profile` at `position`.
    ///
    /// Hurtboxes are authored facing right and mirrored for a left spawn.
    #[must_use]
    pub fn spawn(profile: &FighterProfile, position: Vec2, facing: Facing) -> Self {
        let mut hurtboxes = HurtboxSet::new(profile.hurtboxes.clone());
        if facing == Facing::Left {
            hurtboxes.mirror();
        }
        Self {
            profile: profile.clone(),
            hp: profile.max_hp,
            hitstun_frames: 0,
            facing,
            body: Body::new(position, profile.size).with_gravity_scale(profile.gravity_scale),
            phase: Phase::Idle,
            current_attack: None,
            can_attack: true,
            startup_remaining: 0,
            active_remaining: 0,
            recovery_remaining: 0,
            active_frames: 0,
            recovery_frames: 0,
            frame_index: 0,
            baseline: position,
            adjusted: false,
            adjustment: Vec2::ZERO,
            aim: Vec2::ZERO,
            hurtboxes,
            hitbox: None,
            activations: 0,
            shield: Shield::default(),
            flags: FighterFlags::empty(),
            brain: Brain::from_kind(&profile.brain),
            anchor: None,
            death: DeathSequence::default(),
            gems: 0,
            expended: false,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// The archetype this fighter was built from.
    #[must_use]
    pub fn profile(&self) -> &FighterProfile {
        &self.profile
    }

    /// Team tag.
    #[must_use]
    pub fn faction(&self) -> Faction {
        self.profile.faction
    }

    /// Current hit points.
    #[must_use]
    pub fn hp(&self) -> u32 {
        self.hp
    }

    /// Remaining hitstun.
    #[must_use]
    pub fn hitstun_frames(&self) -> u32 {
        self.hitstun_frames
    }

    /// Current facing.
    #[must_use]
    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Root position.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    /// Physical state.
    #[must_use]
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Physical state for the physics adapter.
    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// Coarse state.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Attack in progress.
    #[must_use]
    pub fn current_attack(&self) -> Option<AttackId> {
        self.current_attack
    }

    /// Returns true if a new attack would be accepted.
    #[must_use]
    pub fn can_attack(&self) -> bool {
        self.can_attack
    }

    /// Returns true while an attack is current.
    #[must_use]
    pub fn is_attacking(&self) -> bool {
        self.flags.contains(FighterFlags::ATTACKING)
    }

    /// Startup ticks left.
    #[must_use]
    pub fn startup_remaining(&self) -> u32 {
        self.startup_remaining
    }

    /// Active ticks left.
    #[must_use]
    pub fn active_remaining(&self) -> u32 {
        self.active_remaining
    }

    /// Recovery ticks left.
    #[must_use]
    pub fn recovery_remaining(&self) -> u32 {
        self.recovery_remaining
    }

    /// Ticks since the current attack started.
    #[must_use]
    pub fn frame_index(&self) -> u32 {
        self.frame_index
    }

    /// Damageable regions.
    #[must_use]
    pub fn hurtboxes(&self) -> &HurtboxSet {
        &self.hurtboxes
    }

    /// The live hitbox, if any.
    #[must_use]
    pub fn hitbox(&self) -> Option<&ActiveHitbox> {
        self.hitbox.as_ref()
    }

    pub(crate) fn hitbox_mut(&mut self) -> Option<&mut ActiveHitbox> {
        self.hitbox.as_mut()
    }

    #[cfg(test)]
    pub(crate) fn set_hitbox(&mut self, hitbox: Option<ActiveHitbox>) {
        self.hitbox = hitbox;
    }

    #[cfg(test)]
    pub(crate) fn hurtboxes_mut(&mut self) -> &mut HurtboxSet {
        &mut self.hurtboxes
    }

    /// Hurtboxes ignored because of the current attack.
    #[must_use]
    pub fn shield(&self) -> Shield {
        self.shield
    }

    /// Status flags.
    #[must_use]
    pub fn flags(&self) -> FighterFlags {
        self.flags
    }

    /// Gems collected.
    #[must_use]
    pub fn gems(&self) -> u32 {
        self.gems
    }

    /// Returns true until the fighter enters its death sequence.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.hp > 0 && self.phase != Phase::Dead
    }

    /// Returns true once the death sequence has reached its terminal frame.
    #[must_use]
    pub fn death_complete(&self) -> bool {
        self.death.complete
    }

    /// Death sequence frame counter.
    #[must_use]
    pub fn death_frame(&self) -> u32 {
        self.death.frame
    }

    /// Returns true for a projectile whose attack has run its course.
    #[must_use]
    pub fn is_spent(&self) -> bool {
        matches!(self.brain, Brain::Projectile { started: true, .. })
            && self.current_attack.is_none()
    }

    /// Returns true for a projectile that has landed its hit.
    #[must_use]
    pub fn is_expended(&self) -> bool {
        self.expended
    }

    /// Fighter whose hitstun this one mirrors.
    #[must_use]
    pub fn anchor(&self) -> Option<EntityId> {
        self.anchor
    }

    /// Ties this fighter's hitstun to `anchor`.
    pub fn set_anchor(&mut self, anchor: Option<EntityId>) {
        self.anchor = anchor;
    }

    /// AI policy, for AI-driven fighters.
    #[must_use]
    pub fn ai_policy(&self) -> Option<&AiPolicy> {
        match &self.brain {
            Brain::Ai(policy) => Some(policy),
            _ => None,
        }
    }

    /// Overwrites the AI counters. Returns false for fighters without AI.
    pub fn set_ai_state(&mut self, state: AiState) -> bool {
        match &mut self.brain {
            Brain::Ai(policy) => {
                policy.set_state(state);
                true
            }
            _ => false,
        }
    }

    /// Input adapter, for the player.
    #[must_use]
    pub fn player_input(&self) -> Option<&PlayerInput> {
        match &self.brain {
            Brain::Player(input) => Some(input),
            _ => None,
        }
    }

    /// Feeds an input edge. Returns false for fighters without input.
    pub fn push_input(&mut self, event: InputEvent) -> bool {
        match &mut self.brain {
            Brain::Player(input) => {
                input.apply(event);
                true
            }
            _ => false,
        }
    }

    /// Drops unconsumed presses.
    pub fn clear_pending_input(&mut self) {
        if let Brain::Player(input) = &mut self.brain {
            input.clear_presses();
        }
    }

    // -------------------------------------------------------------------------
    // Mutation contract
    // -------------------------------------------------------------------------

    /// Removes `amount` hit points, clamping at zero. Returns what is left.
    pub fn reduce_hp(&mut self, amount: u32) -> u32 {
        self.hp = self.hp.saturating_sub(amount);
        self.hp
    }

    /// Sets hitstun, replacing whatever remained.
    pub fn apply_hitstun(&mut self, frames: u32) {
        tracing::trace!(frames, previous = self.hitstun_frames, "hitstun applied");
        self.hitstun_frames = frames;
    }

    /// Adds an instantaneous impulse to the body.
    pub fn apply_knockback(&mut self, impulse: Vec2) {
        if self.body.is_static {
            return;
        }
        self.body.velocity += impulse;
    }

    /// Adds a gem. Returns the new total.
    pub fn collect_gem(&mut self) -> u32 {
        self.gems += 1;
        self.gems
    }

    /// Marks a projectile as used up by a landed hit.
    pub fn mark_expended(&mut self) {
        self.expended = true;
    }

    // -------------------------------------------------------------------------
    // Facing & attacks
    // -------------------------------------------------------------------------

    /// Turns to `facing`, mirroring hurtboxes. Refused during an attack.
    ///
    /// Returns true if the fighter now faces `facing`.
    pub fn face(&mut self, facing: Facing) -> bool {
        if facing == self.facing {
            return true;
        }
        if self.is_attacking() || !self.is_alive() {
            return false;
        }
        self.hurtboxes.mirror();
        self.facing = facing;
        true
    }

    /// Requests `id`. Accepted only while `can_attack` holds and the
    /// archetype's attack set allows the id.
    ///
    /// Unknown ids resolve to the blank attack. A pending transform
    /// adjustment from a cancelled attack is undone first.
    pub fn start_attack(&mut self, id: AttackId, table: &AttackTable) -> bool {
        if !self.is_alive() || !self.can_attack {
            tracing::debug!(attack = %id, "attack rejected: cannot attack");
            return false;
        }
        if !self.profile.attacks.allows(id) {
            tracing::debug!(
                attack = %id,
                fighter = %self.profile.name,
                "attack rejected: not in attack set"
            );
            return false;
        }
        let attack = table.resolve(id);

        self.undo_adjust_transform();
        self.current_attack = Some(id);
        self.startup_remaining = attack.startup_frames;
        self.active_remaining = 0;
        self.recovery_remaining = 0;
        self.active_frames = attack.active_frames;
        self.recovery_frames = attack.recovery_frames;
        self.frame_index = 0;
        self.can_attack = false;
        self.phase = Phase::Startup;
        self.shield = Shield {
            head: attack.invulnerable_head,
            all: attack.invulnerable_all,
        };
        self.flags.insert(FighterFlags::ATTACKING);
        self.flags.remove(FighterFlags::MOVEMENT_LOCKED);
        self.lock_movement_for(id);
        self.hurtboxes.turn_on();

        tracing::debug!(
            attack = %id,
            name = %attack.name,
            startup = attack.startup_frames,
            "attack started"
        );
        true
    }

    // -------------------------------------------------------------------------
    // Tick
    // -------------------------------------------------------------------------

    /// Advances the fighter by one simulation tick.
    pub fn tick(&mut self, id: EntityId, ctx: &mut WorldContext<'_>) {
        self.refresh_contact_flags(ctx.config.contact_threshold);
        if let Some(hitstun) = ctx.anchor_hitstun {
            if self.is_alive() {
                self.hitstun_frames = hitstun;
            }
        }
        self.check_fall_out(id, ctx);

        // 1. Death
        if self.hp == 0 {
            self.advance_death(id, ctx);
            return;
        }

        // 2. Hitstun
        let stunned = self.hitstun_frames > 0;
        if stunned {
            self.hitstun_frames -= 1;
            self.clear_pending_input();
            tracing::trace!(entity = %id, remaining = self.hitstun_frames, "in hitstun");
        }

        // 3. Completion
        if self.current_attack.is_some()
            && self.startup_remaining == 0
            && self.active_remaining == 0
            && self.recovery_remaining == 0
        {
            self.finish_attack(id, ctx);
        }

        // 4. Dispatch
        if !stunned {
            let intent = self.decide(ctx);
            self.apply_intent(id, intent, ctx);
        }

        // 5. Startup
        if self.startup_remaining > 0 {
            self.startup_remaining -= 1;
            if self.startup_remaining == 0 {
                self.activate_hitbox(id, ctx);
            }
        }

        // 6. Active
        if self.active_remaining > 0 {
            self.active_remaining -= 1;
            if self.profile.cancellable
                && self.active_frames.checked_sub(1) == Some(self.active_remaining)
            {
                self.can_attack = true;
                tracing::trace!(entity = %id, "cancel window open");
            }
            if self.active_remaining == 0 {
                self.drop_hitbox(id, ctx);
                self.recovery_remaining = self.recovery_frames.saturating_add(1);
                self.phase = Phase::Recovery;
            }
        }

        self.apply_attack_effects(id, ctx);

        // 7. Recovery
        if self.recovery_remaining > 0 {
            self.recovery_remaining -= 1;
            if self.recovery_remaining == 0 {
                self.undo_adjust_transform();
                self.flags.remove(FighterFlags::MOVEMENT_LOCKED);
                tracing::trace!(entity = %id, "recovery complete");
            }
        }

        if self.current_attack.is_some() {
            self.frame_index += 1;
        }
    }

    fn refresh_contact_flags(&mut self, threshold: u32) {
        let contacts = self.body.contacts;
        self.flags.set(FighterFlags::GROUNDED, contacts.below >= threshold);
        self.flags.set(FighterFlags::WALL_LEFT, contacts.left >= threshold);
        self.flags.set(FighterFlags::WALL_RIGHT, contacts.right >= threshold);
    }

    fn check_fall_out(&mut self, id: EntityId, ctx: &mut WorldContext<'_>) {
        if !self.is_alive() || self.body.position.y >= ctx.config.fall_out_y {
            return;
        }
        match self.profile.fall_out {
            FallOutRule::Kill => {
                tracing::debug!(entity = %id, y = self.body.position.y, "fell out, killed");
                self.hp = 0;
                ctx.emit(Event::FellOut {
                    entity: id,
                    respawned: false,
                });
            }
            FallOutRule::Respawn => {
                tracing::debug!(entity = %id, y = self.body.position.y, "fell out, respawned");
                self.undo_adjust_transform();
                self.body.position = ctx.config.player_respawn;
                self.body.velocity = Vec2::ZERO;
                self.baseline = self.body.position;
                ctx.emit(Event::FellOut {
                    entity: id,
                    respawned: true,
                });
            }
            FallOutRule::Ignore => {}
        }
    }

    fn advance_death(&mut self, id: EntityId, ctx: &mut WorldContext<'_>) {
        if self.phase != Phase::Dead {
            self.enter_death(id, ctx);
            return;
        }
        if self.death.complete {
            return;
        }
        self.death.frame += 1;
        if self.death.frame >= DEATH_FRAMES {
            self.death.complete = true;
            if self.profile.drops_pickup {
                ctx.emit(Command::SpawnPickup {
                    source: id,
                    position: self.body.position,
                });
            }
            ctx.emit(Event::DeathSequenceComplete { entity: id });
            tracing::debug!(entity = %id, "death sequence complete");
        }
    }

    fn enter_death(&mut self, id: EntityId, ctx: &mut WorldContext<'_>) {
        self.drop_hitbox(id, ctx);
        self.undo_adjust_transform();
        self.current_attack = None;
        self.startup_remaining = 0;
        self.active_remaining = 0;
        self.recovery_remaining = 0;
        self.hitstun_frames = 0;
        self.can_attack = false;
        self.shield = Shield::default();
        self.phase = Phase::Dead;
        self.flags = FighterFlags::DEAD;
        self.hurtboxes.turn_off();
        self.clear_pending_input();
        ctx.emit(Command::FreezeBody { target: id });
        ctx.emit(Event::Died { entity: id });
        tracing::debug!(entity = %id, fighter = %self.profile.name, "fighter died");
    }

    fn finish_attack(&mut self, id: EntityId, ctx: &mut WorldContext<'_>) {
        let finished = self.current_attack.take();
        self.drop_hitbox(id, ctx);
        self.undo_adjust_transform();
        self.phase = Phase::Idle;
        self.can_attack = true;
        self.frame_index = 0;
        self.shield = Shield::default();
        self.flags
            .remove(FighterFlags::ATTACKING | FighterFlags::MOVEMENT_LOCKED);
        self.hurtboxes.turn_on();
        if let Some(attack) = finished {
            tracing::debug!(entity = %id, attack = %attack, "attack finished");
        }
    }

    fn decide(&mut self, ctx: &mut WorldContext<'_>) -> Intent {
        let attacking = self.is_attacking();
        match &mut self.brain {
            Brain::Ai(policy) => {
                let view = AiView {
                    position: self.body.position,
                    target: ctx.target,
                    can_attack: self.can_attack,
                    attacking,
                };
                policy.decide(&view, &mut *ctx.rng)
            }
            Brain::Player(input) => {
                let view = PlayerView {
                    grounded: self.flags.contains(FighterFlags::GROUNDED),
                    wall_left: self.flags.contains(FighterFlags::WALL_LEFT),
                    wall_right: self.flags.contains(FighterFlags::WALL_RIGHT),
                    can_attack: self.can_attack,
                    attacking,
                    idle: self.phase == Phase::Idle,
                    gems: self.gems,
                };
                self.flags.set(FighterFlags::CROUCHING, input.crouching());
                self.flags.set(FighterFlags::JUMPING, input.jump_held());
                input.decide(&view, ctx.config)
            }
            Brain::Projectile { attack, started } => {
                if *started {
                    Intent::default()
                } else {
                    *started = true;
                    Intent {
                        attack: Some(*attack),
                        ..Intent::default()
                    }
                }
            }
            Brain::Inert => Intent::default(),
        }
    }

    fn apply_intent(&mut self, id: EntityId, intent: Intent, ctx: &mut WorldContext<'_>) {
        if intent.exit {
            tracing::debug!(entity = %id, gems = self.gems, "exit reached");
            ctx.emit(Event::ExitReached { entity: id });
        }
        self.aim = intent.aim;
        if let Some(facing) = intent.facing {
            self.face(facing);
        }
        if let Some(attack) = intent.attack {
            if self.start_attack(attack, ctx.table) {
                ctx.emit(Event::AttackStarted { source: id, attack });
            }
        }
        self.request_movement(id, intent, ctx);
    }

    fn request_movement(&mut self, id: EntityId, intent: Intent, ctx: &mut WorldContext<'_>) {
        if self.flags.contains(FighterFlags::MOVEMENT_LOCKED) {
            self.flags.remove(FighterFlags::MOVING);
            ctx.emit(Command::SetVelocity {
                target: id,
                velocity: Vec2::ZERO,
            });
            return;
        }
        let jump = intent.jump.then_some(ctx.config.jump_velocity);
        let command = match (intent.movement, jump) {
            (Movement::Keep, None) => None,
            (Movement::Keep, Some(vy)) => Some(Command::SetVelocity {
                target: id,
                velocity: Vec2::new(self.body.velocity.x, vy),
            }),
            (Movement::Horizontal(vx), None) => {
                Some(Command::SetHorizontalVelocity { target: id, vx })
            }
            (Movement::Horizontal(vx), Some(vy)) => Some(Command::SetVelocity {
                target: id,
                velocity: Vec2::new(vx, vy),
            }),
            (Movement::Full(velocity), _) => Some(Command::SetVelocity {
                target: id,
                velocity,
            }),
        };
        let moving = match intent.movement {
            Movement::Keep => self.flags.contains(FighterFlags::MOVING),
            Movement::Horizontal(vx) => vx != 0.0,
            Movement::Full(v) => v != Vec2::ZERO,
        };
        self.flags.set(FighterFlags::MOVING, moving);
        if let Some(command) = command {
            ctx.emit(command);
        }
    }

    fn activate_hitbox(&mut self, id: EntityId, ctx: &mut WorldContext<'_>) {
        let Some(attack_id) = self.current_attack else {
            return;
        };
        self.drop_hitbox(id, ctx);

        let table = ctx.table;
        let attack = table.resolve(attack_id);
        if let Some(kind) = effects::spawn_on_activation(attack_id) {
            let offset = Vec2::new(self.facing.sign() * ctx.config.projectile_spawn_offset, 0.0);
            ctx.emit(Command::SpawnProjectile {
                source: id,
                position: self.body.position + offset,
                facing: self.facing,
                player_owned: self.profile.is_player(),
                kind,
            });
            tracing::debug!(entity = %id, attack = %attack_id, %kind, "peer spawned on activation");
        } else {
            let rect = ctx.geometry.hitbox(attack_id, self.facing);
            if !rect.is_empty() {
                self.activations += 1;
                let payload = HitPayload::snapshot(attack, self.facing);
                self.hitbox = Some(ActiveHitbox::new(attack_id, self.activations, rect, payload));
                ctx.emit(Event::HitboxActivated {
                    source: id,
                    attack: attack_id,
                    activation: self.activations,
                });
                tracing::debug!(
                    entity = %id,
                    attack = %attack_id,
                    activation = self.activations,
                    "hitbox on"
                );
            }
        }

        self.active_remaining = self.active_frames.saturating_add(1);
        self.phase = Phase::Active;
    }

    fn drop_hitbox(&mut self, id: EntityId, ctx: &mut WorldContext<'_>) {
        if let Some(hitbox) = self.hitbox.take() {
            ctx.emit(Event::HitboxDeactivated {
                source: id,
                attack: hitbox.attack,
            });
            tracing::debug!(entity = %id, attack = %hitbox.attack, "hitbox off");
        }
    }
}
