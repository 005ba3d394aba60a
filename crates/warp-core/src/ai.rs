//! Wait/act scheduler that drives every non-player fighter.
//!
//! One generic policy replaces per-enemy controllers. What differs between
//! enemies is data: an [`AiProfile`] says how the fighter moves and which
//! attacks it starts under which trigger.
//!
//! Each tick the policy:
//!
//! 1. re-rolls `wait` in `[1, 90)` and `action` in `[1, 15)` when `action`
//!    has run out,
//! 2. idles while `wait > 0`,
//! 3. otherwise halts outside the engagement radius, attacks when a trigger
//!    matches, or walks toward the target, then spends one action frame.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use warp_core::ai::{AiPolicy, AiProfile, AiRule, AiState, AiView, Locomotion, Trigger};
//! use warp_core::attack::AttackId;
//!
//! let profile = AiProfile::new(Locomotion::Ground { speed: 3.0 })
//!     .with_rule(AiRule::single(Trigger::WithinDistance(1.0), AttackId::HUND_BITE));
//! let mut policy = AiPolicy::with_state(profile, AiState::new(0, 5));
//! let mut rng = ChaCha8Rng::seed_from_u64(7);
//!
//! let intent = policy.decide(
//!     &AiView {
//!         position: Vec2::ZERO,
//!         target: Some(Vec2::new(0.5, 0.0)),
//!         can_attack: true,
//!         attacking: false,
//!     },
//!     &mut rng,
//! );
//! assert_eq!(intent.attack, Some(AttackId::HUND_BITE));
//! assert_eq!(policy.state().action_frames(), 4);
//! ```

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::attack::AttackId;
use crate::error::{CombatError, Result};
use crate::fighter::{Intent, Movement};
use crate::geometry::Facing;

/// Distance beyond which enemies stand still.
pub const ENGAGEMENT_RADIUS: f32 = 7.0;

/// Below this length a homing direction is considered degenerate.
const DIRECTION_EPSILON: f32 = 1.0e-5;

// =============================================================================
// Profile
// =============================================================================

/// How a fighter moves toward its target.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum Locomotion {
    /// Walks horizontally and leaves vertical velocity to gravity.
    Ground {
        /// Walk speed in units per second.
        speed: f32,
    },
    /// Flies straight at the target, diagonals included.
    Homing {
        /// Flight speed in units per second.
        speed: f32,
    },
    /// Never moves; only turns to face the target.
    Stationary,
}

/// Condition under which an [`AiRule`] fires.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum Trigger {
    /// Euclidean distance to the target is strictly below the radius.
    WithinDistance(f32),
    /// Vertical offset to the target is strictly below the threshold.
    VerticallyAligned(f32),
}

impl Trigger {
    /// Tests the trigger against `offset = target - position`.
    #[must_use]
    pub fn matches(self, offset: Vec2) -> bool {
        match self {
            Self::WithinDistance(radius) => offset.length() < radius,
            Self::VerticallyAligned(threshold) => offset.y.abs() < threshold,
        }
    }
}

/// One weighted attack option.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackChoice {
    /// Attack to start.
    pub attack: AttackId,
    /// Relative weight. Zero-weight choices are never picked.
    pub weight: u32,
}

/// A trigger and the attacks it may start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiRule {
    /// When the rule fires.
    pub trigger: Trigger,
    /// What it starts.
    pub choices: Vec<AttackChoice>,
}

impl AiRule {
    /// A rule with a single attack.
    #[must_use]
    pub fn single(trigger: Trigger, attack: AttackId) -> Self {
        Self {
            trigger,
            choices: vec![AttackChoice { attack, weight: 1 }],
        }
    }

    /// A rule choosing among several weighted attacks.
    #[must_use]
    pub fn weighted(trigger: Trigger, choices: impl IntoIterator<Item = (AttackId, u32)>) -> Self {
        Self {
            trigger,
            choices: choices
                .into_iter()
                .map(|(attack, weight)| AttackChoice { attack, weight })
                .collect(),
        }
    }

    /// Picks an attack. A single choice never draws from `rng`.
    fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<AttackId> {
        if let [only] = self.choices.as_slice() {
            return Some(only.attack);
        }
        let total: u32 = self.choices.iter().map(|choice| choice.weight).sum();
        if total == 0 {
            return None;
        }
        let mut roll = rng.gen_range(0..total);
        for choice in &self.choices {
            if roll < choice.weight {
                return Some(choice.attack);
            }
            roll -= choice.weight;
        }
        None
    }
}

/// Per-archetype AI tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiProfile {
    /// Targets at or beyond this distance are ignored.
    pub engagement_radius: f32,
    /// Half-open range `wait` is rolled from.
    pub wait_range: (u32, u32),
    /// Half-open range `action` is rolled from.
    pub action_range: (u32, u32),
    /// Movement style.
    pub locomotion: Locomotion,
    /// Attack rules, tried in order. The first matching rule wins.
    pub rules: Vec<AiRule>,
}

impl AiProfile {
    /// A profile with the standard timing and no attack rules.
    #[must_use]
    pub fn new(locomotion: Locomotion) -> Self {
        Self {
            engagement_radius: ENGAGEMENT_RADIUS,
            wait_range: (1, 90),
            action_range: (1, 15),
            locomotion,
            rules: Vec::new(),
        }
    }

    /// Appends an attack rule.
    #[must_use]
    pub fn with_rule(mut self, rule: AiRule) -> Self {
        self.rules.push(rule);
        self
    }
}

// =============================================================================
// State & Policy
// =============================================================================

/// Wait and action counters.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiState {
    wait_frames: u32,
    action_frames: u32,
}

impl AiState {
    /// Creates a state with explicit counters.
    #[must_use]
    pub const fn new(wait_frames: u32, action_frames: u32) -> Self {
        Self {
            wait_frames,
            action_frames,
        }
    }

    /// Ticks left to idle before acting.
    #[must_use]
    pub const fn wait_frames(&self) -> u32 {
        self.wait_frames
    }

    /// Acting ticks left before the next re-roll.
    #[must_use]
    pub const fn action_frames(&self) -> u32 {
        self.action_frames
    }
}

/// What the policy sees of the world.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AiView {
    /// Own position.
    pub position: Vec2,
    /// Target position, if there is a target.
    pub target: Option<Vec2>,
    /// The fighter may start an attack.
    pub can_attack: bool,
    /// An attack is in progress.
    pub attacking: bool,
}

/// An AI profile together with its running counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiPolicy {
    profile: AiProfile,
    state: AiState,
}

impl AiPolicy {
    /// A policy that re-rolls on its first tick.
    #[must_use]
    pub fn new(profile: AiProfile) -> Self {
        Self::with_state(profile, AiState::default())
    }

    /// A policy starting from explicit counters.
    #[must_use]
    pub fn with_state(profile: AiProfile, state: AiState) -> Self {
        Self { profile, state }
    }

    /// The tuning data.
    #[must_use]
    pub fn profile(&self) -> &AiProfile {
        &self.profile
    }

    /// The counters.
    #[must_use]
    pub fn state(&self) -> AiState {
        self.state
    }

    /// Overwrites the counters.
    pub fn set_state(&mut self, state: AiState) {
        self.state = state;
    }

    /// Runs one tick of the wait/act schedule.
    ///
    /// Only called for fighters that are alive and out of hitstun.
    pub fn decide<R: Rng + ?Sized>(&mut self, view: &AiView, rng: &mut R) -> Intent {
        if self.state.action_frames == 0 {
            self.reroll(rng);
        }

        if self.state.wait_frames > 0 {
            self.state.wait_frames -= 1;
            return Intent::moving(self.halt());
        }

        let intent = self.act(view, rng);
        self.state.action_frames = self.state.action_frames.saturating_sub(1);
        intent
    }

    fn reroll<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let (wait_lo, wait_hi) = self.profile.wait_range;
        let (act_lo, act_hi) = self.profile.action_range;
        self.state.wait_frames = roll(rng, wait_lo, wait_hi);
        self.state.action_frames = roll(rng, act_lo, act_hi).max(1);
        tracing::trace!(
            wait = self.state.wait_frames,
            action = self.state.action_frames,
            "ai re-rolled"
        );
    }

    fn act<R: Rng + ?Sized>(&self, view: &AiView, rng: &mut R) -> Intent {
        let Some(target) = view.target else {
            return Intent::moving(self.halt());
        };
        let offset = target - view.position;
        if offset.length() >= self.profile.engagement_radius {
            return Intent::moving(self.halt());
        }

        if view.can_attack {
            let chosen = self
                .profile
                .rules
                .iter()
                .find(|rule| rule.trigger.matches(offset))
                .and_then(|rule| rule.pick(rng));
            if let Some(attack) = chosen {
                return Intent {
                    attack: Some(attack),
                    ..Intent::default()
                };
            }
        }

        if view.attacking {
            return Intent::default();
        }

        let facing = Facing::from_dx(offset.x);
        let movement = match self.profile.locomotion {
            Locomotion::Ground { speed } => match facing {
                Some(facing) => Movement::Horizontal(speed * facing.sign()),
                None => Movement::Horizontal(0.0),
            },
            Locomotion::Homing { speed } => match direction_to(view.position, target) {
                Ok(direction) => Movement::Full(direction * speed),
                Err(err) => {
                    tracing::debug!(%err, "homing movement skipped");
                    Movement::Keep
                }
            },
            Locomotion::Stationary => Movement::Keep,
        };
        Intent {
            movement,
            facing,
            ..Intent::default()
        }
    }

    fn halt(&self) -> Movement {
        match self.profile.locomotion {
            Locomotion::Ground { .. } | Locomotion::Stationary => Movement::Horizontal(0.0),
            Locomotion::Homing { .. } => Movement::Full(Vec2::ZERO),
        }
    }
}

fn roll<R: Rng + ?Sized>(rng: &mut R, lo: u32, hi: u32) -> u32 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

/// Unit vector from `from` toward `to`.
///
/// # Errors
///
/// Returns [`CombatError::DegenerateDirection`] when the points coincide.
pub fn direction_to(from: Vec2, to: Vec2) -> Result<Vec2> {
    let delta = to - from;
    let length = delta.length();
    if !length.is_finite() || length < DIRECTION_EPSILON {
        return Err(CombatError::DegenerateDirection);
    }
    Ok(delta / length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn hund_like() -> AiProfile {
        AiProfile::new(Locomotion::Ground { speed: 3.0 })
            .with_rule(AiRule::single(Trigger::WithinDistance(1.0), AttackId::HUND_BITE))
            .with_rule(AiRule::single(
                Trigger::WithinDistance(3.0),
                AttackId::HUND_POUNCE,
            ))
    }

    fn view(target: Vec2) -> AiView {
        AiView {
            position: Vec2::ZERO,
            target: Some(target),
            can_attack: true,
            attacking: false,
        }
    }

    mod schedule_tests {
        use super::*;

        #[test]
        fn reroll_stays_in_range() {
            let mut rng = ChaCha8Rng::seed_from_u64(1);
            for _ in 0..200 {
                let mut policy = AiPolicy::new(hund_like());
                policy.decide(&view(Vec2::new(20.0, 0.0)), &mut rng);
                let state = policy.state();
                // One wait frame was spent on the re-roll tick.
                assert!(state.wait_frames() < 89);
                assert!((1..15).contains(&state.action_frames()));
            }
        }

        #[test]
        fn waiting_halts_and_spends_no_action() {
            let mut rng = ChaCha8Rng::seed_from_u64(2);
            let mut policy = AiPolicy::with_state(hund_like(), AiState::new(3, 5));
            let intent = policy.decide(&view(Vec2::new(0.5, 0.0)), &mut rng);
            assert_eq!(intent.attack, None);
            assert_eq!(intent.movement, Movement::Horizontal(0.0));
            assert_eq!(policy.state(), AiState::new(2, 5));
        }

        #[test]
        fn out_of_range_halts() {
            let mut rng = ChaCha8Rng::seed_from_u64(3);
            let mut policy = AiPolicy::with_state(hund_like(), AiState::new(0, 5));
            let intent = policy.decide(&view(Vec2::new(7.0, 0.0)), &mut rng);
            assert_eq!(intent.attack, None);
            assert_eq!(intent.movement, Movement::Horizontal(0.0));
            assert_eq!(policy.state().action_frames(), 4);
        }

        #[test]
        fn no_target_halts() {
            let mut rng = ChaCha8Rng::seed_from_u64(3);
            let mut policy = AiPolicy::with_state(hund_like(), AiState::new(0, 2));
            let intent = policy.decide(
                &AiView {
                    target: None,
                    ..view(Vec2::ZERO)
                },
                &mut rng,
            );
            assert_eq!(intent.movement, Movement::Horizontal(0.0));
        }
    }

    mod trigger_tests {
        use super::*;

        #[test]
        fn melee_trigger_starts_attack() {
            let mut rng = ChaCha8Rng::seed_from_u64(4);
            let mut policy = AiPolicy::with_state(hund_like(), AiState::new(0, 5));
            let intent = policy.decide(&view(Vec2::new(0.5, 0.0)), &mut rng);
            assert_eq!(intent.attack, Some(AttackId::HUND_BITE));
            assert_eq!(policy.state().action_frames(), 4);
        }

        #[test]
        fn first_matching_rule_wins() {
            let mut rng = ChaCha8Rng::seed_from_u64(4);
            let mut policy = AiPolicy::with_state(hund_like(), AiState::new(0, 5));
            let intent = policy.decide(&view(Vec2::new(-2.0, 0.0)), &mut rng);
            assert_eq!(intent.attack, Some(AttackId::HUND_POUNCE));
        }

        #[test]
        fn cannot_attack_moves_instead() {
            let mut rng = ChaCha8Rng::seed_from_u64(5);
            let mut policy = AiPolicy::with_state(hund_like(), AiState::new(0, 5));
            let intent = policy.decide(
                &AiView {
                    can_attack: false,
                    ..view(Vec2::new(-0.5, 0.0))
                },
                &mut rng,
            );
            assert_eq!(intent.attack, None);
            assert_eq!(intent.movement, Movement::Horizontal(-3.0));
            assert_eq!(intent.facing, Some(Facing::Left));
        }

        #[test]
        fn attacking_holds_still() {
            let mut rng = ChaCha8Rng::seed_from_u64(5);
            let mut policy = AiPolicy::with_state(hund_like(), AiState::new(0, 5));
            let intent = policy.decide(
                &AiView {
                    can_attack: false,
                    attacking: true,
                    ..view(Vec2::new(4.0, 0.0))
                },
                &mut rng,
            );
            assert_eq!(intent, Intent::default());
        }

        #[test]
        fn vertical_alignment_trigger() {
            assert!(Trigger::VerticallyAligned(0.5).matches(Vec2::new(6.0, 0.2)));
            assert!(!Trigger::VerticallyAligned(0.5).matches(Vec2::new(0.0, 0.5)));
        }

        #[test]
        fn weighted_choice_covers_all_options() {
            let rule = AiRule::weighted(
                Trigger::WithinDistance(1.0),
                [(AttackId::SHROOM_KICK, 1), (AttackId::SHROOM_SPORE, 1)],
            );
            let mut rng = ChaCha8Rng::seed_from_u64(6);
            let picks: Vec<_> = (0..64).filter_map(|_| rule.pick(&mut rng)).collect();
            assert!(picks.contains(&AttackId::SHROOM_KICK));
            assert!(picks.contains(&AttackId::SHROOM_SPORE));
        }

        #[test]
        fn zero_weights_pick_nothing() {
            let rule = AiRule::weighted(
                Trigger::WithinDistance(1.0),
                [(AttackId::SHROOM_KICK, 0), (AttackId::SHROOM_SPORE, 0)],
            );
            let mut rng = ChaCha8Rng::seed_from_u64(6);
            assert_eq!(rule.pick(&mut rng), None);
        }
    }

    mod locomotion_tests {
        use super::*;

        #[test]
        fn homing_moves_diagonally() {
            let profile = AiProfile::new(Locomotion::Homing { speed: 2.0 });
            let mut policy = AiPolicy::with_state(profile, AiState::new(0, 3));
            let mut rng = ChaCha8Rng::seed_from_u64(8);
            let intent = policy.decide(&view(Vec2::new(3.0, 4.0)), &mut rng);
            match intent.movement {
                Movement::Full(v) => {
                    assert!((v.x - 1.2).abs() < 0.0001);
                    assert!((v.y - 1.6).abs() < 0.0001);
                }
                other => panic!("expected full velocity, got {other:?}"),
            }
        }

        #[test]
        fn homing_on_top_of_target_skips_movement() {
            let profile = AiProfile::new(Locomotion::Homing { speed: 2.0 });
            let mut policy = AiPolicy::with_state(profile, AiState::new(0, 3));
            let mut rng = ChaCha8Rng::seed_from_u64(8);
            let intent = policy.decide(&view(Vec2::ZERO), &mut rng);
            assert_eq!(intent.movement, Movement::Keep);
            assert_eq!(policy.state().action_frames(), 2);
        }

        #[test]
        fn stationary_only_turns() {
            let profile = AiProfile::new(Locomotion::Stationary);
            let mut policy = AiPolicy::with_state(profile, AiState::new(0, 3));
            let mut rng = ChaCha8Rng::seed_from_u64(8);
            let intent = policy.decide(&view(Vec2::new(-2.0, 0.0)), &mut rng);
            assert_eq!(intent.movement, Movement::Keep);
            assert_eq!(intent.facing, Some(Facing::Left));
        }

        #[test]
        fn direction_to_rejects_coincident_points() {
            assert_eq!(
                direction_to(Vec2::ONE, Vec2::ONE),
                Err(CombatError::DegenerateDirection)
            );
            let dir = direction_to(Vec2::ZERO, Vec2::new(0.0, -5.0)).unwrap();
            assert!((dir.y + 1.0).abs() < 0.0001);
        }
    }
}
