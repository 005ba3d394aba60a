//! Fighter archetypes.
//!
//! An archetype is pure data: hit points, faction, which attacks it may
//! start, how it is driven and what its hurtboxes look like. Every enemy in
//! the game runs the same state machine with a different profile.

use std::borrow::Cow;
use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::ai::{AiProfile, AiRule, Locomotion, Trigger};
use crate::attack::{AttackId, AttackSet};
use crate::entity::Faction;
use crate::geometry::Rect;
use crate::hurtbox::{HurtRegion, Hurtbox};

/// Who decides what a fighter does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BrainKind {
    /// Host input through [`PlayerInput`](crate::input::PlayerInput).
    Player,
    /// The wait/act AI policy.
    Ai(AiProfile),
    /// Starts `attack` on its first tick and never decides again.
    Projectile {
        /// The self-starting attack.
        attack: AttackId,
    },
    /// Does nothing. Training dummies.
    Inert,
}

/// What happens to a fighter that drops below the playfield.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FallOutRule {
    /// Hit points are forced to zero.
    Kill,
    /// The fighter is moved back to the configured respawn point.
    Respawn,
    /// Nothing happens.
    Ignore,
}

/// Projectile archetypes spawned by attacks.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Fired by the player's volley special.
    PlayerShot,
    /// Fired by the BB left hand.
    HandShot,
    /// Released by a Shroom. Does not move.
    SporeCloud,
}

impl ProjectileKind {
    /// The attack the projectile carries.
    #[must_use]
    pub const fn attack(self) -> AttackId {
        match self {
            Self::PlayerShot => AttackId::PLAYER_SHOT,
            Self::HandShot => AttackId::BB_SHOT,
            Self::SporeCloud => AttackId::SPORE_CLOUD,
        }
    }

    /// Returns true for projectiles that travel.
    #[must_use]
    pub const fn moves(self) -> bool {
        !matches!(self, Self::SporeCloud)
    }

    /// Returns true for projectiles removed by their first landed hit.
    #[must_use]
    pub const fn despawns_on_hit(self) -> bool {
        self.moves()
    }

    /// Profile for a projectile fired by a fighter of `faction`.
    #[must_use]
    pub fn profile(self, faction: Faction) -> FighterProfile {
        let name = match self {
            Self::PlayerShot => "player shot",
            Self::HandShot => "hand shot",
            Self::SporeCloud => "spore cloud",
        };
        FighterProfile {
            name: Cow::Borrowed(name),
            faction,
            max_hp: 1,
            attacks: AttackSet::new([self.attack()]),
            brain: BrainKind::Projectile {
                attack: self.attack(),
            },
            hurtboxes: Vec::new(),
            size: Vec2::new(0.4, 0.4),
            gravity_scale: 0.0,
            cancellable: false,
            drops_pickup: false,
            fall_out: FallOutRule::Ignore,
            despawn_on_hit: self.despawns_on_hit(),
        }
    }
}

impl fmt::Display for ProjectileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlayerShot => write!(f, "player shot"),
            Self::HandShot => write!(f, "hand shot"),
            Self::SporeCloud => write!(f, "spore cloud"),
        }
    }
}

/// Data describing one kind of fighter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FighterProfile {
    /// Display name for logs.
    pub name: Cow<'static, str>,
    /// Team tag for friendly-fire filtering.
    pub faction: Faction,
    /// Hit points at spawn.
    pub max_hp: u32,
    /// Attacks this fighter may start.
    pub attacks: AttackSet,
    /// Decision source.
    pub brain: BrainKind,
    /// Hurtboxes, authored facing right.
    pub hurtboxes: Vec<Hurtbox>,
    /// Push box size.
    pub size: Vec2,
    /// Gravity multiplier.
    pub gravity_scale: f32,
    /// Regains `can_attack` on the first active tick so attacks can chain.
    pub cancellable: bool,
    /// Leaves a pickup behind at the end of its death sequence.
    pub drops_pickup: bool,
    /// Fall-out handling.
    pub fall_out: FallOutRule,
    /// Removed after its first landed hit.
    pub despawn_on_hit: bool,
}

impl FighterProfile {
    /// PW-350, the player.
    #[must_use]
    pub fn player() -> Self {
        Self {
            name: Cow::Borrowed("PW-350"),
            faction: Faction::Player,
            max_hp: 50,
            attacks: AttackSet::range(1, 15),
            brain: BrainKind::Player,
            hurtboxes: vec![
                Hurtbox::new(HurtRegion::Head, Rect::new(0.1, 0.55, 0.5, 0.4)),
                Hurtbox::new(HurtRegion::Body, Rect::new(0.0, 0.0, 0.7, 0.8)),
                Hurtbox::new(HurtRegion::Legs, Rect::new(0.0, -0.6, 0.6, 0.5)),
            ],
            size: Vec2::new(0.8, 1.6),
            gravity_scale: 1.0,
            cancellable: true,
            drops_pickup: false,
            fall_out: FallOutRule::Respawn,
            despawn_on_hit: false,
        }
    }

    /// HUND: bites up close, pounces from further out.
    #[must_use]
    pub fn hund() -> Self {
        Self::enemy(
            "HUND",
            Faction::Hund,
            20,
            [AttackId::HUND_BITE, AttackId::HUND_POUNCE],
            AiProfile::new(Locomotion::Ground { speed: 3.0 })
                .with_rule(AiRule::single(Trigger::WithinDistance(1.0), AttackId::HUND_BITE))
                .with_rule(AiRule::single(
                    Trigger::WithinDistance(3.0),
                    AttackId::HUND_POUNCE,
                )),
            vec![
                Hurtbox::new(HurtRegion::Head, Rect::new(0.45, 0.15, 0.4, 0.35)),
                Hurtbox::new(HurtRegion::Body, Rect::new(-0.1, 0.0, 0.9, 0.5)),
            ],
            Vec2::new(1.2, 0.6),
        )
    }

    /// Shroom: kicks or releases a spore cloud with equal odds.
    #[must_use]
    pub fn shroom() -> Self {
        Self::enemy(
            "Shroom",
            Faction::Shroom,
            20,
            [AttackId::SHROOM_KICK, AttackId::SHROOM_SPORE],
            AiProfile::new(Locomotion::Ground { speed: 1.5 }).with_rule(AiRule::weighted(
                Trigger::WithinDistance(1.0),
                [(AttackId::SHROOM_KICK, 1), (AttackId::SHROOM_SPORE, 1)],
            )),
            vec![
                Hurtbox::new(HurtRegion::Head, Rect::new(0.0, 0.4, 0.8, 0.4)),
                Hurtbox::new(HurtRegion::Body, Rect::new(0.0, -0.15, 0.5, 0.7)),
            ],
            Vec2::new(0.8, 1.0),
        )
    }

    /// BB-Hands: a stationary body that kicks anything close.
    #[must_use]
    pub fn bb_hands() -> Self {
        Self::enemy(
            "BB-Hands",
            Faction::BbHands,
            75,
            [AttackId::BB_KICK],
            AiProfile::new(Locomotion::Stationary)
                .with_rule(AiRule::single(Trigger::WithinDistance(1.0), AttackId::BB_KICK)),
            vec![
                Hurtbox::new(HurtRegion::Head, Rect::new(0.0, 0.9, 1.0, 0.6)),
                Hurtbox::new(HurtRegion::Body, Rect::new(0.0, 0.0, 1.4, 1.2)),
                Hurtbox::new(HurtRegion::Legs, Rect::new(0.0, -0.8, 1.0, 0.4)),
            ],
            Vec2::new(1.4, 2.2),
        )
    }

    /// BB left hand: homes in and fires when level with the target.
    #[must_use]
    pub fn bb_left_hand() -> Self {
        let mut profile = Self::enemy(
            "BB left hand",
            Faction::BbHands,
            20,
            [AttackId::BB_FIRE],
            AiProfile::new(Locomotion::Homing { speed: 2.0 }).with_rule(AiRule::single(
                Trigger::VerticallyAligned(0.5),
                AttackId::BB_FIRE,
            )),
            vec![Hurtbox::new(HurtRegion::Body, Rect::new(0.0, 0.0, 0.6, 0.6))],
            Vec2::new(0.6, 0.6),
        );
        profile.gravity_scale = 0.0;
        profile
    }

    /// BB right hand: homes in and slams from close range.
    #[must_use]
    pub fn bb_right_hand() -> Self {
        let mut profile = Self::enemy(
            "BB right hand",
            Faction::BbHands,
            20,
            [AttackId::BB_SLAM],
            AiProfile::new(Locomotion::Homing { speed: 2.0 })
                .with_rule(AiRule::single(Trigger::WithinDistance(1.0), AttackId::BB_SLAM)),
            vec![Hurtbox::new(HurtRegion::Body, Rect::new(0.0, 0.0, 0.6, 0.6))],
            Vec2::new(0.6, 0.6),
        );
        profile.gravity_scale = 0.0;
        profile
    }

    /// A one-hit training dummy that never acts.
    #[must_use]
    pub fn dummy() -> Self {
        Self {
            name: Cow::Borrowed("Dummy"),
            faction: Faction::Neutral,
            max_hp: 1,
            attacks: AttackSet::default(),
            brain: BrainKind::Inert,
            hurtboxes: vec![Hurtbox::new(
                HurtRegion::Body,
                Rect::new(0.0, 0.0, 0.8, 1.6),
            )],
            size: Vec2::new(0.8, 1.6),
            gravity_scale: 1.0,
            cancellable: false,
            drops_pickup: false,
            fall_out: FallOutRule::Kill,
            despawn_on_hit: false,
        }
    }

    fn enemy(
        name: &'static str,
        faction: Faction,
        max_hp: u32,
        attacks: impl IntoIterator<Item = AttackId>,
        ai: AiProfile,
        hurtboxes: Vec<Hurtbox>,
        size: Vec2,
    ) -> Self {
        Self {
            name: Cow::Borrowed(name),
            faction,
            max_hp,
            attacks: AttackSet::new(attacks),
            brain: BrainKind::Ai(ai),
            hurtboxes,
            size,
            gravity_scale: 1.0,
            cancellable: false,
            drops_pickup: true,
            fall_out: FallOutRule::Kill,
            despawn_on_hit: false,
        }
    }

    /// Same profile with a different hit point total.
    #[must_use]
    pub fn with_max_hp(mut self, max_hp: u32) -> Self {
        self.max_hp = max_hp;
        self
    }

    /// Returns true if the fighter is a projectile.
    #[must_use]
    pub fn is_projectile(&self) -> bool {
        matches!(self.brain, BrainKind::Projectile { .. })
    }

    /// Returns true if the fighter is driven by host input.
    #[must_use]
    pub fn is_player(&self) -> bool {
        matches!(self.brain, BrainKind::Player)
    }
}
