//! Attack data: the id-keyed frame table every fighter reads from.
//!
//! The table is plain data. It is loaded once (see [`AttackTable::standard`])
//! and shared read-only by every fighter in a simulation. Behaviour that is
//! specific to an attack id but is *not* frame data (lunges, teleports,
//! projectile volleys) lives in [`crate::fighter::effects`].
//!
//! # Example
//!
//! ```
//! use warp_core::attack::{AttackId, AttackTable};
//!
//! let table = AttackTable::standard();
//! let finisher = table.lookup(AttackId::STAND_NNN).unwrap();
//! assert_eq!(finisher.startup_frames, 14);
//! assert_eq!(finisher.damage, 7);
//!
//! // Unknown ids fail on lookup but resolve to the blank attack.
//! assert!(table.lookup(AttackId::new(200)).is_err());
//! assert!(table.resolve(AttackId::new(200)).is_blank());
//! ```

use std::borrow::Cow;
use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{CombatError, Result};

// =============================================================================
// AttackId
// =============================================================================

/// Index into the attack table.
///
/// Id `0` is reserved for the blank "no attack" entry.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AttackId(u16);

impl AttackId {
    /// The reserved "no attack" sentinel.
    pub const NONE: Self = Self(0);
    /// 5N, first standing normal.
    pub const STAND_N: Self = Self(1);
    /// 5NN.
    pub const STAND_NN: Self = Self(2);
    /// 5NNN.
    pub const STAND_NNN: Self = Self(3);
    /// 2N, first crouching normal.
    pub const CROUCH_N: Self = Self(4);
    /// 2NN.
    pub const CROUCH_NN: Self = Self(5);
    /// 2NNN, an anti-air launcher with head invulnerability.
    pub const CROUCH_NNN: Self = Self(6);
    /// 6N, first moving normal.
    pub const FORWARD_N: Self = Self(7);
    /// 6NN.
    pub const FORWARD_NN: Self = Self(8);
    /// 6NNN.
    pub const FORWARD_NNN: Self = Self(9);
    /// j.N, first air normal.
    pub const AIR_N: Self = Self(10);
    /// j.NN.
    pub const AIR_NN: Self = Self(11);
    /// j.NNN.
    pub const AIR_NNN: Self = Self(12);
    /// 5S, directional teleport.
    pub const STAND_S: Self = Self(13);
    /// 2S, invulnerable guard.
    pub const CROUCH_S: Self = Self(14);
    /// 6S, projectile volley.
    pub const FORWARD_S: Self = Self(15);
    /// HUND bite.
    pub const HUND_BITE: Self = Self(16);
    /// HUND pounce.
    pub const HUND_POUNCE: Self = Self(17);
    /// Hitbox carried by the player's projectiles.
    pub const PLAYER_SHOT: Self = Self(18);
    /// Hitbox carried by a spore cloud.
    pub const SPORE_CLOUD: Self = Self(19);
    /// Shroom kick.
    pub const SHROOM_KICK: Self = Self(20);
    /// Shroom spore release.
    pub const SHROOM_SPORE: Self = Self(21);
    /// BB-Hands kick.
    pub const BB_KICK: Self = Self(22);
    /// BB left hand fire.
    pub const BB_FIRE: Self = Self(23);
    /// BB right hand slam.
    pub const BB_SLAM: Self = Self(24);
    /// Hitbox carried by the left hand's projectiles.
    pub const BB_SHOT: Self = Self(25);

    /// Creates an id from its raw table index.
    #[must_use]
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// Returns the raw table index.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Returns true for the reserved blank id.
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for AttackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AttackId({})", self.0)
    }
}

impl fmt::Display for AttackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for AttackId {
    fn from(raw: u16) -> Self {
        Self::new(raw)
    }
}

// =============================================================================
// Attack
// =============================================================================

/// Frame data for one attack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attack {
    /// Display name, used in logs only.
    pub name: Cow<'static, str>,
    /// Frames before the hitbox appears.
    pub startup_frames: u32,
    /// Frames the hitbox stays out.
    pub active_frames: u32,
    /// Frames of end lag after the hitbox is withdrawn.
    pub recovery_frames: u32,
    /// HP removed from the defender on hit.
    pub damage: u32,
    /// Hitstun applied to the defender on hit.
    pub hitstun_frames: u32,
    /// Impulse applied to the defender, authored for a right-facing attacker.
    pub knockback: Vec2,
    /// Head hurtboxes are ignored while this attack is current.
    pub invulnerable_head: bool,
    /// All hurtboxes are ignored while this attack is current.
    pub invulnerable_all: bool,
}

impl Attack {
    /// The blank entry stored at id 0 and used for unknown ids.
    pub const BLANK: Self = Self {
        name: Cow::Borrowed("none"),
        startup_frames: 0,
        active_frames: 0,
        recovery_frames: 0,
        damage: 0,
        hitstun_frames: 0,
        knockback: Vec2::ZERO,
        invulnerable_head: false,
        invulnerable_all: false,
    };

    /// Creates an attack with the given frame data and no invulnerability.
    #[must_use]
    pub const fn new(
        name: &'static str,
        frames: (u32, u32, u32),
        damage: u32,
        hitstun_frames: u32,
        knockback: Vec2,
    ) -> Self {
        Self {
            name: Cow::Borrowed(name),
            startup_frames: frames.0,
            active_frames: frames.1,
            recovery_frames: frames.2,
            damage,
            hitstun_frames,
            knockback,
            invulnerable_head: false,
            invulnerable_all: false,
        }
    }

    /// Marks the attack as head-invulnerable.
    #[must_use]
    pub const fn with_head_invulnerability(mut self) -> Self {
        self.invulnerable_head = true;
        self
    }

    /// Marks the attack as fully invulnerable.
    #[must_use]
    pub const fn with_full_invulnerability(mut self) -> Self {
        self.invulnerable_all = true;
        self
    }

    /// Total frames from start to the end of recovery.
    #[must_use]
    pub const fn total_frames(&self) -> u32 {
        self.startup_frames + self.active_frames + self.recovery_frames
    }

    /// Returns true if every numeric field is zero.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.startup_frames == 0
            && self.active_frames == 0
            && self.recovery_frames == 0
            && self.damage == 0
            && self.hitstun_frames == 0
            && self.knockback == Vec2::ZERO
            && !self.invulnerable_head
            && !self.invulnerable_all
    }
}

// =============================================================================
// AttackTable
// =============================================================================

static BLANK_ATTACK: Attack = Attack::BLANK;

/// Id-indexed attack data, shared read-only by every fighter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackTable {
    attacks: Vec<Attack>,
}

impl AttackTable {
    /// Builds a table from entries indexed by position.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::InvalidConfig`] if the table is empty or entry 0
    /// is not blank.
    pub fn new(attacks: Vec<Attack>) -> Result<Self> {
        match attacks.first() {
            None => Err(CombatError::InvalidConfig {
                field: "attacks",
                reason: "attack table must contain the blank entry".into(),
            }),
            Some(first) if !first.is_blank() => Err(CombatError::InvalidConfig {
                field: "attacks",
                reason: "entry 0 is reserved for the blank attack".into(),
            }),
            Some(_) => Ok(Self { attacks }),
        }
    }

    /// The game's built-in attack data.
    #[must_use]
    pub fn standard() -> Self {
        let kb = Vec2::new;
        let attacks = vec![
            Attack::BLANK,
            Attack::new("5N", (6, 3, 10), 1, 5, Vec2::ZERO),
            Attack::new("5NN", (8, 5, 19), 3, 8, Vec2::ZERO),
            Attack::new("5NNN", (14, 8, 21), 7, 20, kb(6.0, 0.3)),
            Attack::new("2N", (8, 2, 14), 2, 6, Vec2::ZERO),
            Attack::new("2NN", (12, 5, 18), 3, 9, Vec2::ZERO),
            Attack::new("2NNN", (14, 3, 20), 7, 20, kb(0.3, 6.0)).with_head_invulnerability(),
            Attack::new("6N", (20, 6, 4), 10, 25, kb(0.2, 0.0)),
            Attack::new("6NN", (7, 6, 19), 3, 8, Vec2::ZERO),
            Attack::new("6NNN", (14, 8, 21), 7, 20, kb(6.0, 0.3)),
            Attack::new("j.N", (8, 3, 8), 1, 7, kb(0.1, 0.2)),
            Attack::new("j.NN", (7, 3, 13), 3, 8, kb(0.1, 0.2)),
            Attack::new("j.NNN", (13, 4, 19), 6, 14, kb(0.4, -6.0)),
            Attack::new("5S", (11, 1, 6), 0, 0, Vec2::ZERO),
            Attack::new("2S", (9, 17, 46), 0, 0, Vec2::ZERO),
            Attack::new("6S", (13, 14, 15), 0, 0, Vec2::ZERO),
            Attack::new("HUND bite", (7, 3, 10), 1, 6, Vec2::ZERO),
            Attack::new("HUND pounce", (7, 2, 1), 3, 20, kb(6.0, 0.3)),
            Attack::new("player shot", (1, 90, 0), 3, 7, kb(0.3, 0.3)),
            Attack::new("spore cloud", (1, 12, 0), 0, 40, Vec2::ZERO),
            Attack::new("Shroom kick", (8, 3, 14), 2, 8, Vec2::ZERO),
            Attack::new("Shroom spore", (12, 1, 24), 0, 0, Vec2::ZERO),
            Attack::new("BB kick", (9, 4, 18), 5, 12, kb(3.0, 0.3)),
            Attack::new("BB fire", (10, 1, 30), 0, 0, Vec2::ZERO),
            Attack::new("BB slam", (16, 4, 24), 6, 18, kb(0.3, -6.0)),
            Attack::new("BB shot", (1, 90, 0), 3, 20, kb(0.3, 0.3)),
        ];
        Self { attacks }
    }

    /// Looks up an attack by id.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::UnknownAttack`] if `id` is outside the table.
    pub fn lookup(&self, id: AttackId) -> Result<&Attack> {
        self.attacks
            .get(id.index())
            .ok_or(CombatError::UnknownAttack { id })
    }

    /// Looks up an attack, falling back to the blank entry for unknown ids.
    ///
    /// The fallback is logged at `warn` level; the caller carries on with a
    /// zero-effect attack.
    #[must_use]
    pub fn resolve(&self, id: AttackId) -> &Attack {
        match self.lookup(id) {
            Ok(attack) => attack,
            Err(err) => {
                tracing::warn!(%id, %err, "falling back to blank attack");
                &BLANK_ATTACK
            }
        }
    }

    /// Returns true if `id` has an entry.
    #[must_use]
    pub fn contains(&self, id: AttackId) -> bool {
        id.index() < self.attacks.len()
    }

    /// Number of entries, including the blank one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attacks.len()
    }

    /// Always false for a table built through [`AttackTable::new`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attacks.is_empty()
    }

    /// Iterates `(id, attack)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (AttackId, &Attack)> {
        self.attacks.iter().enumerate().map(|(index, attack)| {
            // The table is authored by hand and stays far below u16::MAX.
            #[allow(clippy::cast_possible_truncation)]
            (AttackId::new(index as u16), attack)
        })
    }

    /// Replaces the entry for `id`. Used by tooling and tests.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::UnknownAttack`] for ids outside the table and
    /// [`CombatError::InvalidConfig`] when overwriting the blank entry.
    pub fn set(&mut self, id: AttackId, attack: Attack) -> Result<()> {
        if id.is_none() {
            return Err(CombatError::InvalidConfig {
                field: "attacks",
                reason: "entry 0 is reserved for the blank attack".into(),
            });
        }
        let slot = self
            .attacks
            .get_mut(id.index())
            .ok_or(CombatError::UnknownAttack { id })?;
        *slot = attack;
        Ok(())
    }
}

impl Default for AttackTable {
    fn default() -> Self {
        Self::standard()
    }
}

// =============================================================================
// AttackSet
// =============================================================================

/// The subset of table ids a fighter archetype may start.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackSet {
    ids: Vec<AttackId>,
}

impl AttackSet {
    /// Creates a set from the given ids.
    #[must_use]
    pub fn new(ids: impl IntoIterator<Item = AttackId>) -> Self {
        let mut ids: Vec<_> = ids.into_iter().collect();
        ids.sort();
        ids.dedup();
        Self { ids }
    }

    /// A contiguous range of raw ids, inclusive.
    #[must_use]
    pub fn range(first: u16, last: u16) -> Self {
        Self::new((first..=last).map(AttackId::new))
    }

    /// Returns true if a fighter with this set may start `id`.
    #[must_use]
    pub fn allows(&self, id: AttackId) -> bool {
        self.ids.binary_search(&id).is_ok()
    }

    /// Iterates ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = AttackId> + '_ {
        self.ids.iter().copied()
    }

    /// Number of ids in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if the set allows nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
