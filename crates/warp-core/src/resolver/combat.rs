//! Combat resolver for hitbox/hurtbox overlaps.
//!
//! The `CombatResolver` handles `Contact::Hit` reports. For each one it
//! decides whether the hit counts and, if it does, applies the payload that
//! was snapshotted when the hitbox came out:
//!
//! 1. Filter: self hits, same faction, exempt pairings, a defender this
//!    activation already struck, and switched-off or shielded hurtboxes
//! 2. `reduce_hp(damage)`, clamped at zero
//! 3. `apply_hitstun(frames)`, overwriting what remained
//! 4. An `ApplyImpulse` follow-up carrying the mirrored knockback
//! 5. A `Hitstop` follow-up when impact freeze is enabled
//!
//! # At-most-once damage
//!
//! Overlaps are reported every tick while they persist. The attacker's
//! [`ActiveHitbox`](crate::hitbox::ActiveHitbox) remembers which defenders it
//! has struck, so one activation damages a defender at most once.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::arena::Arena;
use crate::attack::AttackId;
use crate::entity::{EntityId, Faction};
use crate::hitbox::HitPayload;
use crate::output::{Command, Contact, Event, FilterReason, Output, OutputKind};

use super::Resolver;

/// Which faction pairings may hit each other.
///
/// Fighters of the same faction never hit each other. Further pairings can
/// be exempted one direction at a time.
///
/// # Example
///
/// ```
/// use warp_core::entity::Faction;
/// use warp_core::output::FilterReason;
/// use warp_core::resolver::HitRules;
///
/// let rules = HitRules::default().with_exemption(Faction::Shroom, Faction::Hund);
/// assert_eq!(rules.check(Faction::Shroom, Faction::Hund), Some(FilterReason::Exempt));
/// assert_eq!(rules.check(Faction::Hund, Faction::Shroom), None);
/// assert_eq!(rules.check(Faction::Hund, Faction::Hund), Some(FilterReason::SameFaction));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitRules {
    exemptions: BTreeSet<(Faction, Faction)>,
}

impl HitRules {
    /// Rules with no exemptions beyond same-faction.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forbids hits from `attacker` onto `defender`.
    #[must_use]
    pub fn with_exemption(mut self, attacker: Faction, defender: Faction) -> Self {
        self.exemptions.insert((attacker, defender));
        self
    }

    /// Returns the reason a hit between the two factions is refused, if any.
    #[must_use]
    pub fn check(&self, attacker: Faction, defender: Faction) -> Option<FilterReason> {
        if attacker == defender {
            Some(FilterReason::SameFaction)
        } else if self.exemptions.contains(&(attacker, defender)) {
            Some(FilterReason::Exempt)
        } else {
            None
        }
    }

    /// Number of exempt pairings.
    #[must_use]
    pub fn exemption_count(&self) -> usize {
        self.exemptions.len()
    }
}

/// What a hit needs from the attacker, copied out before mutation.
struct Strike {
    faction: Faction,
    payload: HitPayload,
    attack: AttackId,
    already_struck: bool,
    expends: bool,
}

/// Resolver for hit contacts.
///
/// # Example
///
/// ```
/// use warp_core::output::OutputKind;
/// use warp_core::resolver::{CombatResolver, HitRules, Resolver};
///
/// let resolver = CombatResolver::new(HitRules::default()).with_hitstop(10);
/// assert!(resolver.handles().contains(&OutputKind::Contact));
/// assert_eq!(resolver.hitstop_frames(), 10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CombatResolver {
    rules: HitRules,
    hitstop_frames: u32,
}

impl CombatResolver {
    /// Creates a combat resolver with impact freeze disabled.
    #[must_use]
    pub fn new(rules: HitRules) -> Self {
        Self {
            rules,
            hitstop_frames: 0,
        }
    }

    /// Freezes the world clock for `frames` ticks on every landed hit.
    #[must_use]
    pub fn with_hitstop(mut self, frames: u32) -> Self {
        self.hitstop_frames = frames;
        self
    }

    /// Impact freeze length.
    #[must_use]
    pub fn hitstop_frames(&self) -> u32 {
        self.hitstop_frames
    }

    /// Faction rules in use.
    #[must_use]
    pub fn rules(&self) -> &HitRules {
        &self.rules
    }

    fn strike_of(arena: &Arena, attacker: EntityId, defender: EntityId) -> Option<Strike> {
        let fighter = arena.fighter(attacker)?;
        let hitbox = fighter.hitbox()?;
        Some(Strike {
            faction: fighter.faction(),
            payload: hitbox.payload,
            attack: hitbox.attack,
            already_struck: hitbox.has_struck(defender),
            expends: fighter.profile().despawn_on_hit,
        })
    }

    /// Checks a hit without changing anything.
    fn filter(
        &self,
        arena: &Arena,
        attacker: EntityId,
        defender: EntityId,
        hurtbox: usize,
    ) -> Result<Strike, FilterReason> {
        if attacker == defender {
            return Err(FilterReason::SelfHit);
        }
        let strike = Self::strike_of(arena, attacker, defender).ok_or(FilterReason::Stale)?;
        let target = arena
            .fighter(defender)
            .filter(|fighter| fighter.is_alive())
            .ok_or(FilterReason::Stale)?;
        if let Some(reason) = self.rules.check(strike.faction, target.faction()) {
            return Err(reason);
        }
        if strike.already_struck {
            return Err(FilterReason::AlreadyStruck);
        }
        if !target.hurtboxes().accepts_hit(hurtbox, target.shield()) {
            return Err(FilterReason::Invulnerable);
        }
        Ok(strike)
    }

    fn resolve_hit(
        &self,
        arena: &mut Arena,
        attacker: EntityId,
        defender: EntityId,
        hurtbox: usize,
        follow_up: &mut Vec<Output>,
    ) {
        let strike = match self.filter(arena, attacker, defender, hurtbox) {
            Ok(strike) => strike,
            Err(FilterReason::AlreadyStruck) => {
                tracing::trace!(%attacker, %defender, "overlap persists, already struck");
                return;
            }
            Err(reason) => {
                tracing::debug!(%attacker, %defender, %reason, "hit filtered");
                follow_up.push(
                    Event::HitFiltered {
                        attacker,
                        defender,
                        reason,
                    }
                    .into(),
                );
                return;
            }
        };

        if let Some(fighter) = arena.fighter_mut(attacker) {
            if let Some(hitbox) = fighter.hitbox_mut() {
                hitbox.register_hit(defender);
            }
            if strike.expends {
                fighter.mark_expended();
            }
        }

        let Some(target) = arena.fighter_mut(defender) else {
            return;
        };
        let payload = strike.payload;
        let hp_after = target.reduce_hp(payload.damage);
        target.apply_hitstun(payload.hitstun_frames);

        tracing::debug!(
            %attacker,
            %defender,
            attack = %strike.attack,
            damage = payload.damage,
            hp_after,
            hitstun = payload.hitstun_frames,
            "hit landed"
        );

        follow_up.push(
            Command::ApplyImpulse {
                target: defender,
                impulse: payload.knockback,
            }
            .into(),
        );
        follow_up.push(
            Event::HitLanded {
                attacker,
                defender,
                attack: strike.attack,
                damage: payload.damage,
                hp_after,
            }
            .into(),
        );
        if self.hitstop_frames > 0 {
            follow_up.push(
                Command::Hitstop {
                    frames: self.hitstop_frames,
                }
                .into(),
            );
        }
    }
}

impl Resolver for CombatResolver {
    fn handles(&self) -> &[OutputKind] {
        &[OutputKind::Contact]
    }

    fn resolve(&self, outputs: &[&Output], arena: &mut Arena, follow_up: &mut Vec<Output>) {
        for output in outputs {
            if let Some(Contact::Hit {
                attacker,
                defender,
                hurtbox,
            }) = output.as_contact()
            {
                self.resolve_hit(arena, *attacker, *defender, *hurtbox, follow_up);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attack::{Attack, AttackTable};
    use crate::fighter::{Fighter, FighterProfile, ProjectileKind};
    use crate::geometry::{Facing, Rect};
    use crate::hitbox::ActiveHitbox;
    use glam::Vec2;

    fn finisher() -> Attack {
        AttackTable::standard()
            .lookup(AttackId::STAND_NNN)
            .cloned()
            .unwrap()
    }

    fn armed(profile: &FighterProfile, facing: Facing) -> Fighter {
        let mut fighter = Fighter::spawn(profile, Vec2::ZERO, facing);
        let payload = HitPayload::snapshot(&finisher(), facing);
        fighter.set_hitbox(Some(ActiveHitbox::new(
            AttackId::STAND_NNN,
            1,
            Rect::new(1.0, 0.5, 1.0, 0.5),
            payload,
        )));
        fighter
    }

    fn setup(attacker: Fighter, defender: FighterProfile) -> (Arena, EntityId, EntityId) {
        let mut arena = Arena::new();
        let a = arena.spawn_fighter(attacker);
        let d = arena.spawn_fighter(Fighter::spawn(&defender, Vec2::new(1.0, 0.0), Facing::Left));
        (arena, a, d)
    }

    fn hit(
        resolver: &CombatResolver,
        arena: &mut Arena,
        attacker: EntityId,
        defender: EntityId,
        hurtbox: usize,
    ) -> Vec<Output> {
        let contact = Output::from(Contact::Hit {
            attacker,
            defender,
            hurtbox,
        });
        let mut follow_up = Vec::new();
        resolver.resolve(&[&contact], arena, &mut follow_up);
        follow_up
    }

    fn filtered(outputs: &[Output]) -> Option<FilterReason> {
        outputs.iter().find_map(|output| match output.as_event() {
            Some(Event::HitFiltered { reason, .. }) => Some(*reason),
            _ => None,
        })
    }

    mod landing_tests {
        use super::*;

        #[test]
        fn finisher_on_hund() {
            let resolver = CombatResolver::new(HitRules::default()).with_hitstop(10);
            let (mut arena, a, d) =
                setup(armed(&FighterProfile::player(), Facing::Right), FighterProfile::hund());

            let outputs = hit(&resolver, &mut arena, a, d, 0);
            let hund = arena.fighter(d).unwrap();
            assert_eq!(hund.hp(), 13);
            assert_eq!(hund.hitstun_frames(), 20);
            assert!(outputs.contains(&Output::from(Command::ApplyImpulse {
                target: d,
                impulse: Vec2::new(6.0, 0.3),
            })));
            assert!(outputs.contains(&Output::from(Command::Hitstop { frames: 10 })));
            assert!(outputs.contains(&Output::from(Event::HitLanded {
                attacker: a,
                defender: d,
                attack: AttackId::STAND_NNN,
                damage: 7,
                hp_after: 13,
            })));
        }

        #[test]
        fn knockback_is_mirrored_for_left_facing_attacker() {
            let resolver = CombatResolver::default();
            let (mut arena, a, d) =
                setup(armed(&FighterProfile::player(), Facing::Left), FighterProfile::hund());
            let outputs = hit(&resolver, &mut arena, a, d, 0);
            assert!(outputs.contains(&Output::from(Command::ApplyImpulse {
                target: d,
                impulse: Vec2::new(-6.0, 0.3),
            })));
            assert!(!outputs
                .iter()
                .any(|output| matches!(output.as_command(), Some(Command::Hitstop { .. }))));
        }

        #[test]
        fn one_activation_damages_once() {
            let resolver = CombatResolver::default();
            let (mut arena, a, d) =
                setup(armed(&FighterProfile::player(), Facing::Right), FighterProfile::hund());
            hit(&resolver, &mut arena, a, d, 0);
            let second = hit(&resolver, &mut arena, a, d, 1);
            hit(&resolver, &mut arena, a, d, 0);
            assert_eq!(arena.fighter(d).unwrap().hp(), 13);
            assert!(second.is_empty());
        }

        #[test]
        fn hp_clamps_at_zero() {
            let resolver = CombatResolver::default();
            let (mut arena, a, d) =
                setup(armed(&FighterProfile::player(), Facing::Right), FighterProfile::dummy());
            let outputs = hit(&resolver, &mut arena, a, d, 0);
            assert_eq!(arena.fighter(d).unwrap().hp(), 0);
            assert!(outputs.iter().any(|output| matches!(
                output.as_event(),
                Some(Event::HitLanded { hp_after: 0, .. })
            )));
        }

        #[test]
        fn projectile_is_expended_on_hit() {
            let resolver = CombatResolver::default();
            let shot = armed(&ProjectileKind::PlayerShot.profile(Faction::Player), Facing::Right);
            let (mut arena, a, d) = setup(shot, FighterProfile::hund());
            hit(&resolver, &mut arena, a, d, 0);
            assert!(arena.fighter(a).unwrap().is_expended());
        }
    }

    mod filter_tests {
        use super::*;

        #[test]
        fn self_hit() {
            let resolver = CombatResolver::default();
            let (mut arena, a, _) =
                setup(armed(&FighterProfile::player(), Facing::Right), FighterProfile::hund());
            let outputs = hit(&resolver, &mut arena, a, a, 0);
            assert_eq!(filtered(&outputs), Some(FilterReason::SelfHit));
            assert_eq!(arena.fighter(a).unwrap().hp(), 50);
        }

        #[test]
        fn same_faction() {
            let resolver = CombatResolver::default();
            let (mut arena, a, d) =
                setup(armed(&FighterProfile::hund(), Facing::Right), FighterProfile::hund());
            let outputs = hit(&resolver, &mut arena, a, d, 0);
            assert_eq!(filtered(&outputs), Some(FilterReason::SameFaction));
            assert_eq!(arena.fighter(d).unwrap().hp(), 20);
        }

        #[test]
        fn spore_cloud_spares_shrooms() {
            let resolver = CombatResolver::default();
            let spore = armed(&ProjectileKind::SporeCloud.profile(Faction::Shroom), Facing::Left);
            let (mut arena, a, d) = setup(spore, FighterProfile::shroom());
            let outputs = hit(&resolver, &mut arena, a, d, 0);
            assert_eq!(filtered(&outputs), Some(FilterReason::SameFaction));
        }

        #[test]
        fn exemption_table() {
            let resolver =
                CombatResolver::new(HitRules::new().with_exemption(Faction::Hund, Faction::Shroom));
            let (mut arena, a, d) =
                setup(armed(&FighterProfile::hund(), Facing::Right), FighterProfile::shroom());
            let outputs = hit(&resolver, &mut arena, a, d, 0);
            assert_eq!(filtered(&outputs), Some(FilterReason::Exempt));
        }

        #[test]
        fn head_shield() {
            let resolver = CombatResolver::default();
            let table = AttackTable::standard();
            let (mut arena, a, d) = setup(
                armed(&FighterProfile::hund(), Facing::Right),
                FighterProfile::player(),
            );
            assert!(arena
                .fighter_mut(d)
                .unwrap()
                .start_attack(AttackId::CROUCH_NNN, &table));

            // Hurtbox 0 is the player's head.
            let outputs = hit(&resolver, &mut arena, a, d, 0);
            assert_eq!(filtered(&outputs), Some(FilterReason::Invulnerable));
            hit(&resolver, &mut arena, a, d, 1);
            assert_eq!(arena.fighter(d).unwrap().hp(), 43);
        }

        #[test]
        fn attacker_without_hitbox_is_stale() {
            let resolver = CombatResolver::default();
            let (mut arena, a, d) = setup(
                Fighter::spawn(&FighterProfile::player(), Vec2::ZERO, Facing::Right),
                FighterProfile::hund(),
            );
            let outputs = hit(&resolver, &mut arena, a, d, 0);
            assert_eq!(filtered(&outputs), Some(FilterReason::Stale));
        }

        #[test]
        fn dead_defender_is_stale() {
            let resolver = CombatResolver::default();
            let (mut arena, a, d) =
                setup(armed(&FighterProfile::player(), Facing::Right), FighterProfile::hund());
            arena.fighter_mut(d).unwrap().reduce_hp(100);
            let outputs = hit(&resolver, &mut arena, a, d, 0);
            assert_eq!(filtered(&outputs), Some(FilterReason::Stale));
        }
    }
}
