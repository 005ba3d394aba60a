//! End-to-end tests of the tick, run through `Simulation::step`.

use glam::Vec2;

use crate::ai::AiState;
use crate::attack::AttackId;
use crate::entity::{Faction, Pickup};
use crate::fighter::{Fighter, FighterProfile, Phase, ProjectileKind};
use crate::geometry::Facing;
use crate::input::InputEvent;
use crate::output::{Event, FilterReason};
use crate::resolver::HitRules;

use super::helpers::{
    count_events, drain_events, fighter, force_attack, hp, run_until, spawn_dummy, still_sim,
};

fn approx(a: Vec2, b: Vec2) -> bool {
    (a - b).abs().max_element() < 0.0001
}

// =============================================================================
// Hits
// =============================================================================

#[test]
fn finisher_applies_damage_hitstun_and_knockback() {
    let mut sim = still_sim(1);
    let player = sim.spawn_player(Vec2::ZERO);
    let dummy = spawn_dummy(&mut sim, Vec2::new(1.0, 0.0), 20);
    force_attack(&mut sim, player, AttackId::STAND_NNN);

    let landed = run_until(&mut sim, 30, |sim| hp(sim, dummy) < 20);
    assert!(landed.is_some(), "finisher never connected");

    let target = fighter(&sim, dummy);
    assert_eq!(target.hp(), 13);
    assert_eq!(target.hitstun_frames(), 20);
    assert!(approx(target.body().velocity, Vec2::new(6.0, 0.3)));
}

#[test]
fn knockback_mirrors_with_attacker_facing() {
    let mut sim = still_sim(1);
    let player = sim.spawn_fighter(&FighterProfile::player(), Vec2::ZERO, Facing::Left);
    let dummy = spawn_dummy(&mut sim, Vec2::new(-1.0, 0.0), 20);
    force_attack(&mut sim, player, AttackId::STAND_NNN);

    run_until(&mut sim, 30, |sim| hp(sim, dummy) < 20);
    assert!(approx(
        fighter(&sim, dummy).body().velocity,
        Vec2::new(-6.0, 0.3)
    ));
}

#[test]
fn one_activation_damages_once() {
    let mut sim = still_sim(2);
    let player = sim.spawn_player(Vec2::ZERO);
    let dummy = spawn_dummy(&mut sim, Vec2::new(1.0, 0.0), 20);
    force_attack(&mut sim, player, AttackId::STAND_NNN);

    // Eight active frames overlap the dummy the whole time.
    sim.run(80);

    assert_eq!(hp(&sim, dummy), 13);
    let events = drain_events(&sim);
    assert_eq!(
        count_events(&events, |e| matches!(e, Event::HitLanded { .. })),
        1
    );
    assert_eq!(fighter(&sim, player).phase(), Phase::Idle);
}

#[test]
fn landed_hit_starts_hitstop() {
    let mut sim = still_sim(3);
    let player = sim.spawn_player(Vec2::ZERO);
    let dummy = spawn_dummy(&mut sim, Vec2::new(1.0, 0.0), 20);
    force_attack(&mut sim, player, AttackId::STAND_NNN);
    run_until(&mut sim, 30, |sim| hp(sim, dummy) < 20);

    assert_eq!(sim.clock().freeze_frames_remaining(), 10);
    assert!(drain_events(&sim).contains(&Event::HitstopStarted { frames: 10 }));

    let frozen_at = sim.tick();
    for _ in 0..10 {
        sim.step();
        assert_eq!(fighter(&sim, dummy).hitstun_frames(), 20);
    }
    sim.step();
    assert_eq!(fighter(&sim, dummy).hitstun_frames(), 19);
    assert_eq!(sim.tick(), frozen_at + 11);
}

#[test]
fn exempt_pairing_is_filtered() {
    let mut sim = still_sim(4)
        .with_hit_rules(HitRules::new().with_exemption(Faction::Player, Faction::Neutral));
    let player = sim.spawn_player(Vec2::ZERO);
    let dummy = spawn_dummy(&mut sim, Vec2::new(1.0, 0.0), 20);
    force_attack(&mut sim, player, AttackId::STAND_NNN);

    sim.run(40);
    assert_eq!(hp(&sim, dummy), 20);
    let events = drain_events(&sim);
    assert!(events.iter().any(|e| matches!(
        e,
        Event::HitFiltered {
            reason: FilterReason::Exempt,
            ..
        }
    )));
    assert_eq!(sim.clock().freeze_frames_remaining(), 0);
}

// =============================================================================
// AI
// =============================================================================

#[test]
fn ai_in_bite_range_attacks_this_tick() {
    let mut sim = still_sim(5);
    sim.spawn_player(Vec2::ZERO);
    let hund = sim.spawn_fighter(&FighterProfile::hund(), Vec2::new(0.5, 0.0), Facing::Left);
    sim.arena_mut()
        .fighter_mut(hund)
        .unwrap()
        .set_ai_state(AiState::new(0, 5));

    sim.step();

    let hund = fighter(&sim, hund);
    assert_eq!(hund.current_attack(), Some(AttackId::HUND_BITE));
    assert!(!hund.can_attack());
}

#[test]
fn hund_bite_reaches_player() {
    let mut sim = still_sim(6);
    let player = sim.spawn_player(Vec2::ZERO);
    let hund = sim.spawn_fighter(&FighterProfile::hund(), Vec2::new(0.5, 0.0), Facing::Left);
    sim.arena_mut()
        .fighter_mut(hund)
        .unwrap()
        .set_ai_state(AiState::new(0, 5));

    let landed = run_until(&mut sim, 20, |sim| hp(sim, player) < 50);
    assert!(landed.is_some());
    assert_eq!(hp(&sim, player), 49);
    assert_eq!(fighter(&sim, player).hitstun_frames(), 6);
}

// =============================================================================
// Clock
// =============================================================================

#[test]
fn freeze_holds_every_counter() {
    let mut sim = still_sim(7);
    let player = sim.spawn_player(Vec2::new(-5.0, 0.0));
    let hund = sim.spawn_fighter(&FighterProfile::hund(), Vec2::new(5.0, 0.0), Facing::Left);
    sim.arena_mut()
        .fighter_mut(hund)
        .unwrap()
        .set_ai_state(AiState::new(200, 5));
    force_attack(&mut sim, player, AttackId::STAND_N);
    sim.step();

    let before_player = fighter(&sim, player).clone();
    let before_hund = fighter(&sim, hund).clone();
    sim.freeze(3);
    for _ in 0..3 {
        sim.step();
        assert_eq!(fighter(&sim, player), &before_player);
        assert_eq!(fighter(&sim, hund), &before_hund);
    }

    sim.step();
    assert_eq!(
        fighter(&sim, player).startup_remaining(),
        before_player.startup_remaining() - 1
    );
    assert_eq!(
        fighter(&sim, hund).ai_policy().unwrap().state().wait_frames(),
        before_hund.ai_policy().unwrap().state().wait_frames() - 1
    );
}

// =============================================================================
// Death & Fall-Out
// =============================================================================

#[test]
fn falling_out_kills_regardless_of_hp() {
    let mut sim = still_sim(8);
    let dummy = spawn_dummy(&mut sim, Vec2::new(0.0, -5.0), 20);

    sim.step();

    assert_eq!(hp(&sim, dummy), 0);
    assert_eq!(fighter(&sim, dummy).phase(), Phase::Dead);
    let events = drain_events(&sim);
    assert!(events.contains(&Event::FellOut {
        entity: dummy,
        respawned: false
    }));
    assert!(events.contains(&Event::Died { entity: dummy }));
}

#[test]
fn player_respawns_after_falling_out() {
    let mut sim = still_sim(9);
    let player = sim.spawn_player(Vec2::new(3.0, -6.0));

    sim.step();

    let player = fighter(&sim, player);
    assert_eq!(player.hp(), 50);
    assert_eq!(player.position(), sim.config().player_respawn);
}

#[test]
fn dead_enemy_leaves_a_gem_behind() {
    let mut sim = still_sim(10);
    sim.spawn_player(Vec2::new(-6.0, 0.0));
    let hund = sim.spawn_fighter(&FighterProfile::hund(), Vec2::new(4.0, 0.0), Facing::Left);
    sim.arena_mut().fighter_mut(hund).unwrap().reduce_hp(99);

    let gone = run_until(&mut sim, 30, |sim| sim.fighter(hund).is_none());
    assert!(gone.is_some());
    let gems = sim.arena().pickup_ids();
    assert_eq!(gems.len(), 1);
    let gem = sim.arena().get(gems[0]).unwrap();
    assert_eq!(gem.body().position, Vec2::new(4.0, 0.0));
}

#[test]
fn dead_player_stays_in_arena() {
    let mut sim = still_sim(11);
    let player = sim.spawn_player(Vec2::ZERO);
    sim.arena_mut().fighter_mut(player).unwrap().reduce_hp(50);

    sim.run(20);
    let player = fighter(&sim, player);
    assert!(player.death_complete());
    assert!(!player.is_alive());
}

// =============================================================================
// Pickups & Exit
// =============================================================================

#[test]
fn player_collects_touching_gem() {
    let mut sim = still_sim(12);
    let player = sim.spawn_player(Vec2::ZERO);
    let gem = sim
        .arena_mut()
        .spawn_pickup(Pickup::launched(Vec2::new(0.2, 0.0), Vec2::ZERO));

    sim.step();

    assert_eq!(fighter(&sim, player).gems(), 1);
    assert!(sim.arena().get(gem).is_none());
    assert!(drain_events(&sim).contains(&Event::PickupCollected {
        pickup: gem,
        collector: player,
        total: 1
    }));
}

#[test]
fn fallen_gem_returns_to_player() {
    let mut sim = still_sim(13);
    let player = sim.spawn_player(Vec2::new(5.0, 0.0));
    let gem = sim
        .arena_mut()
        .spawn_pickup(Pickup::launched(Vec2::new(0.0, -10.0), Vec2::ZERO));

    sim.step();
    assert_eq!(
        sim.arena().get(gem).unwrap().body().position,
        Vec2::new(5.0, 0.0)
    );
    assert!(drain_events(&sim).contains(&Event::FellOut {
        entity: gem,
        respawned: true
    }));

    sim.step();
    assert_eq!(fighter(&sim, player).gems(), 1);
}

#[test]
fn special_with_enough_gems_exits() {
    let mut sim = still_sim(14);
    let player = sim.spawn_player(Vec2::ZERO);
    for _ in 0..3 {
        sim.arena_mut().fighter_mut(player).unwrap().collect_gem();
    }

    sim.push_input(InputEvent::SpecialAttackPressed).unwrap();
    sim.step();

    assert!(drain_events(&sim).contains(&Event::ExitReached { entity: player }));
    assert_eq!(fighter(&sim, player).current_attack(), None);
}

// =============================================================================
// Projectiles
// =============================================================================

#[test]
fn shot_is_removed_after_landing() {
    let mut sim = still_sim(15);
    let dummy = spawn_dummy(&mut sim, Vec2::new(2.0, 0.0), 1);
    let shot = sim.arena_mut().spawn_fighter(Fighter::spawn(
        &ProjectileKind::PlayerShot.profile(Faction::Player),
        Vec2::new(2.0, 0.0),
        Facing::Right,
    ));

    sim.step();

    assert_eq!(hp(&sim, dummy), 0);
    assert!(sim.fighter(shot).is_none());
}

#[test]
fn missed_shot_expires() {
    let mut sim = still_sim(16);
    let shot = sim.arena_mut().spawn_fighter(Fighter::spawn(
        &ProjectileKind::PlayerShot.profile(Faction::Player),
        Vec2::ZERO,
        Facing::Right,
    ));

    let gone = run_until(&mut sim, 100, |sim| sim.fighter(shot).is_none());
    assert!(gone.is_some_and(|ticks| ticks > 90));
}

#[test]
fn forward_special_fires_player_shots() {
    let mut sim = still_sim(17);
    sim.spawn_player(Vec2::ZERO);
    sim.push_input(InputEvent::MoveAxisChanged(Vec2::new(1.0, 0.0)))
        .unwrap();
    sim.push_input(InputEvent::SpecialAttackPressed).unwrap();

    sim.run(25);
    let events = drain_events(&sim);
    assert!(events.iter().any(|e| matches!(e, Event::Spawned { .. })));
    let shots: Vec<_> = sim
        .arena()
        .fighter_ids()
        .into_iter()
        .filter_map(|id| sim.fighter(id))
        .filter(|f| f.profile().is_projectile())
        .collect();
    assert!(!shots.is_empty());
    assert!(shots.iter().all(|shot| shot.faction() == Faction::Player));
}
