//! Player input adapter.
//!
//! The host feeds edge-triggered [`InputEvent`]s; the adapter turns the held
//! state and the presses seen since the last tick into the same [`Intent`]
//! the AI produces for enemies. Presses are consumed by the tick that sees
//! them and discarded if they arrive while the player is in hitstun.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::attack::AttackId;
use crate::config::SimConfig;
use crate::fighter::{Intent, Movement};
use crate::geometry::Facing;

/// Longest chain of normal attacks.
pub const MAX_COMBO_CHAIN: u16 = 3;

/// Raw input edges from the host.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// The move stick changed. Components are expected in `[-1, 1]`.
    MoveAxisChanged(Vec2),
    /// Jump went down.
    JumpPressed,
    /// Jump went up.
    JumpReleased,
    /// Crouch went down.
    CrouchPressed,
    /// Crouch went up.
    CrouchReleased,
    /// Normal attack button.
    NormalAttackPressed,
    /// Special attack button.
    SpecialAttackPressed,
}

/// Player state the adapter needs to decide.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct PlayerView {
    /// Standing on ground.
    pub grounded: bool,
    /// Blocked on the left.
    pub wall_left: bool,
    /// Blocked on the right.
    pub wall_right: bool,
    /// May start an attack.
    pub can_attack: bool,
    /// An attack is in progress.
    pub attacking: bool,
    /// No attack is current.
    pub idle: bool,
    /// Gems collected so far.
    pub gems: u32,
}

/// Held buttons, pending presses and the combo chain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerInput {
    axis: Vec2,
    crouch_held: bool,
    jump_held: bool,
    jump_pressed: bool,
    normal_pressed: bool,
    special_pressed: bool,
    combo_chain: u16,
}

impl PlayerInput {
    /// Creates an adapter with nothing held.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one input edge.
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::MoveAxisChanged(axis) => {
                self.axis = axis.clamp(Vec2::NEG_ONE, Vec2::ONE);
            }
            InputEvent::JumpPressed => {
                self.jump_held = true;
                self.jump_pressed = true;
            }
            InputEvent::JumpReleased => self.jump_held = false,
            InputEvent::CrouchPressed => self.crouch_held = true,
            InputEvent::CrouchReleased => self.crouch_held = false,
            InputEvent::NormalAttackPressed => self.normal_pressed = true,
            InputEvent::SpecialAttackPressed => self.special_pressed = true,
        }
    }

    /// Drops presses that have not been consumed. Held state is kept.
    pub fn clear_presses(&mut self) {
        self.jump_pressed = false;
        self.normal_pressed = false;
        self.special_pressed = false;
    }

    /// Current move axis.
    #[must_use]
    pub fn axis(&self) -> Vec2 {
        self.axis
    }

    /// Crouch is held.
    #[must_use]
    pub fn crouching(&self) -> bool {
        self.crouch_held
    }

    /// Jump is held.
    #[must_use]
    pub fn jump_held(&self) -> bool {
        self.jump_held
    }

    /// Normal attacks started in the current chain.
    #[must_use]
    pub fn combo_chain(&self) -> u16 {
        self.combo_chain
    }

    /// Held direction for aimed specials. Diagonals are normalised.
    #[must_use]
    pub fn aim(&self) -> Vec2 {
        self.axis.normalize_or_zero()
    }

    /// Turns held state and pending presses into an intent.
    ///
    /// Presses are consumed whether or not they produced anything.
    pub fn decide(&mut self, view: &PlayerView, config: &SimConfig) -> Intent {
        if view.idle {
            self.combo_chain = 0;
        }

        let moving = self.axis.x != 0.0;
        let mut intent = Intent {
            aim: self.aim(),
            ..Intent::default()
        };

        if self.normal_pressed && view.can_attack && self.combo_chain < MAX_COMBO_CHAIN {
            let base = if !view.grounded {
                AttackId::AIR_N
            } else if self.crouch_held {
                AttackId::CROUCH_N
            } else if moving {
                AttackId::FORWARD_N
            } else {
                AttackId::STAND_N
            };
            intent.attack = Some(AttackId::new(base.as_u16() + self.combo_chain));
            self.combo_chain += 1;
        } else if self.special_pressed {
            if view.gems >= config.gems_to_exit {
                intent.exit = true;
            } else if view.can_attack {
                intent.attack = Some(if self.crouch_held {
                    AttackId::CROUCH_S
                } else if moving {
                    AttackId::FORWARD_S
                } else {
                    AttackId::STAND_S
                });
            }
        }

        intent.movement = self.movement(view, config);
        if view.grounded && !view.attacking {
            intent.facing = Facing::from_dx(self.axis.x);
            intent.jump = self.jump_pressed;
        }

        self.clear_presses();
        intent
    }

    fn movement(&self, view: &PlayerView, config: &SimConfig) -> Movement {
        let free = !view.attacking || !view.grounded;
        if !free || (view.grounded && self.crouch_held) || self.axis.x == 0.0 {
            return Movement::Horizontal(0.0);
        }
        let blocked =
            (self.axis.x < 0.0 && view.wall_left) || (self.axis.x > 0.0 && view.wall_right);
        if blocked {
            return Movement::Keep;
        }
        let speed = if view.grounded {
            config.ground_speed
        } else {
            config.air_speed
        };
        Movement::Horizontal(self.axis.x * speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grounded_ready() -> PlayerView {
        PlayerView {
            grounded: true,
            can_attack: true,
            idle: true,
            ..PlayerView::default()
        }
    }

    mod press_tests {
        use super::*;

        #[test]
        fn presses_are_consumed_once() {
            let config = SimConfig::default();
            let mut input = PlayerInput::new();
            input.apply(InputEvent::NormalAttackPressed);
            let first = input.decide(&grounded_ready(), &config);
            let second = input.decide(&grounded_ready(), &config);
            assert_eq!(first.attack, Some(AttackId::STAND_N));
            assert_eq!(second.attack, None);
        }

        #[test]
        fn clear_presses_keeps_held_state() {
            let mut input = PlayerInput::new();
            input.apply(InputEvent::CrouchPressed);
            input.apply(InputEvent::JumpPressed);
            input.clear_presses();
            assert!(input.crouching());
            assert!(input.jump_held());
            let intent = input.decide(&grounded_ready(), &SimConfig::default());
            assert!(!intent.jump);
        }

        #[test]
        fn axis_is_clamped() {
            let mut input = PlayerInput::new();
            input.apply(InputEvent::MoveAxisChanged(Vec2::new(3.0, -2.0)));
            assert_eq!(input.axis(), Vec2::new(1.0, -1.0));
        }
    }

    mod combo_tests {
        use super::*;

        #[test]
        fn chain_walks_through_three_hits() {
            let config = SimConfig::default();
            let mut input = PlayerInput::new();
            let mid_attack = PlayerView {
                idle: false,
                attacking: true,
                ..grounded_ready()
            };

            input.apply(InputEvent::NormalAttackPressed);
            assert_eq!(
                input.decide(&grounded_ready(), &config).attack,
                Some(AttackId::STAND_N)
            );
            input.apply(InputEvent::NormalAttackPressed);
            assert_eq!(
                input.decide(&mid_attack, &config).attack,
                Some(AttackId::STAND_NN)
            );
            input.apply(InputEvent::NormalAttackPressed);
            assert_eq!(
                input.decide(&mid_attack, &config).attack,
                Some(AttackId::STAND_NNN)
            );
            input.apply(InputEvent::NormalAttackPressed);
            assert_eq!(input.decide(&mid_attack, &config).attack, None);
            assert_eq!(input.combo_chain(), 3);

            input.decide(&grounded_ready(), &config);
            assert_eq!(input.combo_chain(), 0);
        }

        #[test]
        fn base_attack_depends_on_stance() {
            let config = SimConfig::default();

            let mut input = PlayerInput::new();
            input.apply(InputEvent::NormalAttackPressed);
            let airborne = PlayerView {
                grounded: false,
                ..grounded_ready()
            };
            assert_eq!(input.decide(&airborne, &config).attack, Some(AttackId::AIR_N));

            let mut input = PlayerInput::new();
            input.apply(InputEvent::CrouchPressed);
            input.apply(InputEvent::NormalAttackPressed);
            assert_eq!(
                input.decide(&grounded_ready(), &config).attack,
                Some(AttackId::CROUCH_N)
            );

            let mut input = PlayerInput::new();
            input.apply(InputEvent::MoveAxisChanged(Vec2::new(1.0, 0.0)));
            input.apply(InputEvent::NormalAttackPressed);
            assert_eq!(
                input.decide(&grounded_ready(), &config).attack,
                Some(AttackId::FORWARD_N)
            );
        }

        #[test]
        fn normal_needs_can_attack() {
            let mut input = PlayerInput::new();
            input.apply(InputEvent::NormalAttackPressed);
            let busy = PlayerView {
                can_attack: false,
                ..grounded_ready()
            };
            assert_eq!(input.decide(&busy, &SimConfig::default()).attack, None);
            assert_eq!(input.combo_chain(), 0);
        }
    }

    mod special_tests {
        use super::*;

        #[test]
        fn special_by_stance() {
            let config = SimConfig::default();
            let mut input = PlayerInput::new();
            input.apply(InputEvent::SpecialAttackPressed);
            assert_eq!(
                input.decide(&grounded_ready(), &config).attack,
                Some(AttackId::STAND_S)
            );

            input.apply(InputEvent::CrouchPressed);
            input.apply(InputEvent::SpecialAttackPressed);
            assert_eq!(
                input.decide(&grounded_ready(), &config).attack,
                Some(AttackId::CROUCH_S)
            );
        }

        #[test]
        fn enough_gems_exits_instead() {
            let config = SimConfig::default();
            let mut input = PlayerInput::new();
            input.apply(InputEvent::SpecialAttackPressed);
            let rich = PlayerView {
                gems: 3,
                ..grounded_ready()
            };
            let intent = input.decide(&rich, &config);
            assert!(intent.exit);
            assert_eq!(intent.attack, None);
        }
    }

    mod movement_tests {
        use super::*;

        #[test]
        fn ground_and_air_speeds() {
            let config = SimConfig::default();
            let mut input = PlayerInput::new();
            input.apply(InputEvent::MoveAxisChanged(Vec2::new(-1.0, 0.0)));

            let intent = input.decide(&grounded_ready(), &config);
            assert_eq!(intent.movement, Movement::Horizontal(-5.0));
            assert_eq!(intent.facing, Some(Facing::Left));

            let airborne = PlayerView {
                grounded: false,
                ..grounded_ready()
            };
            let intent = input.decide(&airborne, &config);
            assert_eq!(intent.movement, Movement::Horizontal(-4.0));
            assert_eq!(intent.facing, None);
        }

        #[test]
        fn walls_block_movement() {
            let mut input = PlayerInput::new();
            input.apply(InputEvent::MoveAxisChanged(Vec2::new(1.0, 0.0)));
            let walled = PlayerView {
                wall_right: true,
                ..grounded_ready()
            };
            let intent = input.decide(&walled, &SimConfig::default());
            assert_eq!(intent.movement, Movement::Keep);
        }

        #[test]
        fn grounded_attack_stops_but_air_attack_drifts() {
            let config = SimConfig::default();
            let mut input = PlayerInput::new();
            input.apply(InputEvent::MoveAxisChanged(Vec2::new(1.0, 0.0)));

            let ground_attack = PlayerView {
                attacking: true,
                idle: false,
                ..grounded_ready()
            };
            assert_eq!(
                input.decide(&ground_attack, &config).movement,
                Movement::Horizontal(0.0)
            );

            let air_attack = PlayerView {
                grounded: false,
                ..ground_attack
            };
            assert_eq!(
                input.decide(&air_attack, &config).movement,
                Movement::Horizontal(4.0)
            );
        }

        #[test]
        fn jump_only_from_ground() {
            let config = SimConfig::default();
            let mut input = PlayerInput::new();
            input.apply(InputEvent::JumpPressed);
            assert!(input.decide(&grounded_ready(), &config).jump);

            input.apply(InputEvent::JumpPressed);
            let airborne = PlayerView {
                grounded: false,
                ..grounded_ready()
            };
            assert!(!input.decide(&airborne, &config).jump);
        }

        #[test]
        fn aim_normalises_diagonals() {
            let mut input = PlayerInput::new();
            input.apply(InputEvent::MoveAxisChanged(Vec2::new(1.0, 1.0)));
            let aim = input.aim();
            assert!((aim.length() - 1.0).abs() < 0.0001);
            assert_eq!(PlayerInput::new().aim(), Vec2::ZERO);
        }
    }
}
