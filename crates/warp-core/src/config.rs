//! Simulation tuning values.
//!
//! Every number the combat core needs that is not attack data lives here.
//! Defaults reproduce the shipped game.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{CombatError, Result};

/// Configuration for a [`Simulation`](crate::simulation::Simulation).
///
/// # Example
///
/// ```
/// use warp_core::config::SimConfig;
///
/// let config = SimConfig {
///     hitstop_frames: 0,
///     ..SimConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// assert_eq!(config.tick_rate, 30);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Fixed ticks per second.
    pub tick_rate: u32,
    /// Anything below this height has fallen out of the playfield.
    pub fall_out_y: f32,
    /// Global freeze applied on every landed hit. Zero disables it.
    pub hitstop_frames: u32,
    /// Where the player reappears after falling out.
    pub player_respawn: Vec2,
    /// Initial velocity of a dropped pickup.
    pub pickup_launch_velocity: Vec2,
    /// Pickups needed before the special button exits the level.
    pub gems_to_exit: u32,
    /// Horizontal speed of projectiles.
    pub projectile_speed: f32,
    /// Horizontal distance from the shooter at which projectiles appear.
    pub projectile_spawn_offset: f32,
    /// Visual lunge applied by standing and moving normals.
    pub lunge_distance: f32,
    /// Distance covered by one teleport step.
    pub teleport_distance: f32,
    /// Vertical lift applied during a pounce's startup.
    pub pounce_lift: f32,
    /// Forward travel per startup tick of a pounce.
    pub pounce_step: f32,
    /// Player run speed on the ground.
    pub ground_speed: f32,
    /// Player drift speed in the air.
    pub air_speed: f32,
    /// Vertical velocity set by a jump.
    pub jump_velocity: f32,
    /// Contact points along an axis needed to count as grounded or walled.
    pub contact_threshold: u32,
    /// Downward acceleration used by the reference physics adapter.
    pub gravity: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate: 30,
            fall_out_y: -4.0,
            hitstop_frames: 10,
            player_respawn: Vec2::new(14.0, 1.0),
            pickup_launch_velocity: Vec2::new(0.0, 5.0),
            gems_to_exit: 3,
            projectile_speed: 8.0,
            projectile_spawn_offset: 1.0,
            lunge_distance: 0.155,
            teleport_distance: 2.0,
            pounce_lift: 0.255,
            pounce_step: 0.15,
            ground_speed: 5.0,
            air_speed: 4.0,
            jump_velocity: 10.0,
            contact_threshold: 2,
            gravity: -20.0,
        }
    }
}

impl SimConfig {
    /// Seconds per tick.
    #[must_use]
    pub fn dt(&self) -> f32 {
        // tick_rate is validated to be small and positive.
        #[allow(clippy::cast_precision_loss)]
        let rate = self.tick_rate.max(1) as f32;
        1.0 / rate
    }

    /// Checks every field for a legal value.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if self.tick_rate == 0 {
            return Err(invalid("tick_rate", "must be positive"));
        }
        if self.contact_threshold == 0 {
            return Err(invalid("contact_threshold", "must be at least 1"));
        }
        let non_negative = [
            ("projectile_speed", self.projectile_speed),
            ("projectile_spawn_offset", self.projectile_spawn_offset),
            ("lunge_distance", self.lunge_distance),
            ("teleport_distance", self.teleport_distance),
            ("pounce_lift", self.pounce_lift),
            ("pounce_step", self.pounce_step),
            ("ground_speed", self.ground_speed),
            ("air_speed", self.air_speed),
            ("jump_velocity", self.jump_velocity),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(field, "must be finite and non-negative"));
            }
        }
        if !self.fall_out_y.is_finite() || !self.gravity.is_finite() {
            return Err(invalid("fall_out_y", "must be finite"));
        }
        if !self.player_respawn.is_finite() || self.player_respawn.y <= self.fall_out_y {
            return Err(invalid(
                "player_respawn",
                "must be finite and above the fall-out height",
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> CombatError {
    CombatError::InvalidConfig {
        field,
        reason: reason.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.dt() - 1.0 / 30.0).abs() < 0.0001);
    }

    #[test]
    fn zero_tick_rate_rejected() {
        let config = SimConfig {
            tick_rate: 0,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CombatError::InvalidConfig {
                field: "tick_rate",
                ..
            })
        ));
    }

    #[test]
    fn negative_speed_rejected() {
        let config = SimConfig {
            ground_speed: -1.0,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CombatError::InvalidConfig {
                field: "ground_speed",
                ..
            })
        ));
    }

    #[test]
    fn respawn_below_fall_out_rejected() {
        let config = SimConfig {
            player_respawn: Vec2::new(0.0, -10.0),
            ..SimConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: SimConfig =
            serde_json::from_str(r#"{ "hitstop_frames": 0, "tick_rate": 60 }"#).unwrap();
        assert_eq!(config.hitstop_frames, 0);
        assert_eq!(config.tick_rate, 60);
        assert_eq!(config.gems_to_exit, 3);
        assert!((config.fall_out_y + 4.0).abs() < 0.0001);
    }
}
