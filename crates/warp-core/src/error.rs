//! Error types for the combat core.
//!
//! Nothing in here is expected to surface during a normal tick. Inside the
//! tick, every recoverable condition degrades to a defined fallback (the blank
//! attack, a skipped movement request) and is logged. Errors only reach the
//! caller from setup-time APIs such as [`SimConfig::validate`] or
//! [`Simulation::push_input`].
//!
//! [`SimConfig::validate`]: crate::config::SimConfig::validate
//! [`Simulation::push_input`]: crate::simulation::Simulation::push_input

use crate::attack::AttackId;
use crate::entity::EntityId;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, CombatError>;

/// Errors produced by the combat core.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CombatError {
    /// An attack id outside the loaded attack table.
    #[error("unknown attack id {id}")]
    UnknownAttack {
        /// The id that was looked up.
        id: AttackId,
    },

    /// A homing direction was requested between two coincident points.
    #[error("cannot normalise a zero-length direction")]
    DegenerateDirection,

    /// An entity id that is not (or no longer) in the arena.
    #[error("no entity with id {0}")]
    UnknownEntity(EntityId),

    /// An operation that needs the player was issued before one was spawned.
    #[error("no player fighter in the arena")]
    NoPlayer,

    /// A configuration value outside its legal range.
    #[error("invalid config field `{field}`: {reason}")]
    InvalidConfig {
        /// Name of the offending field.
        field: &'static str,
        /// Human-readable reason.
        reason: String,
    },
}

impl CombatError {
    /// Returns true for conditions that the tick handles with a fallback.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::UnknownAttack { .. } | Self::DegenerateDirection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = CombatError::UnknownAttack {
            id: AttackId::new(99),
        };
        assert_eq!(err.to_string(), "unknown attack id 99");

        let err = CombatError::InvalidConfig {
            field: "tick_rate",
            reason: "must be positive".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config field `tick_rate`: must be positive"
        );
    }

    #[test]
    fn recoverable_classification() {
        assert!(CombatError::DegenerateDirection.is_recoverable());
        assert!(CombatError::UnknownAttack {
            id: AttackId::new(40)
        }
        .is_recoverable());
        assert!(!CombatError::NoPlayer.is_recoverable());
        assert!(!CombatError::UnknownEntity(EntityId::new(3)).is_recoverable());
    }
}
