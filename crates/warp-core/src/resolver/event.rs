//! Event resolver for the host-facing event log.
//!
//! The `EventResolver` records event outputs with the tick they happened on.
//! It does not mutate game state.
//!
//! # Usage
//!
//! The log is drained with `take_events()`, typically once per host frame to
//! drive audio, effects or replay capture.

use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::arena::Arena;
use crate::output::{Event, Output, OutputKind};

use super::Resolver;

/// An event stamped with its tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickEvent {
    /// Tick the event happened on.
    pub tick: u64,
    /// The event.
    pub event: Event,
}

/// Resolver that records event outputs.
///
/// # Thread Safety
///
/// The log sits behind a `Mutex` to satisfy the `Send + Sync` bound of
/// [`Resolver`], even though the simulation is single-threaded.
///
/// # Example
///
/// ```
/// use warp_core::output::OutputKind;
/// use warp_core::resolver::{EventResolver, Resolver};
///
/// let resolver = EventResolver::new();
/// assert!(resolver.handles().contains(&OutputKind::Event));
/// assert!(resolver.take_events().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct EventResolver {
    event_log: Mutex<Vec<TickEvent>>,
}

impl EventResolver {
    /// Creates an event resolver with an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self {
            event_log: Mutex::new(Vec::new()),
        }
    }

    /// Drains and returns all recorded events in the order they were
    /// recorded.
    pub fn take_events(&self) -> Vec<TickEvent> {
        let mut log = self.event_log.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *log)
    }

    /// Number of events in the log.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.event_log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.event_count() == 0
    }

    /// Drops every recorded event.
    pub fn clear(&self) {
        self.event_log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Resolver for EventResolver {
    fn handles(&self) -> &[OutputKind] {
        &[OutputKind::Event]
    }

    fn resolve(&self, outputs: &[&Output], arena: &mut Arena, _follow_up: &mut Vec<Output>) {
        let tick = arena.current_tick();
        let mut log = self.event_log.lock().unwrap_or_else(PoisonError::into_inner);
        log.extend(outputs.iter().filter_map(|output| output.as_event()).map(|event| TickEvent {
            tick,
            event: event.clone(),
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attack::AttackId;
    use crate::entity::EntityId;
    use crate::output::Command;

    #[test]
    fn handles_event_kind_only() {
        let resolver = EventResolver::new();
        assert!(resolver.handles().contains(&OutputKind::Event));
        assert!(!resolver.handles().contains(&OutputKind::Command));
        assert!(!resolver.handles().contains(&OutputKind::Contact));
    }

    #[test]
    fn records_with_tick_and_drains() {
        let mut arena = Arena::new();
        arena.advance_tick();
        arena.advance_tick();

        let started = Output::from(Event::AttackStarted {
            source: EntityId::new(1),
            attack: AttackId::STAND_N,
        });
        let died = Output::from(Event::Died {
            entity: EntityId::new(2),
        });
        let resolver = EventResolver::new();
        resolver.resolve(&[&started, &died], &mut arena, &mut Vec::new());

        assert_eq!(resolver.event_count(), 2);
        let events = resolver.take_events();
        assert_eq!(events[0].tick, 2);
        assert!(matches!(events[1].event, Event::Died { .. }));
        assert!(resolver.is_empty());
    }

    #[test]
    fn ignores_non_events() {
        let mut arena = Arena::new();
        let command = Output::from(Command::Hitstop { frames: 3 });
        let resolver = EventResolver::new();
        resolver.resolve(&[&command], &mut arena, &mut Vec::new());
        assert!(resolver.is_empty());
    }

    #[test]
    fn clear_empties_log() {
        let mut arena = Arena::new();
        let died = Output::from(Event::Died {
            entity: EntityId::new(2),
        });
        let resolver = EventResolver::new();
        resolver.resolve(&[&died], &mut arena, &mut Vec::new());
        resolver.clear();
        assert!(resolver.is_empty());
    }
}
