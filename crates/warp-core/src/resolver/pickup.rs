//! Pickup resolver for portal gems.
//!
//! A gem touching the player is collected exactly once: the first touch
//! marks it, adds one to the player's count and queues its removal. Later
//! touches in the same tick see a collected gem and do nothing.

use crate::arena::Arena;
use crate::entity::EntityId;
use crate::output::{Command, Contact, Event, Output, OutputKind};

use super::Resolver;

/// Resolver for pickup touches.
#[derive(Debug, Clone, Default)]
pub struct PickupResolver;

impl PickupResolver {
    /// Creates a new pickup resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn collect(
        arena: &mut Arena,
        pickup: EntityId,
        toucher: EntityId,
        follow_up: &mut Vec<Output>,
    ) {
        let is_player = arena
            .fighter(toucher)
            .is_some_and(|fighter| fighter.profile().is_player() && fighter.is_alive());
        if !is_player {
            return;
        }
        let fresh = arena
            .get_mut(pickup)
            .and_then(|entity| entity.as_pickup_mut())
            .is_some_and(|gem| gem.collect());
        if !fresh {
            return;
        }
        let Some(player) = arena.fighter_mut(toucher) else {
            return;
        };
        let total = player.collect_gem();
        tracing::debug!(%pickup, collector = %toucher, total, "pickup collected");
        follow_up.push(
            Event::PickupCollected {
                pickup,
                collector: toucher,
                total,
            }
            .into(),
        );
        follow_up.push(Command::Despawn { target: pickup }.into());
    }
}

impl Resolver for PickupResolver {
    fn handles(&self) -> &[OutputKind] {
        &[OutputKind::Contact]
    }

    fn resolve(&self, outputs: &[&Output], arena: &mut Arena, follow_up: &mut Vec<Output>) {
        for output in outputs {
            if let Some(Contact::Touch { pickup, toucher }) = output.as_contact() {
                Self::collect(arena, *pickup, *toucher, follow_up);
            }
        }
    }
}
