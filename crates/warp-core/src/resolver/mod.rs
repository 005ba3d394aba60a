//! Resolvers turn a tick's outputs into state changes.
//!
//! Fighters emit [`Output`]s while they tick, and the physics adapter reports
//! [`Contact`](crate::output::Contact)s. Resolvers are the only place those
//! become mutations of the arena.
//!
//! # Architecture
//!
//! Each resolver declares which output kinds it handles via
//! [`Resolver::handles()`]. During resolution:
//! 1. Outputs are routed to resolvers based on their kind, in emission order
//! 2. Each resolver mutates the arena for the outputs it handles
//! 3. Outputs a resolver produces (impulses, events, spawns) are queued as
//!    follow-ups and routed again until none remain
//!
//! # Invariants
//!
//! - Resolvers MUST be deterministic given the same arena and output order
//! - Fighter combat state is only changed through the fighter's mutation
//!   contract (`reduce_hp`, `apply_hitstun`, `apply_knockback`)
//!
//! # Available Resolvers
//!
//! - [`PhysicsResolver`]: velocity, impulse and freeze requests
//! - [`CombatResolver`]: hit filtering, damage, hitstun, knockback
//! - [`SpawnResolver`]: projectiles, pickups, despawns
//! - [`PickupResolver`]: gem collection
//! - [`EventResolver`]: records events for the host (no state mutation)

mod combat;
mod event;
mod physics;
mod pickup;
mod spawn;

pub use combat::{CombatResolver, HitRules};
pub use event::{EventResolver, TickEvent};
pub use physics::PhysicsResolver;
pub use pickup::PickupResolver;
pub use spawn::SpawnResolver;

use crate::arena::Arena;
use crate::output::{Output, OutputKind};

/// Resolver processes outputs and mutates the arena.
///
/// # Example
///
/// ```
/// use warp_core::arena::Arena;
/// use warp_core::output::{Output, OutputKind};
/// use warp_core::resolver::Resolver;
///
/// struct CountingResolver;
///
/// impl Resolver for CountingResolver {
///     fn handles(&self) -> &[OutputKind] {
///         &[OutputKind::Command]
///     }
///
///     fn resolve(&self, outputs: &[&Output], _arena: &mut Arena, _follow_up: &mut Vec<Output>) {
///         assert!(outputs.iter().all(|output| output.kind() == OutputKind::Command));
///     }
/// }
/// ```
pub trait Resolver: Send + Sync {
    /// Returns the output kinds this resolver handles.
    fn handles(&self) -> &[OutputKind];

    /// Resolves outputs into state mutations.
    ///
    /// # Arguments
    ///
    /// * `outputs` - The outputs routed to this resolver (filtered by `handles()`)
    /// * `arena` - The state to mutate
    /// * `follow_up` - Sink for outputs produced while resolving
    fn resolve(&self, outputs: &[&Output], arena: &mut Arena, follow_up: &mut Vec<Output>);
}
