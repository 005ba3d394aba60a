//! Crate-level tests for determinism and full-tick behaviour.
//!
//! - **Determinism tests**: same seed and inputs give the same state
//! - **Integration tests**: scenarios run through `Simulation::step`
//! - **Property tests**: invariants over generated inputs
//! - **Helper functions**: setup utilities shared by the above
//!
//! # Test Structure
//!
//! - `determinism.rs`: replay and hash comparisons
//! - `integration.rs`: hits, hitstop, deaths, pickups, projectiles
//! - `properties.rs`: proptest invariants
//! - `helpers.rs`: factory and stepping utilities

mod helpers;
mod integration;
