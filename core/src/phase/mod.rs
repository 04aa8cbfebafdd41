//! Phase control
//!
//! Encounters are registered per zone. While the agent is in combat the
//! controller keeps the phase of the current sub-zone installed in the
//! hazard registry and the dodge scheduler, swapping both wholesale on
//! every transition.

mod controller;
mod definition;

pub use controller::{PhaseController, PhaseState, PhaseTransition, PhaseUpdate};
pub use definition::{Encounter, EncounterPhase, PhaseContent, PhaseKey};
