//! Hazard system
//!
//! This module provides:
//! - **Descriptors**: immutable descriptions of a spatial hazard (shape,
//!   where it sits, when it threatens, how severe it is)
//! - **Registry**: the set of hazards installed for the current phase
//! - **Resolver**: merges the active hazards into one avoidance verdict
//!
//! # Activation
//!
//! A hazard is active on a tick when its predicate holds against that
//! tick's snapshot *and* its origin provider resolved at least one anchor.
//! Nothing is cached between ticks: cast state changes every tick.

mod definition;
mod registry;
mod resolver;

#[cfg(test)]
mod resolver_tests;

pub use definition::{EntityMatcher, HazardDescriptor, OriginProvider, Predicate};
pub use registry::{ActiveHazard, HazardRegistry, RegistryError};
pub use resolver::{AvoidanceVerdict, PriorityResolver};
