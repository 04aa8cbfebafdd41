//! Priority-tiered avoidance
//!
//! Only the highest tier with an active hazard governs: High pre-empts
//! Medium pre-empts Low, even when the agent stands in none of the High
//! hazards. Within that tier the agent escapes to the nearest point outside
//! every hazard of the tier at once.

use std::fmt;

use tracing::debug;
use warden_types::Priority;

use super::ActiveHazard;
use crate::geometry::{SafeSpotSearch, Vec3};

/// Outcome of one avoidance pass
#[derive(Debug, Clone, PartialEq)]
pub enum AvoidanceVerdict {
    /// Not inside any hazard of the governing tier
    Clear,
    /// Move to `target`, which lies outside every hazard of `tier`
    Evade {
        tier: Priority,
        target: Vec3,
        /// Hazards currently occupied
        hazards: Vec<String>,
    },
    /// Inside `hazards` with no safe point within the search bound
    NoSafePoint { tier: Priority, hazards: Vec<String> },
}

impl AvoidanceVerdict {
    pub fn tier(&self) -> Option<Priority> {
        match self {
            AvoidanceVerdict::Clear => None,
            AvoidanceVerdict::Evade { tier, .. } | AvoidanceVerdict::NoSafePoint { tier, .. } => {
                Some(*tier)
            }
        }
    }

    pub fn is_clear(&self) -> bool {
        matches!(self, AvoidanceVerdict::Clear)
    }
}

impl fmt::Display for AvoidanceVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AvoidanceVerdict::Clear => f.write_str("clear"),
            AvoidanceVerdict::Evade {
                tier,
                target,
                hazards,
            } => write!(f, "evade {tier} [{}] -> {target}", hazards.join(", ")),
            AvoidanceVerdict::NoSafePoint { tier, hazards } => {
                write!(f, "no safe point from {tier} [{}]", hazards.join(", "))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PriorityResolver {
    search: SafeSpotSearch,
}

impl PriorityResolver {
    pub fn new(search: SafeSpotSearch) -> Self {
        Self { search }
    }

    pub fn search(&self) -> &SafeSpotSearch {
        &self.search
    }

    /// Merge this tick's active hazards into a single verdict for an agent
    /// standing at `position`.
    pub fn resolve(&self, position: Vec3, active: &[ActiveHazard<'_>]) -> AvoidanceVerdict {
        let Some(tier) = active.iter().map(|h| h.descriptor.priority).max() else {
            return AvoidanceVerdict::Clear;
        };

        let governing: Vec<&ActiveHazard<'_>> = active
            .iter()
            .filter(|h| h.descriptor.priority == tier)
            .collect();

        let occupied: Vec<String> = governing
            .iter()
            .filter(|h| h.contains(position))
            .map(|h| h.id().to_string())
            .collect();

        if occupied.is_empty() {
            return AvoidanceVerdict::Clear;
        }

        let found = self
            .search
            .nearest_safe_point(position, |p| governing.iter().any(|h| h.contains(p)));

        match found {
            Some(target) => {
                debug!(%tier, %target, hazards = ?occupied, "Evading");
                AvoidanceVerdict::Evade {
                    tier,
                    target,
                    hazards: occupied,
                }
            }
            None => AvoidanceVerdict::NoSafePoint {
                tier,
                hazards: occupied,
            },
        }
    }

    /// Nearest point outside every active High-tier hazard. Used for
    /// evacuation when no explicit destination is configured.
    pub fn safe_point(&self, from: Vec3, active: &[ActiveHazard<'_>]) -> Option<Vec3> {
        self.search.nearest_safe_point(from, |p| {
            active
                .iter()
                .filter(|h| h.descriptor.priority == Priority::High)
                .any(|h| h.contains(p))
        })
    }
}
