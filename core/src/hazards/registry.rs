//! Installed hazard set for the current phase

use std::sync::Arc;

use hashbrown::HashSet;
use thiserror::Error;
use tracing::{debug, trace};

use super::HazardDescriptor;
use crate::geometry::{Anchor, Vec3};
use crate::world::WorldSnapshot;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("duplicate hazard id '{0}'")]
    DuplicateId(String),

    #[error("hazard '{id}' has an invalid shape: {reason}")]
    InvalidShape { id: String, reason: String },
}

/// Hazards of the active phase.
///
/// The set is held behind a single `Arc` and replaced wholesale, so any
/// reader sees either the previous set or the new one. Only the phase
/// controller installs or clears.
#[derive(Debug, Clone)]
pub struct HazardRegistry {
    hazards: Arc<[HazardDescriptor]>,
    /// Bumped on every install/clear
    generation: u64,
}

impl Default for HazardRegistry {
    fn default() -> Self {
        Self {
            hazards: Arc::from(Vec::new()),
            generation: 0,
        }
    }
}

impl HazardRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the full hazard set.
    ///
    /// The new set is validated first; on error the current set is left
    /// untouched.
    pub fn install(&mut self, hazards: Vec<HazardDescriptor>) -> Result<(), RegistryError> {
        Self::check(&hazards)?;

        self.hazards = Arc::from(hazards);
        self.generation += 1;
        debug!(count = self.hazards.len(), generation = self.generation, "Hazards installed");
        Ok(())
    }

    fn check(hazards: &[HazardDescriptor]) -> Result<(), RegistryError> {
        let mut seen = HashSet::with_capacity(hazards.len());
        for hazard in hazards {
            if !seen.insert(hazard.id.as_str()) {
                return Err(RegistryError::DuplicateId(hazard.id.clone()));
            }
            hazard
                .shape
                .validate()
                .map_err(|reason| RegistryError::InvalidShape {
                    id: hazard.id.clone(),
                    reason,
                })?;
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        if !self.hazards.is_empty() {
            debug!(count = self.hazards.len(), "Hazards cleared");
        }
        self.hazards = Arc::from(Vec::new());
        self.generation += 1;
    }

    /// Shared handle to the installed set
    pub fn snapshot(&self) -> Arc<[HazardDescriptor]> {
        Arc::clone(&self.hazards)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.hazards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hazards.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&HazardDescriptor> {
        self.hazards.iter().find(|h| h.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.hazards.iter().map(|h| h.id.as_str())
    }

    /// Hazards that threaten this tick, evaluated lazily against `world`
    pub fn active_hazards<'a>(
        &'a self,
        world: &'a WorldSnapshot,
    ) -> impl Iterator<Item = ActiveHazard<'a>> + 'a {
        self.hazards.iter().filter_map(move |descriptor| {
            let anchors = descriptor.activate(world)?;
            trace!(hazard = %descriptor.id, anchors = anchors.len(), "Hazard active");
            Some(ActiveHazard {
                descriptor,
                anchors,
            })
        })
    }
}

/// A hazard that threatens this tick, with its resolved anchors
#[derive(Debug, Clone)]
pub struct ActiveHazard<'a> {
    pub descriptor: &'a HazardDescriptor,
    pub anchors: Vec<Anchor>,
}

impl ActiveHazard<'_> {
    /// Inside the hazard around any of its anchors
    pub fn contains(&self, point: Vec3) -> bool {
        self.anchors
            .iter()
            .any(|anchor| self.descriptor.shape.contains(point, anchor))
    }

    pub fn id(&self) -> &str {
        &self.descriptor.id
    }
}
