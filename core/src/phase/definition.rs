//! Encounter and phase definitions
//!
//! An `Encounter` is the declarative description of one duty: content that
//! applies in every phase plus content specific to individual sub-zones.
//! `Encounter::phase_for` composes the two into the `EncounterPhase` the
//! controller installs.

use std::fmt;

use hashbrown::HashMap;

use crate::dodge::DodgeObligation;
use crate::game_data::area_label;
use crate::hazards::HazardDescriptor;
use crate::positioning::PositioningRule;

/// Identifies a phase: a zone, optionally narrowed to one sub-zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhaseKey {
    pub zone_id: u32,
    /// `None` for the zone-wide phase
    pub sub_zone_id: Option<u32>,
}

impl PhaseKey {
    pub fn zone(zone_id: u32) -> Self {
        Self {
            zone_id,
            sub_zone_id: None,
        }
    }

    pub fn sub_zone(zone_id: u32, sub_zone_id: u32) -> Self {
        Self {
            zone_id,
            sub_zone_id: Some(sub_zone_id),
        }
    }
}

impl fmt::Display for PhaseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&area_label(self.zone_id, self.sub_zone_id))
    }
}

/// Hazards, obligations and positioning rules of one scope
#[derive(Debug, Clone, Default)]
pub struct PhaseContent {
    pub hazards: Vec<HazardDescriptor>,
    pub obligations: Vec<DodgeObligation>,
    pub positioning: Vec<PositioningRule>,
}

impl PhaseContent {
    pub fn is_empty(&self) -> bool {
        self.hazards.is_empty() && self.obligations.is_empty() && self.positioning.is_empty()
    }

    pub fn with_hazard(mut self, hazard: HazardDescriptor) -> Self {
        self.hazards.push(hazard);
        self
    }

    pub fn with_obligation(mut self, obligation: DodgeObligation) -> Self {
        self.obligations.push(obligation);
        self
    }

    pub fn with_positioning(mut self, rule: PositioningRule) -> Self {
        self.positioning.push(rule);
        self
    }
}

/// Content installed for one phase. Replaced wholesale on the next
/// transition.
#[derive(Debug, Clone)]
pub struct EncounterPhase {
    pub key: PhaseKey,
    pub hazards: Vec<HazardDescriptor>,
    pub obligations: Vec<DodgeObligation>,
    pub positioning: Vec<PositioningRule>,
}

#[derive(Debug, Clone)]
pub struct Encounter {
    pub zone_id: u32,
    pub name: String,
    /// Applies in every phase of the zone
    pub common: PhaseContent,
    /// Keyed by sub-zone ID
    pub phases: HashMap<u32, PhaseContent>,
}

impl Encounter {
    pub fn new(zone_id: u32, name: impl Into<String>) -> Self {
        Self {
            zone_id,
            name: name.into(),
            common: PhaseContent::default(),
            phases: HashMap::new(),
        }
    }

    pub fn with_common(mut self, content: PhaseContent) -> Self {
        self.common = content;
        self
    }

    pub fn with_phase(mut self, sub_zone_id: u32, content: PhaseContent) -> Self {
        self.phases.insert(sub_zone_id, content);
        self
    }

    /// Key of the phase that applies in `sub_zone_id`, falling back to the
    /// zone-wide phase
    pub fn phase_key(&self, sub_zone_id: u32) -> PhaseKey {
        if self.phases.contains_key(&sub_zone_id) {
            PhaseKey::sub_zone(self.zone_id, sub_zone_id)
        } else {
            PhaseKey::zone(self.zone_id)
        }
    }

    /// Compose the phase for `sub_zone_id`: zone-wide content first, then
    /// the sub-zone's own.
    pub fn phase_for(&self, sub_zone_id: u32) -> EncounterPhase {
        self.compose(self.phase_key(sub_zone_id))
    }

    pub(crate) fn compose(&self, key: PhaseKey) -> EncounterPhase {
        let mut hazards = self.common.hazards.clone();
        let mut obligations = self.common.obligations.clone();
        let mut positioning = self.common.positioning.clone();

        if let Some(specific) = key.sub_zone_id.and_then(|id| self.phases.get(&id)) {
            hazards.extend(specific.hazards.iter().cloned());
            obligations.extend(specific.obligations.iter().cloned());
            positioning.extend(specific.positioning.iter().cloned());
        }

        EncounterPhase {
            key,
            hazards,
            obligations,
            positioning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{HazardShape, Vec3};
    use crate::hazards::OriginProvider;

    fn hazard(id: &str) -> HazardDescriptor {
        HazardDescriptor::new(
            id,
            HazardShape::Circle { radius: 6.0 },
            OriginProvider::Fixed(Vec3::ZERO),
        )
    }

    fn encounter() -> Encounter {
        Encounter::new(626, "The Sirensong Sea")
            .with_common(PhaseContent::default().with_hazard(hazard("puddle")))
            .with_phase(1961, PhaseContent::default().with_hazard(hazard("lugat_arena")))
    }

    #[test]
    fn sub_zone_phase_includes_common_content_first() {
        let phase = encounter().phase_for(1961);
        assert_eq!(phase.key, PhaseKey::sub_zone(626, 1961));
        let ids: Vec<&str> = phase.hazards.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["puddle", "lugat_arena"]);
    }

    #[test]
    fn unknown_sub_zone_falls_back_to_zone_phase() {
        let phase = encounter().phase_for(1962);
        assert_eq!(phase.key, PhaseKey::zone(626));
        assert_eq!(phase.hazards.len(), 1);
    }

    #[test]
    fn key_display_uses_game_data() {
        assert_eq!(
            PhaseKey::sub_zone(626, 1961).to_string(),
            "The Sirensong Sea > Spae Rock"
        );
    }
}
