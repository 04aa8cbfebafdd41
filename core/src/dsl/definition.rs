//! Encounter file schema
//!
//! One TOML file describes one duty:
//!
//! ```toml
//! [encounter]
//! name = "The Sirensong Sea"
//! zone_id = 626
//!
//! [[hazard]]
//! id = "lugat_donut"
//! sub_zone = 1961
//! priority = "high"
//! shape = { type = "donut", inner_radius = 19.0, outer_radius = 90.0 }
//! origin = { type = "point", position = [-1.79, -2.90, -215.61] }
//!
//! [[obligation]]
//! id = "hydroball"
//! trigger_casts = [8023]
//! max_duration_ms = 5000
//! response = { type = "follow", target = { type = "party_member" }, distance = 2.0 }
//! ```
//!
//! Entries without `sub_zone` apply zone-wide; the rest only in that
//! sub-zone's phase.

use std::time::Duration;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use warden_types::{Priority, Role};

use super::condition::Condition;
use crate::dodge::{DodgeObligation, DodgeResponse};
use crate::geometry::{HazardShape, Vec3};
use crate::hazards::{EntityMatcher, HazardDescriptor, OriginProvider};
use crate::phase::{Encounter, PhaseContent};
use crate::positioning::PositioningRule;
use crate::world::{EntityKind, FollowTarget};

// ═══════════════════════════════════════════════════════════════════════════
// File Root
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterFile {
    pub encounter: EncounterHeader,

    #[serde(default, rename = "hazard", skip_serializing_if = "Vec::is_empty")]
    pub hazards: Vec<HazardDefinition>,

    #[serde(default, rename = "obligation", skip_serializing_if = "Vec::is_empty")]
    pub obligations: Vec<ObligationDefinition>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub positioning: Vec<PositioningDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterHeader {
    pub name: String,
    pub zone_id: u32,
}

// ═══════════════════════════════════════════════════════════════════════════
// Hazards
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardDefinition {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_zone: Option<u32>,

    #[serde(default)]
    pub priority: Priority,

    pub shape: HazardShape,

    pub origin: OriginDefinition,

    /// Defaults to "in combat"
    #[serde(default)]
    pub when: Condition,
}

/// Where a hazard is anchored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum OriginDefinition {
    /// Fixed world coordinate
    Point { position: Vec3 },

    /// Every living NPC with this template ID
    Npc {
        npc_id: u32,
        #[serde(default)]
        targetable_only: bool,
    },

    /// Every living hostile casting one of these abilities
    Casting {
        ability_ids: Vec<u32>,
        #[serde(default)]
        npc_id: Option<u32>,
    },

    /// Ground objects (puddles, orbs) by template ID
    EventObject { npc_id: u32 },
}

impl OriginDefinition {
    fn to_provider(&self) -> OriginProvider {
        match self {
            OriginDefinition::Point { position } => OriginProvider::Fixed(*position),
            OriginDefinition::Npc {
                npc_id,
                targetable_only,
            } => {
                let matcher = EntityMatcher::npc(*npc_id);
                OriginProvider::Entity(if *targetable_only {
                    matcher.targetable()
                } else {
                    matcher
                })
            }
            OriginDefinition::Casting {
                ability_ids,
                npc_id,
            } => OriginProvider::Entity(EntityMatcher {
                npc_id: *npc_id,
                kind: Some(EntityKind::Hostile),
                ..EntityMatcher::casting(ability_ids.iter().copied())
            }),
            OriginDefinition::EventObject { npc_id } => OriginProvider::Entity(EntityMatcher {
                kind: Some(EntityKind::EventObject),
                ..EntityMatcher::npc(*npc_id)
            }),
        }
    }
}

impl HazardDefinition {
    pub fn validate(&self) -> Result<(), String> {
        self.shape
            .validate()
            .map_err(|reason| format!("hazard '{}': {}", self.id, reason))?;
        if let OriginDefinition::Casting { ability_ids, .. } = &self.origin
            && ability_ids.is_empty()
        {
            return Err(format!("hazard '{}': casting origin without ability_ids", self.id));
        }
        self.when
            .validate()
            .map_err(|reason| format!("hazard '{}': {}", self.id, reason))
    }

    pub fn to_descriptor(&self) -> HazardDescriptor {
        let mut descriptor =
            HazardDescriptor::new(self.id.clone(), self.shape.clone(), self.origin.to_provider())
                .with_priority(self.priority)
                .when(self.when.clone().into_predicate());
        if let Some(label) = &self.label {
            descriptor = descriptor.with_label(label.clone());
        }
        descriptor
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Dodge Obligations
// ═══════════════════════════════════════════════════════════════════════════

/// Longest engagement an obligation may declare (one hour)
pub const MAX_OBLIGATION_DURATION_MS: u64 = 60 * 60 * 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObligationDefinition {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_zone: Option<u32>,

    pub trigger_casts: Vec<u32>,

    pub max_duration_ms: u64,

    pub response: DodgeResponse,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movement_suppression: Option<String>,

    #[serde(default)]
    pub only_if_targeted: bool,
}

impl ObligationDefinition {
    pub fn validate(&self) -> Result<(), String> {
        if self.trigger_casts.is_empty() {
            return Err(format!("obligation '{}': no trigger_casts", self.id));
        }
        if self.max_duration_ms == 0 {
            return Err(format!("obligation '{}': max_duration_ms must be > 0", self.id));
        }
        if self.max_duration_ms > MAX_OBLIGATION_DURATION_MS {
            return Err(format!(
                "obligation '{}': max_duration_ms must be <= {}",
                self.id, MAX_OBLIGATION_DURATION_MS
            ));
        }
        match &self.response {
            DodgeResponse::Follow { distance, .. } if *distance < 0.0 => Err(format!(
                "obligation '{}': negative follow distance",
                self.id
            )),
            DodgeResponse::Spread { minimum_separation } if *minimum_separation <= 0.0 => Err(
                format!("obligation '{}': minimum_separation must be > 0", self.id),
            ),
            _ => Ok(()),
        }
    }

    pub fn to_obligation(&self) -> DodgeObligation {
        let mut obligation = DodgeObligation::new(
            self.id.clone(),
            self.trigger_casts.iter().copied(),
            self.response.clone(),
            Duration::from_millis(self.max_duration_ms),
        );
        if let Some(reason) = &self.movement_suppression {
            obligation = obligation.with_suppression(reason.clone());
        }
        if self.only_if_targeted {
            obligation = obligation.only_if_targeted();
        }
        obligation
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Positioning
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositioningDefinition {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_zone: Option<u32>,

    /// Empty = every role
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<Role>,

    pub target: FollowTarget,

    pub engage_distance: f32,

    pub follow_distance: f32,

    #[serde(default = "always")]
    pub when: Condition,
}

fn always() -> Condition {
    Condition::Always
}

impl PositioningDefinition {
    pub fn validate(&self) -> Result<(), String> {
        if matches!(self.target, FollowTarget::Caster | FollowTarget::CastTarget) {
            return Err(format!(
                "positioning '{}': {} needs a cast and cannot be used here",
                self.id,
                self.target.label()
            ));
        }
        if self.engage_distance < 0.0 || self.follow_distance < 0.0 {
            return Err(format!("positioning '{}': negative distance", self.id));
        }
        self.when
            .validate()
            .map_err(|reason| format!("positioning '{}': {}", self.id, reason))
    }

    pub fn to_rule(&self) -> PositioningRule {
        PositioningRule::new(
            self.id.clone(),
            self.target.clone(),
            self.engage_distance,
            self.follow_distance,
        )
        .for_roles(self.roles.iter().copied())
        .when(self.when.clone().into_predicate())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Conversion
// ═══════════════════════════════════════════════════════════════════════════

impl EncounterFile {
    /// Check every entry. Returns the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        check_unique("hazard", self.hazards.iter().map(|h| h.id.as_str()))?;
        check_unique("obligation", self.obligations.iter().map(|o| o.id.as_str()))?;
        check_unique("positioning", self.positioning.iter().map(|p| p.id.as_str()))?;

        self.hazards.iter().try_for_each(HazardDefinition::validate)?;
        self.obligations
            .iter()
            .try_for_each(ObligationDefinition::validate)?;
        self.positioning
            .iter()
            .try_for_each(PositioningDefinition::validate)
    }

    /// Build the runtime encounter, grouping entries by sub-zone
    pub fn to_encounter(&self) -> Encounter {
        let mut encounter = Encounter::new(self.encounter.zone_id, self.encounter.name.clone());

        for hazard in &self.hazards {
            content_for(&mut encounter, hazard.sub_zone)
                .hazards
                .push(hazard.to_descriptor());
        }
        for obligation in &self.obligations {
            content_for(&mut encounter, obligation.sub_zone)
                .obligations
                .push(obligation.to_obligation());
        }
        for rule in &self.positioning {
            content_for(&mut encounter, rule.sub_zone)
                .positioning
                .push(rule.to_rule());
        }

        encounter
    }
}

fn content_for(encounter: &mut Encounter, sub_zone: Option<u32>) -> &mut PhaseContent {
    match sub_zone {
        Some(id) => encounter.phases.entry(id).or_default(),
        None => &mut encounter.common,
    }
}

fn check_unique<'a>(what: &str, ids: impl Iterator<Item = &'a str>) -> Result<(), String> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(format!("duplicate {} id '{}'", what, id));
        }
    }
    Ok(())
}
