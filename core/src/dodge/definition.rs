//! Dodge obligation types
//!
//! An obligation is a bounded positioning requirement triggered by a
//! hostile cast: "while Hydroball is being cast, stand near a party member
//! for at most five seconds".

use std::time::Duration;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::geometry::Vec3;
use crate::world::FollowTarget;

/// What the agent does while an obligation is engaged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum DodgeResponse {
    /// Stay within `distance` of an entity
    Follow { target: FollowTarget, distance: f32 },

    /// Go to a designated point, or to the nearest point outside every
    /// active High-tier hazard when none is given
    Evacuate {
        #[serde(default)]
        point: Option<Vec3>,
        #[serde(default = "default_evacuate_tolerance")]
        tolerance: f32,
    },

    /// Spread out from the party
    Spread { minimum_separation: f32 },
}

impl DodgeResponse {
    pub fn kind(&self) -> &'static str {
        match self {
            DodgeResponse::Follow { .. } => "follow",
            DodgeResponse::Evacuate { .. } => "evacuate",
            DodgeResponse::Spread { .. } => "spread",
        }
    }
}

fn default_evacuate_tolerance() -> f32 {
    1.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct DodgeObligation {
    /// Unique within an encounter
    pub id: String,

    // ─── Trigger ────────────────────────────────────────────────────────────
    /// Ability IDs whose cast engages this obligation
    pub trigger_casts: HashSet<u32>,

    /// Only engage when the triggering cast (or its caster) targets the agent
    pub only_if_targeted: bool,

    // ─── Response ───────────────────────────────────────────────────────────
    pub response: DodgeResponse,

    /// Upper bound on an engagement, even if the cast keeps going
    pub max_duration: Duration,

    /// Reason passed to the ability gate while engaged
    pub movement_suppression: Option<String>,
}

impl DodgeObligation {
    pub fn new(
        id: impl Into<String>,
        trigger_casts: impl IntoIterator<Item = u32>,
        response: DodgeResponse,
        max_duration: Duration,
    ) -> Self {
        Self {
            id: id.into(),
            trigger_casts: trigger_casts.into_iter().collect(),
            only_if_targeted: false,
            response,
            max_duration,
            movement_suppression: None,
        }
    }

    pub fn follow(
        id: impl Into<String>,
        trigger_casts: impl IntoIterator<Item = u32>,
        target: FollowTarget,
        distance: f32,
        max_duration: Duration,
    ) -> Self {
        Self::new(
            id,
            trigger_casts,
            DodgeResponse::Follow { target, distance },
            max_duration,
        )
    }

    pub fn with_suppression(mut self, reason: impl Into<String>) -> Self {
        self.movement_suppression = Some(reason.into());
        self
    }

    pub fn only_if_targeted(mut self) -> Self {
        self.only_if_targeted = true;
        self
    }

    pub fn is_triggered_by(&self, ability_id: u32) -> bool {
        self.trigger_casts.contains(&ability_id)
    }
}
