//! World model consumed from the host client
//!
//! A `WorldSnapshot` is everything the engine knows about one instant:
//! where the agent is, what the hostiles are casting, where the party
//! stands. Snapshots are produced by a `WorldFeed` once per tick and never
//! mutated by the engine.
//!
//! The collaborator traits at the bottom of this module are the only way
//! the engine affects the outside world.

mod target;

pub use target::{CastContext, FollowTarget};

use std::time::Duration;

use chrono::{NaiveDateTime, TimeDelta};
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use warden_types::Role;

use crate::geometry::{Anchor, Vec3};

// ═══════════════════════════════════════════════════════════════════════════
// Snapshot Types
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Hostile,
    PartyMember,
    /// Ground objects such as puddles and markers
    EventObject,
}

/// An in-progress cast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastInfo {
    pub ability_id: u32,
    /// Entity the cast is aimed at (if any)
    #[serde(default)]
    pub target_id: Option<u64>,
}

/// A tracked entity other than the agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub entity_id: u64,
    /// NPC template ID (0 for players)
    #[serde(default)]
    pub npc_id: u32,
    #[serde(default)]
    pub name: String,
    pub kind: EntityKind,
    pub position: Vec3,
    /// Facing in radians
    #[serde(default)]
    pub facing: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default = "default_true")]
    pub is_alive: bool,
    #[serde(default = "default_true")]
    pub is_targetable: bool,
    /// Entity currently targeted (if any)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cast: Option<CastInfo>,
}

impl EntitySnapshot {
    pub fn new(entity_id: u64, kind: EntityKind, position: Vec3) -> Self {
        Self {
            entity_id,
            npc_id: 0,
            name: String::new(),
            kind,
            position,
            facing: 0.0,
            role: None,
            is_alive: true,
            is_targetable: true,
            target_id: None,
            cast: None,
        }
    }

    /// Ability currently being cast (if any)
    pub fn casting_ability(&self) -> Option<u32> {
        self.cast.map(|c| c.ability_id)
    }

    pub fn is_casting_any(&self, ability_ids: &HashSet<u32>) -> bool {
        self.casting_ability()
            .is_some_and(|id| ability_ids.contains(&id))
    }

    pub fn anchor(&self) -> Anchor {
        Anchor::new(self.position, self.facing)
    }
}

/// The agent itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub entity_id: u64,
    pub position: Vec3,
    #[serde(default)]
    pub facing: f32,
    #[serde(default)]
    pub in_combat: bool,
    #[serde(default = "default_true")]
    pub is_alive: bool,
    #[serde(default)]
    pub role: Role,
}

impl PlayerState {
    pub fn new(entity_id: u64, position: Vec3) -> Self {
        Self {
            entity_id,
            position,
            facing: 0.0,
            in_combat: false,
            is_alive: true,
            role: Role::default(),
        }
    }
}

/// Everything observed about the world at one instant
#[derive(Debug, Clone, PartialEq)]
pub struct WorldSnapshot {
    /// Game time of the observation
    pub timestamp: NaiveDateTime,
    pub zone_id: u32,
    /// Sub-zone (arena) the agent is standing in, 0 when unknown
    pub sub_zone_id: u32,
    pub loading: bool,
    pub in_cutscene: bool,
    pub player: PlayerState,
    pub entities: Vec<EntitySnapshot>,
}

impl WorldSnapshot {
    pub fn new(timestamp: NaiveDateTime, player: PlayerState) -> Self {
        Self {
            timestamp,
            zone_id: 0,
            sub_zone_id: 0,
            loading: false,
            in_cutscene: false,
            player,
            entities: Vec::new(),
        }
    }

    /// Whether the agent may be moved at all this tick
    pub fn can_act(&self) -> bool {
        !self.loading && !self.in_cutscene && self.player.is_alive
    }

    pub fn entity(&self, entity_id: u64) -> Option<&EntitySnapshot> {
        self.entities.iter().find(|e| e.entity_id == entity_id)
    }

    /// Living hostile entities
    pub fn hostiles(&self) -> impl Iterator<Item = &EntitySnapshot> {
        self.entities
            .iter()
            .filter(|e| e.kind == EntityKind::Hostile && e.is_alive)
    }

    /// Living party members other than the agent
    pub fn party_members(&self) -> impl Iterator<Item = &EntitySnapshot> {
        let me = self.player.entity_id;
        self.entities
            .iter()
            .filter(move |e| e.kind == EntityKind::PartyMember && e.is_alive && e.entity_id != me)
    }

    /// Whether `entity` has the agent targeted
    pub fn is_targeting_agent(&self, entity: &EntitySnapshot) -> bool {
        entity.target_id == Some(self.player.entity_id)
    }

    /// Whether any living hostile is casting one of `ability_ids`
    pub fn is_casting_any(&self, ability_ids: &HashSet<u32>) -> bool {
        self.hostiles().any(|e| e.is_casting_any(ability_ids))
    }
}

fn default_true() -> bool {
    true
}

/// `start + duration`, saturating at the end of representable time
pub fn deadline(start: NaiveDateTime, duration: Duration) -> NaiveDateTime {
    i64::try_from(duration.as_millis())
        .ok()
        .and_then(TimeDelta::try_milliseconds)
        .and_then(|delta| start.checked_add_signed(delta))
        .unwrap_or(NaiveDateTime::MAX)
}

// ═══════════════════════════════════════════════════════════════════════════
// Collaborators
// ═══════════════════════════════════════════════════════════════════════════

/// Errors from the world-state feed. Losing the feed is the only condition
/// that stops the engine from ticking.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("world state feed unavailable: {0}")]
    Unavailable(String),

    #[error("world state feed disconnected")]
    Disconnected,
}

/// Source of world snapshots
pub trait WorldFeed {
    fn snapshot(&mut self) -> Result<WorldSnapshot, FeedError>;
}

/// Movement/navigation collaborator.
///
/// All calls are fire-and-forget: they return immediately, a newer call
/// supersedes any directive still in flight, and repeating a call with the
/// same arguments is harmless.
pub trait Mover {
    fn move_toward(&mut self, point: Vec3, arrival_tolerance: f32);
    fn follow_entity(&mut self, entity_id: u64, distance: f32);
    fn stop(&mut self);
}

/// Combat-rotation collaborator that can be asked to refrain from actions
/// that would interrupt movement
pub trait AbilityGate {
    fn suppress_movement(&mut self, reason: &str, until: NaiveDateTime);
    fn release_movement(&mut self);
}

/// Gate for hosts without a combat routine to coordinate with
#[derive(Debug, Default, Clone, Copy)]
pub struct NoGate;

impl AbilityGate for NoGate {
    fn suppress_movement(&mut self, _reason: &str, _until: NaiveDateTime) {}
    fn release_movement(&mut self) {}
}
