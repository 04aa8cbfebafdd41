//! Follow-target selectors
//!
//! A `FollowTarget` names an entity relative to the current snapshot and,
//! for cast-triggered behavior, the cast that triggered it. Resolution can
//! fail (the entity died, despawned or never existed); callers treat that as
//! a configuration problem and hold position.

use serde::{Deserialize, Serialize};
use warden_types::Role;

use super::{EntitySnapshot, WorldSnapshot};

/// The cast an obligation is responding to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastContext {
    pub caster_id: u64,
    pub ability_id: u32,
    pub target_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum FollowTarget {
    /// The entity casting the triggering ability
    Caster,
    /// Whoever the triggering cast is aimed at
    CastTarget,
    /// Nearest living party member, optionally restricted to a role
    PartyMember {
        #[serde(default)]
        role: Option<Role>,
    },
    /// Nearest living NPC with this template ID
    NearestNpc { npc_id: u32 },
}

impl FollowTarget {
    /// Find the entity this selector refers to.
    ///
    /// `Caster` and `CastTarget` need a cast context; without one they never
    /// resolve. A `CastTarget` aimed at the agent itself does not resolve
    /// either: see [`FollowTarget::targets_agent`].
    pub fn resolve<'a>(
        &self,
        world: &'a WorldSnapshot,
        cast: Option<&CastContext>,
    ) -> Option<&'a EntitySnapshot> {
        let origin = world.player.position;
        match self {
            FollowTarget::Caster => cast.and_then(|c| world.entity(c.caster_id)),
            FollowTarget::CastTarget => cast
                .and_then(|c| c.target_id)
                .filter(|id| *id != world.player.entity_id)
                .and_then(|id| world.entity(id))
                .filter(|e| e.is_alive),
            FollowTarget::PartyMember { role } => world
                .party_members()
                .filter(|e| role.is_none() || e.role == *role)
                .min_by(|a, b| {
                    origin
                        .distance_squared_2d(a.position)
                        .total_cmp(&origin.distance_squared_2d(b.position))
                }),
            FollowTarget::NearestNpc { npc_id } => world
                .entities
                .iter()
                .filter(|e| e.npc_id == *npc_id && e.is_alive)
                .min_by(|a, b| {
                    origin
                        .distance_squared_2d(a.position)
                        .total_cmp(&origin.distance_squared_2d(b.position))
                }),
        }
    }

    /// Whether this selector points at the agent itself (a cast aimed at us:
    /// the others come to us, we stay put)
    pub fn targets_agent(&self, world: &WorldSnapshot, cast: Option<&CastContext>) -> bool {
        matches!(self, FollowTarget::CastTarget)
            && cast.and_then(|c| c.target_id) == Some(world.player.entity_id)
    }

    pub fn label(&self) -> String {
        match self {
            FollowTarget::Caster => "caster".to_string(),
            FollowTarget::CastTarget => "cast target".to_string(),
            FollowTarget::PartyMember { role: Some(role) } => format!("party {}", role.label()),
            FollowTarget::PartyMember { role: None } => "party member".to_string(),
            FollowTarget::NearestNpc { npc_id } => format!("npc {npc_id}"),
        }
    }
}
