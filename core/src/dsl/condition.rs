//! Declarative world-state conditions
//!
//! Conditions are what encounter files use for hazard activation and
//! positioning gates. They compile into a [`Predicate`] evaluated against
//! every snapshot.

use serde::{Deserialize, Serialize};
use warden_types::Role;

use crate::geometry::Vec3;
use crate::hazards::Predicate;
use crate::world::WorldSnapshot;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Condition {
    Always,

    /// The agent is in combat
    #[default]
    InCombat,

    /// Current sub-zone is one of `ids`
    SubZone { ids: Vec<u32> },

    /// A living hostile is casting one of `ability_ids`
    Casting { ability_ids: Vec<u32> },

    /// A living NPC with this template ID exists
    NpcPresent { npc_id: u32 },

    /// A living NPC with this template ID has the agent targeted
    TargetingAgent { npc_id: u32 },

    /// The agent's role is one of `roles`
    Role { roles: Vec<Role> },

    /// The agent stands within `radius` of `position` (planar)
    AgentWithin { position: Vec3, radius: f32 },

    AllOf { conditions: Vec<Condition> },

    AnyOf { conditions: Vec<Condition> },

    Not { condition: Box<Condition> },
}

impl Condition {
    pub fn evaluate(&self, world: &WorldSnapshot) -> bool {
        match self {
            Condition::Always => true,
            Condition::InCombat => world.player.in_combat,
            Condition::SubZone { ids } => ids.contains(&world.sub_zone_id),
            Condition::Casting { ability_ids } => world.hostiles().any(|e| {
                e.casting_ability()
                    .is_some_and(|id| ability_ids.contains(&id))
            }),
            Condition::NpcPresent { npc_id } => world
                .entities
                .iter()
                .any(|e| e.npc_id == *npc_id && e.is_alive),
            Condition::TargetingAgent { npc_id } => world
                .entities
                .iter()
                .any(|e| e.npc_id == *npc_id && e.is_alive && world.is_targeting_agent(e)),
            Condition::Role { roles } => roles.contains(&world.player.role),
            Condition::AgentWithin { position, radius } => {
                world.player.position.distance_2d(*position) <= *radius
            }
            Condition::AllOf { conditions } => conditions.iter().all(|c| c.evaluate(world)),
            Condition::AnyOf { conditions } => conditions.iter().any(|c| c.evaluate(world)),
            Condition::Not { condition } => !condition.evaluate(world),
        }
    }

    /// Check for conditions that can never be meaningfully satisfied
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Condition::SubZone { ids } if ids.is_empty() => Err("sub_zone condition without ids".into()),
            Condition::Casting { ability_ids } if ability_ids.is_empty() => {
                Err("casting condition without ability_ids".into())
            }
            Condition::Role { roles } if roles.is_empty() => Err("role condition without roles".into()),
            Condition::AgentWithin { radius, .. } if !(*radius > 0.0) => {
                Err("agent_within radius must be > 0".into())
            }
            Condition::AllOf { conditions } | Condition::AnyOf { conditions } => {
                if conditions.is_empty() {
                    return Err("empty all_of/any_of".into());
                }
                conditions.iter().try_for_each(Condition::validate)
            }
            Condition::Not { condition } => condition.validate(),
            _ => Ok(()),
        }
    }

    pub fn into_predicate(self) -> Predicate {
        match self {
            Condition::Always => Predicate::always(),
            Condition::InCombat => Predicate::in_combat(),
            other => Predicate::new(move |world| other.evaluate(world)),
        }
    }
}
