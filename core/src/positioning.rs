//! Standing role positioning
//!
//! Rules that apply for the whole phase rather than per cast: a healer
//! keeping the tank in range, damage dealers soaking an add. The first rule
//! whose role and condition match and whose target resolves governs; if
//! the agent is already within its engage distance nothing is issued.

use tracing::trace;
use warden_types::Role;

use crate::hazards::Predicate;
use crate::world::{FollowTarget, WorldSnapshot};

#[derive(Debug, Clone)]
pub struct PositioningRule {
    pub id: String,
    /// Roles this applies to (empty = everyone)
    pub roles: Vec<Role>,
    pub target: FollowTarget,
    /// Start following when farther than this
    pub engage_distance: f32,
    /// Distance handed to the mover
    pub follow_distance: f32,
    pub condition: Predicate,
}

/// Follow request from a positioning rule
#[derive(Debug, Clone, PartialEq)]
pub struct PositioningDirective {
    pub rule_id: String,
    pub entity_id: u64,
    pub distance: f32,
}

impl PositioningRule {
    pub fn new(
        id: impl Into<String>,
        target: FollowTarget,
        engage_distance: f32,
        follow_distance: f32,
    ) -> Self {
        Self {
            id: id.into(),
            roles: Vec::new(),
            target,
            engage_distance,
            follow_distance,
            condition: Predicate::always(),
        }
    }

    pub fn for_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.roles = roles.into_iter().collect();
        self
    }

    pub fn when(mut self, condition: Predicate) -> Self {
        self.condition = condition;
        self
    }

    pub fn applies_to(&self, role: Role) -> bool {
        self.roles.is_empty() || self.roles.contains(&role)
    }
}

/// Pick the governing rule. `None` out of combat, when no rule applies, or
/// when the governing rule is already satisfied.
pub fn evaluate(rules: &[PositioningRule], world: &WorldSnapshot) -> Option<PositioningDirective> {
    if !world.player.in_combat {
        return None;
    }

    let me = &world.player;
    for rule in rules {
        if !rule.applies_to(me.role) || !rule.condition.evaluate(world) {
            continue;
        }
        let Some(target) = rule.target.resolve(world, None) else {
            trace!(rule = %rule.id, target = %rule.target.label(), "Positioning target absent");
            continue;
        };

        if me.position.distance_2d(target.position) <= rule.engage_distance {
            return None;
        }
        return Some(PositioningDirective {
            rule_id: rule.id.clone(),
            entity_id: target.entity_id,
            distance: rule.follow_distance,
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec3;
    use crate::world::{EntityKind, EntitySnapshot, PlayerState};
    use chrono::NaiveDate;

    fn world(role: Role, entities: Vec<EntitySnapshot>) -> WorldSnapshot {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut player = PlayerState::new(1, Vec3::ZERO);
        player.in_combat = true;
        player.role = role;
        let mut w = WorldSnapshot::new(ts, player);
        w.entities = entities;
        w
    }

    fn tank_at(x: f32) -> EntitySnapshot {
        let mut e = EntitySnapshot::new(2, EntityKind::PartyMember, Vec3::new(x, 0.0, 0.0));
        e.role = Some(Role::Tank);
        e
    }

    fn soak_add(x: f32) -> EntitySnapshot {
        let mut e = EntitySnapshot::new(50, EntityKind::Hostile, Vec3::new(x, 0.0, 0.0));
        e.npc_id = 2138;
        e
    }

    fn rules() -> Vec<PositioningRule> {
        vec![
            PositioningRule::new("soak", FollowTarget::NearestNpc { npc_id: 2138 }, 1.0, 1.0)
                .for_roles([Role::Healer, Role::Dps]),
            PositioningRule::new(
                "healer_range",
                FollowTarget::PartyMember {
                    role: Some(Role::Tank),
                },
                30.0,
                15.0,
            )
            .for_roles([Role::Healer]),
        ]
    }

    #[test]
    fn healer_follows_distant_tank() {
        let w = world(Role::Healer, vec![tank_at(40.0)]);
        let directive = evaluate(&rules(), &w).unwrap();
        assert_eq!(directive.rule_id, "healer_range");
        assert_eq!(directive.entity_id, 2);
        assert_eq!(directive.distance, 15.0);
    }

    #[test]
    fn satisfied_rule_issues_nothing() {
        let w = world(Role::Healer, vec![tank_at(20.0)]);
        assert!(evaluate(&rules(), &w).is_none());
    }

    #[test]
    fn earlier_rule_wins_when_its_target_exists() {
        let w = world(Role::Healer, vec![tank_at(40.0), soak_add(10.0)]);
        assert_eq!(evaluate(&rules(), &w).unwrap().rule_id, "soak");
    }

    #[test]
    fn role_filter_applies() {
        let w = world(Role::Tank, vec![tank_at(40.0), soak_add(10.0)]);
        assert!(evaluate(&rules(), &w).is_none());
    }

    #[test]
    fn nothing_out_of_combat() {
        let mut w = world(Role::Healer, vec![tank_at(40.0)]);
        w.player.in_combat = false;
        assert!(evaluate(&rules(), &w).is_none());
    }

    #[test]
    fn condition_gates_rule() {
        let rules = vec![
            PositioningRule::new("gated", FollowTarget::NearestNpc { npc_id: 2138 }, 1.0, 1.0)
                .when(Predicate::new(|w| w.sub_zone_id == 3)),
        ];
        let mut w = world(Role::Dps, vec![soak_add(10.0)]);
        assert!(evaluate(&rules, &w).is_none());
        w.sub_zone_id = 3;
        assert!(evaluate(&rules, &w).is_some());
    }
}
