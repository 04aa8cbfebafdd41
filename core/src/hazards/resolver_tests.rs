//! Tests for the priority resolver

use chrono::{NaiveDate, NaiveDateTime};
use warden_types::Priority;

use super::*;
use crate::geometry::{HazardShape, SafeSpotSearch, Vec3};
use crate::world::{PlayerState, WorldSnapshot};

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn world_at(position: Vec3) -> WorldSnapshot {
    let mut player = PlayerState::new(1, position);
    player.in_combat = true;
    WorldSnapshot::new(now(), player)
}

fn circle(id: &str, center: Vec3, radius: f32, priority: Priority) -> HazardDescriptor {
    HazardDescriptor::new(id, HazardShape::Circle { radius }, OriginProvider::Fixed(center))
        .with_priority(priority)
}

fn resolve(
    registry: &HazardRegistry,
    world: &WorldSnapshot,
    resolver: &PriorityResolver,
) -> AvoidanceVerdict {
    let active: Vec<_> = registry.active_hazards(world).collect();
    resolver.resolve(world.player.position, &active)
}

#[test]
fn clear_when_nothing_active() {
    let registry = HazardRegistry::new();
    let w = world_at(Vec3::ZERO);
    assert_eq!(resolve(&registry, &w, &PriorityResolver::default()), AvoidanceVerdict::Clear);
}

#[test]
fn clear_when_outside_every_hazard() {
    let mut registry = HazardRegistry::new();
    registry
        .install(vec![circle("a", Vec3::new(0.0, 0.0, 20.0), 5.0, Priority::High)])
        .unwrap();
    let w = world_at(Vec3::ZERO);
    assert!(resolve(&registry, &w, &PriorityResolver::default()).is_clear());
}

#[test]
fn high_tier_escape_ignores_medium() {
    let mut registry = HazardRegistry::new();
    registry
        .install(vec![
            circle("high", Vec3::ZERO, 5.0, Priority::High),
            circle("medium", Vec3::ZERO, 10.0, Priority::Medium),
        ])
        .unwrap();
    let w = world_at(Vec3::new(0.0, 0.0, 1.0));

    let verdict = resolve(&registry, &w, &PriorityResolver::default());
    let AvoidanceVerdict::Evade {
        tier,
        target,
        hazards,
    } = verdict
    else {
        panic!("expected evade, got {verdict:?}");
    };

    assert_eq!(tier, Priority::High);
    assert_eq!(hazards, vec!["high".to_string()]);
    assert!(target.distance_2d(Vec3::ZERO) > 5.0);
    // medium still covers the target; it does not govern while high is active
    assert!(target.distance_2d(Vec3::ZERO) <= 10.0);
}

#[test]
fn lower_tier_ignored_while_higher_tier_active_elsewhere() {
    let mut registry = HazardRegistry::new();
    registry
        .install(vec![
            circle("far_high", Vec3::new(0.0, 0.0, 50.0), 5.0, Priority::High),
            circle("medium", Vec3::ZERO, 10.0, Priority::Medium),
        ])
        .unwrap();
    let w = world_at(Vec3::ZERO);
    assert!(resolve(&registry, &w, &PriorityResolver::default()).is_clear());
}

#[test]
fn escape_avoids_overlapping_hazards_of_same_tier() {
    let mut registry = HazardRegistry::new();
    registry
        .install(vec![
            circle("first", Vec3::ZERO, 5.0, Priority::High),
            circle("second", Vec3::new(0.0, 0.0, 9.0), 5.0, Priority::High),
        ])
        .unwrap();
    let w = world_at(Vec3::new(0.0, 0.0, 3.0));

    let AvoidanceVerdict::Evade { target, .. } = resolve(&registry, &w, &PriorityResolver::default())
    else {
        panic!("expected evade");
    };
    assert!(target.distance_2d(Vec3::ZERO) > 5.0);
    assert!(target.distance_2d(Vec3::new(0.0, 0.0, 9.0)) > 5.0);
}

#[test]
fn agent_at_donut_centre_is_already_safe() {
    let mut registry = HazardRegistry::new();
    registry
        .install(vec![
            HazardDescriptor::new(
                "arena",
                HazardShape::Donut {
                    inner_radius: 12.0,
                    outer_radius: 90.0,
                },
                OriginProvider::Fixed(Vec3::ZERO),
            )
            .with_priority(Priority::High),
        ])
        .unwrap();

    let w = world_at(Vec3::ZERO);
    assert!(resolve(&registry, &w, &PriorityResolver::default()).is_clear());
}

#[test]
fn donut_escape_heads_for_the_closer_side() {
    let mut registry = HazardRegistry::new();
    registry
        .install(vec![
            HazardDescriptor::new(
                "arena",
                HazardShape::Donut {
                    inner_radius: 12.0,
                    outer_radius: 90.0,
                },
                OriginProvider::Fixed(Vec3::ZERO),
            )
            .with_priority(Priority::High),
        ])
        .unwrap();
    let start = Vec3::new(0.0, 0.0, 20.5);
    let w = world_at(start);

    let AvoidanceVerdict::Evade { target, .. } = resolve(&registry, &w, &PriorityResolver::default())
    else {
        panic!("expected evade");
    };
    let from_centre = target.distance_2d(Vec3::ZERO);
    assert!(from_centre < 12.0 || from_centre > 90.0);
    assert!((start.distance_2d(target) - 9.0).abs() < 1e-3);
}

#[test]
fn exhausted_search_reports_no_safe_point() {
    let mut registry = HazardRegistry::new();
    registry
        .install(vec![circle("huge", Vec3::ZERO, 50.0, Priority::Medium)])
        .unwrap();
    let w = world_at(Vec3::ZERO);

    let verdict = resolve(&registry, &w, &PriorityResolver::default());
    assert_eq!(
        verdict,
        AvoidanceVerdict::NoSafePoint {
            tier: Priority::Medium,
            hazards: vec!["huge".to_string()],
        }
    );
}

#[test]
fn wider_search_finds_what_default_misses_clear_of_the_edge() {
    let mut registry = HazardRegistry::new();
    registry
        .install(vec![circle("huge", Vec3::ZERO, 50.0, Priority::Medium)])
        .unwrap();
    let w = world_at(Vec3::ZERO);
    let resolver = PriorityResolver::new(SafeSpotSearch {
        angular_step_degrees: 10.0,
        radial_step: 5.0,
        max_radius: 60.0,
    });

    let AvoidanceVerdict::Evade { target, .. } = resolve(&registry, &w, &resolver) else {
        panic!("expected evade");
    };
    assert!((target.distance_2d(Vec3::ZERO) - 55.0).abs() < 1e-3);
}

#[test]
fn safe_point_only_considers_high_tier() {
    let mut registry = HazardRegistry::new();
    registry
        .install(vec![
            circle("high", Vec3::ZERO, 4.0, Priority::High),
            circle("low", Vec3::ZERO, 30.0, Priority::Low),
        ])
        .unwrap();
    let w = world_at(Vec3::ZERO);
    let active: Vec<_> = registry.active_hazards(&w).collect();

    let point = PriorityResolver::default()
        .safe_point(Vec3::ZERO, &active)
        .unwrap();
    assert!((point.distance_2d(Vec3::ZERO) - 5.0).abs() < 1e-3);
}
