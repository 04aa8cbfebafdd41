//! Tests for Engine
//!
//! Drives the engine with scripted snapshots and records what reaches the
//! mover and the ability gate.

use std::collections::VecDeque;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use tokio::sync::watch;
use warden_types::{EngineConfig, Priority, Role};

use crate::dodge::DodgeObligation;
use crate::dsl::{bundled_definitions_dir, load_encounter_from_file};
use crate::engine::{Engine, EngineStatus, IntentSource, MovementIntent, TickWarning};
use crate::geometry::{HazardShape, Vec3};
use crate::hazards::{AvoidanceVerdict, HazardDescriptor, OriginProvider};
use crate::phase::{Encounter, PhaseContent, PhaseState};
use crate::positioning::PositioningRule;
use crate::spread::spread_radius;
use crate::world::{
    AbilityGate, CastInfo, EntityKind, EntitySnapshot, FeedError, FollowTarget, Mover,
    PlayerState, WorldFeed, WorldSnapshot,
};

const ZONE: u32 = 9000;
const AGENT: u64 = 1;

// ═══════════════════════════════════════════════════════════════════════════
// Test Doubles
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
enum MoverCall {
    MoveToward(Vec3, f32),
    Follow(u64, f32),
    Stop,
}

#[derive(Debug, Default)]
struct RecordingMover {
    calls: Vec<MoverCall>,
}

impl Mover for RecordingMover {
    fn move_toward(&mut self, point: Vec3, arrival_tolerance: f32) {
        self.calls.push(MoverCall::MoveToward(point, arrival_tolerance));
    }

    fn follow_entity(&mut self, entity_id: u64, distance: f32) {
        self.calls.push(MoverCall::Follow(entity_id, distance));
    }

    fn stop(&mut self) {
        self.calls.push(MoverCall::Stop);
    }
}

#[derive(Debug, Default)]
struct RecordingGate {
    suppressed: Vec<(String, NaiveDateTime)>,
    releases: usize,
}

impl AbilityGate for RecordingGate {
    fn suppress_movement(&mut self, reason: &str, until: NaiveDateTime) {
        self.suppressed.push((reason.to_string(), until));
    }

    fn release_movement(&mut self) {
        self.releases += 1;
    }
}

/// Hands out queued frames, then repeats `fallback` (or reports a
/// disconnect when there is none)
#[derive(Debug, Default)]
struct ScriptedFeed {
    frames: VecDeque<Result<WorldSnapshot, FeedError>>,
    fallback: Option<WorldSnapshot>,
    pulls: usize,
}

impl ScriptedFeed {
    fn repeating(world: WorldSnapshot) -> Self {
        Self {
            fallback: Some(world),
            ..Self::default()
        }
    }
}

impl WorldFeed for ScriptedFeed {
    fn snapshot(&mut self) -> Result<WorldSnapshot, FeedError> {
        self.pulls += 1;
        match self.frames.pop_front() {
            Some(frame) => frame,
            None => self.fallback.clone().ok_or(FeedError::Disconnected),
        }
    }
}

type TestEngine = Engine<ScriptedFeed, RecordingMover, RecordingGate>;

// ═══════════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════════

fn at(ms: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
        + chrono::Duration::milliseconds(ms)
}

fn world(ms: i64, position: Vec3) -> WorldSnapshot {
    let mut player = PlayerState::new(AGENT, position);
    player.in_combat = true;
    let mut w = WorldSnapshot::new(at(ms), player);
    w.zone_id = ZONE;
    w
}

fn hostile(id: u64, position: Vec3, ability: Option<u32>) -> EntitySnapshot {
    let mut e = EntitySnapshot::new(id, EntityKind::Hostile, position);
    e.cast = ability.map(|ability_id| CastInfo {
        ability_id,
        target_id: None,
    });
    e
}

fn ally(id: u64, position: Vec3) -> EntitySnapshot {
    EntitySnapshot::new(id, EntityKind::PartyMember, position)
}

fn blast(priority: Priority, radius: f32) -> HazardDescriptor {
    HazardDescriptor::new(
        "blast",
        HazardShape::Circle { radius },
        OriginProvider::Fixed(Vec3::ZERO),
    )
    .with_priority(priority)
}

fn hydroball() -> DodgeObligation {
    DodgeObligation::follow(
        "hydroball",
        [8023],
        FollowTarget::PartyMember { role: None },
        2.0,
        Duration::from_millis(5000),
    )
}

fn engine(content: PhaseContent) -> TestEngine {
    let mut engine = Engine::new(
        ScriptedFeed::default(),
        RecordingMover::default(),
        RecordingGate::default(),
        EngineConfig::default(),
    );
    engine.register_encounter(Encounter::new(ZONE, "Test Duty").with_common(content));
    engine
}

// ═══════════════════════════════════════════════════════════════════════════
// Precedence
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn evades_high_hazard_and_stops_once_when_gate_closes() {
    let mut engine = engine(PhaseContent::default().with_hazard(blast(Priority::High, 5.0)));

    let report = engine.evaluate(&world(0, Vec3::new(0.0, 0.0, 1.0)));
    assert_eq!(report.phase, PhaseState::Active(crate::phase::PhaseKey::zone(ZONE)));
    assert_eq!(report.source, IntentSource::Avoidance(Priority::High));
    assert_eq!(
        report.intent,
        MovementIntent::MoveTo {
            point: Vec3::new(0.0, 0.0, 6.0),
            tolerance: 0.5
        }
    );

    let mut loading = world(100, Vec3::new(0.0, 0.0, 1.0));
    loading.loading = true;
    let report = engine.evaluate(&loading);
    assert_eq!(report.intent, MovementIntent::None);
    assert_eq!(report.source, IntentSource::ActivityGate);

    engine.evaluate(&loading);
    assert_eq!(
        engine.mover().calls,
        vec![
            MoverCall::MoveToward(Vec3::new(0.0, 0.0, 6.0), 0.5),
            MoverCall::Stop
        ]
    );
}

#[test]
fn high_evasion_beats_engaged_dodge() {
    let mut engine = engine(
        PhaseContent::default()
            .with_hazard(blast(Priority::High, 5.0))
            .with_obligation(hydroball()),
    );

    let mut w = world(0, Vec3::new(0.0, 0.0, 1.0));
    w.entities = vec![
        hostile(100, Vec3::new(0.0, 0.0, 20.0), Some(8023)),
        ally(2, Vec3::new(10.0, 0.0, 0.0)),
    ];
    let report = engine.evaluate(&w);

    assert_eq!(report.source, IntentSource::Avoidance(Priority::High));
    assert!(engine.scheduler().engaged().is_some());
}

#[test]
fn engaged_dodge_beats_medium_evasion() {
    let mut engine = engine(
        PhaseContent::default()
            .with_hazard(blast(Priority::Medium, 5.0))
            .with_obligation(hydroball()),
    );

    let mut w = world(0, Vec3::new(0.0, 0.0, 1.0));
    w.entities = vec![
        hostile(100, Vec3::new(0.0, 0.0, 20.0), Some(8023)),
        ally(2, Vec3::new(10.0, 0.0, 0.0)),
    ];
    let report = engine.evaluate(&w);

    assert!(matches!(
        report.verdict,
        AvoidanceVerdict::Evade {
            tier: Priority::Medium,
            ..
        }
    ));
    assert_eq!(report.source, IntentSource::Dodge("hydroball".to_string()));
    assert_eq!(
        report.intent,
        MovementIntent::Follow {
            entity_id: 2,
            distance: 2.0
        }
    );
}

#[test]
fn no_safe_point_holds_position_with_warning() {
    let mut engine = engine(PhaseContent::default().with_hazard(blast(Priority::High, 50.0)));

    let report = engine.evaluate(&world(0, Vec3::ZERO));

    assert_eq!(report.intent, MovementIntent::Stop);
    assert!(matches!(
        report.warnings.as_slice(),
        [TickWarning::NoSafePoint {
            tier: Priority::High,
            ..
        }]
    ));
    assert_eq!(engine.mover().calls, vec![MoverCall::Stop]);
}

#[test]
fn positioning_follows_until_satisfied_then_stops_once() {
    let rule = PositioningRule::new(
        "healer_range",
        FollowTarget::PartyMember {
            role: Some(Role::Tank),
        },
        30.0,
        15.0,
    )
    .for_roles([Role::Healer]);
    let mut engine = engine(PhaseContent::default().with_positioning(rule));

    let frame = |ms: i64, tank_x: f32| {
        let mut w = world(ms, Vec3::ZERO);
        w.player.role = Role::Healer;
        let mut tank = ally(2, Vec3::new(tank_x, 0.0, 0.0));
        tank.role = Some(Role::Tank);
        w.entities = vec![tank];
        w
    };

    let report = engine.evaluate(&frame(0, 40.0));
    assert_eq!(report.source, IntentSource::Positioning("healer_range".to_string()));
    assert_eq!(
        report.intent,
        MovementIntent::Follow {
            entity_id: 2,
            distance: 15.0
        }
    );

    // same intent again: nothing re-issued
    let report = engine.evaluate(&frame(100, 38.0));
    assert!(!report.issued);

    let report = engine.evaluate(&frame(200, 20.0));
    assert_eq!(report.intent, MovementIntent::None);
    assert!(report.issued);

    engine.evaluate(&frame(300, 20.0));
    assert_eq!(
        engine.mover().calls,
        vec![MoverCall::Follow(2, 15.0), MoverCall::Stop]
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// Gate and Lifecycle
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn suppression_follows_engagement() {
    let laser_focus = DodgeObligation::follow(
        "laser_focus",
        [29014],
        FollowTarget::PartyMember { role: None },
        5.0,
        Duration::from_millis(5000),
    )
    .with_suppression("Stacking for Laser Focus");
    let mut engine = engine(PhaseContent::default().with_obligation(laser_focus));

    let mut w = world(0, Vec3::ZERO);
    w.entities = vec![
        hostile(100, Vec3::new(0.0, 0.0, 20.0), Some(29014)),
        ally(2, Vec3::new(10.0, 0.0, 0.0)),
    ];
    engine.evaluate(&w);
    assert_eq!(
        engine.gate().suppressed,
        vec![("Stacking for Laser Focus".to_string(), at(5000))]
    );

    let mut w = world(1000, Vec3::ZERO);
    w.entities = vec![
        hostile(100, Vec3::new(0.0, 0.0, 20.0), None),
        ally(2, Vec3::new(10.0, 0.0, 0.0)),
    ];
    let report = engine.evaluate(&w);

    assert_eq!(engine.gate().releases, 1);
    assert_eq!(report.intent, MovementIntent::None);
    assert_eq!(
        engine.mover().calls,
        vec![MoverCall::Follow(2, 5.0), MoverCall::Stop]
    );
}

#[test]
fn leaving_the_zone_cancels_dodge() {
    let mut engine = engine(
        PhaseContent::default().with_obligation(hydroball().with_suppression("Stacking")),
    );

    let mut w = world(0, Vec3::ZERO);
    w.entities = vec![
        hostile(100, Vec3::new(0.0, 0.0, 20.0), Some(8023)),
        ally(2, Vec3::new(10.0, 0.0, 0.0)),
    ];
    engine.evaluate(&w);
    assert!(engine.scheduler().engaged().is_some());

    let mut elsewhere = world(500, Vec3::ZERO);
    elsewhere.zone_id = 1;
    let report = engine.evaluate(&elsewhere);

    assert_eq!(report.phase, PhaseState::Inactive);
    assert!(engine.scheduler().engaged().is_none());
    assert_eq!(engine.gate().releases, 1);
    assert_eq!(engine.mover().calls.last(), Some(&MoverCall::Stop));
}

#[test]
fn feed_error_escapes_tick() {
    let mut engine = engine(PhaseContent::default());
    engine
        .feed_mut()
        .frames
        .push_back(Err(FeedError::Unavailable("pipe closed".to_string())));

    assert!(matches!(engine.tick(), Err(FeedError::Unavailable(_))));
    assert!(matches!(engine.tick(), Err(FeedError::Disconnected)));
    assert!(engine.mover().calls.is_empty());
}

#[test]
fn invoked_spread_moves_to_slot_until_expiry() {
    let mut engine = engine(PhaseContent::default());

    let mut w = world(0, Vec3::new(0.0, 0.0, 10.0));
    w.entities = vec![
        ally(2, Vec3::new(10.0, 0.0, 0.0)),
        ally(3, Vec3::new(-10.0, 0.0, 0.0)),
    ];
    engine.evaluate(&w);
    engine.invoke_spread(&w, Duration::from_secs(5), 4.0);

    let report = engine.evaluate(&w);
    assert_eq!(report.source, IntentSource::Spread);
    let MovementIntent::MoveTo { point, .. } = report.intent else {
        panic!("expected move_to, got {:?}", report.intent);
    };
    let centroid = Vec3::new(0.0, 0.0, 10.0 / 3.0);
    assert!((point.distance_2d(centroid) - spread_radius(3, 4.0)).abs() < 1e-3);

    let mut later = w.clone();
    later.timestamp = at(6000);
    let report = engine.evaluate(&later);
    assert_eq!(report.intent, MovementIntent::None);
    assert_eq!(engine.mover().calls.last(), Some(&MoverCall::Stop));
}

// ═══════════════════════════════════════════════════════════════════════════
// Bundled Encounter
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn porta_decumana_explosion_then_laser_focus() {
    const ARENA: Vec3 = Vec3::new(-703.6115, -185.6595, 479.6159);

    let encounter =
        load_encounter_from_file(&bundled_definitions_dir().join("porta_decumana.toml")).unwrap();
    let mut engine = Engine::new(
        ScriptedFeed::default(),
        RecordingMover::default(),
        RecordingGate::default(),
        EngineConfig::default(),
    );
    engine.register_encounter(encounter);

    let ultima = |ability: u32| {
        let mut boss = hostile(100, ARENA, Some(ability));
        boss.npc_id = 2137;
        boss
    };

    let mut w = world(0, ARENA.offset_2d(0.0, 2.0));
    w.zone_id = 1048;
    w.entities = vec![ultima(29021)];
    let report = engine.evaluate(&w);

    assert_eq!(report.source, IntentSource::Avoidance(Priority::High));
    let MovementIntent::MoveTo { point, .. } = report.intent else {
        panic!("expected move_to, got {:?}", report.intent);
    };
    let from_center = point.distance_2d(ARENA);
    assert!(from_center > 17.4 && from_center < 19.0, "{from_center}");

    let mut w = world(1000, ARENA.offset_2d(0.0, 18.0));
    w.zone_id = 1048;
    w.entities = vec![ultima(29014), ally(2, ARENA.offset_2d(1.0, 10.0))];
    let report = engine.evaluate(&w);

    assert_eq!(report.verdict, AvoidanceVerdict::Clear);
    assert_eq!(report.source, IntentSource::Dodge("laser_focus".to_string()));
    assert_eq!(
        report.intent,
        MovementIntent::Follow {
            entity_id: 2,
            distance: 5.0
        }
    );
    assert_eq!(
        engine.gate().suppressed,
        vec![("Stacking for Laser Focus".to_string(), at(6000))]
    );
}

#[test]
fn porta_decumana_medium_hazards_govern_inside_the_arena() {
    const ARENA: Vec3 = Vec3::new(-703.6115, -185.6595, 479.6159);

    let encounter =
        load_encounter_from_file(&bundled_definitions_dir().join("porta_decumana.toml")).unwrap();
    let mut engine = Engine::new(
        ScriptedFeed::default(),
        RecordingMover::default(),
        RecordingGate::default(),
        EngineConfig::default(),
    );
    engine.register_encounter(encounter);

    let mut boss = hostile(100, ARENA, None);
    boss.npc_id = 2137;

    // standing under the boss, well inside the arena edge
    let mut w = world(0, ARENA.offset_2d(0.0, 2.0));
    w.zone_id = 1048;
    w.entities = vec![boss.clone()];
    let report = engine.evaluate(&w);
    assert_eq!(report.source, IntentSource::Avoidance(Priority::Medium));
    let MovementIntent::MoveTo { point, .. } = report.intent else {
        panic!("expected move_to, got {:?}", report.intent);
    };
    assert!(point.distance_2d(ARENA) > 4.3);

    // near the edge the arena takes over and masks the hitbox tier
    let mut w = world(100, ARENA.offset_2d(0.0, 20.0));
    w.zone_id = 1048;
    w.entities = vec![boss];
    let report = engine.evaluate(&w);
    assert_eq!(report.source, IntentSource::Avoidance(Priority::High));
    let MovementIntent::MoveTo { point, .. } = report.intent else {
        panic!("expected move_to, got {:?}", report.intent);
    };
    assert!(point.distance_2d(ARENA) < 19.0);
}

#[test]
fn sirensong_enter_night_reaches_the_arena_edge() {
    const GOVERNOR_ARENA: Vec3 = Vec3::new(-7.938193, 4.440489, 79.09968);
    const BREAK_POINT: Vec3 = Vec3::new(8.985318, 4.437799, 70.16875);

    let encounter =
        load_encounter_from_file(&bundled_definitions_dir().join("sirensong_sea.toml")).unwrap();
    let mut engine = Engine::new(
        ScriptedFeed::default(),
        RecordingMover::default(),
        RecordingGate::default(),
        EngineConfig::default(),
    );
    engine.register_encounter(encounter);

    let mut governor = hostile(100, GOVERNOR_ARENA, None);
    governor.cast = Some(CastInfo {
        ability_id: 8032,
        target_id: Some(AGENT),
    });

    for (ms, position) in [(0, GOVERNOR_ARENA.offset_2d(0.0, 5.0)), (3000, BREAK_POINT)] {
        let mut w = world(ms, position);
        w.zone_id = 626;
        w.sub_zone_id = 1963;
        w.entities = vec![governor.clone()];
        let report = engine.evaluate(&w);

        assert_eq!(report.verdict, AvoidanceVerdict::Clear, "at {ms}ms");
        assert_eq!(report.source, IntentSource::Dodge("enter_night".to_string()));
        assert_eq!(
            report.intent,
            MovementIntent::MoveTo {
                point: BREAK_POINT,
                tolerance: 1.0
            }
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Run Loop
// ═══════════════════════════════════════════════════════════════════════════

fn quiet_world() -> WorldSnapshot {
    WorldSnapshot::new(at(0), PlayerState::new(AGENT, Vec3::ZERO))
}

#[tokio::test(start_paused = true)]
async fn run_ticks_on_interval_until_shutdown() {
    let mut engine = Engine::new(
        ScriptedFeed::repeating(quiet_world()),
        RecordingMover::default(),
        RecordingGate::default(),
        EngineConfig::default(),
    );
    let status = engine.status();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let driver = async {
        tokio::time::sleep(Duration::from_millis(350)).await;
        assert_eq!(*status.borrow(), EngineStatus::Running);
        shutdown_tx.send_replace(true);
    };
    tokio::join!(engine.run(shutdown_rx), driver);

    let pulls = engine.feed().pulls;
    assert!((3..=5).contains(&pulls), "{pulls} ticks");
    assert_eq!(*status.borrow(), EngineStatus::Stopped);
}

#[tokio::test(start_paused = true)]
async fn run_reports_lost_feed() {
    let mut engine = Engine::new(
        ScriptedFeed::default(),
        RecordingMover::default(),
        RecordingGate::default(),
        EngineConfig::default(),
    );
    let status = engine.status();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let driver = async {
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(*status.borrow(), EngineStatus::FeedLost);
        shutdown_tx.send_replace(true);
    };
    tokio::join!(engine.run(shutdown_rx), driver);

    assert!(engine.feed().pulls >= 2);
    assert_eq!(*status.borrow(), EngineStatus::Stopped);
}

#[tokio::test(start_paused = true)]
async fn waker_forces_immediate_tick() {
    let config = EngineConfig {
        tick_interval_ms: 10_000,
        ..EngineConfig::default()
    };
    let mut engine = Engine::new(
        ScriptedFeed::repeating(quiet_world()),
        RecordingMover::default(),
        RecordingGate::default(),
        config,
    );
    let waker = engine.waker();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let driver = async {
        tokio::time::sleep(Duration::from_millis(1)).await;
        waker.notify_one();
        tokio::time::sleep(Duration::from_millis(1)).await;
        shutdown_tx.send_replace(true);
    };
    tokio::join!(engine.run(shutdown_rx), driver);

    assert_eq!(engine.feed().pulls, 2);
}

#[tokio::test(start_paused = true)]
async fn dodge_does_not_reengage_after_feed_restore() {
    let casting = |ms: i64| {
        let mut w = world(ms, Vec3::ZERO);
        w.entities = vec![
            hostile(100, Vec3::new(0.0, 0.0, 20.0), Some(8023)),
            ally(2, Vec3::new(3.0, 0.0, 0.0)),
        ];
        w
    };

    let mut engine = engine(PhaseContent::default().with_obligation(hydroball()));
    {
        let feed = engine.feed_mut();
        feed.frames.push_back(Ok(casting(0)));
        feed.frames.push_back(Err(FeedError::Disconnected));
        feed.fallback = Some(casting(6000));
    }
    let status = engine.status();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let driver = async {
        tokio::time::sleep(Duration::from_millis(350)).await;
        assert_eq!(*status.borrow(), EngineStatus::Running);
        shutdown_tx.send_replace(true);
    };
    tokio::join!(engine.run(shutdown_rx), driver);

    assert_eq!(
        engine.mover().calls,
        vec![MoverCall::Follow(2, 2.0), MoverCall::Stop]
    );
    assert!(engine.scheduler().engaged().is_none());
}
