//! Avoidance engine
//!
//! One cooperative loop drives everything. Each tick:
//! 1. the phase controller follows zone / combat / sub-zone changes
//! 2. the registry yields the hazards active in this snapshot
//! 3. the resolver merges them into one verdict
//! 4. the dodge scheduler advances its obligations
//! 5. one movement intent is chosen and, if it changed, issued
//!
//! A tick never fails. The only error that escapes is losing the world
//! feed, which pauses ticking until a snapshot arrives again.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use tokio::sync::{Notify, watch};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info, trace, warn};
use warden_types::{EngineConfig, Priority};

use crate::dodge::{DodgeDirective, DodgeEvent, DodgeScheduler};
use crate::geometry::{SafeSpotSearch, Vec3};
use crate::hazards::{ActiveHazard, AvoidanceVerdict, PriorityResolver};
use crate::phase::{Encounter, PhaseController, PhaseState, PhaseTransition};
use crate::positioning;
use crate::spread::{Participant, SpreadDirective};
use crate::world::{AbilityGate, FeedError, Mover, WorldFeed, WorldSnapshot};

// ═══════════════════════════════════════════════════════════════════════════
// Tick Output
// ═══════════════════════════════════════════════════════════════════════════

/// The single movement decision of a tick
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MovementIntent {
    /// Nothing to do; the agent's own routine keeps control
    #[default]
    None,
    /// Hold position
    Stop,
    MoveTo { point: Vec3, tolerance: f32 },
    Follow { entity_id: u64, distance: f32 },
}

impl MovementIntent {
    pub fn kind(&self) -> &'static str {
        match self {
            MovementIntent::None => "none",
            MovementIntent::Stop => "stop",
            MovementIntent::MoveTo { .. } => "move_to",
            MovementIntent::Follow { .. } => "follow",
        }
    }

    pub fn is_movement(&self) -> bool {
        matches!(self, MovementIntent::MoveTo { .. } | MovementIntent::Follow { .. })
    }
}

impl fmt::Display for MovementIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MovementIntent::None => f.write_str("none"),
            MovementIntent::Stop => f.write_str("stop"),
            MovementIntent::MoveTo { point, tolerance } => write!(f, "move to {point} (±{tolerance})"),
            MovementIntent::Follow {
                entity_id,
                distance,
            } => write!(f, "follow {entity_id} at {distance}"),
        }
    }
}

/// Which layer produced the intent
#[derive(Debug, Clone, PartialEq, Default)]
pub enum IntentSource {
    #[default]
    Idle,
    /// Loading, cutscene or dead
    ActivityGate,
    Avoidance(Priority),
    Dodge(String),
    Spread,
    Positioning(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickWarning {
    NoSafePoint { tier: Priority, hazards: Vec<String> },
    UnresolvedTarget(String),
}

impl fmt::Display for TickWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TickWarning::NoSafePoint { tier, hazards } => {
                write!(f, "no safe point from {tier} hazards [{}]", hazards.join(", "))
            }
            TickWarning::UnresolvedTarget(target) => write!(f, "unresolved follow target {target}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TickReport {
    pub timestamp: NaiveDateTime,
    pub phase: PhaseState,
    pub transition: Option<PhaseTransition>,
    pub verdict: AvoidanceVerdict,
    pub intent: MovementIntent,
    pub source: IntentSource,
    /// Whether the intent was sent to the mover this tick
    pub issued: bool,
    pub warnings: Vec<TickWarning>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    Running,
    FeedLost,
    Stopped,
}

// ═══════════════════════════════════════════════════════════════════════════
// Engine
// ═══════════════════════════════════════════════════════════════════════════

pub struct Engine<F, M, G> {
    feed: F,
    mover: M,
    gate: G,
    config: EngineConfig,

    // ─── Core ───────────────────────────────────────────────────────────────
    controller: PhaseController,
    scheduler: DodgeScheduler,
    resolver: PriorityResolver,
    /// Spread invoked directly by encounter logic
    spread: Option<SpreadDirective>,

    // ─── Tick memory ────────────────────────────────────────────────────────
    last_intent: MovementIntent,
    last_verdict: AvoidanceVerdict,
    suppressing: bool,

    // ─── Loop plumbing ──────────────────────────────────────────────────────
    status_tx: watch::Sender<EngineStatus>,
    wake: Arc<Notify>,
}

impl<F, M, G> Engine<F, M, G>
where
    F: WorldFeed,
    M: Mover,
    G: AbilityGate,
{
    pub fn new(feed: F, mover: M, gate: G, config: EngineConfig) -> Self {
        let resolver = PriorityResolver::new(SafeSpotSearch::from(&config.safe_spot));
        let (status_tx, _) = watch::channel(EngineStatus::Stopped);
        Self {
            feed,
            mover,
            gate,
            config,
            controller: PhaseController::new(),
            scheduler: DodgeScheduler::new(),
            resolver,
            spread: None,
            last_intent: MovementIntent::None,
            last_verdict: AvoidanceVerdict::Clear,
            suppressing: false,
            status_tx,
            wake: Arc::new(Notify::new()),
        }
    }

    // ─── Encounter configuration ────────────────────────────────────────────

    pub fn register_encounter(&mut self, encounter: Encounter) {
        self.controller.register_encounter(encounter);
    }

    pub fn on_enter(&mut self, zone_id: u32) {
        self.controller.on_enter(zone_id);
    }

    pub fn on_exit(&mut self) {
        let update = self.controller.on_exit(&mut self.scheduler);
        if let Some(event) = update.released {
            self.apply_dodge_event(&event);
        }
        self.spread = None;
        self.issue(MovementIntent::None);
    }

    /// Spread the agent and the living party out from their centroid.
    /// Held until `duration` elapses, combat ends or the phase changes.
    pub fn invoke_spread(&mut self, world: &WorldSnapshot, duration: Duration, minimum_separation: f32) {
        let me = &world.player;
        let participants: Vec<Participant> = std::iter::once(Participant::new(me.entity_id, me.position))
            .chain(
                world
                    .party_members()
                    .map(|e| Participant::new(e.entity_id, e.position)),
            )
            .collect();
        self.spread =
            SpreadDirective::invoke(&participants, duration, minimum_separation, world.timestamp);
        info!(participants = participants.len(), minimum_separation, "Spread invoked");
    }

    // ─── Accessors ──────────────────────────────────────────────────────────

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn controller(&self) -> &PhaseController {
        &self.controller
    }

    pub fn scheduler(&self) -> &DodgeScheduler {
        &self.scheduler
    }

    pub fn feed(&self) -> &F {
        &self.feed
    }

    pub fn feed_mut(&mut self) -> &mut F {
        &mut self.feed
    }

    pub fn mover(&self) -> &M {
        &self.mover
    }

    pub fn gate(&self) -> &G {
        &self.gate
    }

    pub fn last_intent(&self) -> &MovementIntent {
        &self.last_intent
    }

    /// Current loop status
    pub fn status(&self) -> watch::Receiver<EngineStatus> {
        self.status_tx.subscribe()
    }

    /// Handle that requests an immediate tick
    pub fn waker(&self) -> Arc<Notify> {
        Arc::clone(&self.wake)
    }

    // ─── Tick ───────────────────────────────────────────────────────────────

    /// Pull one snapshot from the feed and evaluate it
    pub fn tick(&mut self) -> Result<TickReport, FeedError> {
        let world = self.feed.snapshot()?;
        Ok(self.evaluate(&world))
    }

    /// Run one full pass against `world` and issue the resulting intent
    pub fn evaluate(&mut self, world: &WorldSnapshot) -> TickReport {
        let now = world.timestamp;
        let mut warnings = Vec::new();

        // ─── Phase ──────────────────────────────────────────────────────────
        let phase_update = self.controller.update(world, &mut self.scheduler);
        if let Some(event) = &phase_update.released {
            self.apply_dodge_event(event);
        }
        if phase_update.transition.is_some() || !world.player.in_combat {
            self.spread = None;
        }
        if self.spread.as_ref().is_some_and(|s| s.is_expired(now)) {
            debug!("Spread expired");
            self.spread = None;
        }

        if !world.can_act() {
            trace!(
                loading = world.loading,
                cutscene = world.in_cutscene,
                alive = world.player.is_alive,
                "Activity gate closed"
            );
            let issued = self.issue(MovementIntent::None);
            return TickReport {
                timestamp: now,
                phase: self.controller.state(),
                transition: phase_update.transition,
                verdict: AvoidanceVerdict::Clear,
                intent: MovementIntent::None,
                source: IntentSource::ActivityGate,
                issued,
                warnings,
            };
        }

        // ─── Hazards ────────────────────────────────────────────────────────
        let active: Vec<ActiveHazard<'_>> = self.controller.registry().active_hazards(world).collect();
        let verdict = self.resolver.resolve(world.player.position, &active);

        // ─── Dodge ──────────────────────────────────────────────────────────
        let resolver = self.resolver;
        let safe_point = |from: Vec3| resolver.safe_point(from, &active);
        let dodge = self.scheduler.update(world, &safe_point);
        drop(active);

        for event in &dodge.events {
            self.apply_dodge_event(event);
        }
        if let Some(target) = dodge.unresolved {
            warnings.push(TickWarning::UnresolvedTarget(target));
        }
        if let AvoidanceVerdict::NoSafePoint { tier, hazards } = &verdict {
            warnings.push(TickWarning::NoSafePoint {
                tier: *tier,
                hazards: hazards.clone(),
            });
        }
        self.note_verdict(&verdict);

        // ─── Combine ────────────────────────────────────────────────────────
        let (intent, source) = self.combine(world, &verdict, dodge.directive);
        let issued = self.issue(intent.clone());

        TickReport {
            timestamp: now,
            phase: self.controller.state(),
            transition: phase_update.transition,
            verdict,
            intent,
            source,
            issued,
            warnings,
        }
    }

    /// Intent precedence: High-tier evasion, engaged dodge, spread, lower
    /// tier evasion, hold when cornered, standing positioning.
    fn combine(
        &self,
        world: &WorldSnapshot,
        verdict: &AvoidanceVerdict,
        directive: Option<DodgeDirective>,
    ) -> (MovementIntent, IntentSource) {
        let tolerance = self.config.arrival_tolerance;

        if let AvoidanceVerdict::Evade {
            tier: Priority::High,
            target,
            ..
        } = verdict
        {
            return (
                MovementIntent::MoveTo {
                    point: *target,
                    tolerance,
                },
                IntentSource::Avoidance(Priority::High),
            );
        }

        if let (Some(directive), Some(engaged)) = (directive, self.scheduler.engaged()) {
            let intent = match directive {
                DodgeDirective::MoveTo {
                    point,
                    tolerance: own,
                } => MovementIntent::MoveTo {
                    point,
                    tolerance: own.unwrap_or(tolerance),
                },
                DodgeDirective::Follow {
                    entity_id,
                    distance,
                } => MovementIntent::Follow {
                    entity_id,
                    distance,
                },
                DodgeDirective::Hold => MovementIntent::Stop,
            };
            return (intent, IntentSource::Dodge(engaged.obligation_id.clone()));
        }

        if let Some(point) = self
            .spread
            .as_ref()
            .and_then(|s| s.target_for(world.player.entity_id))
        {
            return (
                MovementIntent::MoveTo { point, tolerance },
                IntentSource::Spread,
            );
        }

        match verdict {
            AvoidanceVerdict::Evade { tier, target, .. } => (
                MovementIntent::MoveTo {
                    point: *target,
                    tolerance,
                },
                IntentSource::Avoidance(*tier),
            ),
            AvoidanceVerdict::NoSafePoint { tier, .. } => {
                (MovementIntent::Stop, IntentSource::Avoidance(*tier))
            }
            AvoidanceVerdict::Clear => {
                match positioning::evaluate(self.controller.positioning(), world) {
                    Some(directive) => (
                        MovementIntent::Follow {
                            entity_id: directive.entity_id,
                            distance: directive.distance,
                        },
                        IntentSource::Positioning(directive.rule_id),
                    ),
                    None => (MovementIntent::None, IntentSource::Idle),
                }
            }
        }
    }

    /// Send `intent` to the mover unless it is what was sent last.
    /// Leaving a movement for `None` stops the abandoned directive.
    fn issue(&mut self, intent: MovementIntent) -> bool {
        if intent == self.last_intent {
            return false;
        }

        match &intent {
            MovementIntent::MoveTo { point, tolerance } => self.mover.move_toward(*point, *tolerance),
            MovementIntent::Follow {
                entity_id,
                distance,
            } => self.mover.follow_entity(*entity_id, *distance),
            MovementIntent::Stop => self.mover.stop(),
            MovementIntent::None => {
                if self.last_intent.is_movement() {
                    self.mover.stop();
                }
            }
        }

        debug!(from = %self.last_intent, to = %intent, "Intent changed");
        self.last_intent = intent;
        true
    }

    fn apply_dodge_event(&mut self, event: &DodgeEvent) {
        match event {
            DodgeEvent::Engaged {
                suppression: Some((reason, until)),
                ..
            } => {
                self.gate.suppress_movement(reason, *until);
                self.suppressing = true;
            }
            DodgeEvent::Released {
                had_suppression: true,
                ..
            } => {
                self.gate.release_movement();
                self.suppressing = false;
            }
            _ => {}
        }
    }

    fn note_verdict(&mut self, verdict: &AvoidanceVerdict) {
        if *verdict == self.last_verdict {
            return;
        }
        match verdict {
            AvoidanceVerdict::NoSafePoint { tier, hazards } => {
                // only on entering the condition
                if !matches!(self.last_verdict, AvoidanceVerdict::NoSafePoint { .. }) {
                    warn!(%tier, hazards = ?hazards, "No safe point within search radius, holding position");
                }
            }
            other => debug!(verdict = %other, "Verdict changed"),
        }
        self.last_verdict = verdict.clone();
    }

    /// Stop moving and hand control back to the combat routine
    fn halt(&mut self) {
        if let Some(event) = self.scheduler.suspend() {
            self.apply_dodge_event(&event);
        }
        if self.suppressing {
            self.gate.release_movement();
            self.suppressing = false;
        }
        if self.last_intent.is_movement() {
            self.issue(MovementIntent::Stop);
        }
    }

    // ─── Loop ───────────────────────────────────────────────────────────────

    /// Tick every `tick_interval_ms` (or immediately when woken) until
    /// `shutdown` turns true or its sender is dropped.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) {
        let period = Duration::from_millis(self.config.tick_interval_ms.max(1));
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let wake = Arc::clone(&self.wake);

        self.status_tx.send_replace(EngineStatus::Running);
        info!(interval_ms = period.as_millis() as u64, "Avoidance loop started");

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
                _ = interval.tick() => {}
                _ = wake.notified() => {}
            }

            match self.tick() {
                Ok(report) => {
                    if *self.status_tx.borrow() == EngineStatus::FeedLost {
                        info!("World state feed restored");
                        self.status_tx.send_replace(EngineStatus::Running);
                    }
                    trace!(intent = %report.intent, source = ?report.source, "Tick");
                }
                Err(e) => {
                    if *self.status_tx.borrow() != EngineStatus::FeedLost {
                        error!(error = %e, "World state feed lost, pausing avoidance");
                        self.halt();
                        self.status_tx.send_replace(EngineStatus::FeedLost);
                    }
                }
            }
        }

        self.halt();
        self.status_tx.send_replace(EngineStatus::Stopped);
        info!("Avoidance loop stopped");
    }
}
