//! Obligation scheduling
//!
//! Only one obligation is engaged at a time. When several trigger together
//! the one registered last wins, and a later-registered obligation that
//! triggers while an earlier one is engaged pre-empts it.
//!
//! An engagement that expired or was pre-empted marks its cast as spent:
//! the same ongoing cast never starts a fresh engagement with a new timer.

use std::fmt;
use std::iter;

use chrono::NaiveDateTime;
use hashbrown::HashSet;
use tracing::{debug, info, warn};

use super::{CastKey, DodgeObligation, DodgeResponse, EngagedDodge};
use crate::geometry::Vec3;
use crate::spread::{Participant, SpreadDirective};
use crate::world::WorldSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObligationState {
    Idle,
    /// A matching cast is observed but another obligation holds the slot
    Triggered,
    Engaged,
}

/// Movement requested by the engaged obligation
#[derive(Debug, Clone, PartialEq)]
pub enum DodgeDirective {
    /// Go to `point`; `None` tolerance uses the engine's arrival tolerance
    MoveTo { point: Vec3, tolerance: Option<f32> },
    Follow { entity_id: u64, distance: f32 },
    /// Engaged but nowhere valid to go; stand still
    Hold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseReason {
    CastEnded,
    Expired,
    Preempted,
    /// Obligation removed or phase changed
    Cancelled,
    /// Engine halted mid-cast (feed lost or shut down)
    Suspended,
}

impl ReleaseReason {
    pub fn label(&self) -> &'static str {
        match self {
            ReleaseReason::CastEnded => "cast ended",
            ReleaseReason::Expired => "expired",
            ReleaseReason::Preempted => "pre-empted",
            ReleaseReason::Cancelled => "cancelled",
            ReleaseReason::Suspended => "suspended",
        }
    }
}

impl fmt::Display for ReleaseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Engagement changes, for the ability gate
#[derive(Debug, Clone, PartialEq)]
pub enum DodgeEvent {
    Engaged {
        obligation_id: String,
        /// Suppression reason and when it lapses
        suppression: Option<(String, NaiveDateTime)>,
    },
    Released {
        obligation_id: String,
        reason: ReleaseReason,
        had_suppression: bool,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DodgeUpdate {
    pub directive: Option<DodgeDirective>,
    pub events: Vec<DodgeEvent>,
    /// Follow target that could not be resolved (reported once per
    /// engagement)
    pub unresolved: Option<String>,
}

/// A cast that satisfies an obligation's trigger this tick
struct Candidate {
    index: usize,
    cast: CastKey,
    cast_target: Option<u64>,
}

#[derive(Debug, Default)]
pub struct DodgeScheduler {
    /// Declaration order; later entries win ties
    obligations: Vec<DodgeObligation>,
    engaged: Option<EngagedDodge>,
    triggered: HashSet<String>,
    /// Casts that already had their engagement
    spent: HashSet<CastKey>,
}

impl DodgeScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the obligation set. Cancel first to release an engagement
    /// cleanly; one left behind is dropped on the next update.
    pub fn install(&mut self, obligations: Vec<DodgeObligation>) {
        debug!(count = obligations.len(), "Obligations installed");
        self.obligations = obligations;
        self.triggered.clear();
    }

    pub fn clear(&mut self) {
        self.obligations.clear();
        self.triggered.clear();
    }

    /// Forget per-cast memory
    pub fn reset_timers(&mut self) {
        self.spent.clear();
        self.triggered.clear();
    }

    /// Release the engaged obligation, if any
    pub fn cancel(&mut self) -> Option<DodgeEvent> {
        self.release(ReleaseReason::Cancelled)
    }

    /// Release the engaged obligation without letting its cast engage
    /// again once ticking resumes
    pub fn suspend(&mut self) -> Option<DodgeEvent> {
        self.release(ReleaseReason::Suspended)
    }

    pub fn obligations(&self) -> &[DodgeObligation] {
        &self.obligations
    }

    pub fn engaged(&self) -> Option<&EngagedDodge> {
        self.engaged.as_ref()
    }

    pub fn state(&self, obligation_id: &str) -> ObligationState {
        if self.is_engaged(obligation_id) {
            ObligationState::Engaged
        } else if self.triggered.contains(obligation_id) {
            ObligationState::Triggered
        } else {
            ObligationState::Idle
        }
    }

    /// Advance every obligation against this tick's snapshot.
    ///
    /// `safe_point` maps the agent's position to the nearest point outside
    /// the active High-tier hazards, for evacuations without a fixed
    /// destination.
    pub fn update(
        &mut self,
        world: &WorldSnapshot,
        safe_point: &dyn Fn(Vec3) -> Option<Vec3>,
    ) -> DodgeUpdate {
        let now = world.timestamp;
        let mut update = DodgeUpdate::default();

        self.spent
            .retain(|key| key.is_ongoing(world.entity(key.caster_id)));

        // ─── Release ────────────────────────────────────────────────────────
        if let Some(engaged) = &self.engaged {
            let reason = if self.index_of(&engaged.obligation_id).is_none() {
                Some(ReleaseReason::Cancelled)
            } else if !engaged.cast.is_ongoing(world.entity(engaged.cast.caster_id)) {
                Some(ReleaseReason::CastEnded)
            } else if engaged.has_expired(now) {
                Some(ReleaseReason::Expired)
            } else {
                None
            };
            if let Some(event) = reason.and_then(|r| self.release(r)) {
                update.events.push(event);
            }
        }

        // ─── Trigger ────────────────────────────────────────────────────────
        let candidates = self.candidates(world);
        let current = self
            .engaged
            .as_ref()
            .and_then(|e| self.index_of(&e.obligation_id));

        if let Some(winner) = candidates.last() {
            let engage = match current {
                None => true,
                Some(index) => winner.index > index,
            };
            if engage {
                if let Some(event) = self.release(ReleaseReason::Preempted) {
                    update.events.push(event);
                }
                update.events.push(self.engage(winner, world));
            }
        }

        self.triggered = candidates
            .iter()
            .map(|c| self.obligations[c.index].id.clone())
            .filter(|id| !self.is_engaged(id))
            .collect();

        // ─── Directive ──────────────────────────────────────────────────────
        if let Some(engaged) = self.engaged.as_mut()
            && let Some(obligation) = self
                .obligations
                .iter()
                .find(|o| o.id == engaged.obligation_id)
        {
            update.directive = Some(directive_for(
                obligation,
                engaged,
                world,
                safe_point,
                &mut update.unresolved,
            ));
        }

        update
    }

    fn index_of(&self, obligation_id: &str) -> Option<usize> {
        self.obligations.iter().position(|o| o.id == obligation_id)
    }

    fn is_engaged(&self, obligation_id: &str) -> bool {
        self.engaged
            .as_ref()
            .is_some_and(|e| e.obligation_id == obligation_id)
    }

    /// First qualifying cast per obligation, in declaration order
    fn candidates(&self, world: &WorldSnapshot) -> Vec<Candidate> {
        let me = world.player.entity_id;
        self.obligations
            .iter()
            .enumerate()
            .filter_map(|(index, obligation)| {
                world.hostiles().find_map(|caster| {
                    let cast = caster.cast?;
                    if !obligation.is_triggered_by(cast.ability_id) {
                        return None;
                    }
                    let key = CastKey::new(caster.entity_id, cast.ability_id);
                    if self.spent.contains(&key) {
                        return None;
                    }
                    let targeted = cast.target_id == Some(me) || caster.target_id == Some(me);
                    if obligation.only_if_targeted && !targeted {
                        return None;
                    }
                    Some(Candidate {
                        index,
                        cast: key,
                        cast_target: cast.target_id,
                    })
                })
            })
            .collect()
    }

    fn engage(&mut self, candidate: &Candidate, world: &WorldSnapshot) -> DodgeEvent {
        let obligation = &self.obligations[candidate.index];
        let mut engaged = EngagedDodge::new(
            obligation.id.clone(),
            candidate.cast,
            candidate.cast_target,
            world.timestamp,
            obligation.max_duration,
            obligation.movement_suppression.clone(),
        );

        if let DodgeResponse::Spread { minimum_separation } = obligation.response {
            let player = &world.player;
            let participants: Vec<Participant> =
                iter::once(Participant::new(player.entity_id, player.position))
                    .chain(
                        world
                            .party_members()
                            .map(|e| Participant::new(e.entity_id, e.position)),
                    )
                    .collect();
            engaged.spread = SpreadDirective::invoke(
                &participants,
                obligation.max_duration,
                minimum_separation,
                world.timestamp,
            );
        }

        info!(
            obligation = %obligation.id,
            response = obligation.response.kind(),
            ability = candidate.cast.ability_id,
            caster = candidate.cast.caster_id,
            "Dodge engaged"
        );

        let event = DodgeEvent::Engaged {
            obligation_id: engaged.obligation_id.clone(),
            suppression: engaged
                .suppression
                .clone()
                .map(|reason| (reason, engaged.expires_at)),
        };
        self.engaged = Some(engaged);
        event
    }

    fn release(&mut self, reason: ReleaseReason) -> Option<DodgeEvent> {
        let engaged = self.engaged.take()?;
        if matches!(
            reason,
            ReleaseReason::Expired | ReleaseReason::Preempted | ReleaseReason::Suspended
        ) {
            self.spent.insert(engaged.cast);
        }
        info!(obligation = %engaged.obligation_id, %reason, "Dodge released");
        Some(DodgeEvent::Released {
            had_suppression: engaged.suppression.is_some(),
            obligation_id: engaged.obligation_id,
            reason,
        })
    }
}

fn directive_for(
    obligation: &DodgeObligation,
    engaged: &mut EngagedDodge,
    world: &WorldSnapshot,
    safe_point: &dyn Fn(Vec3) -> Option<Vec3>,
    unresolved: &mut Option<String>,
) -> DodgeDirective {
    match &obligation.response {
        DodgeResponse::Follow { target, distance } => {
            let cast = engaged.cast_context();
            if let Some(entity) = target.resolve(world, Some(&cast)) {
                return DodgeDirective::Follow {
                    entity_id: entity.entity_id,
                    distance: *distance,
                };
            }
            // a cast aimed at us: stay put and let the others come
            if !target.targets_agent(world, Some(&cast)) && !engaged.unresolved_reported {
                engaged.unresolved_reported = true;
                warn!(obligation = %obligation.id, target = %target.label(), "Follow target not found, holding position");
                *unresolved = Some(format!("{}: {}", obligation.id, target.label()));
            }
            DodgeDirective::Hold
        }
        DodgeResponse::Evacuate { point, tolerance } => {
            match point.or_else(|| safe_point(world.player.position)) {
                Some(point) => DodgeDirective::MoveTo {
                    point,
                    tolerance: Some(*tolerance),
                },
                None => DodgeDirective::Hold,
            }
        }
        DodgeResponse::Spread { .. } => engaged
            .spread
            .as_ref()
            .and_then(|s| s.target_for(world.player.entity_id))
            .map_or(DodgeDirective::Hold, |point| DodgeDirective::MoveTo {
                point,
                tolerance: None,
            }),
    }
}
