//! Phase state machine
//!
//! `Inactive → Active(key)` when combat starts in a zone with a registered
//! encounter, `Active(a) → Active(b)` when the sub-zone moves to another
//! phase, and back to `Inactive` on combat end, death or zone exit.
//!
//! Every transition runs, in order:
//! 1. cancel the engaged dodge obligation
//! 2. clear the hazard registry (and the obligation set)
//! 3. install the new phase's hazards and obligations
//! 4. reset phase-local timers

use hashbrown::HashMap;
use tracing::{debug, error, info};

use super::{Encounter, EncounterPhase, PhaseKey};
use crate::dodge::{DodgeEvent, DodgeScheduler};
use crate::hazards::HazardRegistry;
use crate::positioning::PositioningRule;
use crate::world::WorldSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhaseState {
    #[default]
    Inactive,
    Active(PhaseKey),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseTransition {
    Entered(PhaseKey),
    Changed { from: PhaseKey, to: PhaseKey },
    Exited(PhaseKey),
}

/// What a controller step did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhaseUpdate {
    pub transition: Option<PhaseTransition>,
    /// Release of an obligation cancelled by the transition
    pub released: Option<DodgeEvent>,
}

#[derive(Debug, Default)]
pub struct PhaseController {
    encounters: HashMap<u32, Encounter>,
    current_zone: Option<u32>,
    state: PhaseState,
    installed: Option<EncounterPhase>,
    registry: HazardRegistry,
    /// Encounter of the active zone was re-registered
    reload: bool,
}

impl PhaseController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the encounter for its zone
    pub fn register_encounter(&mut self, encounter: Encounter) {
        info!(zone = encounter.zone_id, name = %encounter.name, "Encounter registered");
        if self.current_zone == Some(encounter.zone_id) {
            self.reload = true;
        }
        self.encounters.insert(encounter.zone_id, encounter);
    }

    pub fn encounter(&self, zone_id: u32) -> Option<&Encounter> {
        self.encounters.get(&zone_id)
    }

    pub fn encounter_count(&self) -> usize {
        self.encounters.len()
    }

    /// The agent entered `zone_id`. Nothing is installed until combat.
    pub fn on_enter(&mut self, zone_id: u32) {
        self.current_zone = Some(zone_id);
        match self.encounters.get(&zone_id) {
            Some(encounter) => info!(zone = zone_id, name = %encounter.name, "Entered encounter zone"),
            None => debug!(zone = zone_id, "Entered zone without encounter"),
        }
    }

    /// The agent left the zone: drop everything installed
    pub fn on_exit(&mut self, scheduler: &mut DodgeScheduler) -> PhaseUpdate {
        let update = self.transition(None, scheduler);
        if let Some(zone) = self.current_zone.take() {
            debug!(zone, "Left zone");
        }
        update
    }

    pub fn state(&self) -> PhaseState {
        self.state
    }

    pub fn current_zone(&self) -> Option<u32> {
        self.current_zone
    }

    pub fn registry(&self) -> &HazardRegistry {
        &self.registry
    }

    pub fn installed(&self) -> Option<&EncounterPhase> {
        self.installed.as_ref()
    }

    pub fn positioning(&self) -> &[PositioningRule] {
        self.installed
            .as_ref()
            .map(|phase| phase.positioning.as_slice())
            .unwrap_or_default()
    }

    /// Follow the world: zone changes, combat state and sub-zone phase
    pub fn update(&mut self, world: &WorldSnapshot, scheduler: &mut DodgeScheduler) -> PhaseUpdate {
        let mut update = PhaseUpdate::default();

        if self.current_zone != Some(world.zone_id) {
            if self.current_zone.is_some() {
                update = self.on_exit(scheduler);
            }
            self.on_enter(world.zone_id);
        }

        let target = self.target_key(world);
        let current = match self.state {
            PhaseState::Active(key) => Some(key),
            PhaseState::Inactive => None,
        };

        if target != current || (self.reload && target.is_some()) {
            self.reload = false;
            let step = self.transition(target, scheduler);
            // leaving one zone's phase straight into another's is a change
            update.transition = match (update.transition, step.transition) {
                (Some(PhaseTransition::Exited(from)), Some(PhaseTransition::Entered(to))) => {
                    Some(PhaseTransition::Changed { from, to })
                }
                (earlier, later) => later.or(earlier),
            };
            update.released = step.released.or(update.released);
        }

        update
    }

    fn target_key(&self, world: &WorldSnapshot) -> Option<PhaseKey> {
        if !world.player.in_combat || !world.player.is_alive {
            return None;
        }
        self.encounters
            .get(&world.zone_id)
            .map(|encounter| encounter.phase_key(world.sub_zone_id))
    }

    fn transition(&mut self, target: Option<PhaseKey>, scheduler: &mut DodgeScheduler) -> PhaseUpdate {
        let previous = match self.state {
            PhaseState::Active(key) => Some(key),
            PhaseState::Inactive => None,
        };

        let released = scheduler.cancel();
        self.registry.clear();
        scheduler.clear();
        self.installed = None;

        if let Some(key) = target {
            let phase = self
                .encounters
                .get(&key.zone_id)
                .map(|encounter| encounter.compose(key));

            if let Some(phase) = phase {
                if let Err(e) = self.registry.install(phase.hazards.clone()) {
                    error!(phase = %key, error = %e, "Failed to install phase hazards");
                }
                scheduler.install(phase.obligations.clone());
                info!(
                    phase = %key,
                    hazards = self.registry.len(),
                    obligations = phase.obligations.len(),
                    positioning = phase.positioning.len(),
                    "Phase installed"
                );
                self.installed = Some(phase);
            }
        }

        scheduler.reset_timers();

        self.state = match target {
            Some(key) => PhaseState::Active(key),
            None => PhaseState::Inactive,
        };

        let transition = match (previous, target) {
            (None, Some(to)) => Some(PhaseTransition::Entered(to)),
            (Some(from), Some(to)) => Some(PhaseTransition::Changed { from, to }),
            (Some(from), None) => {
                info!(phase = %from, "Phase exited");
                Some(PhaseTransition::Exited(from))
            }
            (None, None) => None,
        };

        PhaseUpdate {
            transition,
            released,
        }
    }
}
