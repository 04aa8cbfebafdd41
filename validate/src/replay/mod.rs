//! Scenario replay
//!
//! Drives the engine tick by tick through a scenario on a virtual clock and
//! checks its intents against the scenario's checkpoints.

pub mod clock;
pub mod feed;
pub mod scenario;

pub use clock::VirtualClock;
pub use feed::{RecordingGate, RecordingMover, ScenarioFeed};
pub use scenario::Scenario;

use warden_core::engine::Engine;
use warden_core::phase::Encounter;
use warden_types::EngineConfig;

use crate::output::CliOutput;
use crate::verification::{CheckpointVerifier, VerificationResult};

pub type ReplayEngine = Engine<ScenarioFeed, RecordingMover, RecordingGate>;

/// Replay `scenario` against `encounters`, one tick every
/// `config.tick_interval_ms` of scenario time
pub fn replay(
    scenario: &Scenario,
    encounters: Vec<Encounter>,
    config: EngineConfig,
    clock: &mut VirtualClock,
    cli: &mut CliOutput,
) -> (VerificationResult, ReplayEngine) {
    let step = config.tick_interval_ms.max(1);
    let feed = ScenarioFeed::new(scenario.frames.clone(), clock.start());
    let mut engine = Engine::new(
        feed,
        RecordingMover::default(),
        RecordingGate::default(),
        config,
    );
    for encounter in encounters {
        engine.register_encounter(encounter);
    }

    let mut verifier =
        CheckpointVerifier::new(scenario.expectations.clone(), scenario.meta.tolerance);
    cli.set_start(clock.start());

    let end = scenario.end_ms();
    let mut elapsed = 0;
    while elapsed <= end {
        let now = clock.at(elapsed);
        clock.advance_to(now);
        engine.feed_mut().set_elapsed(elapsed);

        match engine.tick() {
            Ok(report) => cli.tick(&report),
            Err(e) => cli.feed_error(now, &e),
        }

        while let Some(result) = verifier.check_time(elapsed, engine.last_intent()) {
            cli.checkpoint(&result);
        }

        elapsed += step;
    }

    (verifier.finalize(), engine)
}
