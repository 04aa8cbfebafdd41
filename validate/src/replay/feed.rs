//! Scripted collaborators for replay
//!
//! The feed serves scenario frames by elapsed time; mover and gate record
//! what the engine asked of them.

use std::fmt;

use chrono::NaiveDateTime;
use warden_core::geometry::Vec3;
use warden_core::world::{AbilityGate, FeedError, Mover, WorldFeed, WorldSnapshot};

use super::scenario::Frame;

#[derive(Debug)]
pub struct ScenarioFeed {
    frames: Vec<Frame>,
    start: NaiveDateTime,
    elapsed_ms: u64,
}

impl ScenarioFeed {
    /// `frames` must be sorted by `at_ms`
    pub fn new(frames: Vec<Frame>, start: NaiveDateTime) -> Self {
        Self {
            frames,
            start,
            elapsed_ms: 0,
        }
    }

    pub fn set_elapsed(&mut self, elapsed_ms: u64) {
        self.elapsed_ms = elapsed_ms;
    }

    fn current(&self) -> Option<&Frame> {
        self.frames
            .iter()
            .take_while(|f| f.at_ms <= self.elapsed_ms)
            .last()
    }
}

impl WorldFeed for ScenarioFeed {
    fn snapshot(&mut self) -> Result<WorldSnapshot, FeedError> {
        let Some(frame) = self.current() else {
            return Err(FeedError::Unavailable(format!(
                "no frame before {}ms",
                self.elapsed_ms
            )));
        };
        if frame.disconnected {
            return Err(FeedError::Disconnected);
        }
        let timestamp = self.start + chrono::Duration::milliseconds(self.elapsed_ms as i64);
        Ok(frame.to_snapshot(timestamp))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MoverCommand {
    MoveToward { point: Vec3, tolerance: f32 },
    Follow { entity_id: u64, distance: f32 },
    Stop,
}

impl fmt::Display for MoverCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoverCommand::MoveToward { point, tolerance } => {
                write!(f, "move toward {} (±{})", point, tolerance)
            }
            MoverCommand::Follow {
                entity_id,
                distance,
            } => write!(f, "follow {} at {}", entity_id, distance),
            MoverCommand::Stop => f.write_str("stop"),
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingMover {
    pub commands: Vec<MoverCommand>,
}

impl Mover for RecordingMover {
    fn move_toward(&mut self, point: Vec3, arrival_tolerance: f32) {
        self.commands.push(MoverCommand::MoveToward {
            point,
            tolerance: arrival_tolerance,
        });
    }

    fn follow_entity(&mut self, entity_id: u64, distance: f32) {
        self.commands.push(MoverCommand::Follow {
            entity_id,
            distance,
        });
    }

    fn stop(&mut self) {
        self.commands.push(MoverCommand::Stop);
    }
}

#[derive(Debug, Default)]
pub struct RecordingGate {
    pub suppressions: Vec<(String, NaiveDateTime)>,
    pub releases: u32,
}

impl AbilityGate for RecordingGate {
    fn suppress_movement(&mut self, reason: &str, until: NaiveDateTime) {
        self.suppressions.push((reason.to_string(), until));
    }

    fn release_movement(&mut self) {
        self.releases += 1;
    }
}
