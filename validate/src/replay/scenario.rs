//! Scenario files
//!
//! A scenario is a timeline of world states plus the movement the engine is
//! expected to produce:
//!
//! ```toml
//! [meta]
//! name = "Lugat: Hydroball stack"
//!
//! [[frame]]
//! at_ms = 0
//! zone_id = 626
//! sub_zone_id = 1961
//! player = { entity_id = 1, position = [0.0, 0.0, 5.0], in_combat = true }
//! entities = [
//!     { entity_id = 100, npc_id = 6071, kind = "hostile", position = [0.0, 0.0, 0.0] },
//! ]
//!
//! [[expect]]
//! at_ms = 500
//! intent = "none"
//! ```
//!
//! Each frame holds until the next one.

use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use warden_core::world::{EntitySnapshot, PlayerState, WorldSnapshot};

use crate::verification::Expectation;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub meta: ScenarioMeta,

    #[serde(rename = "frame")]
    pub frames: Vec<Frame>,

    #[serde(default, rename = "expect")]
    pub expectations: Vec<Expectation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioMeta {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Default distance tolerance for point checks
    #[serde(default = "default_tolerance")]
    pub tolerance: f32,

    /// Keep ticking this long after the last frame or checkpoint
    #[serde(default)]
    pub tail_ms: u64,
}

fn default_tolerance() -> f32 {
    0.5
}

/// World state from `at_ms` until the next frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frame {
    pub at_ms: u64,

    pub zone_id: u32,

    #[serde(default)]
    pub sub_zone_id: u32,

    #[serde(default)]
    pub loading: bool,

    #[serde(default)]
    pub in_cutscene: bool,

    /// Simulate the feed dropping out for the duration of this frame
    #[serde(default)]
    pub disconnected: bool,

    pub player: PlayerState,

    #[serde(default)]
    pub entities: Vec<EntitySnapshot>,
}

impl Frame {
    pub fn to_snapshot(&self, timestamp: NaiveDateTime) -> WorldSnapshot {
        let mut world = WorldSnapshot::new(timestamp, self.player.clone());
        world.zone_id = self.zone_id;
        world.sub_zone_id = self.sub_zone_id;
        world.loading = self.loading;
        world.in_cutscene = self.in_cutscene;
        world.entities = self.entities.clone();
        world
    }
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let mut scenario: Scenario = toml::from_str(&content)?;
        if scenario.frames.is_empty() {
            return Err(format!("{}: scenario has no frames", path.display()).into());
        }
        scenario.frames.sort_by_key(|f| f.at_ms);
        scenario.expectations.sort_by_key(|e| e.at_ms);
        Ok(scenario)
    }

    /// Last scenario time that needs a tick
    pub fn end_ms(&self) -> u64 {
        let last_frame = self.frames.last().map_or(0, |f| f.at_ms);
        let last_expect = self.expectations.last().map_or(0, |e| e.at_ms);
        last_frame.max(last_expect) + self.meta.tail_ms
    }
}
