//! Spread directive
//!
//! Distributes a group of participants evenly on a circle around their
//! current centroid so that every pair ends up at least
//! `minimum_separation` apart. Computed once per invocation and held until
//! it expires or is dropped on a combat/phase change.

use std::f32::consts::PI;
use std::time::Duration;

use chrono::NaiveDateTime;

use crate::geometry::Vec3;
use crate::world::deadline;

/// Someone taking part in a spread
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Participant {
    pub entity_id: u64,
    pub position: Vec3,
}

impl Participant {
    pub fn new(entity_id: u64, position: Vec3) -> Self {
        Self {
            entity_id,
            position,
        }
    }
}

/// Radius at which `n` evenly spaced points are `minimum_separation` apart
/// (adjacent chord length).
pub fn spread_radius(n: usize, minimum_separation: f32) -> f32 {
    if n < 2 {
        return 0.0;
    }
    minimum_separation / (2.0 * (PI / n as f32).sin())
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpreadDirective {
    /// Destination per participant, in slot order
    assignments: Vec<(u64, Vec3)>,
    pub center: Vec3,
    pub radius: f32,
    pub minimum_separation: f32,
    pub expires_at: NaiveDateTime,
}

impl SpreadDirective {
    /// Assign every participant a slot. `None` without participants.
    ///
    /// Slots are handed out in bearing order from the centroid, starting at
    /// the first participant's own bearing, so the group rotates as little
    /// as possible.
    pub fn invoke(
        participants: &[Participant],
        duration: Duration,
        minimum_separation: f32,
        now: NaiveDateTime,
    ) -> Option<Self> {
        let center = Vec3::centroid(participants.iter().map(|p| p.position))?;
        let n = participants.len();
        let radius = spread_radius(n, minimum_separation);

        let mut ordered: Vec<(f32, &Participant)> = participants
            .iter()
            .map(|p| (center.bearing_to(p.position), p))
            .collect();
        ordered.sort_by(|a, b| {
            a.0.total_cmp(&b.0)
                .then_with(|| a.1.entity_id.cmp(&b.1.entity_id))
        });

        let start = ordered[0].0;
        let step = 2.0 * PI / n as f32;
        let assignments = ordered
            .iter()
            .enumerate()
            .map(|(slot, (_, p))| {
                let point = center.offset_2d(start + step * slot as f32, radius);
                (p.entity_id, point)
            })
            .collect();

        let expires_at = deadline(now, duration);

        Some(Self {
            assignments,
            center,
            radius,
            minimum_separation,
            expires_at,
        })
    }

    pub fn target_for(&self, entity_id: u64) -> Option<Vec3> {
        self.assignments
            .iter()
            .find(|(id, _)| *id == entity_id)
            .map(|(_, point)| *point)
    }

    pub fn assignments(&self) -> &[(u64, Vec3)] {
        &self.assignments
    }

    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        now >= self.expires_at
    }
}
