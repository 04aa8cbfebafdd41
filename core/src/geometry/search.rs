//! Nearest safe point search
//!
//! Samples candidate points on concentric rings around the query point,
//! nearest ring first, and returns the first candidate the caller deems
//! safe. Bounded by a maximum search radius so a hopeless situation costs a
//! fixed amount of work and reports "no safe point" instead of wandering.

use warden_types::SafeSpotConfig;

use super::Vec3;

/// Margin a candidate must keep from every unsafe point, so a spot that
/// only rounds to "outside" on a hazard's edge is never chosen
const CLEARANCE: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafeSpotSearch {
    pub angular_step_degrees: f32,
    pub radial_step: f32,
    pub max_radius: f32,
}

impl Default for SafeSpotSearch {
    fn default() -> Self {
        Self::from(&SafeSpotConfig::default())
    }
}

impl From<&SafeSpotConfig> for SafeSpotSearch {
    fn from(config: &SafeSpotConfig) -> Self {
        Self {
            angular_step_degrees: config.angular_step_degrees,
            radial_step: config.radial_step,
            max_radius: config.max_radius,
        }
    }
}

impl SafeSpotSearch {
    /// Find the nearest sampled point for which `is_unsafe` is false.
    ///
    /// Returns `from` itself when it is already safe, and `None` when every
    /// candidate within `max_radius` is unsafe. Candidates on the same ring
    /// are tried in bearing order starting at 0. A candidate only counts when
    /// the points `CLEARANCE` away from it on both planar axes are safe
    /// too.
    pub fn nearest_safe_point(&self, from: Vec3, is_unsafe: impl Fn(Vec3) -> bool) -> Option<Vec3> {
        if !is_unsafe(from) {
            return Some(from);
        }
        if !(self.radial_step > 0.0) || !(self.angular_step_degrees > 0.0) {
            return None;
        }

        let samples_per_ring = (360.0 / self.angular_step_degrees).round().max(1.0) as u32;
        let rings = (self.max_radius / self.radial_step + 1e-3).floor().max(0.0) as u32;

        for ring in 1..=rings {
            let radius = ring as f32 * self.radial_step;
            for sample in 0..samples_per_ring {
                let bearing = (sample as f32 * self.angular_step_degrees).to_radians();
                let candidate = from.offset_2d(bearing, radius);
                if has_clearance(candidate, &is_unsafe) {
                    return Some(candidate);
                }
            }
        }

        None
    }
}

fn has_clearance(candidate: Vec3, is_unsafe: &impl Fn(Vec3) -> bool) -> bool {
    const PROBES: [(f32, f32); 5] = [
        (0.0, 0.0),
        (CLEARANCE, 0.0),
        (-CLEARANCE, 0.0),
        (0.0, CLEARANCE),
        (0.0, -CLEARANCE),
    ];
    PROBES.iter().all(|&(dx, dz)| {
        !is_unsafe(Vec3::new(candidate.x + dx, candidate.y, candidate.z + dz))
    })
}
