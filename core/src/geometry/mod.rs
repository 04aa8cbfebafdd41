//! Planar spatial math for hazard evaluation
//!
//! All distance and angle computations ignore the vertical axis (`y`):
//! ground-targeted mechanics only care about the x/z plane.
//!
//! - **shape**: hazard shapes and point-in-shape tests
//! - **search**: nearest safe point search by ring sampling
//!
//! # Bearing convention
//!
//! Bearings and facings are radians measured with `atan2(dx, dz)`, so a
//! bearing of 0 points along +z and π/2 points along +x.

mod search;
mod shape;

pub use search::SafeSpotSearch;
pub use shape::HazardShape;

use serde::{Deserialize, Serialize};

/// World-space point. `y` is height.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Planar distance, ignoring height
    pub fn distance_2d(&self, other: Vec3) -> f32 {
        self.distance_squared_2d(other).sqrt()
    }

    pub fn distance_squared_2d(&self, other: Vec3) -> f32 {
        let dx = other.x - self.x;
        let dz = other.z - self.z;
        dx * dx + dz * dz
    }

    /// Bearing from `self` towards `other` in radians.
    pub fn bearing_to(&self, other: Vec3) -> f32 {
        (other.x - self.x).atan2(other.z - self.z)
    }

    /// Point `distance` away along `bearing`, keeping the current height.
    pub fn offset_2d(&self, bearing: f32, distance: f32) -> Vec3 {
        Vec3::new(
            self.x + distance * bearing.sin(),
            self.y,
            self.z + distance * bearing.cos(),
        )
    }

    /// Arithmetic mean of a set of points. `None` when empty.
    pub fn centroid(points: impl IntoIterator<Item = Vec3>) -> Option<Vec3> {
        let mut count = 0usize;
        let mut sum = Vec3::ZERO;
        for p in points {
            sum.x += p.x;
            sum.y += p.y;
            sum.z += p.z;
            count += 1;
        }
        if count == 0 {
            return None;
        }
        let n = count as f32;
        Some(Vec3::new(sum.x / n, sum.y / n, sum.z / n))
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Vec3::new(x, y, z)
    }
}

impl From<Vec3> for [f32; 3] {
    fn from(v: Vec3) -> Self {
        [v.x, v.y, v.z]
    }
}

impl std::fmt::Display for Vec3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{:.2}, {:.2}, {:.2}>", self.x, self.y, self.z)
    }
}

/// Where a hazard instance sits this tick: its origin and the facing its
/// cones are oriented to.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Anchor {
    pub position: Vec3,
    /// Facing in radians (see module docs for the convention)
    pub facing: f32,
}

impl Anchor {
    pub fn new(position: Vec3, facing: f32) -> Self {
        Self { position, facing }
    }

    pub fn at(position: Vec3) -> Self {
        Self::new(position, 0.0)
    }
}

/// Wrap an angle in degrees into `[-180, 180)`.
pub fn normalize_degrees(angle: f32) -> f32 {
    (angle + 180.0).rem_euclid(360.0) - 180.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn distance_ignores_height() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(3.0, 100.0, 4.0);
        assert!((a.distance_2d(b) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn bearing_zero_faces_positive_z() {
        let origin = Vec3::ZERO;
        assert!(origin.bearing_to(Vec3::new(0.0, 0.0, 10.0)).abs() < 1e-6);
        assert!((origin.bearing_to(Vec3::new(10.0, 0.0, 0.0)) - FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn offset_round_trips_through_bearing() {
        let origin = Vec3::new(5.0, 2.0, -3.0);
        let p = origin.offset_2d(1.0, 7.5);
        assert!((origin.distance_2d(p) - 7.5).abs() < 1e-4);
        assert!((origin.bearing_to(p) - 1.0).abs() < 1e-4);
        assert_eq!(p.y, 2.0);
    }

    #[test]
    fn normalize_wraps_into_half_open_range() {
        assert!((normalize_degrees(190.0) - -170.0).abs() < 1e-4);
        assert!((normalize_degrees(-190.0) - 170.0).abs() < 1e-4);
        assert!((normalize_degrees(720.0 + 45.0) - 45.0).abs() < 1e-3);
        assert!((normalize_degrees(180.0) - -180.0).abs() < 1e-4);
    }

    #[test]
    fn centroid_of_nothing_is_none() {
        assert!(Vec3::centroid(Vec::new()).is_none());
        let c = Vec3::centroid([Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 4.0)]).unwrap();
        assert_eq!(c, Vec3::new(1.0, 0.0, 2.0));
    }
}
