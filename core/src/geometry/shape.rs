//! Hazard shapes and point-in-shape tests
//!
//! Boundaries are inclusive everywhere: a point exactly on a circle's rim,
//! on either ring of a donut, or on a cone's edge counts as inside.

use serde::{Deserialize, Serialize};

use super::{Anchor, Vec3, normalize_degrees};

/// Distances below this are treated as "at the origin"
const ORIGIN_EPSILON: f32 = 1e-4;

/// Geometric footprint of a hazard, relative to its anchor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum HazardShape {
    /// Everything within `radius` of the origin
    Circle { radius: f32 },

    /// Ring between `inner_radius` and `outer_radius` (both inclusive)
    Donut {
        inner_radius: f32,
        outer_radius: f32,
    },

    /// Sector of `arc_degrees` centred on the anchor's facing, turned by
    /// `rotation_degrees` (clockwise when viewed from above)
    Cone {
        radius: f32,
        arc_degrees: f32,
        #[serde(default)]
        rotation_degrees: f32,
    },

    /// Cone anchored to a moving unit. The whole hazard is void while the
    /// unit stands farther than `leash_radius` from `leash_point`: once the
    /// mechanic has been dragged out of the danger zone it no longer counts.
    UnitCone {
        radius: f32,
        arc_degrees: f32,
        #[serde(default)]
        rotation_degrees: f32,
        leash_point: Vec3,
        leash_radius: f32,
    },
}

impl HazardShape {
    /// Whether `point` lies inside this shape placed at `anchor`.
    pub fn contains(&self, point: Vec3, anchor: &Anchor) -> bool {
        let origin = anchor.position;
        let distance = origin.distance_2d(point);

        match *self {
            HazardShape::Circle { radius } => distance <= radius,
            HazardShape::Donut {
                inner_radius,
                outer_radius,
            } => inner_radius <= distance && distance <= outer_radius,
            HazardShape::Cone {
                radius,
                arc_degrees,
                rotation_degrees,
            } => {
                distance <= radius
                    && within_arc(point, anchor, distance, arc_degrees, rotation_degrees)
            }
            HazardShape::UnitCone {
                radius,
                arc_degrees,
                rotation_degrees,
                leash_point,
                leash_radius,
            } => {
                if leash_point.distance_2d(origin) > leash_radius {
                    return false;
                }
                distance <= radius
                    && within_arc(point, anchor, distance, arc_degrees, rotation_degrees)
            }
        }
    }

    /// Check the shape's parameters make sense.
    pub fn validate(&self) -> Result<(), String> {
        match *self {
            HazardShape::Circle { radius } => positive("radius", radius),
            HazardShape::Donut {
                inner_radius,
                outer_radius,
            } => {
                if !(inner_radius >= 0.0) {
                    return Err(format!("inner_radius must be >= 0, got {inner_radius}"));
                }
                positive("outer_radius", outer_radius)?;
                if inner_radius > outer_radius {
                    return Err(format!(
                        "inner_radius {inner_radius} exceeds outer_radius {outer_radius}"
                    ));
                }
                Ok(())
            }
            HazardShape::Cone {
                radius,
                arc_degrees,
                rotation_degrees,
            } => {
                positive("radius", radius)?;
                arc("arc_degrees", arc_degrees)?;
                finite("rotation_degrees", rotation_degrees)
            }
            HazardShape::UnitCone {
                radius,
                arc_degrees,
                rotation_degrees,
                leash_radius,
                ..
            } => {
                positive("radius", radius)?;
                arc("arc_degrees", arc_degrees)?;
                finite("rotation_degrees", rotation_degrees)?;
                positive("leash_radius", leash_radius)
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            HazardShape::Circle { .. } => "circle",
            HazardShape::Donut { .. } => "donut",
            HazardShape::Cone { .. } => "cone",
            HazardShape::UnitCone { .. } => "unit_cone",
        }
    }
}

fn within_arc(
    point: Vec3,
    anchor: &Anchor,
    distance: f32,
    arc_degrees: f32,
    rotation_degrees: f32,
) -> bool {
    // The apex belongs to every cone
    if distance <= ORIGIN_EPSILON {
        return true;
    }
    let bearing = anchor.position.bearing_to(point).to_degrees();
    let centre = anchor.facing.to_degrees() + rotation_degrees;
    normalize_degrees(bearing - centre).abs() <= arc_degrees / 2.0
}

fn positive(name: &str, value: f32) -> Result<(), String> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(format!("{name} must be a positive number, got {value}"))
    }
}

fn finite(name: &str, value: f32) -> Result<(), String> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(format!("{name} must be finite"))
    }
}

fn arc(name: &str, value: f32) -> Result<(), String> {
    if value > 0.0 && value <= 360.0 {
        Ok(())
    } else {
        Err(format!("{name} must be in (0, 360], got {value}"))
    }
}
