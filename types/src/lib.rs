//! Shared configuration types for Warden
//!
//! This crate contains serializable types that are shared between the
//! engine (warden-core), encounter definition files and the validation
//! harness (warden-validate).

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Hazard Priority
// ─────────────────────────────────────────────────────────────────────────────

/// Severity tier of a hazard.
///
/// Ordering is meaningful: `High > Medium > Low`. When hazards of several
/// tiers are active at once only the highest tier governs avoidance.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Party Role
// ─────────────────────────────────────────────────────────────────────────────

/// Combat role of the agent or a party member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Tank,
    Healer,
    #[default]
    Dps,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Tank => "tank",
            Role::Healer => "healer",
            Role::Dps => "dps",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Engine Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Parameters of the nearest-safe-point search.
///
/// Candidates are sampled on rings around the query point: every
/// `angular_step_degrees` on rings spaced `radial_step` apart, out to
/// `max_radius`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SafeSpotConfig {
    #[serde(default = "default_angular_step")]
    pub angular_step_degrees: f32,
    #[serde(default = "default_radial_step")]
    pub radial_step: f32,
    #[serde(default = "default_max_radius")]
    pub max_radius: f32,
}

impl Default for SafeSpotConfig {
    fn default() -> Self {
        Self {
            angular_step_degrees: default_angular_step(),
            radial_step: default_radial_step(),
            max_radius: default_max_radius(),
        }
    }
}

/// Engine configuration (persisted by warden-core)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Interval between ticks of the avoidance loop
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Distance at which a move-to directive counts as arrived
    #[serde(default = "default_arrival_tolerance")]
    pub arrival_tolerance: f32,

    #[serde(default)]
    pub safe_spot: SafeSpotConfig,

    /// User encounter definitions, loaded after the bundled ones
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definitions_dir: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            arrival_tolerance: default_arrival_tolerance(),
            safe_spot: SafeSpotConfig::default(),
            definitions_dir: None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Serde Helpers
// ═══════════════════════════════════════════════════════════════════════════

fn default_tick_interval_ms() -> u64 {
    100
}

fn default_arrival_tolerance() -> f32 {
    0.5
}

fn default_angular_step() -> f32 {
    10.0
}

fn default_radial_step() -> f32 {
    1.0
}

fn default_max_radius() -> f32 {
    40.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_orders_high_above_low() {
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
            tick_interval_ms = 50

            [safe_spot]
            max_radius = 60.0
            "#,
        )
        .unwrap();

        assert_eq!(config.tick_interval_ms, 50);
        assert_eq!(config.arrival_tolerance, 0.5);
        assert_eq!(config.safe_spot.max_radius, 60.0);
        assert_eq!(config.safe_spot.angular_step_degrees, 10.0);
        assert!(config.definitions_dir.is_none());
    }

    #[test]
    fn priority_parses_snake_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            priority: Priority,
        }
        let w: Wrapper = toml::from_str("priority = \"high\"").unwrap();
        assert_eq!(w.priority, Priority::High);
    }
}
