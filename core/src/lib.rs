pub mod context;
pub mod dodge;
pub mod dsl;
pub mod engine;
pub mod game_data;
pub mod geometry;
pub mod hazards;
pub mod phase;
pub mod positioning;
pub mod spread;
pub mod world;

#[cfg(test)]
mod engine_tests;

// Re-exports for convenience
pub use context::{ConfigError, EngineConfigExt};
pub use dodge::{DodgeObligation, DodgeResponse, DodgeScheduler};
pub use dsl::{DslError, load_all_encounters, load_encounters_from_dir};
pub use engine::{Engine, EngineStatus, IntentSource, MovementIntent, TickReport, TickWarning};
pub use game_data::{area_label, lookup_sub_zone, lookup_zone};
pub use geometry::{Anchor, HazardShape, SafeSpotSearch, Vec3};
pub use hazards::{AvoidanceVerdict, HazardDescriptor, HazardRegistry, PriorityResolver};
pub use phase::{Encounter, PhaseController, PhaseKey, PhaseState};
pub use spread::SpreadDirective;
pub use world::{
    AbilityGate, EntityKind, EntitySnapshot, FeedError, FollowTarget, Mover, NoGate, PlayerState,
    WorldFeed, WorldSnapshot,
};
pub use warden_types::{EngineConfig, Priority, Role, SafeSpotConfig};
