//! Encounter definition files
//!
//! Encounters are described in TOML and compiled into the runtime types the
//! phase controller installs.
//!
//! - **definition**: file schema and conversion into [`Encounter`](crate::phase::Encounter)
//! - **condition**: declarative world-state conditions
//! - **loader**: file and directory loading
//! - **error**: loading errors

mod condition;
mod definition;
mod error;
mod loader;

pub use condition::Condition;
pub use definition::{
    EncounterFile, EncounterHeader, HazardDefinition, ObligationDefinition, OriginDefinition,
    PositioningDefinition,
};
pub use error::DslError;
pub use loader::{
    bundled_definitions_dir, load_all_encounters, load_encounter_from_file,
    load_encounters_from_dir, parse_encounter, user_definitions_dir,
};
