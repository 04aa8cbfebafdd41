//! Encounter definition loading
//!
//! Definitions come from two places: the files bundled with the crate and
//! an optional user directory. Both are scanned recursively for `.toml`
//! files. A file that fails to parse or validate is logged and skipped so
//! one broken definition cannot take the others down with it.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use warden_types::EngineConfig;

use super::EncounterFile;
use super::error::DslError;
use crate::phase::Encounter;

/// Load and validate a single encounter file
pub fn load_encounter_from_file(path: &Path) -> Result<Encounter, DslError> {
    let content = fs::read_to_string(path).map_err(|source| DslError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    parse_encounter(&content, path)
}

/// Parse encounter TOML. `path` is only used for error reporting.
pub fn parse_encounter(content: &str, path: &Path) -> Result<Encounter, DslError> {
    let file: EncounterFile = toml::from_str(content).map_err(|source| DslError::ParseToml {
        path: path.to_path_buf(),
        source,
    })?;

    file.validate()
        .map_err(|reason| DslError::InvalidDefinition {
            path: path.to_path_buf(),
            reason,
        })?;

    Ok(file.to_encounter())
}

/// Load every encounter under `dir` (recursive). Files are visited in path
/// order, so when two files describe the same zone the later one wins once
/// registered. A missing directory yields nothing.
pub fn load_encounters_from_dir(dir: &Path) -> Result<Vec<Encounter>, DslError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    collect_toml_files(dir, &mut files)?;
    files.sort();

    let mut encounters = Vec::with_capacity(files.len());
    for path in files {
        match load_encounter_from_file(&path) {
            Ok(encounter) => {
                debug!(
                    path = %path.display(),
                    zone_id = encounter.zone_id,
                    name = %encounter.name,
                    "Loaded encounter"
                );
                encounters.push(encounter);
            }
            Err(e) => warn!(error = ?e, "Skipping encounter file"),
        }
    }

    Ok(encounters)
}

fn collect_toml_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), DslError> {
    let entries = fs::read_dir(dir).map_err(|source| DslError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_toml_files(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            files.push(path);
        }
    }

    Ok(())
}

/// Definitions shipped with the crate
pub fn bundled_definitions_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("definitions")
}

/// Default location for user definitions
pub fn user_definitions_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("warden").join("encounters"))
}

/// Bundled encounters followed by user encounters.
///
/// The user directory is `config.definitions_dir` when set, otherwise
/// [`user_definitions_dir`]. Directory errors are logged; whatever loaded
/// is returned.
pub fn load_all_encounters(config: &EngineConfig) -> Vec<Encounter> {
    let user_dir = config
        .definitions_dir
        .as_ref()
        .map(PathBuf::from)
        .or_else(user_definitions_dir);

    let mut encounters = Vec::new();
    for dir in std::iter::once(bundled_definitions_dir()).chain(user_dir) {
        match load_encounters_from_dir(&dir) {
            Ok(loaded) => {
                info!(dir = %dir.display(), count = loaded.len(), "Loaded encounter definitions");
                encounters.extend(loaded);
            }
            Err(e) => warn!(error = %e, "Failed to load encounter definitions"),
        }
    }
    encounters
}
