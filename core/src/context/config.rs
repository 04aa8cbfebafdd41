//! Engine configuration
//!
//! Re-exports the shared config types from warden-types and adds
//! persistence through confy.

pub use warden_types::{EngineConfig, SafeSpotConfig};

use std::path::{Path, PathBuf};

use tracing::warn;

use super::error::ConfigError;

const APP_NAME: &str = "warden";
const CONFIG_NAME: &str = "config";

/// Extension trait for EngineConfig persistence
pub trait EngineConfigExt: Sized {
    /// Load the stored config, falling back to defaults when it is missing,
    /// unreadable or invalid
    fn load() -> Self;
    fn try_load() -> Result<Self, ConfigError>;
    /// Load from an explicit file, creating it with defaults when missing
    fn load_from(path: &Path) -> Result<Self, ConfigError>;
    fn save(&self) -> Result<(), ConfigError>;
    fn save_to(&self, path: &Path) -> Result<(), ConfigError>;
    fn config_path() -> Result<PathBuf, ConfigError>;
    fn validate(&self) -> Result<(), ConfigError>;
}

impl EngineConfigExt for EngineConfig {
    fn load() -> Self {
        match Self::try_load() {
            Ok(config) => config,
            Err(e) => {
                warn!(error = ?e, "Using default configuration");
                Self::default()
            }
        }
    }

    fn try_load() -> Result<Self, ConfigError> {
        let config: EngineConfig = confy::load(APP_NAME, CONFIG_NAME)?;
        config.validate()?;
        Ok(config)
    }

    fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let config: EngineConfig = confy::load_path(path)?;
        config.validate()?;
        Ok(config)
    }

    fn save(&self) -> Result<(), ConfigError> {
        self.validate()?;
        confy::store(APP_NAME, CONFIG_NAME, self).map_err(ConfigError::Save)
    }

    fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;
        confy::store_path(path, self).map_err(ConfigError::Save)
    }

    fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let spot = &self.safe_spot;
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid("tick_interval_ms must be > 0".into()));
        }
        if self.arrival_tolerance < 0.0 {
            return Err(ConfigError::Invalid("arrival_tolerance must be >= 0".into()));
        }
        if spot.angular_step_degrees <= 0.0 || spot.angular_step_degrees > 360.0 {
            return Err(ConfigError::Invalid(
                "safe_spot.angular_step_degrees must be in (0, 360]".into(),
            ));
        }
        if spot.radial_step <= 0.0 || spot.max_radius < spot.radial_step {
            return Err(ConfigError::Invalid(
                "safe_spot needs radial_step > 0 and max_radius >= radial_step".into(),
            ));
        }
        Ok(())
    }
}
