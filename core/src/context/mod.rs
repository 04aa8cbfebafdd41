mod config;
mod error;

pub use config::{EngineConfig, EngineConfigExt, SafeSpotConfig};
pub use error::ConfigError;
