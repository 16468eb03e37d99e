//! Application configuration: TOML settings with atomic persistence.

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{LoggingSettings, MatchingSettings, PathSettings, Settings};
