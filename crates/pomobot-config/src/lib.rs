//! Pomobot configuration system.
//!
//! TOML-based configuration with serde defaults so partial configs work
//! out of the box. Secrets can be supplied through environment variables
//! instead of the file.

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::BotConfig;

use pomobot_common::ConfigError;

/// Load config from the platform default path, apply environment
/// overrides, and validate the result.
///
/// Creates a commented default file on first run.
pub fn load_config() -> Result<BotConfig, ConfigError> {
    let mut config = loader::load_default()?;
    loader::apply_env_overrides(&mut config);
    validation::validate(&config)?;
    Ok(config)
}

/// Load config from an explicit path, apply environment overrides, and
/// validate the result.
pub fn load_config_from(path: &std::path::Path) -> Result<BotConfig, ConfigError> {
    let mut config = loader::load_from_path(path)?;
    loader::apply_env_overrides(&mut config);
    validation::validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = BotConfig::default();
        assert!(validation::validate(&config).is_ok());
    }
}
