//! TOML config loading: read from path or platform default, with
//! environment overrides for secrets.

use std::path::{Path, PathBuf};

use pomobot_common::ConfigError;
use tracing::{info, warn};

use crate::schema::BotConfig;
use crate::validation;

/// Template written on first run so every section is discoverable.
const DEFAULT_CONFIG_TOML: &str = r#"# pomobot configuration.
# Every key is optional; missing keys fall back to built-in defaults.

[bot]
# Prefer the POMOBOT_TOKEN environment variable for the token.
token = ""
presence_name = "pomobot"

[channels]
# Voice channel the session timer manages, and the text channel that
# receives voice-channel start notices.
pomodoro_voice = ""
notify_text = ""

[session]
cycle_minutes = 30
work_minutes = 25
work_cue = "begin-work"
rest_cue = "begin-rest"
cue_timeout_secs = 60

[wiki]
api_host = "https://en.wikipedia.org"

[keepalive]
enabled = true
port = 3000

[gateway]
url = ""
heartbeat_interval_secs = 25
reconnect_delay_secs = 1
max_reconnect_delay_secs = 30
"#;

/// Get the platform-specific default config file path.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::ParseError("could not determine config directory".into()))?;
    Ok(config_dir.join("pomobot").join("pomobot.toml"))
}

/// Load config from a specific TOML file path.
///
/// Deserializes the file using serde defaults for any missing fields.
/// After loading, the config is validated; if validation fails, a
/// warning is logged and the parsed config is returned as-is.
pub fn load_from_path(path: &Path) -> Result<BotConfig, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let config: BotConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    if let Err(e) = validation::validate(&config) {
        warn!("config validation warning: {e}");
    }

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from the platform-specific default path.
///
/// If the file does not exist, creates a commented default config file
/// and returns defaults.
pub fn load_default() -> Result<BotConfig, ConfigError> {
    let path = default_config_path()?;

    match load_from_path(&path) {
        Ok(config) => Ok(config),
        Err(ConfigError::ParseError(msg)) if msg.contains("failed to read") => {
            info!("no config found at {}, creating default", path.display());
            create_default_config(&path)?;
            Ok(BotConfig::default())
        }
        Err(e) => Err(e),
    }
}

/// Write the default commented config template to `path`.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::ParseError(format!(
                "failed to create config directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    std::fs::write(path, DEFAULT_CONFIG_TOML).map_err(|e| {
        ConfigError::ParseError(format!(
            "failed to write default config to {}: {e}",
            path.display()
        ))
    })?;

    info!("created default config at {}", path.display());
    Ok(())
}

/// Apply environment overrides on top of the loaded file.
///
/// `POMOBOT_TOKEN` and `POMOBOT_GATEWAY_URL` take precedence over the
/// file so secrets never need to live on disk.
pub fn apply_env_overrides(config: &mut BotConfig) {
    if let Ok(token) = std::env::var("POMOBOT_TOKEN") {
        if !token.is_empty() {
            config.bot.token = token;
        }
    }
    if let Ok(url) = std::env::var("POMOBOT_GATEWAY_URL") {
        if !url.is_empty() {
            config.gateway.url = url;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_from_path_reads_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pomobot.toml");
        std::fs::write(&path, "[session]\ncycle_minutes = 50\nwork_minutes = 40\n").unwrap();

        let config = load_from_path(&path).unwrap();
        assert_eq!(config.session.cycle_minutes, 50);
        assert_eq!(config.session.work_minutes, 40);
        assert_eq!(config.keepalive.port, 3000);
    }

    #[test]
    fn load_from_path_missing_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        let err = load_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn load_from_path_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pomobot.toml");
        std::fs::write(&path, "[session\ncycle_minutes = ").unwrap();
        let err = load_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse TOML"));
    }

    #[test]
    fn default_template_parses_to_defaults() {
        let config: BotConfig = toml::from_str(DEFAULT_CONFIG_TOML).unwrap();
        assert_eq!(config.session.cycle_minutes, 30);
        assert_eq!(config.session.work_minutes, 25);
        assert_eq!(config.gateway.heartbeat_interval_secs, 25);
    }

    #[test]
    fn create_default_config_writes_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("pomobot.toml");
        create_default_config(&path).unwrap();
        let config = load_from_path(&path).unwrap();
        assert_eq!(config.keepalive.port, 3000);
    }
}
