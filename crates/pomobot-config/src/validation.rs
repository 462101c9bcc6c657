//! Configuration validation.
//!
//! Collects every problem into a single `ConfigError` so users see all
//! mistakes at once instead of fixing them one by one.

use pomobot_common::ConfigError;

use crate::schema::BotConfig;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &BotConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_session(&mut errors, config);
    validate_gateway(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_session(errors: &mut Vec<String>, config: &BotConfig) {
    let session = &config.session;
    if session.cycle_minutes == 0 {
        errors.push("session.cycle_minutes must be greater than zero".into());
    }
    if session.work_minutes == 0 {
        errors.push("session.work_minutes must be greater than zero".into());
    }
    if session.work_minutes >= session.cycle_minutes {
        errors.push(format!(
            "session.work_minutes = {} must be below session.cycle_minutes = {}",
            session.work_minutes, session.cycle_minutes
        ));
    }
    if session.cue_timeout_secs == 0 {
        errors.push("session.cue_timeout_secs must be greater than zero".into());
    }
}

fn validate_gateway(errors: &mut Vec<String>, config: &BotConfig) {
    let gateway = &config.gateway;
    if gateway.heartbeat_interval_secs == 0 {
        errors.push("gateway.heartbeat_interval_secs must be greater than zero".into());
    }
    if gateway.reconnect_delay_secs > gateway.max_reconnect_delay_secs {
        errors.push(format!(
            "gateway.reconnect_delay_secs = {} exceeds gateway.max_reconnect_delay_secs = {}",
            gateway.reconnect_delay_secs, gateway.max_reconnect_delay_secs
        ));
    }
}
