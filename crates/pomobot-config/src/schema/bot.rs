//! Bot identity and channel wiring.

use serde::{Deserialize, Serialize};

/// Credentials and display identity of the bot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotSection {
    /// Login token for the gateway. Usually supplied via `POMOBOT_TOKEN`
    /// rather than the config file.
    pub token: String,
    /// Name shown as the bot's presence/activity.
    pub presence_name: String,
}

impl Default for BotSection {
    fn default() -> Self {
        Self {
            token: String::new(),
            presence_name: "pomobot".to_string(),
        }
    }
}

/// Channels the bot operates on.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ChannelsSection {
    /// Voice channel the session timer manages.
    pub pomodoro_voice: String,
    /// Text channel that receives voice-channel start notices.
    pub notify_text: String,
}
