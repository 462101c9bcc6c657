//! Wire protocol for the platform gateway.
//!
//! Every frame is a JSON envelope tagged by event name: `{"t": ...,
//! "d": {...}}`. Inbound events and outbound commands share the shape
//! but not the type. After `ready` the platform replays current voice
//! occupancy as individual `voice_state` events so a reconnecting
//! client can rebuild its roster.

use pomobot_common::{ChannelId, MemberId};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Inbound events
// ---------------------------------------------------------------------------

/// Frames the gateway sends to the bot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", content = "d", rename_all = "snake_case")]
pub enum GatewayEvent {
    Ready(ReadyPayload),
    Message(MessagePayload),
    VoiceState(VoiceStatePayload),
    PlaybackFinished(PlaybackFinishedPayload),
    Pong,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadyPayload {
    pub session_id: String,
    /// The bot's own member id, used to recognize mentions.
    pub member: MemberId,
}

/// A chat message posted in a text channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagePayload {
    pub id: String,
    pub channel: ChannelId,
    pub author: Author,
    pub content: String,
    #[serde(default)]
    pub mentions: Vec<MemberId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub id: MemberId,
    pub display_name: String,
    #[serde(default)]
    pub bot: bool,
}

/// A member moved between voice channels (or in/out of voice).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceStatePayload {
    pub member: MemberId,
    pub display_name: String,
    #[serde(default)]
    pub bot: bool,
    pub old_channel: Option<ChannelId>,
    pub new_channel: Option<ChannelId>,
    /// Display name of `new_channel`, when there is one.
    #[serde(default)]
    pub new_channel_name: Option<String>,
}

/// Completion signal for an earlier `play_cue` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackFinishedPayload {
    #[serde(rename = "ref")]
    pub correlation: String,
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Outbound commands
// ---------------------------------------------------------------------------

/// Frames the bot sends to the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", content = "d", rename_all = "snake_case")]
pub enum GatewayCommand {
    Identify {
        token: String,
    },
    Heartbeat,
    SendMessage {
        channel: ChannelId,
        content: String,
    },
    /// Server-side mute flag for a member's current voice connection.
    SetMute {
        member: MemberId,
        mute: bool,
    },
    PlayCue {
        channel: ChannelId,
        cue: String,
        #[serde(rename = "ref")]
        correlation: String,
    },
    SetPresence {
        name: String,
    },
}
