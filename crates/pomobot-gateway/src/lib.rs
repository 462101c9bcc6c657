//! Client for the voice/chat platform gateway.
//!
//! One WebSocket connection carries everything: chat messages and voice
//! state in, mute/cue/message commands out. `client` owns the
//! connection, `roster` mirrors voice occupancy from events, and
//! `adapters` expose both through the session engine's traits.

pub mod adapters;
pub mod client;
pub mod protocol;
pub mod roster;

pub use adapters::{ChannelRoster, GatewayCues};
pub use client::{GatewayClient, GatewayConfig};
pub use protocol::{
    Author, GatewayCommand, GatewayEvent, MessagePayload, PlaybackFinishedPayload, ReadyPayload,
    VoiceStatePayload,
};
pub use roster::VoiceRoster;
