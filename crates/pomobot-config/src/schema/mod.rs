//! Configuration schema types for pomobot.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Missing fields are filled with sensible defaults.

mod bot;
mod gateway;
mod services;
mod session;

pub use bot::*;
pub use gateway::*;
pub use services::*;
pub use session::*;

use serde::{Deserialize, Serialize};

/// Root configuration for pomobot.
///
/// All options have sensible defaults; only override what you want to
/// change.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BotConfig {
    pub bot: BotSection,
    pub channels: ChannelsSection,
    pub session: SessionSection,
    pub memo: MemoSection,
    pub wiki: WikiSection,
    pub keepalive: KeepaliveSection,
    pub gateway: GatewaySection,
}
