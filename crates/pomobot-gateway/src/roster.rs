//! Live mirror of voice-channel occupancy.
//!
//! Fed exclusively by `voice_state` events, so a reconnect (after which
//! the gateway replays current occupancy) rebuilds it from scratch.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use pomobot_common::{ChannelId, MemberId};
use tokio::sync::RwLock;
use tracing::debug;

use crate::protocol::VoiceStatePayload;

/// Which members occupy which voice channels right now.
#[derive(Clone, Default)]
pub struct VoiceRoster {
    channels: Arc<RwLock<HashMap<ChannelId, HashSet<MemberId>>>>,
}

impl VoiceRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one voice-state transition.
    ///
    /// Returns the occupancy of the joined channel after the move, when
    /// the member joined one; the notifier uses this to detect a
    /// channel's first occupant.
    pub async fn apply(&self, update: &VoiceStatePayload) -> Option<usize> {
        let mut channels = self.channels.write().await;

        if let Some(old) = &update.old_channel {
            if let Some(members) = channels.get_mut(old) {
                members.remove(&update.member);
                if members.is_empty() {
                    channels.remove(old);
                }
            }
        }

        let joined_count = update.new_channel.as_ref().map(|new| {
            let members = channels.entry(new.clone()).or_default();
            members.insert(update.member.clone());
            members.len()
        });

        debug!(
            member = %update.member,
            old = ?update.old_channel,
            new = ?update.new_channel,
            "voice state applied"
        );
        joined_count
    }

    /// Snapshot of a channel's members.
    pub async fn members_of(&self, channel: &ChannelId) -> HashSet<MemberId> {
        self.channels
            .read()
            .await
            .get(channel)
            .cloned()
            .unwrap_or_default()
    }

    /// Whether the member is connected to any voice channel, which is
    /// the scope a mute command can reach.
    pub async fn in_any_channel(&self, member: &MemberId) -> bool {
        self.channels
            .read()
            .await
            .values()
            .any(|members| members.contains(member))
    }

    /// Occupancy of a channel.
    pub async fn occupancy(&self, channel: &ChannelId) -> usize {
        self.channels
            .read()
            .await
            .get(channel)
            .map(|members| members.len())
            .unwrap_or(0)
    }
}
