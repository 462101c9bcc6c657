//! Session-engine adapters over the gateway.
//!
//! The engine sees only `PresenceRoster` and `CuePlayer`; these types
//! bind those seams to the live roster and the gateway connection.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use pomobot_common::{ChannelId, MemberId, RosterError};
use pomobot_session::{CueError, CuePlayer, PresenceRoster};

use crate::client::GatewayClient;
use crate::roster::VoiceRoster;

/// `PresenceRoster` view of one voice channel.
pub struct ChannelRoster {
    roster: VoiceRoster,
    client: GatewayClient,
    channel: ChannelId,
}

impl ChannelRoster {
    pub fn new(roster: VoiceRoster, client: GatewayClient, channel: ChannelId) -> Self {
        Self {
            roster,
            client,
            channel,
        }
    }
}

#[async_trait]
impl PresenceRoster for ChannelRoster {
    async fn members_present(&self) -> HashSet<MemberId> {
        self.roster.members_of(&self.channel).await
    }

    async fn set_muted(&self, member: &MemberId, muted: bool) -> Result<(), RosterError> {
        // A mute command only reaches members connected to voice;
        // anyone else is gone as far as the engine is concerned.
        if !self.roster.in_any_channel(member).await {
            return Err(RosterError::Absent(member.to_string()));
        }
        self.client
            .set_mute(member, muted)
            .await
            .map_err(|e| RosterError::Transport(e.to_string()))
    }
}

/// `CuePlayer` that plays named cues into one voice channel through the
/// gateway and waits for the platform's completion signal.
pub struct GatewayCues {
    client: GatewayClient,
    channel: ChannelId,
    timeout: Duration,
}

impl GatewayCues {
    pub fn new(client: GatewayClient, channel: ChannelId, timeout: Duration) -> Self {
        Self {
            client,
            channel,
            timeout,
        }
    }
}

#[async_trait]
impl CuePlayer for GatewayCues {
    async fn play(&self, cue: &str) -> Result<(), CueError> {
        let done = self
            .client
            .play_cue(&self.channel, cue, self.timeout)
            .await
            .map_err(|e| CueError::Transport(e.to_string()))?;

        if done.ok {
            Ok(())
        } else {
            Err(CueError::Playback(
                done.error.unwrap_or_else(|| "unspecified".to_string()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::GatewayConfig;
    use crate::protocol::VoiceStatePayload;

    fn disconnected_client() -> GatewayClient {
        let (client, _events) = GatewayClient::connect(GatewayConfig {
            url: "ws://127.0.0.1:9".to_string(),
            token: "test-token".to_string(),
            ..GatewayConfig::default()
        });
        client
    }

    #[tokio::test]
    async fn absent_member_is_reported_before_any_send() {
        let roster = VoiceRoster::new();
        let adapter = ChannelRoster::new(roster, disconnected_client(), ChannelId::from("focus"));

        let err = adapter
            .set_muted(&MemberId::from("ghost"), true)
            .await
            .unwrap_err();
        assert!(matches!(err, RosterError::Absent(_)));
    }

    #[tokio::test]
    async fn transport_failure_surfaces_for_present_members() {
        let roster = VoiceRoster::new();
        roster
            .apply(&VoiceStatePayload {
                member: MemberId::from("alice"),
                display_name: "alice".to_string(),
                bot: false,
                old_channel: None,
                new_channel: Some(ChannelId::from("focus")),
                new_channel_name: Some("focus".to_string()),
            })
            .await;
        let adapter = ChannelRoster::new(roster, disconnected_client(), ChannelId::from("focus"));

        let err = adapter
            .set_muted(&MemberId::from("alice"), true)
            .await
            .unwrap_err();
        assert!(matches!(err, RosterError::Transport(_)));
    }

    #[tokio::test]
    async fn members_present_is_scoped_to_the_channel() {
        let roster = VoiceRoster::new();
        for (member, channel) in [("alice", "focus"), ("bob", "lounge")] {
            roster
                .apply(&VoiceStatePayload {
                    member: MemberId::from(member),
                    display_name: member.to_string(),
                    bot: false,
                    old_channel: None,
                    new_channel: Some(ChannelId::from(channel)),
                    new_channel_name: Some(channel.to_string()),
                })
                .await;
        }
        let adapter = ChannelRoster::new(roster, disconnected_client(), ChannelId::from("focus"));

        let present = adapter.members_present().await;
        assert!(present.contains(&MemberId::from("alice")));
        assert!(!present.contains(&MemberId::from("bob")));
    }
}
