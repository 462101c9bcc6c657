//! Voice-channel start notices.
//!
//! When a member lands in a voice channel as its first occupant, post a
//! notice to the configured text channel so others can join in.

use pomobot_common::ChannelId;
use pomobot_gateway::{GatewayClient, VoiceStatePayload};
use tracing::warn;

pub struct NotifyService {
    client: GatewayClient,
    notify_channel: ChannelId,
}

impl NotifyService {
    pub fn new(client: GatewayClient, notify_channel: ChannelId) -> Self {
        Self {
            client,
            notify_channel,
        }
    }

    /// Inspect one voice-state transition. `joined_count` is the
    /// occupancy of the joined channel after the move, as reported by
    /// the roster.
    pub async fn on_voice_state(&self, update: &VoiceStatePayload, joined_count: Option<usize>) {
        if self.notify_channel.is_empty() || !is_first_occupant(update, joined_count) {
            return;
        }

        let text = render_notice(update);
        if let Err(e) = self.client.send_message(&self.notify_channel, &text).await {
            warn!(error = %e, "failed to send voice-channel notice");
        }
    }
}

/// A non-bot member coming from no voice channel into a channel they
/// now occupy alone.
fn is_first_occupant(update: &VoiceStatePayload, joined_count: Option<usize>) -> bool {
    !update.bot
        && update.old_channel.is_none()
        && update.new_channel.is_some()
        && joined_count == Some(1)
}

fn render_notice(update: &VoiceStatePayload) -> String {
    let channel = update
        .new_channel_name
        .clone()
        .or_else(|| update.new_channel.as_ref().map(|c| c.to_string()))
        .unwrap_or_default();
    format!(
        ":loudspeaker: **{}** started a voice chat in **{}**",
        update.display_name, channel
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pomobot_common::MemberId;

    fn update(old_channel: Option<&str>, new_channel: Option<&str>, bot: bool) -> VoiceStatePayload {
        VoiceStatePayload {
            member: MemberId::from("m1"),
            display_name: "Alice".to_string(),
            bot,
            old_channel: old_channel.map(ChannelId::from),
            new_channel: new_channel.map(ChannelId::from),
            new_channel_name: new_channel.map(|_| "Focus Room".to_string()),
        }
    }

    #[test]
    fn first_occupant_from_nowhere_triggers() {
        assert!(is_first_occupant(&update(None, Some("focus"), false), Some(1)));
    }

    #[test]
    fn second_occupant_does_not_trigger() {
        assert!(!is_first_occupant(
            &update(None, Some("focus"), false),
            Some(2)
        ));
    }

    #[test]
    fn channel_hops_do_not_trigger() {
        assert!(!is_first_occupant(
            &update(Some("lounge"), Some("focus"), false),
            Some(1)
        ));
    }

    #[test]
    fn bots_do_not_trigger() {
        assert!(!is_first_occupant(&update(None, Some("focus"), true), Some(1)));
    }

    #[test]
    fn notice_names_member_and_channel() {
        let text = render_notice(&update(None, Some("focus"), false));
        assert_eq!(
            text,
            ":loudspeaker: **Alice** started a voice chat in **Focus Room**"
        );
    }
}
