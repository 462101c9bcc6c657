//! Chat command dispatch.
//!
//! The facade routes each incoming message to one service by command
//! prefix, the same way the services themselves route subcommands.
//! Messages authored by bots are dropped before any routing.

pub mod memo;
pub mod mention;
pub mod pomodoro;
pub mod wiki;

pub use memo::MemoService;
pub use mention::MentionService;
pub use pomodoro::PomodoroService;
pub use wiki::WikiService;

use pomobot_common::{ChannelId, MemberId};
use pomobot_gateway::{GatewayClient, MessagePayload};
use tracing::warn;

pub struct CommandsFacade {
    pomodoro: PomodoroService,
    memo: MemoService,
    wiki: WikiService,
    mention: MentionService,
}

impl CommandsFacade {
    pub fn new(
        pomodoro: PomodoroService,
        memo: MemoService,
        wiki: WikiService,
        mention: MentionService,
    ) -> Self {
        Self {
            pomodoro,
            memo,
            wiki,
            mention,
        }
    }

    /// Route one message. `self_id` is the bot's own member id once the
    /// gateway has sent `ready`.
    pub async fn dispatch(&self, msg: &MessagePayload, self_id: Option<&MemberId>) {
        if msg.author.bot {
            return;
        }

        let content = msg.content.as_str();
        if content.starts_with("!pomodoro") {
            self.pomodoro.handle(msg).await;
        } else if content.starts_with("!memo") {
            self.memo.handle(msg).await;
        } else if content.starts_with("!wiki") {
            self.wiki.handle(msg).await;
        } else if let Some(me) = self_id {
            if msg.mentions.contains(me) {
                self.mention.reply_to(msg).await;
            }
        }
    }
}

/// Everything after the leading `!command.sub` token, trimmed. Values
/// may span lines, so only the command token is removed.
pub(crate) fn strip_command(content: &str) -> &str {
    match content.find(char::is_whitespace) {
        Some(idx) => content[idx..].trim(),
        None => "",
    }
}

/// Post a reply, logging instead of failing the handler on transport
/// trouble.
pub(crate) async fn reply(client: &GatewayClient, channel: &ChannelId, text: &str) {
    if let Err(e) = client.send_message(channel, text).await {
        warn!(channel = %channel, error = %e, "failed to send reply");
    }
}
