//! The `!pomodoro` command family.

use pomobot_gateway::{ChannelRoster, GatewayClient, GatewayCues, MessagePayload};
use pomobot_session::{Phase, SessionEngine, Status};

use crate::text::help_list;

use super::reply;

/// Drives the session engine from chat and renders its status back.
pub struct PomodoroService {
    engine: SessionEngine<ChannelRoster, GatewayCues>,
    client: GatewayClient,
    /// Display label of the managed voice channel, used in the start
    /// announcement.
    channel_label: String,
}

impl PomodoroService {
    pub fn new(
        engine: SessionEngine<ChannelRoster, GatewayCues>,
        client: GatewayClient,
        channel_label: String,
    ) -> Self {
        Self {
            engine,
            client,
            channel_label,
        }
    }

    pub async fn handle(&self, msg: &MessagePayload) {
        let content = msg.content.as_str();
        if content.starts_with("!pomodoro.start") {
            self.start(msg).await;
        } else if content.starts_with("!pomodoro.stop") {
            self.stop(msg).await;
        } else if content.starts_with("!pomodoro.status") {
            self.status(msg).await;
        } else if content.starts_with("!pomodoro.help") || content.trim() == "!pomodoro" {
            self.help(msg).await;
        }
    }

    async fn start(&self, msg: &MessagePayload) {
        self.engine.start().await;
        let text = format!(
            "Pomodoro started :timer: Join **:loudspeaker:{}** and get to work :fire:",
            self.channel_label
        );
        reply(&self.client, &msg.channel, &text).await;
    }

    async fn stop(&self, msg: &MessagePayload) {
        self.engine.stop().await;
        reply(
            &self.client,
            &msg.channel,
            "Pomodoro finished :timer: Well done :island:",
        )
        .await;
    }

    async fn status(&self, msg: &MessagePayload) {
        let status = self.engine.status().await;
        reply(&self.client, &msg.channel, &render_status(&status)).await;
    }

    async fn help(&self, msg: &MessagePayload) {
        reply(&self.client, &msg.channel, &help_text()).await;
    }
}

/// Render a status snapshot as chat markdown.
pub fn render_status(status: &Status) -> String {
    let started = match status.started_at {
        Some(at) => format!("{} :timer:", at.format("%Y-%m-%d %H:%M UTC")),
        None => "stopped :sleeping:".to_string(),
    };
    let state = match status.phase {
        Phase::Working => "working :fire:",
        Phase::Resting => "resting :island:",
        Phase::Stopped => "stopped :sleeping:",
    };
    format!(
        "**Timer started:** _{started}_\n\
         **Pomodoro:** _cycle {}, {} min elapsed_\n\
         **State:** _{state}_",
        status.cycle_count, status.elapsed_in_cycle
    )
}

fn help_text() -> String {
    help_list(
        "The `!pomodoro` command runs a **pomodoro timer** in the voice channel.\n\
         Join the pomodoro voice channel, then use the commands below.",
        &[
            ("!pomodoro.start", "starts (or resets) the pomodoro timer"),
            ("!pomodoro.stop", "stops the pomodoro timer"),
            ("!pomodoro.status", "shows the current pomodoro status"),
            (
                "!pomodoro.help",
                "shows this help (alias: `!pomodoro`)",
            ),
        ],
    )
}
