//! Wiring and the gateway event loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use pomobot_common::{ChannelId, MemberId};
use pomobot_config::BotConfig;
use pomobot_gateway::{
    ChannelRoster, GatewayClient, GatewayConfig, GatewayCues, GatewayEvent, VoiceRoster,
};
use pomobot_session::{EngineConfig, JsonStartedAtStore, SessionClock, SessionEngine};
use tracing::{info, warn};

use crate::commands::{CommandsFacade, MemoService, MentionService, PomodoroService, WikiService};
use crate::keepalive;
use crate::notify::NotifyService;
use crate::store::MemoStore;

/// Build every component from config and run until the gateway event
/// stream ends.
pub async fn run(config: BotConfig) -> pomobot_common::Result<()> {
    let (client, mut events) = GatewayClient::connect(GatewayConfig {
        url: config.gateway.url.clone(),
        token: config.bot.token.clone(),
        heartbeat_interval_secs: config.gateway.heartbeat_interval_secs,
        reconnect_delay_secs: config.gateway.reconnect_delay_secs,
        max_reconnect_delay_secs: config.gateway.max_reconnect_delay_secs,
    });

    let voice_channel = ChannelId::new(config.channels.pomodoro_voice.clone());
    let roster = VoiceRoster::new();
    let channel_roster = Arc::new(ChannelRoster::new(
        roster.clone(),
        client.clone(),
        voice_channel.clone(),
    ));
    let cues = Arc::new(GatewayCues::new(
        client.clone(),
        voice_channel.clone(),
        Duration::from_secs(config.session.cue_timeout_secs),
    ));
    let session_store = Arc::new(JsonStartedAtStore::new(session_store_path(&config)));

    let engine = SessionEngine::new(
        EngineConfig {
            channel: voice_channel,
            cycle_minutes: config.session.cycle_minutes,
            work_minutes: config.session.work_minutes,
            work_cue: config.session.work_cue.clone(),
            rest_cue: config.session.rest_cue.clone(),
        },
        channel_roster,
        cues,
        session_store,
        SessionClock::minutely(),
    );

    if let Some(status) = engine.resume_persisted().await {
        info!(
            phase = ?status.phase,
            cycle = status.cycle_count,
            "resumed session from a previous run"
        );
    }

    let memo_store = Arc::new(MemoStore::open(memo_store_path(&config))?);
    let facade = CommandsFacade::new(
        PomodoroService::new(
            engine.clone(),
            client.clone(),
            config.channels.pomodoro_voice.clone(),
        ),
        MemoService::new(memo_store, client.clone()),
        WikiService::new(
            reqwest::Client::new(),
            config.wiki.api_host.clone(),
            client.clone(),
        ),
        MentionService::new(client.clone(), "README.md"),
    );
    let notify = NotifyService::new(
        client.clone(),
        ChannelId::new(config.channels.notify_text.clone()),
    );

    if config.keepalive.enabled {
        let port = config.keepalive.port;
        tokio::spawn(async move {
            if let Err(e) = keepalive::serve(port).await {
                warn!(error = %e, "keep-alive listener stopped");
            }
        });
    }

    let presence_name = config.bot.presence_name.clone();
    let mut self_id: Option<MemberId> = None;

    info!("pomobot up, waiting for gateway events");
    while let Some(event) = events.recv().await {
        match event {
            GatewayEvent::Ready(ready) => {
                info!(session = %ready.session_id, "gateway ready");
                self_id = Some(ready.member);
                if let Err(e) = client.set_presence(&presence_name).await {
                    warn!(error = %e, "failed to set presence");
                }
                // Voice occupancy is replayed after ready; the engine's
                // presence handler reconciles each member's mute flag
                // as those events arrive.
            }
            GatewayEvent::Message(msg) => {
                facade.dispatch(&msg, self_id.as_ref()).await;
            }
            GatewayEvent::VoiceState(update) => {
                // Roster first, so mute commands issued by the engine
                // see the post-move membership.
                let joined_count = roster.apply(&update).await;
                notify.on_voice_state(&update, joined_count).await;
                engine
                    .on_presence_change(
                        &update.member,
                        update.old_channel.as_ref(),
                        update.new_channel.as_ref(),
                        update.bot,
                    )
                    .await;
            }
            // Consumed inside the gateway client; nothing to do here.
            GatewayEvent::PlaybackFinished(_) | GatewayEvent::Pong => {}
        }
    }

    info!("gateway event stream closed, shutting down");
    Ok(())
}

fn data_dir(config: &BotConfig) -> PathBuf {
    if !config.session.data_dir.is_empty() {
        return PathBuf::from(&config.session.data_dir);
    }
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pomobot")
}

fn session_store_path(config: &BotConfig) -> PathBuf {
    data_dir(config).join("session.json")
}

fn memo_store_path(config: &BotConfig) -> PathBuf {
    if !config.memo.data_path.is_empty() {
        return PathBuf::from(&config.memo.data_path);
    }
    data_dir(config).join("memos.json")
}
