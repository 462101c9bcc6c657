//! WebSocket gateway client.
//!
//! Maintains one connection to the platform gateway with heartbeats and
//! auto-reconnect with backoff. Commands are fire-and-forget through an
//! mpsc channel; cue playback is the exception and is correlated with
//! its completion event through a oneshot registered per `ref`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use pomobot_common::{new_correlation_id, ChannelId, GatewayError, MemberId};
use tokio::sync::{mpsc, oneshot, Mutex, RwLock};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, error, info, warn};

use crate::protocol::{GatewayCommand, GatewayEvent, PlaybackFinishedPayload};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for connecting to the platform gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// WebSocket URL of the gateway.
    pub url: String,
    /// Login token, sent in the `identify` command.
    pub token: String,
    /// Heartbeat interval in seconds.
    pub heartbeat_interval_secs: u64,
    /// Reconnect base delay in seconds.
    pub reconnect_delay_secs: u64,
    /// Maximum reconnect delay in seconds.
    pub max_reconnect_delay_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            token: String::new(),
            heartbeat_interval_secs: 25,
            reconnect_delay_secs: 1,
            max_reconnect_delay_secs: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

#[derive(Debug)]
enum ClientCommand {
    Send(GatewayCommand),
    Disconnect,
}

type PendingCues = Arc<Mutex<HashMap<String, oneshot::Sender<PlaybackFinishedPayload>>>>;

/// Handle for interacting with the gateway connection.
///
/// Cheap to clone; all clones talk to the same background connection
/// task.
#[derive(Clone)]
pub struct GatewayClient {
    command_tx: mpsc::Sender<ClientCommand>,
    connected: Arc<RwLock<bool>>,
    pending_cues: PendingCues,
}

impl GatewayClient {
    /// Create a client and start the background connection.
    /// Returns `(client, event_receiver)`.
    pub fn connect(config: GatewayConfig) -> (Self, mpsc::Receiver<GatewayEvent>) {
        let (event_tx, event_rx) = mpsc::channel(256);
        let (command_tx, command_rx) = mpsc::channel(64);
        let connected = Arc::new(RwLock::new(false));
        let pending_cues: PendingCues = Arc::new(Mutex::new(HashMap::new()));

        let client = Self {
            command_tx,
            connected: Arc::clone(&connected),
            pending_cues: Arc::clone(&pending_cues),
        };

        tokio::spawn(connection_loop(
            config,
            connected,
            pending_cues,
            event_tx,
            command_rx,
        ));

        (client, event_rx)
    }

    /// Check if connected.
    pub async fn is_connected(&self) -> bool {
        *self.connected.read().await
    }

    /// Post a chat message to a text channel.
    pub async fn send_message(
        &self,
        channel: &ChannelId,
        content: &str,
    ) -> Result<(), GatewayError> {
        self.send(GatewayCommand::SendMessage {
            channel: channel.clone(),
            content: content.to_string(),
        })
        .await
    }

    /// Set or clear the server-side mute flag on a member.
    pub async fn set_mute(&self, member: &MemberId, mute: bool) -> Result<(), GatewayError> {
        self.send(GatewayCommand::SetMute {
            member: member.clone(),
            mute,
        })
        .await
    }

    /// Update the bot's displayed presence name.
    pub async fn set_presence(&self, name: &str) -> Result<(), GatewayError> {
        self.send(GatewayCommand::SetPresence {
            name: name.to_string(),
        })
        .await
    }

    /// Play a named cue into a voice channel and wait for its
    /// completion signal, up to `timeout`.
    pub async fn play_cue(
        &self,
        channel: &ChannelId,
        cue: &str,
        timeout: Duration,
    ) -> Result<PlaybackFinishedPayload, GatewayError> {
        let correlation = new_correlation_id();
        let (tx, rx) = oneshot::channel();
        self.pending_cues
            .lock()
            .await
            .insert(correlation.clone(), tx);

        let sent = self
            .send(GatewayCommand::PlayCue {
                channel: channel.clone(),
                cue: cue.to_string(),
                correlation: correlation.clone(),
            })
            .await;
        if let Err(e) = sent {
            self.pending_cues.lock().await.remove(&correlation);
            return Err(e);
        }

        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(done)) => Ok(done),
            Ok(Err(_)) => Err(GatewayError::Transport(
                "connection dropped during playback".into(),
            )),
            Err(_) => {
                self.pending_cues.lock().await.remove(&correlation);
                Err(GatewayError::Transport(format!(
                    "no completion signal within {}s",
                    timeout.as_secs()
                )))
            }
        }
    }

    /// Close the connection for good.
    pub async fn disconnect(&self) {
        let _ = self.command_tx.send(ClientCommand::Disconnect).await;
    }

    async fn send(&self, command: GatewayCommand) -> Result<(), GatewayError> {
        if !self.is_connected().await {
            return Err(GatewayError::NotConnected);
        }
        self.command_tx
            .send(ClientCommand::Send(command))
            .await
            .map_err(|_| GatewayError::Transport("command channel closed".into()))
    }
}

// ---------------------------------------------------------------------------
// Connection loop
// ---------------------------------------------------------------------------

/// Background task managing the WebSocket connection with auto-reconnect.
async fn connection_loop(
    config: GatewayConfig,
    connected: Arc<RwLock<bool>>,
    pending_cues: PendingCues,
    event_tx: mpsc::Sender<GatewayEvent>,
    command_rx: mpsc::Receiver<ClientCommand>,
) {
    let command_rx = Arc::new(Mutex::new(command_rx));
    let shutdown = Arc::new(AtomicBool::new(false));
    let mut reconnect_delay = config.reconnect_delay_secs;

    loop {
        info!(url = %config.url, "Connecting to gateway");

        match tokio_tungstenite::connect_async(&config.url).await {
            Ok((ws_stream, _)) => {
                reconnect_delay = config.reconnect_delay_secs;
                *connected.write().await = true;

                let (ws_write, mut ws_read) = ws_stream.split();
                let ws_write = Arc::new(Mutex::new(ws_write));

                // Identify first so the platform accepts the session.
                send_frame(
                    &ws_write,
                    &GatewayCommand::Identify {
                        token: config.token.clone(),
                    },
                )
                .await;

                // Spawn heartbeat task.
                let heartbeat_write = Arc::clone(&ws_write);
                let heartbeat_interval = config.heartbeat_interval_secs;
                let heartbeat_handle = tokio::spawn(async move {
                    let mut interval =
                        tokio::time::interval(Duration::from_secs(heartbeat_interval));
                    interval.tick().await;
                    loop {
                        interval.tick().await;
                        if !send_frame(&heartbeat_write, &GatewayCommand::Heartbeat).await {
                            break;
                        }
                    }
                });

                // Spawn command forwarder.
                let cmd_write = Arc::clone(&ws_write);
                let cmd_rx = Arc::clone(&command_rx);
                let cmd_shutdown = Arc::clone(&shutdown);
                let cmd_handle = tokio::spawn(async move {
                    let mut rx = cmd_rx.lock().await;
                    while let Some(cmd) = rx.recv().await {
                        match cmd {
                            ClientCommand::Send(command) => {
                                if !send_frame(&cmd_write, &command).await {
                                    break;
                                }
                            }
                            ClientCommand::Disconnect => {
                                cmd_shutdown.store(true, Ordering::SeqCst);
                                let mut writer = cmd_write.lock().await;
                                let _ = writer.send(WsMessage::Close(None)).await;
                                return;
                            }
                        }
                    }
                });

                // Process incoming frames.
                while let Some(msg_result) = ws_read.next().await {
                    match msg_result {
                        Ok(WsMessage::Text(text)) => {
                            match serde_json::from_str::<GatewayEvent>(&text) {
                                Ok(event) => {
                                    dispatch_event(event, &pending_cues, &event_tx).await;
                                }
                                Err(_) => {
                                    debug!(text = %text, "Unrecognized frame from gateway");
                                }
                            }
                        }
                        Ok(WsMessage::Close(_)) => {
                            info!("Gateway closed connection");
                            break;
                        }
                        Err(e) => {
                            warn!(error = %e, "WebSocket error");
                            break;
                        }
                        _ => {}
                    }
                }

                // Cleanup.
                heartbeat_handle.abort();
                cmd_handle.abort();
                *connected.write().await = false;
                fail_pending(&pending_cues).await;
            }
            Err(e) => {
                error!(error = %e, "Failed to connect to gateway");
            }
        }

        if shutdown.load(Ordering::SeqCst) {
            info!("Gateway client shut down");
            return;
        }

        // Exponential backoff reconnect.
        info!(delay = reconnect_delay, "Reconnecting after delay");
        tokio::time::sleep(Duration::from_secs(reconnect_delay)).await;
        reconnect_delay = (reconnect_delay * 2).min(config.max_reconnect_delay_secs);
    }
}

/// Serialize and send one frame. Returns false when the socket is gone.
async fn send_frame<S>(ws_write: &Arc<Mutex<S>>, command: &GatewayCommand) -> bool
where
    S: futures_util::Sink<WsMessage> + Unpin + Send,
{
    match serde_json::to_string(command) {
        Ok(json) => {
            let mut writer = ws_write.lock().await;
            writer.send(WsMessage::Text(json.into())).await.is_ok()
        }
        Err(e) => {
            error!(error = %e, "Failed to serialize gateway command");
            true
        }
    }
}

/// Route one inbound event: cue completions resolve their pending
/// oneshot, everything else goes to the application.
async fn dispatch_event(
    event: GatewayEvent,
    pending_cues: &PendingCues,
    event_tx: &mpsc::Sender<GatewayEvent>,
) {
    match event {
        GatewayEvent::PlaybackFinished(done) => {
            match pending_cues.lock().await.remove(&done.correlation) {
                Some(tx) => {
                    let _ = tx.send(done);
                }
                None => {
                    debug!(correlation = %done.correlation, "completion for unknown cue");
                }
            }
        }
        GatewayEvent::Pong => {}
        other => {
            let _ = event_tx.send(other).await;
        }
    }
}

/// Drop every pending cue waiter so callers see the connection loss
/// instead of hanging until their timeout.
async fn fail_pending(pending_cues: &PendingCues) {
    pending_cues.lock().await.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_config() -> GatewayConfig {
        GatewayConfig {
            url: "ws://127.0.0.1:9".to_string(),
            token: "test-token".to_string(),
            ..GatewayConfig::default()
        }
    }

    #[tokio::test]
    async fn commands_fail_fast_while_disconnected() {
        let (client, _events) = GatewayClient::connect(unreachable_config());
        let err = client
            .set_mute(&MemberId::from("m1"), true)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::NotConnected));
    }

    #[tokio::test]
    async fn play_cue_while_disconnected_cleans_up_pending() {
        let (client, _events) = GatewayClient::connect(unreachable_config());
        let result = client
            .play_cue(
                &ChannelId::from("focus-voice"),
                "begin-work",
                Duration::from_millis(50),
            )
            .await;
        assert!(result.is_err());
        assert!(client.pending_cues.lock().await.is_empty());
    }

    #[test]
    fn default_config_backoff_bounds() {
        let config = GatewayConfig::default();
        assert!(config.reconnect_delay_secs <= config.max_reconnect_delay_secs);
        assert_eq!(config.heartbeat_interval_secs, 25);
    }
}
