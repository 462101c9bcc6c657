//! The session engine: phase transitions, tick handling, and
//! presence-synchronized muting.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use pomobot_common::{ChannelId, MemberId, RosterError};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::clock::{SessionClock, TickSubscription};
use crate::persist::StartedAtStore;
use crate::state::{
    cycle_count, elapsed_in_cycle, elapsed_minutes, phase_at, truncate_to_minute, Phase,
    SessionState, Status,
};
use crate::traits::{CuePlayer, PresenceRoster};

/// Engine parameters, mapped from the `[session]` and `[channels]`
/// config sections by the caller.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// The voice channel whose occupants the session manages.
    pub channel: ChannelId,
    pub cycle_minutes: u32,
    pub work_minutes: u32,
    pub work_cue: String,
    pub rest_cue: String,
}

enum Entry {
    Work,
    Rest,
}

/// Owns the session record and drives the roster and cue player.
///
/// All state mutations and mute commands happen while holding the one
/// state lock, so tick handlers, presence handlers, and `stop` are
/// serialized against each other. The lock is never held across cue
/// playback; after a cue finishes, mute intent is re-derived from the
/// phase and roster as they are at that moment.
pub struct SessionEngine<R, C> {
    config: EngineConfig,
    clock: SessionClock,
    roster: Arc<R>,
    cues: Arc<C>,
    store: Arc<dyn StartedAtStore>,
    state: Arc<Mutex<SessionState>>,
    ticker: Arc<Mutex<Option<TickSubscription>>>,
}

impl<R, C> Clone for SessionEngine<R, C> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            clock: self.clock.clone(),
            roster: Arc::clone(&self.roster),
            cues: Arc::clone(&self.cues),
            store: Arc::clone(&self.store),
            state: Arc::clone(&self.state),
            ticker: Arc::clone(&self.ticker),
        }
    }
}

impl<R, C> SessionEngine<R, C>
where
    R: PresenceRoster + 'static,
    C: CuePlayer + 'static,
{
    pub fn new(
        config: EngineConfig,
        roster: Arc<R>,
        cues: Arc<C>,
        store: Arc<dyn StartedAtStore>,
        clock: SessionClock,
    ) -> Self {
        Self {
            config,
            clock,
            roster,
            cues,
            store,
            state: Arc::new(Mutex::new(SessionState::default())),
            ticker: Arc::new(Mutex::new(None)),
        }
    }

    /// The voice channel this engine manages.
    pub fn channel(&self) -> &ChannelId {
        &self.config.channel
    }

    /// Begin a session. A session already running is reset.
    ///
    /// The work-entry procedure (unmute, work cue, mute) completes
    /// before this returns, so callers can announce a fully set-up
    /// session.
    pub async fn start(&self) -> Status {
        let started_at = truncate_to_minute(Utc::now());
        {
            let mut state = self.state.lock().await;
            *state = SessionState {
                phase: Phase::Working,
                started_at: Some(started_at),
                last_cycle: 1,
            };
        }
        if let Err(e) = self.store.save(Some(started_at)) {
            warn!(error = %e, "failed to persist session start");
        }
        info!(channel = %self.config.channel, %started_at, "session started");

        self.subscribe_ticker().await;
        self.work_entry().await;
        self.status().await
    }

    /// End the session and leave every present member unmuted.
    /// Idempotent.
    pub async fn stop(&self) {
        if let Some(sub) = self.ticker.lock().await.take() {
            sub.cancel();
        }

        let mut state = self.state.lock().await;
        *state = SessionState::default();
        if let Err(e) = self.store.save(None) {
            warn!(error = %e, "failed to clear persisted session");
        }
        info!(channel = %self.config.channel, "session stopped");

        // Unmute everyone still present, including members who joined
        // since the last tick. Holding the state lock here keeps this
        // ordered after any in-progress entry procedure's mute step.
        self.set_mute_all(false).await;
    }

    /// Resume a previously persisted session, if any.
    ///
    /// Phase and cycle are re-derived from the stored timestamp; the
    /// roster is reconciled with the derived phase but no cue is
    /// replayed.
    pub async fn resume_persisted(&self) -> Option<Status> {
        let started_at = match self.store.load() {
            Ok(found) => found?,
            Err(e) => {
                warn!(error = %e, "failed to load persisted session");
                return None;
            }
        };

        let now = Utc::now();
        let elapsed = elapsed_minutes(now, started_at);
        let cycle = cycle_count(elapsed, self.config.cycle_minutes);
        let in_cycle = elapsed_in_cycle(elapsed, self.config.cycle_minutes);
        let phase = phase_at(in_cycle, self.config.work_minutes);

        {
            let mut state = self.state.lock().await;
            *state = SessionState {
                phase,
                started_at: Some(started_at),
                last_cycle: cycle,
            };
            info!(%started_at, ?phase, cycle, "resumed persisted session");
            self.set_mute_all(phase.requires_mute()).await;
        }

        self.subscribe_ticker().await;
        Some(self.status().await)
    }

    /// Handle one clock tick. Purely derived from the start timestamp,
    /// so late, repeated, or skipped ticks cannot accumulate drift.
    pub async fn on_tick(&self, now: DateTime<Utc>) {
        let entry = {
            let mut state = self.state.lock().await;
            let Some(started_at) = state.started_at else {
                return;
            };

            let elapsed = elapsed_minutes(now, started_at);
            let cycle = cycle_count(elapsed, self.config.cycle_minutes);
            let in_cycle = elapsed_in_cycle(elapsed, self.config.cycle_minutes);
            let previous_cycle = state.last_cycle;
            state.last_cycle = cycle;
            debug!(elapsed, cycle, in_cycle, "tick");

            if in_cycle == 0 && cycle > previous_cycle {
                Some(Entry::Work)
            } else if in_cycle == self.config.work_minutes && state.phase != Phase::Resting {
                Some(Entry::Rest)
            } else {
                None
            }
        };

        match entry {
            Some(Entry::Work) => self.work_entry().await,
            Some(Entry::Rest) => self.rest_entry().await,
            None => {}
        }
    }

    /// React to a member moving between voice channels.
    ///
    /// Latecomers are muted or unmuted according to the current phase
    /// without waiting for the next tick; members leaving the managed
    /// channel are always unmuted so they do not stay muted elsewhere.
    pub async fn on_presence_change(
        &self,
        member: &MemberId,
        old_channel: Option<&ChannelId>,
        new_channel: Option<&ChannelId>,
        is_bot: bool,
    ) {
        if is_bot {
            return;
        }

        let designated = &self.config.channel;
        let was_in = old_channel == Some(designated);
        let now_in = new_channel == Some(designated);

        if now_in && !was_in {
            let state = self.state.lock().await;
            let muted = state.phase.requires_mute();
            debug!(member = %member, muted, "member entered the session channel");
            self.apply_mute(member, muted).await;
        } else if was_in && !now_in {
            debug!(member = %member, "member left the session channel");
            self.apply_mute(member, false).await;
        }
    }

    /// Current status. Pure read; zeroed while stopped.
    pub async fn status(&self) -> Status {
        self.status_at(Utc::now()).await
    }

    /// Status as it would be reported at `now`.
    pub async fn status_at(&self, now: DateTime<Utc>) -> Status {
        let state = self.state.lock().await;
        let Some(started_at) = state.started_at else {
            return Status::stopped();
        };

        let elapsed = elapsed_minutes(now, started_at);
        Status {
            phase: state.phase,
            started_at: Some(started_at),
            cycle_count: cycle_count(elapsed, self.config.cycle_minutes),
            elapsed_in_cycle: elapsed_in_cycle(elapsed, self.config.cycle_minutes),
        }
    }

    async fn subscribe_ticker(&self) {
        let engine = self.clone();
        let sub = self.clock.subscribe(move |now| {
            let engine = engine.clone();
            async move { engine.on_tick(now).await }
        });
        // Replacing an existing subscription aborts it on drop.
        *self.ticker.lock().await = Some(sub);
    }

    /// Work entry: everyone audible for the cue, then muted for the
    /// work interval.
    async fn work_entry(&self) {
        {
            let mut state = self.state.lock().await;
            if state.phase == Phase::Stopped {
                return;
            }
            state.phase = Phase::Working;
            self.set_mute_all(false).await;
        }

        if let Err(e) = self.cues.play(&self.config.work_cue).await {
            warn!(cue = %self.config.work_cue, error = %e, "work cue did not finish cleanly");
        }

        // Playback is over; re-derive intent from the phase and roster
        // of this moment. A stop() or restart during playback already
        // issued its own mute commands.
        let state = self.state.lock().await;
        if state.phase != Phase::Working {
            return;
        }
        self.set_mute_all(true).await;
    }

    /// Rest entry: everyone unmuted, rest cue played. Nothing is gated
    /// on the cue finishing; the channel stays unmuted until the next
    /// work entry.
    async fn rest_entry(&self) {
        {
            let mut state = self.state.lock().await;
            if state.phase == Phase::Stopped {
                return;
            }
            state.phase = Phase::Resting;
            self.set_mute_all(false).await;
        }

        if let Err(e) = self.cues.play(&self.config.rest_cue).await {
            warn!(cue = %self.config.rest_cue, error = %e, "rest cue did not finish cleanly");
        }
    }

    /// Apply one mute flag to every member currently present.
    async fn set_mute_all(&self, muted: bool) {
        for member in self.roster.members_present().await {
            self.apply_mute(&member, muted).await;
        }
    }

    /// Issue one mute command, treating an absent member as done.
    async fn apply_mute(&self, member: &MemberId, muted: bool) {
        match self.roster.set_muted(member, muted).await {
            Ok(()) => {}
            Err(RosterError::Absent(_)) => {}
            Err(e) => warn!(member = %member, muted, error = %e, "mute command failed"),
        }
    }
}
