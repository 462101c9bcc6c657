//! Seams between the engine and the voice platform.
//!
//! The engine only ever sees these two traits; the gateway crate
//! provides the real implementations and tests substitute fakes.

use std::collections::HashSet;

use async_trait::async_trait;
use pomobot_common::{MemberId, RosterError};

/// Read-only view of the managed voice channel plus per-member mute
/// control.
#[async_trait]
pub trait PresenceRoster: Send + Sync {
    /// Members currently in the managed voice channel. Recomputed on
    /// every call; never cached by the engine.
    async fn members_present(&self) -> HashSet<MemberId>;

    /// Set or clear a member's mute flag.
    ///
    /// `RosterError::Absent` means the member is gone and must be
    /// treated as success-equivalent by callers. Transport failures are
    /// logged and left to heal on the next tick or presence event.
    async fn set_muted(&self, member: &MemberId, muted: bool) -> Result<(), RosterError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CueError {
    #[error("cue transport error: {0}")]
    Transport(String),

    #[error("cue playback failed: {0}")]
    Playback(String),
}

/// Plays a named audio cue into the voice channel.
#[async_trait]
pub trait CuePlayer: Send + Sync {
    /// Resolve when playback ends. An error resolves the same way for
    /// sequencing purposes; callers log it and carry on.
    async fn play(&self, cue: &str) -> Result<(), CueError>;
}
