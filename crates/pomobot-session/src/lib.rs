//! Session timer core: a work/rest state machine synchronized with the
//! live occupancy of a voice channel.
//!
//! The engine owns all session state behind one lock, reacts to clock
//! ticks and presence changes, and keeps every member's mute flag
//! consistent with the current phase. Mute intent is always re-derived
//! from current phase and current presence at the moment a command is
//! issued, never replayed from an earlier snapshot.

pub mod clock;
pub mod engine;
pub mod persist;
pub mod state;
pub mod traits;

pub use clock::{SessionClock, TickSubscription};
pub use engine::{EngineConfig, SessionEngine};
pub use persist::{JsonStartedAtStore, StartedAtStore};
pub use state::{Phase, Status};
pub use traits::{CueError, CuePlayer, PresenceRoster};
