//! Session timer configuration.

use serde::{Deserialize, Serialize};

/// Work/rest cycle lengths and cue names for the session timer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    /// Total minutes per work+rest cycle.
    pub cycle_minutes: u32,
    /// Minutes of work at the start of each cycle.
    pub work_minutes: u32,
    /// Cue played when a work interval begins.
    pub work_cue: String,
    /// Cue played when a rest interval begins.
    pub rest_cue: String,
    /// Upper bound on waiting for a cue's completion signal.
    pub cue_timeout_secs: u64,
    /// Directory for the persisted start timestamp. Platform data dir
    /// when empty.
    pub data_dir: String,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            cycle_minutes: 30,
            work_minutes: 25,
            work_cue: "begin-work".to_string(),
            rest_cue: "begin-rest".to_string(),
            cue_timeout_secs: 60,
            data_dir: String::new(),
        }
    }
}
