//! Ancillary service configuration: memos, lookup, keep-alive.

use serde::{Deserialize, Serialize};

/// Memo store configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MemoSection {
    /// Path of the memo JSON document. Platform data dir when empty.
    pub data_path: String,
}

/// Encyclopedia lookup configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiSection {
    /// Base URL of the MediaWiki instance to query.
    pub api_host: String,
}

impl Default for WikiSection {
    fn default() -> Self {
        Self {
            api_host: "https://en.wikipedia.org".to_string(),
        }
    }
}

/// Keep-alive HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeepaliveSection {
    pub enabled: bool,
    pub port: u16,
}

impl Default for KeepaliveSection {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 3000,
        }
    }
}
