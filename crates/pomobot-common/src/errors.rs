use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("gateway connect error: {0}")]
    Connect(String),

    #[error("gateway transport error: {0}")]
    Transport(String),

    #[error("gateway not connected")]
    NotConnected,
}

/// Failures when reading or muting members of the voice roster.
///
/// `Absent` means the target member is no longer in the channel; callers
/// treat it as success-equivalent rather than propagating it.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("member {0} is not in the voice channel")]
    Absent(String),

    #[error("roster transport error: {0}")]
    Transport(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store read error: {0}")]
    Read(String),

    #[error("store write error: {0}")]
    Write(String),

    #[error("store parse error: {0}")]
    Parse(String),
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("lookup network error: {0}")]
    Network(String),

    #[error("lookup api error: {0}")]
    Api(String),

    #[error("lookup parse error: {0}")]
    Parse(String),
}

#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}
