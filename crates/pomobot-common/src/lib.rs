pub mod errors;
pub mod id;

pub use errors::{BotError, ConfigError, GatewayError, LookupError, RosterError, StoreError};
pub use id::{new_correlation_id, ChannelId, MemberId};

pub type Result<T> = std::result::Result<T, BotError>;
