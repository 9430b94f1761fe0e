use crate::domain::GuildId;

/// Core error type for the bot.
///
/// Adapter crates should map their specific errors into this type so the
/// core can handle failures consistently (user-facing message vs logged
/// cause).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("store read error: {0}")]
    StorageRead(String),

    #[error("store write error: {0}")]
    StorageWrite(String),

    #[error("no hall of fame channel configured for guild {0}")]
    NoDestinationConfigured(GuildId),

    #[error("lookup error: {0}")]
    CollaboratorFetch(String),

    #[error("publish error: {0}")]
    Publish(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
