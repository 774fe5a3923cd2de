use thiserror::Error;

/// Everything that can go wrong while building or running a session.
#[derive(Debug, Error)]
pub enum GameError {
    /// A chasing behavior ran but there was no player to chase.
    #[error("no player entity on the board")]
    MissingPlayer,

    #[error("unknown behavior: {0}")]
    UnknownBehavior(String),

    #[error("entity template has no player")]
    NoPlayerInTemplate,

    #[error("entity template has {0} players, expected exactly one")]
    MultiplePlayers(usize),

    #[error("failed to parse settings '{path}': {source}")]
    Config {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
