use std::path::PathBuf;

use thiserror::Error;

/// Failures while saving or loading a snapshot file.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("snapshot file {} does not exist", path.display())]
    Missing { path: PathBuf },

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed snapshot {}: {source}", path.display())]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Outcomes the gateway reports back to its transport.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("word {0:?} not found")]
    NotFound(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("no snapshot path configured")]
    PersistenceDisabled,

    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Failures while starting the HTTP server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}
