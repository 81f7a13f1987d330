use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by [`TaskSession`](crate::TaskSession).
///
/// Only process spawning fails synchronously; everything that goes wrong
/// while streaming degrades to end-of-stream and never reaches the caller
/// as an error value.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("failed to spawn worker process (binary={binary:?}): {source}")]
    Spawn {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to wait for worker process: {source}")]
    Wait {
        #[source]
        source: std::io::Error,
    },
    #[error("internal error: missing worker stdout pipe")]
    MissingStdout,
    #[error("failed to join ingestion driver task: {0}")]
    Join(#[from] tokio::task::JoinError),
}
