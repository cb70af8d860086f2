//! Error types for the worker pool.

use std::collections::HashMap;

/// One work item's captured failure.
#[derive(Debug, thiserror::Error)]
pub enum WorkerFailure {
    /// The work function returned an error.
    #[error("{0}")]
    Error(String),

    /// The work function panicked; the payload is the panic message.
    #[error("worker panicked: {0}")]
    Panic(String),
}

/// Errors escaping [`ConcurrencyEngine::run`](crate::ConcurrencyEngine::run).
#[derive(Debug, thiserror::Error)]
pub enum PoolError<K, R> {
    /// The chunk's worker pool could not be built.
    #[error("failed to build worker pool: {0}")]
    Build(#[from] rayon::ThreadPoolBuildError),

    /// At least one work item in a chunk failed.
    ///
    /// `completed` holds every result collected before the run stopped,
    /// including the failing chunk's successes: partial success within a
    /// chunk is kept, the run just does not continue past it.
    #[error("{} work item(s) in a chunk failed", failures.len())]
    ChunkFailed {
        completed: HashMap<K, R>,
        failures: Vec<(K, WorkerFailure)>,
    },
}

impl<K, R> PoolError<K, R> {
    /// The results collected before the run stopped, if any.
    pub fn into_completed(self) -> HashMap<K, R> {
        match self {
            PoolError::Build(_) => HashMap::new(),
            PoolError::ChunkFailed { completed, .. } => completed,
        }
    }
}
