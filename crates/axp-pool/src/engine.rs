//! The chunked dispatch engine.

use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;
use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{debug, error};

use crate::error::{PoolError, WorkerFailure};

/// Default work items per chunk.
///
/// Bounds per-pool memory growth: a pool's memory is only reclaimed when the
/// pool itself is dropped, which happens between chunks.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Chunked multi-worker dispatcher.
///
/// Chunking is a memory-bound implementation detail: the aggregate result
/// map is identical for any chunk size.
#[derive(Clone, Copy, Debug)]
pub struct ConcurrencyEngine {
    workers: usize,
    chunk_size: usize,
}

impl ConcurrencyEngine {
    /// Create an engine.
    ///
    /// `workers` defaults to the logical CPU count, `chunk_size` to
    /// [`DEFAULT_CHUNK_SIZE`].
    pub fn new(workers: Option<usize>, chunk_size: Option<usize>) -> Self {
        Self {
            workers: workers.unwrap_or_else(num_cpus::get).max(1),
            chunk_size: chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE).max(1),
        }
    }

    /// Worker count per chunk pool.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `work` over `items`, collecting results keyed by `key_of`.
    ///
    /// Items within a chunk complete in any order. After a chunk finishes,
    /// if any of its items failed the run stops: the error carries every
    /// captured failure plus all results collected so far (the failing
    /// chunk's successes included). Chunks after a failed chunk never run.
    pub fn run<T, K, R, E, KF, F>(
        &self,
        items: &[T],
        key_of: KF,
        work: F,
    ) -> Result<HashMap<K, R>, PoolError<K, R>>
    where
        T: Sync,
        K: Eq + Hash + Send,
        R: Send,
        E: Display,
        KF: Fn(&T) -> K + Sync,
        F: Fn(&T) -> Result<R, E> + Sync,
    {
        let mut completed = HashMap::with_capacity(items.len());

        for (chunk_idx, chunk) in items.chunks(self.chunk_size).enumerate() {
            // A fresh pool per chunk; dropping it at the end of the scope is
            // what releases the workers' memory.
            let pool = ThreadPoolBuilder::new()
                .num_threads(self.workers)
                .thread_name(|idx| format!("axp-worker-{idx}"))
                .start_handler(|idx| debug!("worker {idx} ready"))
                .build()?;

            debug!(
                "dispatching chunk {chunk_idx} ({} items) across {} workers",
                chunk.len(),
                self.workers
            );

            let outcomes: Vec<(K, Result<R, WorkerFailure>)> = pool.install(|| {
                chunk
                    .par_iter()
                    .map(|item| {
                        let key = key_of(item);
                        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| work(item))) {
                            Ok(Ok(result)) => Ok(result),
                            Ok(Err(err)) => Err(WorkerFailure::Error(err.to_string())),
                            Err(payload) => {
                                Err(WorkerFailure::Panic(panic_message(payload.as_ref())))
                            }
                        };
                        (key, outcome)
                    })
                    .collect()
            });
            drop(pool);

            let mut failures = Vec::new();
            for (key, outcome) in outcomes {
                match outcome {
                    Ok(result) => {
                        completed.insert(key, result);
                    }
                    Err(failure) => failures.push((key, failure)),
                }
            }

            if !failures.is_empty() {
                return Err(PoolError::ChunkFailed {
                    completed,
                    failures,
                });
            }
        }

        Ok(completed)
    }

    /// Like [`run`](Self::run), but a failed chunk logs every captured
    /// failure and terminates the process with a non-zero exit.
    ///
    /// This is the scheduler's fail-fast policy: entries already committed
    /// stay committed, nothing after the failing chunk runs.
    pub fn run_or_exit<T, K, R, E, KF, F>(&self, items: &[T], key_of: KF, work: F) -> HashMap<K, R>
    where
        T: Sync,
        K: Eq + Hash + Send + Display,
        R: Send,
        E: Display,
        KF: Fn(&T) -> K + Sync,
        F: Fn(&T) -> Result<R, E> + Sync,
    {
        match self.run(items, key_of, work) {
            Ok(completed) => completed,
            Err(PoolError::Build(err)) => {
                error!("failed to build worker pool: {err}");
                std::process::exit(1);
            }
            Err(PoolError::ChunkFailed {
                completed,
                failures,
            }) => {
                error!(
                    "{} of {} concurrent work item(s) in the chunk failed",
                    failures.len(),
                    failures.len() + completed.len()
                );
                for (key, failure) in &failures {
                    error!("{key}: {failure}");
                }
                std::process::exit(1);
            }
        }
    }
}

impl Default for ConcurrencyEngine {
    fn default() -> Self {
        Self::new(None, None)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "opaque panic payload".to_string()
    }
}
