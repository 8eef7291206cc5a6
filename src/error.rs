use std::io;

use thiserror::Error;

/// Failures that can occur while constructing a [`Pool`](crate::Pool) or
/// growing its worker sets.
#[derive(Debug, Error)]
pub enum PoolError {
    /// The OS refused to spawn a worker thread.
    #[error("failed to spawn worker thread {name:?}: {source}")]
    SpawnFailed {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Failure to admit a job, returned together with the rejected payload so
/// the caller keeps ownership of it.
#[derive(Debug, Error)]
pub enum SubmitError<T> {
    /// The pool has already started (or finished) shutting down.
    #[error("pool is shutting down")]
    ShuttingDown { data: T },

    /// The admission test wanted to grow the ordinary worker set but the
    /// OS refused to spawn the new thread.
    #[error("failed to spawn worker thread: {source}")]
    SpawnFailed {
        data: T,
        #[source]
        source: io::Error,
    },

    /// The pool is already at `max_workers` with no free worker able to
    /// absorb the job immediately, and `max_workers` forbids growing
    /// further (e.g. a pool constructed with `max_workers == 0`).
    #[error("pool has no spare capacity")]
    NoCapacity { data: T },
}

impl<T> SubmitError<T> {
    /// Reclaim the job payload that was rejected.
    pub fn into_data(self) -> T {
        match self {
            SubmitError::ShuttingDown { data } => data,
            SubmitError::SpawnFailed { data, .. } => data,
            SubmitError::NoCapacity { data } => data,
        }
    }
}
