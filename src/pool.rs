use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::{Condvar, Mutex, MutexGuard};
use tracing::{debug, info, trace, warn};

use crate::error::{PoolError, SubmitError};
use crate::queue::JobQueue;
use crate::worker;

pub(crate) struct PoolState<T> {
    pub(crate) queue: JobQueue<T>,
    pub(crate) quit: bool,
    pub(crate) free_workers: usize,
    pub(crate) n_workers: usize,
    pub(crate) n_prio_workers: usize,
    ordinary_handles: Vec<JoinHandle<()>>,
    priority_handles: Vec<JoinHandle<()>>,
}

/// The part of a [`Pool`] shared between the owning value and every
/// spawned worker thread. Guarded entirely by `state`'s mutex: one mutex
/// protects queue links, cursors, counters, and the `quit` flag.
pub(crate) struct Core<T, C, F> {
    pub(crate) state: Mutex<PoolState<T>>,
    pub(crate) cond: Condvar,
    pub(crate) prio_cond: Option<Condvar>,
    pub(crate) min_workers: usize,
    pub(crate) max_workers: usize,
    pub(crate) has_priority_workers: bool,
    pub(crate) job_fn: F,
    pub(crate) opaque: C,
    pub(crate) job_name: String,
}

/// A dynamic, prioritized worker pool.
///
/// `T` is the job payload type and `C` is the opaque context handed to
/// every invocation of the job function alongside the payload. Dropping
/// a `Pool` drains it exactly like [`Pool::shutdown`]: it signals every
/// worker to quit, joins all of them, and discards (without running)
/// any job still queued at that point.
pub struct Pool<T, C, F>
where
    F: Fn(T, &C) + Send + Sync + 'static,
    T: Send + 'static,
    C: Send + Sync + 'static,
{
    core: Arc<Core<T, C, F>>,
}

fn spawn_worker<T, C, F>(
    core: &Arc<Core<T, C, F>>,
    guard: &mut MutexGuard<'_, PoolState<T>>,
    priority: bool,
) -> Result<(), PoolError>
where
    F: Fn(T, &C) + Send + Sync + 'static,
    T: Send + 'static,
    C: Send + Sync + 'static,
{
    let worker_core = Arc::clone(core);
    let class = if priority { "priority" } else { "ordinary" };
    let name = format!("{}-{class}", core.job_name);
    let spawned = thread::Builder::new()
        .name(name.clone())
        .spawn(move || worker::run(worker_core, priority));

    match spawned {
        Ok(handle) => {
            if priority {
                guard.n_prio_workers += 1;
                guard.priority_handles.push(handle);
            } else {
                guard.n_workers += 1;
                guard.ordinary_handles.push(handle);
            }
            debug!(class, n_workers = guard.n_workers, n_prio_workers = guard.n_prio_workers, "spawned worker");
            Ok(())
        }
        Err(source) => {
            warn!(class, %source, "failed to spawn worker thread");
            Err(PoolError::SpawnFailed { name, source })
        }
    }
}

/// Grow the chosen worker class by `gain` threads, one spawn at a time so
/// a mid-way failure leaves the counters and handle vector consistent
/// with the number of threads actually running.
fn expand<T, C, F>(
    core: &Arc<Core<T, C, F>>,
    guard: &mut MutexGuard<'_, PoolState<T>>,
    gain: usize,
    priority: bool,
) -> Result<(), PoolError>
where
    F: Fn(T, &C) + Send + Sync + 'static,
    T: Send + 'static,
    C: Send + Sync + 'static,
{
    for _ in 0..gain {
        spawn_worker(core, guard, priority)?;
    }
    Ok(())
}

/// Signal every worker to quit, join all of them, and drop any job still
/// queued. Safe to call more than once: a second call finds an empty
/// handle/queue state and is a no-op. Shared by `Pool::shutdown`,
/// `Drop`, and `Pool::new`'s partial-construction failure path.
fn teardown<T, C, F>(core: &Arc<Core<T, C, F>>)
where
    F: Fn(T, &C) + Send + Sync + 'static,
    T: Send + 'static,
    C: Send + Sync + 'static,
{
    let (ordinary, priority) = {
        let mut guard = core.state.lock();
        guard.quit = true;
        core.cond.notify_all();
        if let Some(pc) = &core.prio_cond {
            pc.notify_all();
        }
        (
            std::mem::take(&mut guard.ordinary_handles),
            std::mem::take(&mut guard.priority_handles),
        )
    };

    debug!(
        ordinary = ordinary.len(),
        priority = priority.len(),
        "joining worker threads"
    );
    for handle in ordinary {
        let _ = handle.join();
    }
    for handle in priority {
        let _ = handle.join();
    }

    let mut guard = core.state.lock();
    let mut dropped = 0usize;
    while guard.queue.has_head() {
        let _ = guard.queue.pop_oldest();
        dropped += 1;
    }
    if dropped > 0 {
        debug!(dropped, "dropped jobs still queued at shutdown");
    }
}

impl<T, C, F> Pool<T, C, F>
where
    F: Fn(T, &C) + Send + Sync + 'static,
    T: Send + 'static,
    C: Send + Sync + 'static,
{
    /// Construct a pool, spawning `min_workers` ordinary workers and
    /// `prio_workers` priority workers up front. `min_workers` is clamped
    /// to `max_workers`. On any spawn failure the pool is fully torn down
    /// (any threads already spawned are stopped and joined) before
    /// returning `Err`; no partial state leaks.
    pub fn new(
        min_workers: usize,
        max_workers: usize,
        prio_workers: usize,
        job_fn: F,
        job_name: impl Into<String>,
        opaque: C,
    ) -> Result<Self, PoolError> {
        let min_workers = min_workers.min(max_workers);
        let job_name = job_name.into();
        debug!(min_workers, max_workers, prio_workers, %job_name, "constructing pool");

        let core = Arc::new(Core {
            state: Mutex::new(PoolState {
                queue: JobQueue::new(),
                quit: false,
                free_workers: 0,
                n_workers: 0,
                n_prio_workers: 0,
                ordinary_handles: Vec::new(),
                priority_handles: Vec::new(),
            }),
            cond: Condvar::new(),
            prio_cond: if prio_workers > 0 {
                Some(Condvar::new())
            } else {
                None
            },
            min_workers,
            max_workers,
            has_priority_workers: prio_workers > 0,
            job_fn,
            opaque,
            job_name,
        });

        {
            let mut guard = core.state.lock();
            if let Err(e) = expand(&core, &mut guard, min_workers, false) {
                drop(guard);
                teardown(&core);
                return Err(e);
            }
            if prio_workers > 0 {
                if let Err(e) = expand(&core, &mut guard, prio_workers, true) {
                    drop(guard);
                    teardown(&core);
                    return Err(e);
                }
            }
        }

        Ok(Self { core })
    }

    /// Submit a job. `priority > 0` marks it priority-eligible.
    /// Fails fast if the pool is shutting down, if growing the
    /// ordinary worker set to absorb the backlog fails, or if the pool
    /// has no worker of any class that could ever run this job (e.g. a
    /// pool constructed with `max_workers == 0` and no priority
    /// workers). The caller keeps ownership of `data` on every failure
    /// path.
    pub fn submit(&self, priority: u32, data: T) -> Result<(), SubmitError<T>> {
        if self.core.max_workers == 0 && !self.core.has_priority_workers {
            return Err(SubmitError::NoCapacity { data });
        }

        let mut guard = self.core.state.lock();
        if guard.quit {
            return Err(SubmitError::ShuttingDown { data });
        }

        // Always a signed comparison: never compute this as an unsigned
        // subtraction (`free_workers - depth`), which wraps.
        let backlog_exceeds_capacity =
            guard.free_workers as isize - guard.queue.depth() as isize <= 0;
        if backlog_exceeds_capacity && guard.n_workers < self.core.max_workers {
            if let Err(e) = spawn_worker(&self.core, &mut guard, false) {
                let PoolError::SpawnFailed { source, .. } = e;
                return Err(SubmitError::SpawnFailed { data, source });
            }
        }

        guard.queue.enqueue(priority, data);
        trace!(priority, depth = guard.queue.depth(), "job enqueued");
        self.core.cond.notify_one();
        if priority > 0 {
            if let Some(pc) = &self.core.prio_cond {
                pc.notify_one();
            }
        }

        Ok(())
    }

    /// Configured lower bound on ordinary workers.
    pub fn min_workers(&self) -> usize {
        self.core.min_workers
    }

    /// Configured upper bound on ordinary workers.
    pub fn max_workers(&self) -> usize {
        self.core.max_workers
    }

    /// Count of currently live priority workers (not the configured
    /// target).
    pub fn priority_workers(&self) -> usize {
        self.core.state.lock().n_prio_workers
    }

    /// Current count of live ordinary workers.
    pub fn workers(&self) -> usize {
        self.core.state.lock().n_workers
    }

    /// Number of jobs currently queued (not yet picked up by a worker).
    pub fn depth(&self) -> usize {
        self.core.state.lock().queue.depth()
    }

    /// Signal every worker to quit and block until all of them have
    /// exited, discarding any job still queued at that point. Takes
    /// `&self` (rather than consuming the pool) so that a `submit` racing
    /// concurrently on another thread observes a clean `ShuttingDown`
    /// rejection instead of being unable to compile at all; idempotent,
    /// and safe to call any number of times, including from inside
    /// `Drop`.
    pub fn shutdown(&self) {
        info!("pool shutdown requested");
        teardown(&self.core);
    }
}

impl<T, C, F> Drop for Pool<T, C, F>
where
    F: Fn(T, &C) + Send + Sync + 'static,
    T: Send + 'static,
    C: Send + Sync + 'static,
{
    fn drop(&mut self) {
        teardown(&self.core);
    }
}
