use std::sync::Arc;

use tracing::trace;

use crate::pool::Core;

/// Body shared by ordinary and priority worker threads, parameterized by
/// which side of the queue this thread drains and which condvar it waits
/// on. The `while` guards on queue state and `quit` make the loop
/// resistant to spurious wakeups.
pub(crate) fn run<T, C, F>(core: Arc<Core<T, C, F>>, priority: bool)
where
    F: Fn(T, &C) + Send + Sync + 'static,
    T: Send + 'static,
    C: Send + Sync + 'static,
{
    'outer: loop {
        let data = {
            let mut guard = core.state.lock();
            loop {
                let has_work = if priority {
                    guard.queue.has_first_prio()
                } else {
                    guard.queue.has_head()
                };
                if guard.quit || has_work {
                    break;
                }
                if !priority {
                    guard.free_workers += 1;
                }
                if priority {
                    core.prio_cond
                        .as_ref()
                        .expect("priority worker spawned without a priority condvar")
                        .wait(&mut guard);
                } else {
                    core.cond.wait(&mut guard);
                }
                if !priority {
                    guard.free_workers -= 1;
                }
            }

            if guard.quit {
                if priority {
                    guard.n_prio_workers -= 1;
                } else {
                    guard.n_workers -= 1;
                }
                break 'outer;
            }

            if priority {
                guard.queue.pop_first_prio()
            } else {
                guard.queue.pop_oldest()
            }
        };

        trace!(priority, "worker picked up a job, running outside the lock");
        (core.job_fn)(data, &core.opaque);
    }
}
