#![warn(clippy::correctness)]
#![warn(clippy::suspicious)]
#![warn(clippy::perf)]
#![warn(clippy::style)]

//! A dynamic, prioritized worker pool.
//!
//! [`Pool`] executes submitted jobs concurrently across a bounded set of
//! background threads. It supports two worker classes coordinated over a
//! shared FIFO queue:
//!
//! - **ordinary workers** drain the queue from its head, in submission
//!   order, and grow elastically (up to a configured maximum) whenever
//!   the backlog outpaces parked capacity;
//! - **priority workers** drain only priority-eligible jobs (submitted
//!   with `priority > 0`), via a separate cursor into the same queue, so
//!   they are never stuck behind a long run of ordinary jobs even while
//!   every ordinary worker is busy.
//!
//! Priority jobs are served from both sides: an ordinary worker may also
//! pop a priority-eligible job if it reaches the head of the queue first.
//! There is no ordering guarantee across the two streams, only within
//! each of them.
//!
//! There is no cross-pool work stealing, no persistent queue, and no
//! per-job cancellation — the only shutdown channel is pool-wide, via
//! [`Pool::shutdown`] or letting the pool drop.

mod error;
mod job;
mod pool;
mod queue;
mod worker;

pub use error::{PoolError, SubmitError};
pub use pool::Pool;
