//! A small smoke-test / demo for [`vpool::Pool`]: submits a mix of
//! ordinary and priority jobs and logs how the pool handles them.

#[path = "../logging.rs"]
mod logging;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::sleep;
use std::time::Duration;

use tracing::info;
use vpool::Pool;

struct Context {
    completed: AtomicU64,
}

fn main() {
    logging::init();

    let parallelism = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4);

    let pool = Pool::new(
        1,
        parallelism.max(2),
        1,
        |job: u64, ctx: &Arc<Context>| {
            info!(job, "running job");
            sleep(Duration::from_millis(5));
            ctx.completed.fetch_add(1, Ordering::Relaxed);
        },
        "pool-demo",
        Arc::new(Context {
            completed: AtomicU64::new(0),
        }),
    )
    .expect("failed to construct pool");

    for i in 0..20u64 {
        let priority = if i % 5 == 0 { 1 } else { 0 };
        if let Err(e) = pool.submit(priority, i) {
            let data = e.into_data();
            eprintln!("failed to submit job {data}");
        }
    }

    sleep(Duration::from_millis(200));
    info!(
        workers = pool.workers(),
        priority_workers = pool.priority_workers(),
        depth = pool.depth(),
        "pool status before shutdown"
    );

    pool.shutdown();
}
