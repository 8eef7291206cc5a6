//! Property-based tests over a live [`vpool::Pool`], exercising real OS
//! threads. Case counts are kept modest since each case spawns threads
//! and waits on real timing, unlike the pure in-process model test in
//! `src/queue.rs`.

use std::sync::{Arc, Mutex};
use std::thread::sleep;
use std::time::{Duration, Instant};

use proptest::prelude::*;
use vpool::Pool;

proptest! {
    #![proptest_config(ProptestConfig { cases: 24, .. ProptestConfig::default() })]

    // With max_workers == 1 and every job ordinary, execution order
    // equals submission order.
    #[test]
    fn fifo_within_ordinary_stream(data in prop::collection::vec(any::<u32>(), 0..24)) {
        let expected = data.clone();
        let recorded: Arc<Mutex<Vec<u32>>> = Arc::new(Mutex::new(Vec::new()));
        let pool = {
            let recorded = Arc::clone(&recorded);
            Pool::new(1, 1, 0, move |n: u32, _ctx: &()| {
                recorded.lock().unwrap().push(n);
            }, "fifo-ordinary", ()).unwrap()
        };

        for n in &expected {
            pool.submit(0, *n).unwrap();
        }

        let deadline = Instant::now() + Duration::from_secs(5);
        while recorded.lock().unwrap().len() < expected.len() && Instant::now() < deadline {
            sleep(Duration::from_millis(5));
        }
        pool.shutdown();

        prop_assert_eq!(recorded.lock().unwrap().clone(), expected);
    }

    // With max_workers == 1 and prio_workers == 1, a priority-only
    // submission sequence executes in submission order via the
    // dedicated priority worker.
    #[test]
    fn priority_fifo(data in prop::collection::vec(any::<u32>(), 0..24)) {
        let expected = data.clone();
        let recorded: Arc<Mutex<Vec<u32>>> = Arc::new(Mutex::new(Vec::new()));
        let pool = {
            let recorded = Arc::clone(&recorded);
            Pool::new(0, 1, 1, move |n: u32, _ctx: &()| {
                recorded.lock().unwrap().push(n);
            }, "priority-fifo", ()).unwrap()
        };

        for n in &expected {
            pool.submit(1, *n).unwrap();
        }

        let deadline = Instant::now() + Duration::from_secs(5);
        while recorded.lock().unwrap().len() < expected.len() && Instant::now() < deadline {
            sleep(Duration::from_millis(5));
        }
        pool.shutdown();

        prop_assert_eq!(recorded.lock().unwrap().clone(), expected);
    }

    // For any workload, the multiset of executed payloads equals the
    // multiset submitted, regardless of worker count or priority mix.
    #[test]
    fn no_job_lost_or_double_run(
        data in prop::collection::vec(any::<u32>(), 0..40),
        priorities in prop::collection::vec(0u32..3, 0..40),
        min_workers in 0usize..3,
        max_workers in 1usize..5,
        prio_workers in 0usize..2,
    ) {
        let n = data.len().min(priorities.len());
        let data = &data[..n];
        let priorities = &priorities[..n];

        let recorded: Arc<Mutex<Vec<u32>>> = Arc::new(Mutex::new(Vec::new()));
        let pool = {
            let recorded = Arc::clone(&recorded);
            Pool::new(min_workers, max_workers, prio_workers, move |n: u32, _ctx: &()| {
                recorded.lock().unwrap().push(n);
            }, "no-lost-jobs", ()).unwrap()
        };

        let mut submitted = Vec::new();
        for (d, p) in data.iter().zip(priorities.iter()) {
            if pool.submit(*p, *d).is_ok() {
                submitted.push(*d);
            }
        }

        let deadline = Instant::now() + Duration::from_secs(5);
        while recorded.lock().unwrap().len() < submitted.len() && Instant::now() < deadline {
            sleep(Duration::from_millis(5));
        }
        pool.shutdown();

        let mut got = recorded.lock().unwrap().clone();
        let mut want = submitted;
        got.sort_unstable();
        want.sort_unstable();
        prop_assert_eq!(got, want);
    }
}
