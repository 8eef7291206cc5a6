use slab::Slab;

use crate::job::Job;

struct Entry<T> {
    job: Job<T>,
    prev: Option<usize>,
    next: Option<usize>,
}

/// An ordered sequence of pending [`Job`]s, backed by an arena (`Slab`)
/// instead of an intrusive pointer list. `head`/`tail` are the oldest and
/// newest arena slots; `first_prio` is the oldest slot whose job is
/// priority-eligible, or `None`.
///
/// All methods assume the caller already holds the pool mutex; this type
/// has no internal locking of its own.
pub(crate) struct JobQueue<T> {
    entries: Slab<Entry<T>>,
    head: Option<usize>,
    tail: Option<usize>,
    first_prio: Option<usize>,
    depth: usize,
}

impl<T> JobQueue<T> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Slab::new(),
            head: None,
            tail: None,
            first_prio: None,
            depth: 0,
        }
    }

    pub(crate) fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn has_head(&self) -> bool {
        self.head.is_some()
    }

    pub(crate) fn has_first_prio(&self) -> bool {
        self.first_prio.is_some()
    }

    /// Splice a new job in at the tail. Returns the arena key, which
    /// callers may ignore; kept for parity with the source's interior
    /// pointer return value.
    pub(crate) fn enqueue(&mut self, priority: u32, data: T) -> usize {
        let prev = self.tail;
        let key = self.entries.insert(Entry {
            job: Job::new(priority, data),
            prev,
            next: None,
        });

        if let Some(t) = prev {
            self.entries[t].next = Some(key);
        }
        self.tail = Some(key);
        if self.head.is_none() {
            self.head = Some(key);
        }
        if priority > 0 && self.first_prio.is_none() {
            self.first_prio = Some(key);
        }
        self.depth += 1;
        key
    }

    /// Remove and return the oldest job. Panics if the queue is empty;
    /// callers must check `has_head` under the same lock acquisition.
    pub(crate) fn pop_oldest(&mut self) -> T {
        let key = self.head.expect("pop_oldest called on empty queue");
        self.unlink(key)
    }

    /// Remove and return the oldest priority-eligible job. Panics if none
    /// exists; callers must check `has_first_prio` first.
    pub(crate) fn pop_first_prio(&mut self) -> T {
        let key = self
            .first_prio
            .expect("pop_first_prio called with no priority job queued");
        self.unlink(key)
    }

    fn unlink(&mut self, key: usize) -> T {
        let entry = self.entries.remove(key);

        match entry.prev {
            Some(p) => self.entries[p].next = entry.next,
            None => self.head = entry.next,
        }
        match entry.next {
            Some(n) => self.entries[n].prev = entry.prev,
            None => self.tail = entry.prev,
        }

        if self.first_prio == Some(key) {
            self.first_prio = self.scan_first_prio_from(entry.next);
        }

        self.depth -= 1;
        entry.job.data
    }

    fn scan_first_prio_from(&self, mut cursor: Option<usize>) -> Option<usize> {
        while let Some(key) = cursor {
            let entry = &self.entries[key];
            if entry.job.is_priority_eligible() {
                return Some(key);
            }
            cursor = entry.next;
        }
        None
    }
}
