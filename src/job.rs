/// A unit of work submitted to a [`Pool`](crate::Pool).
///
/// `priority > 0` marks the job priority-eligible: it becomes reachable
/// from the priority worker's `firstPrio` cursor in addition to the
/// ordinary head-of-queue path.
pub(crate) struct Job<T> {
    pub(crate) data: T,
    pub(crate) priority: u32,
}

impl<T> Job<T> {
    pub(crate) fn new(priority: u32, data: T) -> Self {
        Self { data, priority }
    }

    pub(crate) fn is_priority_eligible(&self) -> bool {
        self.priority > 0
    }
}
