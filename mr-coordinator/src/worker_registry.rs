use common::task::WorkerID;

/// Registry for workers.
///
/// IDs come from a monotonic counter and are never reused, even after a
/// worker disappears. They identify workers in logs, nothing more.
#[derive(Debug, Default)]
pub struct WorkerRegistry {
    next_worker_id: WorkerID,
}

impl WorkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next worker ID.
    pub fn register(&mut self) -> WorkerID {
        let worker_id = self.next_worker_id;
        self.next_worker_id += 1;
        worker_id
    }

    /// Number of IDs handed out so far.
    pub fn len(&self) -> usize {
        self.next_worker_id as usize
    }

    pub fn is_empty(&self) -> bool {
        self.next_worker_id == 0
    }
}
