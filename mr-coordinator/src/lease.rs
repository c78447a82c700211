use std::collections::HashMap;

use tokio::time::Instant;

use common::task::{Task, TaskId, WorkerID};

/// A time-bounded claim on one task.
#[derive(Debug, Clone)]
pub struct Lease {
    pub task: Task,

    /// Worker the task was handed to. Informational, reports are not checked against it.
    pub worker_id: WorkerID,

    pub deadline: Instant,
}

/// Tasks of one phase that are currently handed out.
#[derive(Debug, Default)]
pub struct LeaseTracker {
    leases: HashMap<TaskId, Lease>,
}

impl LeaseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&mut self, task: Task, worker_id: WorkerID, deadline: Instant) {
        self.leases.insert(
            task.id,
            Lease {
                task,
                worker_id,
                deadline,
            },
        );
    }

    /// Drop the lease for `task_id`, if any.
    pub fn release(&mut self, task_id: TaskId) -> Option<Lease> {
        self.leases.remove(&task_id)
    }

    /// Remove the lease for `task_id` only if its deadline has passed at `now`,
    /// returning the task so it can be offered again.
    pub fn expire(&mut self, task_id: TaskId, now: Instant) -> Option<Lease> {
        match self.leases.get(&task_id) {
            Some(lease) if lease.deadline <= now => self.leases.remove(&task_id),
            _ => None,
        }
    }

    pub fn contains(&self, task_id: TaskId) -> bool {
        self.leases.contains_key(&task_id)
    }

    pub fn len(&self) -> usize {
        self.leases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leases.is_empty()
    }
}
