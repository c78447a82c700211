use std::time::Duration;

use anyhow::{anyhow, Result};
use tokio::time::Instant;
use tracing::{info, warn};

use common::rpc::{StatusResponse, TaskPhase};
use common::task::{Assignment, Task, TaskId, WorkerID};

use crate::lease::LeaseTracker;
use crate::task_pool::TaskPool;
use crate::worker_registry::WorkerRegistry;

/// Default time a worker may hold a task before it is offered again.
pub const LEASE_TIMEOUT: Duration = Duration::from_secs(10);

/// Scheduling state machine for one job.
///
/// A task of the current phase sits in exactly one of its phase's pool or
/// lease tracker, or in neither once reported. Reduce tasks are only offered
/// after every map task has been reported. `Done` is never stored, it is
/// derived from every pool and tracker being empty.
///
/// NOTE: This type does no locking of its own. [`crate::core::MRCoordinator`]
///       keeps it behind a single mutex and every access goes through it.
#[derive(Debug)]
pub struct Scheduler {
    map_pool: TaskPool,
    reduce_pool: TaskPool,
    map_leases: LeaseTracker,
    reduce_leases: LeaseTracker,

    /// Either `Map` or `Reduce`. Only moves forward.
    phase: TaskPhase,

    workers: WorkerRegistry,

    n_map: u32,
    n_reduce: u32,
    lease_timeout: Duration,
}

impl Scheduler {
    /// Create the map tasks (one per input, in order) and the reduce tasks
    /// (one per bucket).
    pub fn new(inputs: Vec<String>, n_reduce: u32, lease_timeout: Duration) -> Result<Self> {
        if n_reduce == 0 {
            return Err(anyhow!("n_reduce must be at least 1"));
        }
        let n_map = u32::try_from(inputs.len())?;

        let map_pool: TaskPool = inputs
            .into_iter()
            .enumerate()
            .map(|(id, input)| Task::map(id as TaskId, input, n_map, n_reduce))
            .collect();
        let reduce_pool: TaskPool = (0..n_reduce)
            .map(|id| Task::reduce(id as TaskId, n_map, n_reduce))
            .collect();

        // With no inputs there is nothing to wait for.
        let phase = if map_pool.is_empty() {
            TaskPhase::Reduce
        } else {
            TaskPhase::Map
        };

        Ok(Self {
            map_pool,
            reduce_pool,
            map_leases: LeaseTracker::new(),
            reduce_leases: LeaseTracker::new(),
            phase,
            workers: WorkerRegistry::new(),
            n_map,
            n_reduce,
            lease_timeout,
        })
    }

    pub fn lease_timeout(&self) -> Duration {
        self.lease_timeout
    }

    pub fn n_map(&self) -> u32 {
        self.n_map
    }

    pub fn n_reduce(&self) -> u32 {
        self.n_reduce
    }

    pub fn register(&mut self) -> WorkerID {
        self.workers.register()
    }

    /// Hand out a pending task of the current phase, leasing it until
    /// `now + lease_timeout`.
    pub fn request_task(&mut self, worker_id: WorkerID, now: Instant) -> Assignment {
        if self.is_done() {
            return Assignment::Exit;
        }

        let deadline = now + self.lease_timeout;
        let (pool, leases) = match self.phase {
            TaskPhase::Map => (&mut self.map_pool, &mut self.map_leases),
            _ => (&mut self.reduce_pool, &mut self.reduce_leases),
        };

        match pool.take_any() {
            Some(task) => {
                leases.grant(task.clone(), worker_id, deadline);
                Assignment::Run(task)
            }
            None => Assignment::Wait,
        }
    }

    /// Record completion of a task. Unknown or already released ids are a
    /// no-op. Returns whether a lease was released.
    ///
    /// The last map report moves the job into the reduce phase.
    pub fn report(&mut self, phase: TaskPhase, task_id: TaskId) -> bool {
        let released = match phase {
            TaskPhase::Map => self.map_leases.release(task_id).is_some(),
            TaskPhase::Reduce => self.reduce_leases.release(task_id).is_some(),
            TaskPhase::Done => false,
        };

        if self.phase == TaskPhase::Map && self.map_pool.is_empty() && self.map_leases.is_empty()
        {
            info!("All {} map tasks complete, entering reduce phase", self.n_map);
            self.phase = TaskPhase::Reduce;
        }

        released
    }

    /// Put a task back into its pool if it is still leased and the lease has
    /// expired at `now`. Returns whether the task was reclaimed.
    pub fn reclaim(&mut self, phase: TaskPhase, task_id: TaskId, now: Instant) -> bool {
        let (pool, leases) = match phase {
            TaskPhase::Map => (&mut self.map_pool, &mut self.map_leases),
            TaskPhase::Reduce => (&mut self.reduce_pool, &mut self.reduce_leases),
            TaskPhase::Done => return false,
        };

        match leases.expire(task_id, now) {
            Some(lease) => {
                warn!(
                    "Lease on {} task {} held by worker {} expired, task is pending again",
                    phase, task_id, lease.worker_id
                );
                pool.insert(lease.task);
                true
            }
            None => false,
        }
    }

    /// True once every task has been reported and no lease is outstanding.
    pub fn is_done(&self) -> bool {
        self.map_pool.is_empty()
            && self.reduce_pool.is_empty()
            && self.map_leases.is_empty()
            && self.reduce_leases.is_empty()
    }

    /// The current phase, with `Done` derived.
    pub fn phase(&self) -> TaskPhase {
        if self.is_done() {
            TaskPhase::Done
        } else {
            self.phase
        }
    }

    pub fn status(&self) -> StatusResponse {
        StatusResponse {
            phase: self.phase().into(),
            pending_map: self.map_pool.len() as u32,
            leased_map: self.map_leases.len() as u32,
            pending_reduce: self.reduce_pool.len() as u32,
            leased_reduce: self.reduce_leases.len() as u32,
            workers: self.workers.len() as u32,
            done: self.is_done(),
        }
    }
}
