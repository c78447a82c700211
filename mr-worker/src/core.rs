use std::time::Duration;

use anyhow::{anyhow, Result};
use bytes::Bytes;
use tonic::transport::Channel;
use tracing::{debug, info, warn};

use common::rpc::{CoordinatorClient, RegisterRequest, ReportRequest, TaskPhase, TaskRequest};
use common::store::Store;
use common::task::{Assignment, Task, WorkerID};
use common::Workload;

use crate::{map, reduce};

/// How long to wait before asking again when no task is available.
pub const IDLE_BACKOFF: Duration = Duration::from_secs(1);

/// The worker's view of the coordinator.
///
/// Errors returned here are transport failures and are fatal to the worker.
#[tonic::async_trait]
pub trait TaskSource: Send {
    async fn register(&mut self) -> Result<WorkerID>;

    async fn request_task(&mut self, worker_id: WorkerID) -> Result<Assignment>;

    async fn report_task(&mut self, worker_id: WorkerID, task: &Task) -> Result<()>;
}

#[tonic::async_trait]
impl TaskSource for CoordinatorClient<Channel> {
    async fn register(&mut self) -> Result<WorkerID> {
        let response = CoordinatorClient::register(self, RegisterRequest {}).await?;
        Ok(response.into_inner().worker_id)
    }

    async fn request_task(&mut self, worker_id: WorkerID) -> Result<Assignment> {
        let response = CoordinatorClient::request_task(self, TaskRequest { worker_id }).await?;
        Assignment::from_reply(response.into_inner())
    }

    async fn report_task(&mut self, worker_id: WorkerID, task: &Task) -> Result<()> {
        let request = ReportRequest {
            task_id: task.id,
            phase: task.phase.into(),
            worker_id,
        };
        CoordinatorClient::report_task(self, request).await?;
        Ok(())
    }
}

pub struct MRWorker<S, St> {
    source: S,
    store: St,
    workload: Workload,

    /// Auxiliary arguments handed to every map and reduce call.
    aux: Bytes,

    backoff: Duration,
}

impl<S: TaskSource, St: Store> MRWorker<S, St> {
    pub fn new(source: S, store: St, workload: Workload, aux: Bytes) -> Self {
        Self {
            source,
            store,
            workload,
            aux,
            backoff: IDLE_BACKOFF,
        }
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Register, then execute tasks until the coordinator says the job is
    /// finished. Returns the number of tasks this worker completed.
    ///
    /// A task that fails to execute is abandoned without a report, its lease
    /// expires and the coordinator hands it out again.
    pub async fn run(&mut self) -> Result<usize> {
        let worker_id = self.source.register().await?;
        info!("Worker registered (ID={})", worker_id);

        let mut completed = 0;
        loop {
            let task = match self.source.request_task(worker_id).await? {
                Assignment::Exit => {
                    info!("Job finished, worker {} exiting", worker_id);
                    return Ok(completed);
                }
                Assignment::Wait => {
                    debug!("No task available, backing off for {:?}", self.backoff);
                    tokio::time::sleep(self.backoff).await;
                    continue;
                }
                Assignment::Run(task) => task,
            };

            info!("Starting {} task {}", task.phase, task.id);
            if let Err(e) = execute(&task, &self.workload, self.aux.clone(), &self.store).await {
                warn!("Abandoning {} task {}: {:#}", task.phase, task.id, e);
                continue;
            }

            self.source.report_task(worker_id, &task).await?;
            completed += 1;
            info!("Finished {} task {}", task.phase, task.id);
        }
    }
}

async fn execute<St: Store>(
    task: &Task,
    workload: &Workload,
    aux: Bytes,
    store: &St,
) -> Result<()> {
    match task.phase {
        TaskPhase::Map => map::perform_map(task, workload, aux, store).await,
        TaskPhase::Reduce => reduce::perform_reduce(task, workload, aux, store).await,
        TaskPhase::Done => Err(anyhow!("task {} has no work in the done phase", task.id)),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::test_store::MemoryStore;

    type Reports = Arc<Mutex<Vec<(WorkerID, Task)>>>;

    /// Replays a fixed script of assignments and records reports.
    struct Scripted {
        replies: VecDeque<Assignment>,
        reports: Reports,
    }

    #[tonic::async_trait]
    impl TaskSource for Scripted {
        async fn register(&mut self) -> Result<WorkerID> {
            Ok(5)
        }

        async fn request_task(&mut self, _: WorkerID) -> Result<Assignment> {
            self.replies
                .pop_front()
                .ok_or_else(|| anyhow!("connection closed"))
        }

        async fn report_task(&mut self, worker_id: WorkerID, task: &Task) -> Result<()> {
            self.reports.lock().unwrap().push((worker_id, task.clone()));
            Ok(())
        }
    }

    fn worker(
        replies: Vec<Assignment>,
        store: MemoryStore,
    ) -> (MRWorker<Scripted, MemoryStore>, Reports) {
        let reports = Arc::new(Mutex::new(vec![]));
        let source = Scripted {
            replies: replies.into(),
            reports: reports.clone(),
        };
        let worker = MRWorker::new(source, store, workload::wc::WORKLOAD, Bytes::new())
            .with_backoff(Duration::from_millis(1));
        (worker, reports)
    }

    #[tokio::test]
    async fn runs_until_exit_and_reports_each_task() {
        let store = MemoryStore::with_inputs([("a.txt", "hello world")]);
        let replies = vec![
            Assignment::Wait,
            Assignment::Run(Task::map(0, "a.txt", 1, 1)),
            Assignment::Run(Task::reduce(0, 1, 1)),
            Assignment::Exit,
        ];
        let (mut worker, reports) = worker(replies, store.clone());

        assert_eq!(worker.run().await.unwrap(), 2);

        let reports = reports.lock().unwrap();
        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|(worker_id, _)| *worker_id == 5));
        assert_eq!(store.output(0).unwrap(), "hello 1\nworld 1\n");
    }

    #[tokio::test]
    async fn unreadable_input_is_abandoned_silently() {
        let store = MemoryStore::default();
        let replies = vec![
            Assignment::Run(Task::map(0, "missing.txt", 1, 1)),
            Assignment::Exit,
        ];
        let (mut worker, reports) = worker(replies, store.clone());

        assert_eq!(worker.run().await.unwrap(), 0);
        assert!(reports.lock().unwrap().is_empty());
        assert_eq!(store.shard_count(), 0);
    }

    #[tokio::test]
    async fn transport_failure_ends_the_loop() {
        let (mut worker, _) = worker(vec![Assignment::Wait], MemoryStore::default());
        assert!(worker.run().await.is_err());
    }
}
