use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tonic::{Request, Response, Status};
use tracing::{debug, info};

pub use common::rpc::{Coordinator, CoordinatorServer};
use common::rpc::{
    RegisterRequest, RegisterResponse, ReportRequest, ReportResponse, StatusRequest,
    StatusResponse, TaskPhase, TaskReply, TaskRequest,
};
use common::task::{Assignment, TaskId};

use crate::scheduler::Scheduler;

/// The coordinator service.
///
/// All scheduling state lives in one [`Scheduler`] behind one mutex. RPC
/// handlers and lease-expiry timers both go through that lock, so pool,
/// lease and phase are always observed together.
#[derive(Debug, Clone)]
pub struct MRCoordinator {
    scheduler: Arc<Mutex<Scheduler>>,
}

impl MRCoordinator {
    pub fn new(scheduler: Scheduler) -> Self {
        Self {
            scheduler: Arc::new(Mutex::new(scheduler)),
        }
    }

    /// Whether the whole job has finished. Polled by the job driver.
    pub async fn is_done(&self) -> bool {
        self.scheduler.lock().await.is_done()
    }

    pub async fn snapshot(&self) -> StatusResponse {
        self.scheduler.lock().await.status()
    }

    /// Re-check the lease on `task_id` once `deadline` has passed.
    fn schedule_lease_expiry(&self, phase: TaskPhase, task_id: TaskId, deadline: Instant) {
        let scheduler = self.scheduler.clone();
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let mut scheduler = scheduler.lock().await;
            scheduler.reclaim(phase, task_id, Instant::now());
        });
    }
}

fn parse_phase(phase: i32) -> Result<TaskPhase, Status> {
    match TaskPhase::try_from(phase) {
        Ok(TaskPhase::Done) | Err(_) => Err(Status::invalid_argument(format!(
            "`{phase}` is not a task phase"
        ))),
        Ok(phase) => Ok(phase),
    }
}

#[tonic::async_trait]
impl Coordinator for MRCoordinator {
    /// Worker requests to join the workforce.
    async fn register(
        &self,
        request: Request<RegisterRequest>,
    ) -> Result<Response<RegisterResponse>, Status> {
        let worker_id = self.scheduler.lock().await.register();
        info!(
            "Worker {} registered from {:?}",
            worker_id,
            request.remote_addr()
        );

        Ok(Response::new(RegisterResponse { worker_id }))
    }

    async fn request_task(
        &self,
        request: Request<TaskRequest>,
    ) -> Result<Response<TaskReply>, Status> {
        let worker_id = request.into_inner().worker_id;

        let (assignment, deadline) = {
            let mut scheduler = self.scheduler.lock().await;
            let now = Instant::now();
            let assignment = scheduler.request_task(worker_id, now);
            (assignment, now + scheduler.lease_timeout())
        };

        match &assignment {
            Assignment::Run(task) => {
                info!(
                    "Granted {} task {} to worker {}",
                    task.phase, task.id, worker_id
                );
                self.schedule_lease_expiry(task.phase, task.id, deadline);
            }
            Assignment::Wait => debug!("No task available for worker {}", worker_id),
            Assignment::Exit => debug!("Telling worker {} the job is done", worker_id),
        }

        Ok(Response::new(assignment.into_reply()))
    }

    async fn report_task(
        &self,
        request: Request<ReportRequest>,
    ) -> Result<Response<ReportResponse>, Status> {
        let report = request.into_inner();
        let phase = parse_phase(report.phase)?;

        let released = self.scheduler.lock().await.report(phase, report.task_id);
        if released {
            info!(
                "Worker {} completed {} task {}",
                report.worker_id, phase, report.task_id
            );
        } else {
            debug!(
                "Ignoring report for untracked {} task {} from worker {}",
                phase, report.task_id, report.worker_id
            );
        }

        Ok(Response::new(ReportResponse {}))
    }

    async fn status(
        &self,
        _: Request<StatusRequest>,
    ) -> Result<Response<StatusResponse>, Status> {
        Ok(Response::new(self.snapshot().await))
    }
}
