use std::time::Duration;

use tonic::Request;

use common::rpc::{Coordinator, RegisterRequest, ReportRequest, TaskPhase, TaskReply, TaskRequest};
use common::task::IDLE_TASK_ID;
use mr_coordinator::core::MRCoordinator;
use mr_coordinator::scheduler::{Scheduler, LEASE_TIMEOUT};

fn coordinator(inputs: &[&str], n_reduce: u32) -> MRCoordinator {
    let inputs = inputs.iter().map(|s| s.to_string()).collect();
    MRCoordinator::new(Scheduler::new(inputs, n_reduce, LEASE_TIMEOUT).unwrap())
}

async fn register(coordinator: &MRCoordinator) -> i32 {
    coordinator
        .register(Request::new(RegisterRequest {}))
        .await
        .unwrap()
        .into_inner()
        .worker_id
}

async fn request(coordinator: &MRCoordinator, worker_id: i32) -> TaskReply {
    coordinator
        .request_task(Request::new(TaskRequest { worker_id }))
        .await
        .unwrap()
        .into_inner()
}

async fn report(coordinator: &MRCoordinator, phase: TaskPhase, task_id: i32) {
    coordinator
        .report_task(Request::new(ReportRequest {
            task_id,
            phase: phase.into(),
            worker_id: 0,
        }))
        .await
        .unwrap();
}

#[tokio::test(start_paused = true)]
async fn abandoned_map_task_is_granted_again_after_deadline() {
    let coordinator = coordinator(&["pg-being_ernest.txt"], 2);

    let first = register(&coordinator).await;
    let second = register(&coordinator).await;
    assert_ne!(first, second);

    let granted = request(&coordinator, first).await;
    assert!(granted.alive);
    assert_eq!(granted.task_id, 0);
    assert_eq!(granted.phase(), TaskPhase::Map);

    tokio::time::sleep(Duration::from_secs(9)).await;
    let idle = request(&coordinator, second).await;
    assert!(idle.alive);
    assert_eq!(idle.task_id, IDLE_TASK_ID);

    tokio::time::sleep(Duration::from_secs(2)).await;
    let regranted = request(&coordinator, second).await;
    assert!(regranted.alive);
    assert_eq!(regranted.task_id, 0);
    assert_eq!(regranted.phase(), TaskPhase::Map);
    assert_eq!(regranted.input, "pg-being_ernest.txt");
}

#[tokio::test(start_paused = true)]
async fn reported_task_is_not_reclaimed() {
    let coordinator = coordinator(&["a.txt", "b.txt"], 1);

    let task = request(&coordinator, 0).await;
    report(&coordinator, TaskPhase::Map, task.task_id).await;

    tokio::time::sleep(LEASE_TIMEOUT + Duration::from_secs(1)).await;

    let status = coordinator.snapshot().await;
    assert_eq!(status.pending_map, 1);
    assert_eq!(status.leased_map, 0);
}

#[tokio::test(start_paused = true)]
async fn late_report_after_reclaim_does_not_skip_the_task() {
    let coordinator = coordinator(&["a.txt"], 1);

    let task = request(&coordinator, 0).await;
    tokio::time::sleep(LEASE_TIMEOUT + Duration::from_secs(1)).await;

    // The slow worker finally reports, but the task was already put back.
    report(&coordinator, TaskPhase::Map, task.task_id).await;
    assert_eq!(coordinator.snapshot().await.phase(), TaskPhase::Map);

    let again = request(&coordinator, 1).await;
    assert_eq!(again.task_id, task.task_id);
    assert_eq!(again.phase(), TaskPhase::Map);
}

#[tokio::test(start_paused = true)]
async fn abandoned_reduce_task_is_granted_again_after_deadline() {
    let coordinator = coordinator(&["a.txt", "b.txt"], 1);

    for _ in 0..2 {
        let map = request(&coordinator, 0).await;
        assert_eq!(map.phase(), TaskPhase::Map);
        report(&coordinator, TaskPhase::Map, map.task_id).await;
    }

    let reduce = request(&coordinator, 0).await;
    assert_eq!(reduce.phase(), TaskPhase::Reduce);
    assert_eq!(reduce.task_id, 0);

    let idle = request(&coordinator, 1).await;
    assert_eq!(idle.task_id, IDLE_TASK_ID);

    tokio::time::sleep(LEASE_TIMEOUT + Duration::from_secs(1)).await;

    let status = coordinator.snapshot().await;
    assert_eq!(status.pending_map, 0);
    assert_eq!(status.pending_reduce, 1);
    assert_eq!(status.leased_reduce, 0);

    let regranted = request(&coordinator, 1).await;
    assert!(regranted.alive);
    assert_eq!(regranted.task_id, 0);
    assert_eq!(regranted.phase(), TaskPhase::Reduce);
    assert_eq!(regranted.n_map, 2);
}

#[tokio::test(start_paused = true)]
async fn workers_are_told_to_exit_once_done() {
    let coordinator = coordinator(&["a.txt"], 1);

    let map = request(&coordinator, 0).await;
    report(&coordinator, TaskPhase::Map, map.task_id).await;
    let reduce = request(&coordinator, 0).await;
    assert_eq!(reduce.phase(), TaskPhase::Reduce);
    assert_eq!(reduce.n_map, 1);
    report(&coordinator, TaskPhase::Reduce, reduce.task_id).await;

    assert!(coordinator.is_done().await);
    let exit = request(&coordinator, 0).await;
    assert!(!exit.alive);

    // A duplicate report after completion changes nothing.
    report(&coordinator, TaskPhase::Reduce, reduce.task_id).await;
    assert!(coordinator.is_done().await);
}

#[tokio::test]
async fn report_with_done_phase_is_rejected() {
    let coordinator = coordinator(&["a.txt"], 1);

    let status = coordinator
        .report_task(Request::new(ReportRequest {
            task_id: 0,
            phase: TaskPhase::Done.into(),
            worker_id: 0,
        }))
        .await
        .unwrap_err();

    assert_eq!(status.code(), tonic::Code::InvalidArgument);
}
