mod args;

use std::net::SocketAddr;
use std::time::Duration;

use args::Args;
use clap::Parser;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tonic::transport::Server;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use mr_coordinator::core::{CoordinatorServer, MRCoordinator};
use mr_coordinator::driver::wait_until_done;
use mr_coordinator::scheduler::Scheduler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Retrieve server configuration from command line.
    // Note: There are default values for every argument except the inputs.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let addr = SocketAddr::new(args.host, args.port);
    let scheduler = Scheduler::new(
        args.inputs,
        args.n_reduce,
        Duration::from_secs(args.lease_timeout_secs),
    )?;
    info!(
        "Starting job with {} map tasks and {} reduce tasks",
        scheduler.n_map(),
        scheduler.n_reduce()
    );

    let coordinator = MRCoordinator::new(scheduler);
    let shutdown = CancellationToken::new();

    let server = {
        let shutdown = shutdown.clone();
        let service = CoordinatorServer::new(coordinator.clone());
        tokio::spawn(async move {
            Server::builder()
                .add_service(service)
                .serve_with_shutdown(addr, shutdown.cancelled())
                .await
        })
    };
    info!("CoordinatorServer listening on {}", addr);

    tokio::select! {
        _ = wait_until_done(&coordinator, Duration::from_millis(args.poll_interval_ms)) => {
            tokio::time::sleep(Duration::from_millis(args.grace_period_ms)).await;
            info!("Shutting down coordinator");
        }
        result = signal::ctrl_c() => {
            if let Err(err) = result {
                error!("Unable to listen for shutdown signal: {}", err);
            }
            info!("Interrupted, shutting down with job unfinished");
        }
    }

    shutdown.cancel();
    server.await??;

    Ok(())
}
