mod args;

use std::time::Duration;

use anyhow::anyhow;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use args::Args;
use common::rpc::CoordinatorClient;
use common::store::LocalStore;
use common::utils::aux_bytes;
use mr_worker::core::MRWorker;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let workload = workload::try_named(&args.workload)
        .ok_or_else(|| anyhow!("The workload `{}` is not a known workload", args.workload))?;

    // Any transport failure from here on ends the process.
    let client = CoordinatorClient::connect(args.address).await?;
    let store = LocalStore::new(args.dir);

    let mut worker = MRWorker::new(client, store, workload, aux_bytes(&args.aux))
        .with_backoff(Duration::from_millis(args.backoff_ms));
    let completed = worker.run().await?;

    info!("Worker exited after completing {} tasks", completed);
    Ok(())
}
