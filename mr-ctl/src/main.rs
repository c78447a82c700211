mod args;
use args::{Args, Commands};
use clap::Parser;
use std::time::Duration;

mod core;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.command {
        Commands::Status => core::status(args.address).await?,
        Commands::Wait { interval_ms } => {
            core::wait(args.address, Duration::from_millis(interval_ms)).await?
        }
    }

    Ok(())
}
