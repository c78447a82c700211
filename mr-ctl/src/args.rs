use clap::{Parser, Subcommand};

//
// For parsing user specified command.
//
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// The address of the coordinator server
    #[arg(short, long, default_value = "http://[::1]:8030")]
    pub address: String,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Display the job phase and how many tasks are pending or leased in each phase.
    Status,
    /// Block until the coordinator reports the job as done.
    Wait {
        /// Polling interval in milliseconds.
        #[arg(short, long, default_value = "1000")]
        interval_ms: u64,
    },
}
