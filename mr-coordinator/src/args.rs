use std::net::IpAddr;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Input files. Map task `i` processes the `i`th file.
    #[arg(required = true)]
    pub inputs: Vec<String>,

    /// The port for the server to run on.
    #[arg(short, long, default_value = "8030")]
    pub port: u16,

    /// The address for the server to bind to.
    #[arg(long, default_value = "::1")]
    pub host: IpAddr,

    /// Number of reduce tasks (output partitions).
    #[arg(short = 'r', long, default_value = "10")]
    pub n_reduce: u32,

    /// Seconds a worker may hold a task before it is handed out again.
    #[arg(long, default_value = "10")]
    pub lease_timeout_secs: u64,

    /// How often to check whether the job has finished, in milliseconds.
    #[arg(long, default_value = "1000")]
    pub poll_interval_ms: u64,

    /// How long to keep serving after the job finishes, so polling workers
    /// are told to exit, in milliseconds.
    #[arg(long, default_value = "1000")]
    pub grace_period_ms: u64,
}
