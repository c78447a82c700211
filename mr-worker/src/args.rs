use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// The address of the coordinator server
    #[arg(short = 'j', long = "join", default_value = "http://[::1]:8030")]
    pub address: String,

    /// Name of the workload to run.
    #[arg(short, long, default_value = "wc")]
    pub workload: String,

    /// Directory holding intermediate shards and outputs. Must be shared by all workers.
    #[arg(short, long, default_value = ".")]
    pub dir: String,

    /// How long to wait before asking again when no task is available, in milliseconds.
    #[arg(long, default_value = "1000")]
    pub backoff_ms: u64,

    /// Auxiliary arguments to pass to the MapReduce application.
    #[clap(value_parser, last = true)]
    pub aux: Vec<String>,
}
