//! MapReduce applications that workers can run, looked up by name.

use common::Workload;

pub mod grep;
pub mod vertex_degree;
pub mod wc;

/// Names accepted by [`try_named`].
pub const NAMES: [&str; 3] = ["wc", "grep", "vertex-degree"];

/// Look up a workload by name.
pub fn try_named(name: &str) -> Option<Workload> {
    match name {
        "wc" => Some(wc::WORKLOAD),
        "grep" => Some(grep::WORKLOAD),
        "vertex-degree" => Some(vertex_degree::WORKLOAD),
        _ => None,
    }
}
