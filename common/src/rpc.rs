//! Wire types and gRPC stubs for the coordinator service.
//!
//! NOTE: The client/server stubs are generated by `build.rs` and refer to the
//!       messages below by path (`crate::rpc::*`). If you rename a message,
//!       make sure to propagate the change to `build.rs`.

pub use coordinator_client::CoordinatorClient;
pub use coordinator_server::{Coordinator, CoordinatorServer};

include!(concat!(env!("OUT_DIR"), "/mapreduce.Coordinator.rs"));

/// Global stage of the job.
///
/// `Done` is never stored by the coordinator, it is derived from the
/// pools and leases being empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum TaskPhase {
    Map = 0,
    Reduce = 1,
    Done = 2,
}

impl TaskPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPhase::Map => "map",
            TaskPhase::Reduce => "reduce",
            TaskPhase::Done => "done",
        }
    }
}

impl std::fmt::Display for TaskPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RegisterRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RegisterResponse {
    #[prost(int32, tag = "1")]
    pub worker_id: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TaskRequest {
    #[prost(int32, tag = "1")]
    pub worker_id: i32,
}

/// A task grant, or one of the two sentinels.
///
/// `alive == false` tells the worker to exit, `task_id == -1` tells it to
/// back off and ask again.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TaskReply {
    #[prost(bool, tag = "1")]
    pub alive: bool,
    #[prost(int32, tag = "2")]
    pub task_id: i32,
    #[prost(enumeration = "TaskPhase", tag = "3")]
    pub phase: i32,
    /// Input reference. A file name for map tasks, unused for reduce tasks.
    #[prost(string, tag = "4")]
    pub input: String,
    #[prost(int32, tag = "5")]
    pub n_map: i32,
    #[prost(int32, tag = "6")]
    pub n_reduce: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ReportRequest {
    #[prost(int32, tag = "1")]
    pub task_id: i32,
    #[prost(enumeration = "TaskPhase", tag = "2")]
    pub phase: i32,
    /// Diagnostic only. Reports are accepted from any worker.
    #[prost(int32, tag = "3")]
    pub worker_id: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ReportResponse {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StatusRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StatusResponse {
    #[prost(enumeration = "TaskPhase", tag = "1")]
    pub phase: i32,
    #[prost(uint32, tag = "2")]
    pub pending_map: u32,
    #[prost(uint32, tag = "3")]
    pub leased_map: u32,
    #[prost(uint32, tag = "4")]
    pub pending_reduce: u32,
    #[prost(uint32, tag = "5")]
    pub leased_reduce: u32,
    #[prost(uint32, tag = "6")]
    pub workers: u32,
    #[prost(bool, tag = "7")]
    pub done: bool,
}
