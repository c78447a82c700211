// The coordinator service is described here rather than in a `.proto` file.
// Message types live in `src/rpc.rs` as hand-derived prost messages, so the
// build only needs `tonic-build` for the client/server stubs and no `protoc`.
use tonic_build::manual::{Builder, Method, Service};

fn unary(name: &str, route: &str, input: &str, output: &str) -> Method {
    Method::builder()
        .name(name)
        .route_name(route)
        .input_type(format!("crate::rpc::{input}"))
        .output_type(format!("crate::rpc::{output}"))
        .codec_path("tonic::codec::ProstCodec")
        .build()
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let coordinator = Service::builder()
        .name("Coordinator")
        .package("mapreduce")
        .method(unary("register", "Register", "RegisterRequest", "RegisterResponse"))
        .method(unary("request_task", "RequestTask", "TaskRequest", "TaskReply"))
        .method(unary("report_task", "ReportTask", "ReportRequest", "ReportResponse"))
        .method(unary("status", "Status", "StatusRequest", "StatusResponse"))
        .build();

    Builder::new().compile(&[coordinator]);
}
