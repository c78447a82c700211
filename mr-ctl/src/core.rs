use std::time::Duration;

use anyhow::Result;
use tonic::transport::Channel;

use common::rpc::{CoordinatorClient, StatusRequest, StatusResponse};

async fn fetch_status(client: &mut CoordinatorClient<Channel>) -> Result<StatusResponse> {
    let response = client.status(StatusRequest {}).await?;
    Ok(response.into_inner())
}

pub async fn status(address: String) -> Result<()> {
    let mut client = CoordinatorClient::connect(address).await?;
    let status = fetch_status(&mut client).await?;

    println!("[Status]");
    println!("phase:   {}", status.phase());
    println!("workers: {}", status.workers);
    println!("map:     {} pending, {} leased", status.pending_map, status.leased_map);
    println!(
        "reduce:  {} pending, {} leased",
        status.pending_reduce, status.leased_reduce
    );

    Ok(())
}

pub async fn wait(address: String, interval: Duration) -> Result<()> {
    let mut client = CoordinatorClient::connect(address).await?;

    loop {
        let status = fetch_status(&mut client).await?;
        if status.done {
            println!("Job done");
            return Ok(());
        }
        tokio::time::sleep(interval).await;
    }
}
