use std::time::Duration;

use tracing::info;

use crate::core::MRCoordinator;

/// Poll [`MRCoordinator::is_done`] until the job completes.
pub async fn wait_until_done(coordinator: &MRCoordinator, poll_interval: Duration) {
    let mut ticker = tokio::time::interval(poll_interval);
    loop {
        ticker.tick().await;
        if coordinator.is_done().await {
            info!("All tasks complete");
            return;
        }
    }
}
