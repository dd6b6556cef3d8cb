use async_trait::async_trait;
use std::time::Duration;

/// Clock seam for everything the polling engine waits on: the refresh
/// interval and the pause safety timeout. Tests drive it under a paused
/// runtime clock.
#[async_trait]
pub trait TimeService: Send + Sync {
    async fn sleep(&self, duration: Duration);
}
