use async_trait::async_trait;
use std::time::Duration;

use crate::domain::ports::TimeService;

/// Production clock backed by the tokio timer. Tests run the same
/// implementation under a paused runtime clock.
pub struct SystemTimeService;

#[async_trait]
impl TimeService for SystemTimeService {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
