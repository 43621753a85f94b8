//! Request pacing
//!
//! The archiver issues one request at a time and waits the configured delay
//! before each one after the seed page, which gives a single global rate limit.

use std::time::Duration;

/// Inserts the configured delay before outbound requests
#[derive(Debug, Clone)]
pub struct Pacer {
    delay: Duration,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Waits the configured delay
    pub async fn wait(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}
