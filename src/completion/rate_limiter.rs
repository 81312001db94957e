//! @ai:module:intent Throttle and cap requests toward the completion provider
//! @ai:module:layer infrastructure
//! @ai:module:public_api RequestWindow, ProviderGate
//! @ai:module:stateless false

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{AcquireError, Mutex, OwnedSemaphorePermit, Semaphore};
use tokio::time::Instant;

const WINDOW: Duration = Duration::from_secs(60);

/// @ai:intent Sliding one-minute window of request start times
pub struct RequestWindow {
    started: Mutex<VecDeque<Instant>>,
    per_minute: usize,
}

impl RequestWindow {
    /// @ai:pre per_minute > 0 (zero is treated as one)
    /// @ai:effects pure
    pub fn new(per_minute: u32) -> Self {
        let per_minute = per_minute.max(1) as usize;
        Self {
            started: Mutex::new(VecDeque::with_capacity(per_minute)),
            per_minute,
        }
    }

    /// @ai:intent Wait until fewer than `per_minute` requests started in the last minute, then record one
    /// @ai:effects state:write, time
    pub async fn acquire(&self) {
        loop {
            let wait_until = {
                let mut started = self.started.lock().await;
                let now = Instant::now();
                while started.front().is_some_and(|t| now.duration_since(*t) >= WINDOW) {
                    started.pop_front();
                }

                if started.len() < self.per_minute {
                    started.push_back(now);
                    return;
                }

                match started.front() {
                    Some(oldest) => *oldest + WINDOW,
                    None => now,
                }
            };

            tokio::time::sleep_until(wait_until).await;
        }
    }

    /// Requests counted in the current window
    pub async fn in_window(&self) -> usize {
        self.started.lock().await.len()
    }
}

/// @ai:intent Admission control toward the provider: rate plus in-flight cap, shared by all requests
pub struct ProviderGate {
    window: RequestWindow,
    in_flight: Arc<Semaphore>,
}

impl ProviderGate {
    /// @ai:effects pure
    pub fn new(requests_per_minute: u32, max_concurrent: usize) -> Self {
        Self {
            window: RequestWindow::new(requests_per_minute),
            in_flight: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    /// @ai:intent Wait for a concurrency slot and a rate token
    /// @ai:post returned permit holds the slot until dropped
    /// @ai:effects state:write, time
    pub async fn admit(&self) -> Result<OwnedSemaphorePermit, AcquireError> {
        let permit = self.in_flight.clone().acquire_owned().await?;
        self.window.acquire().await;
        Ok(permit)
    }

    pub fn available_slots(&self) -> usize {
        self.in_flight.available_permits()
    }
}
