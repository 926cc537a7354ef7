//! Request scheduler enforcing concurrency and pacing limits
//!
//! This module provides the single gate every outbound request passes
//! through:
//! - A global semaphore caps the number of tasks running at once
//! - A start gate enforces a minimum delay between successive task starts
//! - Admission is first-in first-out in submission order
//!
//! The limiter never inspects what a task returns; a failed task propagates
//! its error to the `schedule` caller and the next queued task is admitted
//! regardless.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, Semaphore};

/// Default number of tasks allowed to run concurrently
pub const DEFAULT_MAX_CONCURRENT: usize = 1;

/// Default minimum delay between successive task starts
pub const DEFAULT_MIN_TIME: Duration = Duration::from_millis(200);

/// FIFO task scheduler with a concurrency cap and minimum start spacing
///
/// With the defaults (one task at a time, 200ms between starts) the
/// sustained request rate tops out at five starts per second with no
/// overlap, which is the polite pace for hammering a single site.
pub struct Limiter {
    /// Caps the number of tasks executing at once; tokio semaphores are
    /// fair, so waiters are admitted in submission order
    permits: Arc<Semaphore>,

    /// Timestamp of the most recent task start
    last_start: Mutex<Option<Instant>>,

    /// Minimum delay between successive task starts
    min_time: Duration,
}

impl Limiter {
    /// Creates a limiter admitting `max_concurrent` tasks at once with at
    /// least `min_time` between successive task starts
    pub fn new(max_concurrent: usize, min_time: Duration) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            last_start: Mutex::new(None),
            min_time,
        }
    }

    /// Runs `task` once the limiter admits it, returning its output
    ///
    /// The call suspends while queued, then while waiting out the minimum
    /// start gap, then for the task itself. Submission order is preserved.
    pub async fn schedule<F, Fut, T>(&self, task: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        // Never closed, so acquire only fails if the semaphore is dropped
        let _permit = self
            .permits
            .acquire()
            .await
            .expect("limiter semaphore closed");

        self.wait_for_start_slot().await;

        task().await
    }

    /// Sleeps until the minimum gap since the previous start has elapsed,
    /// then records this task's start
    ///
    /// The gate mutex is held across the sleep so starts are spaced and
    /// ordered even when the concurrency cap is above one.
    async fn wait_for_start_slot(&self) {
        let mut last_start = self.last_start.lock().await;

        if let Some(previous) = *last_start {
            let next_allowed = previous + self.min_time;
            let now = Instant::now();
            if next_allowed > now {
                tokio::time::sleep(next_allowed - now).await;
            }
        }

        *last_start = Some(Instant::now());
    }

    /// The configured minimum delay between task starts
    pub fn min_time(&self) -> Duration {
        self.min_time
    }

    /// Number of tasks that could start right now without queueing
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }
}

impl Default for Limiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONCURRENT, DEFAULT_MIN_TIME)
    }
}
