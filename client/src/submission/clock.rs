//! Time source for the finality tracker.
//!
//! The tracker never calls `tokio::time::sleep` directly; it asks a
//! [`Clock`]. Production code uses [`TokioClock`]. Tests use
//! [`RecordingClock`] to observe every wait without spending wall time.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::time::Duration;

/// Suspends the current task.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Wait for `duration`. Must not block the executor thread.
    async fn sleep(&self, duration: Duration);
}

/// Real timers backed by the tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Records every requested sleep and returns immediately.
#[derive(Debug, Default)]
pub struct RecordingClock {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every duration passed to `sleep`, in call order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().clone()
    }

    /// Number of `sleep` calls so far.
    pub fn count(&self) -> usize {
        self.sleeps.lock().len()
    }
}

#[async_trait]
impl Clock for RecordingClock {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().push(duration);
        tokio::task::yield_now().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn recording_clock_records_without_waiting() {
        let clock = RecordingClock::new();
        clock.sleep(Duration::from_secs(3600)).await;
        clock.sleep(Duration::from_millis(5)).await;
        assert_eq!(
            clock.sleeps(),
            vec![Duration::from_secs(3600), Duration::from_millis(5)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_clock_advances_virtual_time() {
        let start = tokio::time::Instant::now();
        TokioClock.sleep(Duration::from_secs(2)).await;
        assert!(start.elapsed() >= Duration::from_secs(2));
    }
}
