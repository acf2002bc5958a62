//! Signal handling for the record command

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use tokio::time::Instant;

/// Why a recording stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The requested duration elapsed
    DurationElapsed,
    /// The user pressed Ctrl+C
    Interrupted,
}

/// Shutdown flag set on Ctrl+C
pub struct ShutdownSignal {
    shutdown: Arc<AtomicBool>,
}

impl ShutdownSignal {
    /// Create a new shutdown signal handler
    pub fn new() -> Self {
        Self {
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get a clone of the shutdown flag
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Check if shutdown was requested
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    /// Setup signal handler
    pub fn setup(&self) {
        let shutdown = Arc::clone(&self.shutdown);

        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => shutdown.store(true, Ordering::SeqCst),
                Err(e) => log::warn!("failed to listen for Ctrl+C: {}", e),
            }
        });
    }

    /// Wait until `limit` elapses or shutdown is requested, calling `tick`
    /// with the elapsed time every `interval`
    pub async fn wait_for_stop<F>(
        &self,
        limit: StdDuration,
        interval: StdDuration,
        mut tick: F,
    ) -> StopReason
    where
        F: FnMut(StdDuration),
    {
        let start = Instant::now();
        let deadline = start + limit;

        loop {
            if self.is_shutdown() {
                return StopReason::Interrupted;
            }

            let now = Instant::now();
            if now >= deadline {
                return StopReason::DurationElapsed;
            }

            tick(now - start);
            tokio::time::sleep(interval.min(deadline - now)).await;
        }
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}
