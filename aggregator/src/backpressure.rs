use std::time::Duration;

use tokio_util::sync::CancellationToken;

use epochval_utils::shutdown::handle_abort;

/// Checkpoint between two batches. Sleeps a fixed amount so the oracle sees
/// at most one batch per `delay`, no matter how fast batches settle.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Waits out the delay. Errors with `AbortDueToShutdown` as soon as
    /// `shutdown_signal` fires.
    pub async fn checkpoint(
        &self,
        shutdown_signal: &CancellationToken,
    ) -> epochval_utils::Result<()> {
        handle_abort(shutdown_signal, || tokio::time::sleep(self.delay)).await
    }
}
