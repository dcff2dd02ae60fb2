use tokio_util::sync::CancellationToken;

/// Runs `f` unless `shutdown_signal` fires first.
pub async fn handle_abort<F, Fut>(
    shutdown_signal: &CancellationToken,
    f: F,
) -> crate::Result<Fut::Output>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future,
{
    tokio::select! {
        biased;
        _ = shutdown_signal.cancelled() => {
            Err(crate::Error::AbortDueToShutdown)
        }
        result = f() => {
            Ok(result)
        }
    }
}

/// Cancels `shutdown_signal` on Ctrl-C. The returned handle ends once the
/// token is cancelled either way.
pub fn cancel_on_ctrl_c(shutdown_signal: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if result.is_ok() {
                    log::warn!("Ctrl-C received, finishing with a partial report");
                    shutdown_signal.cancel();
                }
            }
            _ = shutdown_signal.cancelled() => {}
        }
    })
}
