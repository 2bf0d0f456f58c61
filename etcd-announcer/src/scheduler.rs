use std::future::Future;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use crate::error::AnnounceError;

/// Re-run `action` every `period` until it fails or `cancel` fires.
///
/// The caller is expected to have run `action` once already, so the first
/// invocation here happens one full period after start. Invocations never
/// overlap: a tick that arrives while `action` is still running is skipped.
pub async fn run<F, Fut>(
    period: Duration,
    mut action: F,
    cancel: CancellationToken,
) -> Result<(), AnnounceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), AnnounceError>>,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // Completes immediately
    ticker.tick().await;

    tracing::info!("Announcing every {}s", period.as_secs());

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!("Scheduler shutting down");
                break;
            }
            _ = ticker.tick() => {
                action().await?;
            }
        }
    }

    Ok(())
}
