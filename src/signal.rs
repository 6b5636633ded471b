use std::time::Duration;

use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

/// Which of the two composed cancellation sources fired first.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum CancelCause {
    /// The caller-owned token. Always terminal.
    Caller,
    /// The internally-owned per-call deadline. Retryable.
    Deadline,
}

/// Merged view over the caller token and the per-call deadline.
///
/// The deadline is fixed at construction and spans every attempt of the
/// call, backoff waits included. Polling is biased towards the caller
/// token so an external cancel is never misreported as a timeout, even
/// when both sources have fired. The token is borrowed: it is observed
/// here, never cancelled.
pub(crate) struct EffectiveSignal {
    caller: Option<CancellationToken>,
    deadline: Instant,
}

impl EffectiveSignal {
    pub(crate) fn new(caller: Option<CancellationToken>, timeout: Duration) -> Self {
        Self {
            caller,
            deadline: Instant::now() + timeout,
        }
    }

    pub(crate) fn caller(&self) -> Option<&CancellationToken> {
        self.caller.as_ref()
    }

    /// Resolves once either source fires, reporting the winner.
    ///
    /// The deadline sleep is created per wait and dropped as soon as the
    /// surrounding race resolves, so no timer outlives the call.
    pub(crate) async fn fired(&self) -> CancelCause {
        match &self.caller {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => CancelCause::Caller,
                _ = sleep_until(self.deadline) => CancelCause::Deadline,
            },
            None => {
                sleep_until(self.deadline).await;
                CancelCause::Deadline
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::task;
    use tokio::time::sleep;

    #[tokio::test]
    async fn deadline_fires_without_caller_token() {
        let signal = EffectiveSignal::new(None, Duration::from_millis(10));
        assert_eq!(signal.fired().await, CancelCause::Deadline);
    }

    #[tokio::test]
    async fn caller_cancel_wins_over_pending_deadline() {
        let token = CancellationToken::new();
        let signal = EffectiveSignal::new(Some(token.clone()), Duration::from_secs(5));

        let cancel_handle = task::spawn(async move {
            sleep(Duration::from_millis(10)).await;
            token.cancel();
        });

        assert_eq!(signal.fired().await, CancelCause::Caller);
        cancel_handle.await.expect("cancel task panicked");
    }

    #[tokio::test]
    async fn already_cancelled_token_reports_caller() {
        let token = CancellationToken::new();
        token.cancel();
        let signal = EffectiveSignal::new(Some(token), Duration::from_secs(5));

        assert_eq!(signal.fired().await, CancelCause::Caller);
    }

    #[tokio::test]
    async fn caller_reported_when_both_sources_fired() {
        let token = CancellationToken::new();
        token.cancel();
        let signal = EffectiveSignal::new(Some(token), Duration::from_millis(0));
        sleep(Duration::from_millis(5)).await;

        assert_eq!(signal.fired().await, CancelCause::Caller);
    }

    #[tokio::test]
    async fn fired_is_reobservable_after_first_report() {
        let signal = EffectiveSignal::new(None, Duration::from_millis(5));
        assert_eq!(signal.fired().await, CancelCause::Deadline);
        assert_eq!(signal.fired().await, CancelCause::Deadline);
    }
}
