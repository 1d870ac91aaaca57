//! Timeout hook for time-limited aggregated listeners.

use splice_core::{AggregatedHook, BoxError, HookError, Verdict};
use std::time::Duration;
use tokio::time::timeout;

/// Wraps an aggregated listener; if it does not settle within the duration,
/// the broadcast is rejected with [`HookError::Timeout`].
///
/// # Example
///
/// ```rust,ignore
/// bus.on_async::<AjaxConfirmMessage, _>(TimeoutHook::secs(ModalConfirm::new(), 30));
/// ```
pub struct TimeoutHook<H> {
    inner: H,
    duration: Duration,
}

impl<H> TimeoutHook<H> {
    /// Create a new timeout hook.
    pub fn new(inner: H, duration: Duration) -> Self {
        Self { inner, duration }
    }

    /// Create a timeout hook with the limit in seconds.
    pub fn secs(inner: H, seconds: u64) -> Self {
        Self::new(inner, Duration::from_secs(seconds))
    }

    /// Create a timeout hook with the limit in milliseconds.
    pub fn millis(inner: H, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }

    /// Get the configured timeout duration.
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl<E: Send + Sync + 'static, H: AggregatedHook<E>> AggregatedHook<E> for TimeoutHook<H> {
    async fn on_event(&self, event: &E) -> Result<Verdict, BoxError> {
        match timeout(self.duration, self.inner.on_event(event)).await {
            Ok(result) => result,
            Err(_) => Err(Box::new(HookError::Timeout(self.duration))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use splice_core::AsyncFn;

    #[tokio::test]
    async fn test_timeout_trigger() {
        let slow = AsyncFn(|_: u8| async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            true
        });
        let hook = TimeoutHook::millis(slow, 10);

        let err = hook.on_event(&0u8).await.unwrap_err();
        assert!(err.to_string().contains("10ms"));
    }

    #[tokio::test]
    async fn test_timeout_success() {
        let fast = AsyncFn(|_: u8| async { false });
        let hook = TimeoutHook::millis(fast, 100);
        assert_eq!(hook.duration(), Duration::from_millis(100));
        assert_eq!(hook.on_event(&0u8).await.unwrap(), Verdict::Veto);
    }
}
