//! Logging hook for broadcast observation.

use splice_core::{AggregatedHook, BoxError, CancellableHook, Verdict};

/// A hook that logs every event it sees and never vetoes.
///
/// Register it on any hook point to trace the request flow.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingHook {
    label: &'static str,
}

impl LoggingHook {
    /// Create a logging hook whose records carry `label`.
    pub const fn new(label: &'static str) -> Self {
        Self { label }
    }

    fn record<E: std::fmt::Debug>(&self, event: &E) {
        #[cfg(feature = "tracing")]
        {
            tracing::info!(hook = self.label, ?event, "hook broadcast");
        }
        #[cfg(not(feature = "tracing"))]
        {
            let _ = (self.label, event);
        }
    }
}

impl<E: std::fmt::Debug> CancellableHook<E> for LoggingHook {
    fn on_event(&self, event: &mut E) -> Verdict {
        self.record(event);
        Verdict::Pass
    }
}

impl<E: std::fmt::Debug + Send + Sync + 'static> AggregatedHook<E> for LoggingHook {
    async fn on_event(&self, event: &E) -> Result<Verdict, BoxError> {
        self.record(event);
        Ok(Verdict::Pass)
    }
}
