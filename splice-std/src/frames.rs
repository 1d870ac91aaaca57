//! Frame schedulers backed by the tokio runtime.

use splice_core::{BoxFuture, FrameScheduler};
use std::time::Duration;

/// Resolves on the next scheduler turn, or after a fixed frame interval.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFrames {
    interval: Option<Duration>,
}

impl TokioFrames {
    /// Yield to the runtime once per frame.
    pub const fn new() -> Self {
        Self { interval: None }
    }

    /// Sleep for `interval` per frame (e.g. 16ms for a 60Hz display).
    pub const fn at_interval(interval: Duration) -> Self {
        Self {
            interval: Some(interval),
        }
    }
}

impl FrameScheduler for TokioFrames {
    fn next_frame(&self) -> BoxFuture<'_, ()> {
        let interval = self.interval;
        Box::pin(async move {
            match interval {
                Some(interval) => tokio::time::sleep(interval).await,
                None => tokio::task::yield_now().await,
            }
        })
    }
}
