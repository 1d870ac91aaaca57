//! # Hook Layer
//!
//! Hooks are the extension points other collaborators use to observe or veto a
//! request. There are two kinds:
//!
//! - [`CancellableHook`]: synchronous, receives the event mutably and returns a
//!   [`Verdict`] straight away.
//! - [`AggregatedHook`]: asynchronous, may suspend (e.g. to show a custom
//!   confirmation dialog); all listeners are awaited and their verdicts combined.
//!
//! Each hook is attached to a named [`HookPoint`], which fixes the event type a
//! listener receives.

use crate::{error::BoxError, response::IntoVerdict};
use std::{future::Future, pin::Pin};

/// Whether a hook listener lets the request continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Verdict {
    /// The listener has no objection.
    #[default]
    Pass,
    /// The listener cancels the current step.
    Veto,
}

impl Verdict {
    /// Logical AND of two verdicts.
    pub fn and(self, other: Verdict) -> Verdict {
        match (self, other) {
            (Verdict::Pass, Verdict::Pass) => Verdict::Pass,
            _ => Verdict::Veto,
        }
    }

    /// Returns `true` for [`Verdict::Pass`].
    pub fn is_pass(self) -> bool {
        self == Verdict::Pass
    }

    /// Returns `true` for [`Verdict::Veto`].
    pub fn is_veto(self) -> bool {
        self == Verdict::Veto
    }
}

/// A named extension point and the event its listeners receive.
pub trait HookPoint: Send + Sync + 'static {
    /// The name listeners register under.
    const NAME: &'static str;

    /// The event payload.
    type Event: Send + Sync + 'static;
}

/// A hook point broadcast synchronously; any listener may veto.
pub trait CancellablePoint: HookPoint {}

/// A hook point broadcast asynchronously; listeners' verdicts are aggregated.
pub trait AggregatedPoint: HookPoint {}

/// A synchronous, cancellable listener.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `CancellableHook<{E}>`",
    label = "missing `CancellableHook` implementation",
    note = "Implement `on_event`, or pass a closure `Fn(&mut {E}) -> bool`."
)]
pub trait CancellableHook<E>: Send + Sync + 'static {
    /// Called when the hook point is emitted.
    fn on_event(&self, event: &mut E) -> Verdict;
}

impl<E, F, R> CancellableHook<E> for F
where
    F: Fn(&mut E) -> R + Send + Sync + 'static,
    R: IntoVerdict,
{
    fn on_event(&self, event: &mut E) -> Verdict {
        crate::response::verdict_of(self(event))
    }
}

/// An asynchronous listener whose verdict is aggregated with its peers.
///
/// This trait uses native `async fn` for static dispatch. The bus stores
/// listeners as [`DynAggregatedHook`].
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `AggregatedHook<{E}>`",
    label = "missing `AggregatedHook` implementation",
    note = "Aggregated hooks must implement `on_event` for the event type `{E}`."
)]
pub trait AggregatedHook<E: Send + Sync + 'static>: Send + Sync + 'static {
    /// Called when the hook point is emitted.
    fn on_event(&self, event: &E) -> impl Future<Output = Result<Verdict, BoxError>> + Send;
}

/// Dynamic object-safe version of [`AggregatedHook`].
pub trait DynAggregatedHook<E>: Send + Sync + 'static {
    /// Called when the hook point is emitted (dynamic dispatch version).
    fn on_event_dyn<'a>(
        &'a self,
        event: &'a E,
    ) -> Pin<Box<dyn Future<Output = Result<Verdict, BoxError>> + Send + 'a>>;
}

impl<E: Send + Sync + 'static, T: AggregatedHook<E>> DynAggregatedHook<E> for T {
    fn on_event_dyn<'a>(
        &'a self,
        event: &'a E,
    ) -> Pin<Box<dyn Future<Output = Result<Verdict, BoxError>> + Send + 'a>> {
        Box::pin(self.on_event(event))
    }
}

/// Adapts an async closure into an [`AggregatedHook`].
///
/// The closure receives a clone of the event so the returned future may own it.
pub struct AsyncFn<F>(pub F);

impl<E, F, Fut, R> AggregatedHook<E> for AsyncFn<F>
where
    E: Clone + Send + Sync + 'static,
    F: Fn(E) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send,
    R: IntoVerdict,
{
    async fn on_event(&self, event: &E) -> Result<Verdict, BoxError> {
        (self.0)(event.clone()).await.into_verdict()
    }
}
