//! Hook registry keyed by hook name.
//!
//! Listeners are kept in registration order per name. Emitting snapshots the
//! current list first, so a listener may register or remove listeners while a
//! broadcast is running without affecting that broadcast.

use crate::{
    error::HookError,
    hook::{
        AggregatedHook, AggregatedPoint, CancellableHook, CancellablePoint, DynAggregatedHook,
        HookPoint, Verdict,
    },
};
use futures::future::try_join_all;
use std::{
    any::Any,
    collections::HashMap,
    sync::{
        Arc, PoisonError, RwLock,
        atomic::{AtomicU64, Ordering},
    },
};

/// Identifies a registered listener so it can be removed again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle {
    name: &'static str,
    id: u64,
}

impl ListenerHandle {
    /// The hook name the listener is registered under.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

struct Entry {
    id: u64,
    listener: Arc<dyn Any + Send + Sync>,
}

/// The global hook bus shared by every request.
#[derive(Default)]
pub struct HookBus {
    entries: RwLock<HashMap<&'static str, Vec<Entry>>>,
    next_id: AtomicU64,
}

impl std::fmt::Debug for HookBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut map = f.debug_map();
        for (name, list) in entries.iter() {
            map.entry(name, &list.len());
        }
        map.finish()
    }
}

impl HookBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a synchronous listener on a cancellable hook point.
    pub fn on<P, H>(&self, hook: H) -> ListenerHandle
    where
        P: CancellablePoint,
        H: CancellableHook<P::Event>,
    {
        let listener: Arc<dyn CancellableHook<P::Event>> = Arc::new(hook);
        self.insert(P::NAME, Arc::new(listener))
    }

    /// Register an asynchronous listener on an aggregated hook point.
    pub fn on_async<P, H>(&self, hook: H) -> ListenerHandle
    where
        P: AggregatedPoint,
        H: AggregatedHook<P::Event>,
    {
        let listener: Arc<dyn DynAggregatedHook<P::Event>> = Arc::new(hook);
        self.insert(P::NAME, Arc::new(listener))
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn off(&self, handle: ListenerHandle) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let Some(list) = entries.get_mut(handle.name) else {
            return false;
        };
        let before = list.len();
        list.retain(|entry| entry.id != handle.id);
        before != list.len()
    }

    /// Whether any listener is registered under `name`.
    pub fn has_listeners(&self, name: &str) -> bool {
        self.listener_count(name) > 0
    }

    /// Number of listeners registered under `name`.
    pub fn listener_count(&self, name: &str) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .map_or(0, Vec::len)
    }

    /// Broadcast synchronously. Every listener runs; the result is the
    /// logical AND of their verdicts.
    pub fn emit<P: CancellablePoint>(&self, event: &mut P::Event) -> Verdict {
        let mut verdict = Verdict::Pass;
        for hook in self.snapshot::<Arc<dyn CancellableHook<P::Event>>>(P::NAME) {
            verdict = verdict.and(hook.on_event(event));
        }
        verdict
    }

    /// Broadcast asynchronously. All listeners are awaited concurrently; the
    /// first rejection to settle wins, otherwise verdicts are AND-ed.
    pub async fn emit_async<P: AggregatedPoint>(
        &self,
        event: &P::Event,
    ) -> Result<Verdict, HookError> {
        let hooks = self.snapshot::<Arc<dyn DynAggregatedHook<P::Event>>>(P::NAME);
        let verdicts = try_join_all(hooks.iter().map(|hook| hook.on_event_dyn(event)))
            .await
            .map_err(HookError::Rejected)?;
        Ok(verdicts.into_iter().fold(Verdict::Pass, Verdict::and))
    }

    fn insert(&self, name: &'static str, listener: Arc<dyn Any + Send + Sync>) -> ListenerHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name)
            .or_default()
            .push(Entry { id, listener });
        ListenerHandle { name, id }
    }

    fn snapshot<T: Clone + 'static>(&self, name: &'static str) -> Vec<T> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(name)
            .into_iter()
            .flatten()
            .filter_map(|entry| entry.listener.downcast_ref::<T>().cloned())
            .collect()
    }
}

/// Keeps the type-level link between a hook point and its name visible to callers.
pub fn hook_name<P: HookPoint>() -> &'static str {
    P::NAME
}
