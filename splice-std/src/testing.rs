//! Testing utilities for splice.
//!
//! This module provides doubles for every collaborator so a request can run
//! end to end without a browser or a server.
//!
//! # Features
//!
//! - [`RecordingHook`]: A hook that records every event it receives
//! - [`ScriptedBackend`]: An HTTP backend that replays canned responses
//! - [`RecordingNavigator`]: A navigator that records navigations and fakes pop-state
//! - [`ScriptedDialogs`]: Confirm/alert dialogs with a fixed answer
//! - [`RecordingAssets`]: An asset loader that records what it was asked to load
//! - [`ImmediateFrames`]: A frame scheduler that resolves at once and counts frames

use futures::channel::oneshot;
use splice_core::{
    AggregatedHook, AssetList, AssetLoader, BoxError, BoxFuture, CancellableHook, Dialogs,
    FrameScheduler, HttpBackend, Navigator, PopStateCallback, RawResponse, Verdict, WireRequest,
    wire::HEADER_HANDLER,
};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Recording Hook
// ============================================================================

/// A hook that records all events it receives.
///
/// Works as both a cancellable and an aggregated listener.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = RecordingHook::<RedirectEvent>::new();
/// bus.on::<AjaxRedirect, _>(recorder.clone());
///
/// request.send().await?;
///
/// assert_eq!(recorder.count(), 1);
/// ```
pub struct RecordingHook<E: Clone> {
    events: Arc<Mutex<Vec<E>>>,
    verdict: Verdict,
}

impl<E: Clone> RecordingHook<E> {
    /// Create a new recording hook that passes.
    pub fn new() -> Self {
        Self::with_verdict(Verdict::Pass)
    }

    /// Create a recording hook that returns a specific verdict.
    pub fn with_verdict(verdict: Verdict) -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            verdict,
        }
    }

    /// Create a recording hook that vetoes.
    pub fn vetoing() -> Self {
        Self::with_verdict(Verdict::Veto)
    }

    /// Get a clone of the recorded events.
    pub fn events(&self) -> Vec<E> {
        self.events.lock().unwrap().clone()
    }

    /// Get the number of recorded events.
    pub fn count(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

impl<E: Clone> Default for RecordingHook<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Clone> Clone for RecordingHook<E> {
    fn clone(&self) -> Self {
        Self {
            events: self.events.clone(),
            verdict: self.verdict,
        }
    }
}

impl<E: Clone + Send + 'static> CancellableHook<E> for RecordingHook<E> {
    fn on_event(&self, event: &mut E) -> Verdict {
        self.events.lock().unwrap().push(event.clone());
        self.verdict
    }
}

impl<E: Clone + Send + Sync + 'static> AggregatedHook<E> for RecordingHook<E> {
    async fn on_event(&self, event: &E) -> Result<Verdict, BoxError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(self.verdict)
    }
}

// ============================================================================
// Scripted Backend
// ============================================================================

/// Opens a gated reply so its response is delivered.
pub struct Gate(oneshot::Sender<()>);

impl Gate {
    /// Let the held response through.
    pub fn open(self) {
        let _ = self.0.send(());
    }
}

struct Reply {
    handler: Option<String>,
    response: Result<RawResponse, String>,
    gate: Option<oneshot::Receiver<()>>,
}

/// An HTTP backend that answers from a script.
///
/// Replies are consumed in the order they were queued. A reply bound to a
/// handler only answers requests for that handler. Every request is recorded.
#[derive(Clone, Default)]
pub struct ScriptedBackend {
    replies: Arc<Mutex<Vec<Reply>>>,
    requests: Arc<Mutex<Vec<WireRequest>>>,
}

impl ScriptedBackend {
    /// Create a backend with no replies queued.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, reply: Reply) {
        self.replies.lock().unwrap().push(reply);
    }

    /// Answer the next request with `response`.
    pub fn respond(&self, response: RawResponse) -> &Self {
        self.push(Reply {
            handler: None,
            response: Ok(response),
            gate: None,
        });
        self
    }

    /// Answer the next request for `handler` with `response`.
    pub fn respond_to(&self, handler: &str, response: RawResponse) -> &Self {
        self.push(Reply {
            handler: Some(handler.to_owned()),
            response: Ok(response),
            gate: None,
        });
        self
    }

    /// Answer the next request for `handler`, but only once the gate opens.
    pub fn respond_gated(&self, handler: &str, response: RawResponse) -> Gate {
        let (tx, rx) = oneshot::channel();
        self.push(Reply {
            handler: Some(handler.to_owned()),
            response: Ok(response),
            gate: Some(rx),
        });
        Gate(tx)
    }

    /// Fail the next request as if no response arrived.
    pub fn fail(&self, message: &str) -> &Self {
        self.push(Reply {
            handler: None,
            response: Err(message.to_owned()),
            gate: None,
        });
        self
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<WireRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn take_reply(&self, handler: Option<&str>) -> Option<Reply> {
        let mut replies = self.replies.lock().unwrap();
        let index = replies
            .iter()
            .position(|reply| reply.handler.is_none() || reply.handler.as_deref() == handler)?;
        Some(replies.remove(index))
    }
}

impl HttpBackend for ScriptedBackend {
    fn post(&self, request: WireRequest) -> BoxFuture<'_, Result<RawResponse, BoxError>> {
        let handler = request.header(HEADER_HANDLER).map(str::to_owned);
        self.requests.lock().unwrap().push(request);
        let reply = self.take_reply(handler.as_deref());
        Box::pin(async move {
            let Some(reply) = reply else {
                return Err("no scripted response left".into());
            };
            if let Some(gate) = reply.gate {
                gate.await.map_err(|_| "gate dropped before opening")?;
            }
            reply.response.map_err(BoxError::from)
        })
    }
}

// ============================================================================
// Recording Navigator
// ============================================================================

/// A navigator that records navigations instead of performing them.
///
/// A navigation that only changes the `#fragment` updates [`current_url`]
/// the way a browser would; [`pop_state`] fires pending pop-state callbacks.
///
/// [`current_url`]: Navigator::current_url
/// [`pop_state`]: RecordingNavigator::pop_state
#[derive(Clone)]
pub struct RecordingNavigator {
    current: Arc<Mutex<String>>,
    navigations: Arc<Mutex<Vec<String>>>,
    pop_listeners: Arc<Mutex<Vec<PopStateCallback>>>,
}

impl RecordingNavigator {
    /// Start at `url`.
    pub fn new(url: &str) -> Self {
        Self {
            current: Arc::new(Mutex::new(url.to_owned())),
            navigations: Arc::new(Mutex::new(Vec::new())),
            pop_listeners: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// URLs navigated to so far.
    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }

    /// Number of pop-state callbacks waiting.
    pub fn pending_pop_listeners(&self) -> usize {
        self.pop_listeners.lock().unwrap().len()
    }

    /// Simulate the browser popping history: run and drop every callback.
    pub fn pop_state(&self) {
        let listeners = std::mem::take(&mut *self.pop_listeners.lock().unwrap());
        for listener in listeners {
            listener();
        }
    }
}

impl Navigator for RecordingNavigator {
    fn current_url(&self) -> String {
        self.current.lock().unwrap().clone()
    }

    fn navigate(&self, url: &str) {
        self.navigations.lock().unwrap().push(url.to_owned());
        let mut current = self.current.lock().unwrap();
        let base = current.split('#').next().unwrap_or("").to_owned();
        if let Some(fragment) = url.strip_prefix('#') {
            *current = format!("{base}#{fragment}");
        } else {
            *current = url.to_owned();
        }
    }

    fn once_pop_state(&self, callback: PopStateCallback) {
        self.pop_listeners.lock().unwrap().push(callback);
    }
}

// ============================================================================
// Scripted Dialogs
// ============================================================================

/// Dialogs that answer every confirmation the same way and record everything.
#[derive(Clone)]
pub struct ScriptedDialogs {
    answer: bool,
    confirms: Arc<Mutex<Vec<String>>>,
    alerts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedDialogs {
    /// Answer confirmations with `answer`.
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            confirms: Arc::new(Mutex::new(Vec::new())),
            alerts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Confirmation prompts shown so far.
    pub fn confirms(&self) -> Vec<String> {
        self.confirms.lock().unwrap().clone()
    }

    /// Alerts shown so far.
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }
}

impl Default for ScriptedDialogs {
    fn default() -> Self {
        Self::answering(true)
    }
}

impl Dialogs for ScriptedDialogs {
    fn confirm(&self, message: &str) -> bool {
        self.confirms.lock().unwrap().push(message.to_owned());
        self.answer
    }

    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_owned());
    }
}

// ============================================================================
// Recording Assets
// ============================================================================

/// An asset loader that records every list it is asked to load.
#[derive(Clone, Default)]
pub struct RecordingAssets {
    loads: Arc<Mutex<Vec<AssetList>>>,
}

impl RecordingAssets {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Asset lists loaded so far.
    pub fn loads(&self) -> Vec<AssetList> {
        self.loads.lock().unwrap().clone()
    }
}

impl AssetLoader for RecordingAssets {
    fn load<'a>(&'a self, assets: &'a AssetList) -> BoxFuture<'a, Result<(), BoxError>> {
        self.loads.lock().unwrap().push(assets.clone());
        Box::pin(async { Ok(()) })
    }
}

// ============================================================================
// Immediate Frames
// ============================================================================

/// A frame scheduler that resolves immediately and counts how often it was asked.
#[derive(Clone, Default)]
pub struct ImmediateFrames {
    frames: Arc<AtomicUsize>,
}

impl ImmediateFrames {
    /// Create a new counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames waited for so far.
    pub fn count(&self) -> usize {
        self.frames.load(Ordering::SeqCst)
    }
}

impl FrameScheduler for ImmediateFrames {
    fn next_frame(&self) -> BoxFuture<'_, ()> {
        self.frames.fetch_add(1, Ordering::SeqCst);
        Box::pin(async {})
    }
}
