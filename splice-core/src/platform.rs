//! Collaborators the engine relies on but does not implement itself.

use crate::{
    error::BoxError,
    outcome::AssetList,
    wire::{RawResponse, WireRequest},
};
use std::{future::Future, pin::Pin};

/// A boxed future, as returned by the object-safe collaborator traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Turns server-supplied markup into markup that is safe to insert.
pub trait Sanitizer: Send + Sync + 'static {
    /// Sanitize raw HTML.
    fn sanitize(&self, raw_html: &str) -> String;
}

/// Callback run once when the history pops.
pub type PopStateCallback = Box<dyn FnOnce() + Send + 'static>;

/// Browser location control.
pub trait Navigator: Send + Sync + 'static {
    /// The current page URL.
    fn current_url(&self) -> String;

    /// Navigate to `url`.
    fn navigate(&self, url: &str);

    /// Run `callback` the next time the history pops, then forget it.
    fn once_pop_state(&self, callback: PopStateCallback);
}

/// Blocking user dialogs.
pub trait Dialogs: Send + Sync + 'static {
    /// Ask the user a yes/no question.
    fn confirm(&self, message: &str) -> bool;

    /// Show a message.
    fn alert(&self, message: &str);
}

/// Loads scripts, stylesheets and images announced by a response.
pub trait AssetLoader: Send + Sync + 'static {
    /// Load every asset in the list.
    fn load<'a>(&'a self, assets: &'a AssetList) -> BoxFuture<'a, Result<(), BoxError>>;
}

/// Waits for the next redraw boundary.
pub trait FrameScheduler: Send + Sync + 'static {
    /// Resolve once the next frame has been reached.
    fn next_frame(&self) -> BoxFuture<'_, ()>;
}

/// Supplies the anti-forgery token sent with every request.
pub trait TokenSource: Send + Sync + 'static {
    /// The token, if one is available.
    fn token(&self) -> Option<String>;
}

/// Performs the actual HTTP exchange.
pub trait HttpBackend: Send + Sync + 'static {
    /// POST the request and return whatever came back.
    ///
    /// An `Err` means no response was obtained at all.
    fn post(&self, request: WireRequest) -> BoxFuture<'_, Result<RawResponse, BoxError>>;
}

/// An asset loader that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAssets;

impl AssetLoader for NoAssets {
    fn load<'a>(&'a self, _assets: &'a AssetList) -> BoxFuture<'a, Result<(), BoxError>> {
        Box::pin(async { Ok(()) })
    }
}

/// A token source that never has a token.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoToken;

impl TokenSource for NoToken {
    fn token(&self) -> Option<String> {
        None
    }
}
