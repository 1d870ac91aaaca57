//! The collaborators every request shares.

use crate::{config::EngineConfig, lifecycle::Request, options::RequestOptions};
use splice_core::{
    AssetLoader, ConstructionError, Dialogs, Document, ElementId, FrameScheduler, HookBus,
    HttpBackend, Navigator, NoAssets, NoToken, Sanitizer, TokenSource,
};
use splice_std::{HtmlSanitizer, TokioFrames};
use std::sync::Arc;

/// The page, the hook bus and the platform services a request runs against.
///
/// Cloning is cheap; requests each hold their own clone.
#[derive(Clone)]
pub struct Environment {
    document: Arc<dyn Document>,
    hooks: Arc<HookBus>,
    backend: Arc<dyn HttpBackend>,
    sanitizer: Arc<dyn Sanitizer>,
    navigator: Arc<dyn Navigator>,
    dialogs: Arc<dyn Dialogs>,
    assets: Arc<dyn AssetLoader>,
    frames: Arc<dyn FrameScheduler>,
    token: Arc<dyn TokenSource>,
    config: EngineConfig,
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("hooks", &self.hooks)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Environment {
    /// Start building an environment from the collaborators that have no default.
    pub fn builder(
        document: Arc<dyn Document>,
        backend: Arc<dyn HttpBackend>,
        navigator: Arc<dyn Navigator>,
        dialogs: Arc<dyn Dialogs>,
    ) -> EnvironmentBuilder {
        EnvironmentBuilder {
            document,
            backend,
            navigator,
            dialogs,
            hooks: None,
            sanitizer: None,
            assets: None,
            frames: None,
            token: None,
            config: EngineConfig::default(),
        }
    }

    /// Define a request programmatically.
    pub fn request(
        &self,
        element: Option<ElementId>,
        handler: &str,
        options: RequestOptions,
    ) -> Result<Request, ConstructionError> {
        Request::new(self, element, handler, options)
    }

    /// Define a request from an element's `data-request*` attributes.
    pub fn request_from_element(&self, element: ElementId) -> Result<Request, ConstructionError> {
        Request::from_element(self, element)
    }

    /// The page.
    pub fn document(&self) -> &Arc<dyn Document> {
        &self.document
    }

    /// The global hook bus.
    pub fn hooks(&self) -> &Arc<HookBus> {
        &self.hooks
    }

    /// The HTTP backend.
    pub fn backend(&self) -> &Arc<dyn HttpBackend> {
        &self.backend
    }

    /// The markup sanitizer.
    pub fn sanitizer(&self) -> &Arc<dyn Sanitizer> {
        &self.sanitizer
    }

    /// Location control.
    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    /// User dialogs.
    pub fn dialogs(&self) -> &Arc<dyn Dialogs> {
        &self.dialogs
    }

    /// Asset loading.
    pub fn assets(&self) -> &Arc<dyn AssetLoader> {
        &self.assets
    }

    /// Frame scheduling.
    pub fn frames(&self) -> &Arc<dyn FrameScheduler> {
        &self.frames
    }

    /// Anti-forgery token source.
    pub fn token(&self) -> &Arc<dyn TokenSource> {
        &self.token
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

/// Builder for [`Environment`].
pub struct EnvironmentBuilder {
    document: Arc<dyn Document>,
    backend: Arc<dyn HttpBackend>,
    navigator: Arc<dyn Navigator>,
    dialogs: Arc<dyn Dialogs>,
    hooks: Option<Arc<HookBus>>,
    sanitizer: Option<Arc<dyn Sanitizer>>,
    assets: Option<Arc<dyn AssetLoader>>,
    frames: Option<Arc<dyn FrameScheduler>>,
    token: Option<Arc<dyn TokenSource>>,
    config: EngineConfig,
}

impl EnvironmentBuilder {
    /// Share an existing hook bus (default: a fresh one).
    pub fn hooks(mut self, hooks: Arc<HookBus>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Set the sanitizer (default: [`HtmlSanitizer`]).
    pub fn sanitizer(mut self, sanitizer: impl Sanitizer) -> Self {
        self.sanitizer = Some(Arc::new(sanitizer));
        self
    }

    /// Set the asset loader (default: [`NoAssets`]).
    pub fn assets(mut self, assets: Arc<dyn AssetLoader>) -> Self {
        self.assets = Some(assets);
        self
    }

    /// Set the frame scheduler (default: [`TokioFrames`]).
    pub fn frames(mut self, frames: Arc<dyn FrameScheduler>) -> Self {
        self.frames = Some(frames);
        self
    }

    /// Set the token source (default: [`NoToken`]).
    pub fn token(mut self, token: impl TokenSource) -> Self {
        self.token = Some(Arc::new(token));
        self
    }

    /// Set the engine configuration.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Finish.
    pub fn build(self) -> Environment {
        Environment {
            document: self.document,
            hooks: self.hooks.unwrap_or_default(),
            backend: self.backend,
            sanitizer: self.sanitizer.unwrap_or_else(|| Arc::new(HtmlSanitizer::new())),
            navigator: self.navigator,
            dialogs: self.dialogs,
            assets: self.assets.unwrap_or_else(|| Arc::new(NoAssets)),
            frames: self.frames.unwrap_or_else(|| Arc::new(TokioFrames::new())),
            token: self.token.unwrap_or_else(|| Arc::new(NoToken)),
            config: self.config,
        }
    }
}
