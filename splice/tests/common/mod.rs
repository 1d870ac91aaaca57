#![allow(dead_code)]

use splice::{
    EngineConfig, Environment, HandlerName, RawResponse, RequestDescriptor, RequestOptions,
    std_impls::{Element, MemoryDocument},
    testing::{
        ImmediateFrames, RecordingAssets, RecordingNavigator, ScriptedBackend, ScriptedDialogs,
    },
};
use std::sync::Arc;

pub const PAGE_URL: &str = "https://example.test/page";

// ============================================================================
// Fixture
// ============================================================================

/// A page with a form, a button inside it and a few update targets.
pub struct Fixture {
    pub doc: Arc<MemoryDocument>,
    pub backend: ScriptedBackend,
    pub navigator: RecordingNavigator,
    pub dialogs: ScriptedDialogs,
    pub assets: RecordingAssets,
    pub frames: ImmediateFrames,
    pub env: Environment,
    pub form: splice::ElementId,
    pub button: splice::ElementId,
}

impl Fixture {
    pub fn new() -> Self {
        Self::build(EngineConfig::default(), true)
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self::build(config, true)
    }

    pub fn answering(answer: bool) -> Self {
        Self::build(EngineConfig::default(), answer)
    }

    fn build(config: EngineConfig, answer: bool) -> Self {
        let doc = Arc::new(MemoryDocument::new());
        let form = doc.insert(None, Element::new("form").id("contact"));
        doc.insert(
            Some(form),
            Element::new("input").attr("name", "name").value("Ada"),
        );
        doc.insert(
            Some(form),
            Element::new("input").attr("name", "email").value("ada@example.test"),
        );
        let button = doc.insert(Some(form), Element::new("button").id("save"));
        doc.insert(None, Element::new("div").id("foo").html("old"));
        doc.insert(None, Element::new("ul").id("list").html("A"));
        doc.insert(None, Element::new("div").id("left").html("left"));
        doc.insert(None, Element::new("div").id("right").html("right"));

        let backend = ScriptedBackend::new();
        let navigator = RecordingNavigator::new(PAGE_URL);
        let dialogs = ScriptedDialogs::answering(answer);
        let assets = RecordingAssets::new();
        let frames = ImmediateFrames::new();

        let env = Environment::builder(
            doc.clone(),
            Arc::new(backend.clone()),
            Arc::new(navigator.clone()),
            Arc::new(dialogs.clone()),
        )
        .assets(Arc::new(assets.clone()))
        .frames(Arc::new(frames.clone()))
        .config(config)
        .build();

        Self {
            doc,
            backend,
            navigator,
            dialogs,
            assets,
            frames,
            env,
            form,
            button,
        }
    }

    /// A request from the button with the given options.
    pub fn request(&self, handler: &str, options: RequestOptions) -> splice::Request {
        self.env
            .request(Some(self.button), handler, options)
            .expect("valid request")
    }

    /// A frozen descriptor, for driving stages directly.
    pub fn descriptor(&self, options: RequestOptions) -> Arc<RequestDescriptor> {
        Arc::new(RequestDescriptor::resolve(
            &self.env,
            HandlerName::parse("onSave").unwrap(),
            Some(self.button),
            options,
        ))
    }

    pub fn html(&self, selector: &str) -> String {
        self.doc.html_of(selector).unwrap_or_default()
    }
}

pub fn json(status: u16, body: serde_json::Value) -> RawResponse {
    RawResponse::json(status, body.to_string())
}
