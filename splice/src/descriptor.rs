//! The frozen definition of one request.

use crate::{environment::Environment, options::RequestOptions};
use splice_core::{ElementId, HandlerName};

/// Everything a request needs after `ajaxSetup` has run.
///
/// Stages receive it by reference and never change it.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    handler: HandlerName,
    element: Option<ElementId>,
    form: Option<ElementId>,
    url: String,
    options: RequestOptions,
}

impl RequestDescriptor {
    /// Resolve the form and endpoint against `env`.
    ///
    /// The explicit `form` option wins over the element's enclosing form. The
    /// endpoint falls back from the `url` option to the current page, then to
    /// the configured default.
    pub fn resolve(
        env: &Environment,
        handler: HandlerName,
        element: Option<ElementId>,
        options: RequestOptions,
    ) -> Self {
        let form = options
            .form
            .or_else(|| element.and_then(|el| env.document().closest_form(el)));
        let url = options
            .url
            .clone()
            .or_else(|| Some(env.navigator().current_url()).filter(|url| !url.is_empty()))
            .or_else(|| env.config().default_url.clone())
            .unwrap_or_default();
        Self {
            handler,
            element,
            form,
            url,
            options,
        }
    }

    /// The server-side handler.
    pub fn handler(&self) -> &HandlerName {
        &self.handler
    }

    /// The trigger element.
    pub fn element(&self) -> Option<ElementId> {
        self.element
    }

    /// The form whose fields are sent.
    pub fn form(&self) -> Option<ElementId> {
        self.form
    }

    /// The endpoint.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The options as left by `ajaxSetup` listeners.
    pub fn options(&self) -> &RequestOptions {
        &self.options
    }
}
