//! The hook points a request broadcasts to.
//!
//! Register listeners on an [`Environment`](crate::Environment)'s bus:
//!
//! ```rust,ignore
//! env.hooks().on::<AjaxRedirect, _>(|event: &mut RedirectEvent| {
//!     !event.url.starts_with("https://elsewhere")
//! });
//! ```

use crate::{descriptor::RequestDescriptor, options::RequestOptions};
use splice_core::{
    AggregatedPoint, CancellablePoint, ElementId, FieldErrors, FlashMessage, HandlerName,
    HookPoint, SuccessPayload,
};
use std::sync::Arc;

macro_rules! hook_points {
    ($($(#[$meta:meta])* $point:ident($name:literal, $event:ty): $kind:ident;)*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy)]
            pub struct $point;

            impl HookPoint for $point {
                const NAME: &'static str = $name;
                type Event = $event;
            }

            impl $kind for $point {}
        )*
    };
}

hook_points! {
    /// Before anything else; listeners may edit the options. A veto aborts.
    AjaxSetup("ajaxSetup", SetupEvent): CancellablePoint;
    /// After confirmation, right before the network call. A veto aborts.
    AjaxStart("ajaxStart", StartEvent): CancellablePoint;
    /// Before partials are applied. A veto or rejection aborts the update.
    AjaxBeforeUpdate("ajaxBeforeUpdate", BeforeUpdateEvent): AggregatedPoint;
    /// Before navigating to a redirect. A veto cancels it.
    AjaxRedirect("ajaxRedirect", RedirectEvent): CancellablePoint;
    /// Before the default error alert. A veto suppresses it.
    AjaxErrorMessage("ajaxErrorMessage", ErrorMessageEvent): CancellablePoint;
    /// Flash messages arrived.
    AjaxFlashMessages("ajaxFlashMessages", FlashMessagesEvent): CancellablePoint;
    /// Field validation errors arrived.
    AjaxValidationErrors("ajaxValidationErrors", ValidationErrorsEvent): CancellablePoint;
    /// Confirmation prompt. Aggregated verdict decides; no listener means a native dialog.
    AjaxConfirmMessage("ajaxConfirmMessage", ConfirmMessageEvent): AggregatedPoint;
}

/// Payload of [`AjaxSetup`].
#[derive(Debug, Clone)]
pub struct SetupEvent {
    handler: HandlerName,
    element: Option<ElementId>,
    /// Options the request will be frozen with.
    pub options: RequestOptions,
}

impl SetupEvent {
    pub(crate) fn new(
        handler: HandlerName,
        element: Option<ElementId>,
        options: RequestOptions,
    ) -> Self {
        Self {
            handler,
            element,
            options,
        }
    }

    /// The handler being called.
    pub fn handler(&self) -> &HandlerName {
        &self.handler
    }

    /// The trigger element.
    pub fn element(&self) -> Option<ElementId> {
        self.element
    }

    pub(crate) fn into_options(self) -> RequestOptions {
        self.options
    }
}

/// Payload of [`AjaxStart`].
#[derive(Debug, Clone)]
pub struct StartEvent {
    /// The request.
    pub descriptor: Arc<RequestDescriptor>,
}

/// Payload of [`AjaxBeforeUpdate`].
#[derive(Debug, Clone)]
pub struct BeforeUpdateEvent {
    /// The request.
    pub descriptor: Arc<RequestDescriptor>,
    /// The payload about to be applied.
    pub payload: Arc<SuccessPayload>,
}

/// Payload of [`AjaxRedirect`].
#[derive(Debug, Clone)]
pub struct RedirectEvent {
    /// The request.
    pub descriptor: Arc<RequestDescriptor>,
    /// Target; listeners may rewrite it.
    pub url: String,
}

/// Payload of [`AjaxErrorMessage`].
#[derive(Debug, Clone)]
pub struct ErrorMessageEvent {
    /// The request.
    pub descriptor: Arc<RequestDescriptor>,
    /// Text the default handler would alert.
    pub message: String,
}

/// Payload of [`AjaxFlashMessages`].
#[derive(Debug, Clone)]
pub struct FlashMessagesEvent {
    /// The request.
    pub descriptor: Arc<RequestDescriptor>,
    /// Messages in level order.
    pub messages: Vec<FlashMessage>,
}

/// Payload of [`AjaxValidationErrors`].
#[derive(Debug, Clone)]
pub struct ValidationErrorsEvent {
    /// The request.
    pub descriptor: Arc<RequestDescriptor>,
    /// The resolved form, if any.
    pub form: Option<ElementId>,
    /// Messages per field.
    pub fields: FieldErrors,
}

/// Payload of [`AjaxConfirmMessage`].
#[derive(Debug, Clone)]
pub struct ConfirmMessageEvent {
    /// The request.
    pub descriptor: Arc<RequestDescriptor>,
    /// Prompt text.
    pub message: String,
}
