//! Acting on a normalized outcome once the update phase has settled.
//!
//! Every routine follows the same two tiers: the per-request callback first,
//! then the global cancellable hook. A veto at either tier skips the default
//! behaviour.

use crate::{
    descriptor::RequestDescriptor,
    environment::Environment,
    hooks::{
        AjaxErrorMessage, AjaxFlashMessages, AjaxRedirect, AjaxValidationErrors,
        ErrorMessageEvent, FlashMessagesEvent, RedirectEvent, ValidationErrorsEvent,
    },
};
use splice_core::{
    AssetList, ElementEvent, ErrorPayload, FieldErrors, FlashMessage, NormalizedOutcome,
    SuccessPayload,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// What the dispatcher did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    /// A redirect was processed; no other success handling ran.
    Redirect {
        /// Target URL after listeners had their say.
        url: String,
        /// `false` when a callback or listener vetoed.
        navigated: bool,
    },
    /// The success path without a redirect.
    Success {
        /// Flash messages were handed to the flash routine.
        flash: bool,
        /// Assets were loaded.
        assets: bool,
    },
    /// The error path.
    Error {
        /// Field errors were handed to the validation routine.
        validation: bool,
        /// A message was handed to the error-message routine.
        message: bool,
        /// The default alert was shown.
        alerted: bool,
    },
}

impl Dispatched {
    /// Whether the success path ran.
    pub fn is_success(&self) -> bool {
        !matches!(self, Dispatched::Error { .. })
    }
}

/// Routes an outcome to redirect, flash, asset, validation or error handling.
pub struct OutcomeDispatcher<'a> {
    env: &'a Environment,
}

impl<'a> OutcomeDispatcher<'a> {
    /// Dispatch against `env`.
    pub fn new(env: &'a Environment) -> Self {
        Self { env }
    }

    /// Dispatch. A soft failure takes the error path.
    pub async fn dispatch(
        &self,
        descriptor: &Arc<RequestDescriptor>,
        outcome: &NormalizedOutcome,
    ) -> Dispatched {
        match outcome {
            NormalizedOutcome::Success(payload) if payload.success => {
                self.success(descriptor, payload).await
            }
            NormalizedOutcome::Success(payload) => self.error(descriptor, &payload.to_error()),
            NormalizedOutcome::Error(error) => self.error(descriptor, error),
        }
    }

    async fn success(
        &self,
        descriptor: &Arc<RequestDescriptor>,
        payload: &SuccessPayload,
    ) -> Dispatched {
        let redirect = payload
            .redirect
            .clone()
            .or_else(|| descriptor.options().redirect.clone());
        if let Some(url) = redirect {
            return self.redirect(descriptor, url);
        }

        let flash = descriptor.options().flash && !payload.flash.is_empty();
        if flash {
            self.flash_messages(descriptor, &payload.flash);
        }
        let assets = match &payload.assets {
            Some(assets) if !assets.is_empty() => self.load_assets(assets).await,
            _ => false,
        };
        Dispatched::Success { flash, assets }
    }

    fn error(&self, descriptor: &Arc<RequestDescriptor>, error: &ErrorPayload) -> Dispatched {
        if error.is_generic() {
            let message = error
                .message
                .clone()
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| self.env.config().unknown_error_message.clone());
            let alerted = self.error_message(descriptor, message);
            return Dispatched::Error {
                validation: false,
                message: true,
                alerted,
            };
        }

        let validation = match &error.fields {
            Some(fields) if !fields.is_empty() => {
                self.validation_errors(descriptor, fields);
                true
            }
            _ => false,
        };
        let (message, alerted) = match error.message.clone().filter(|m| !m.is_empty()) {
            Some(message) => (true, self.error_message(descriptor, message)),
            None => (false, false),
        };
        Dispatched::Error {
            validation,
            message,
            alerted,
        }
    }

    fn redirect(&self, descriptor: &Arc<RequestDescriptor>, url: String) -> Dispatched {
        if let Some(callback) = &descriptor.options().callbacks.handle_redirect_response {
            if callback(&url).is_veto() {
                debug!(url = url.as_str(), "redirect vetoed by callback");
                return Dispatched::Redirect {
                    url,
                    navigated: false,
                };
            }
        }
        let mut event = RedirectEvent {
            descriptor: descriptor.clone(),
            url,
        };
        if self.env.hooks().emit::<AjaxRedirect>(&mut event).is_veto() {
            debug!(url = event.url.as_str(), "redirect vetoed by listener");
            return Dispatched::Redirect {
                url: event.url,
                navigated: false,
            };
        }

        // A hash-only navigation never reloads, so completion is signalled on pop.
        if let Some(element) = descriptor.element() {
            let document = self.env.document().clone();
            self.env.navigator().once_pop_state(Box::new(move || {
                document.dispatch_event(element, ElementEvent::Redirected);
            }));
        }
        self.env.navigator().navigate(&event.url);
        Dispatched::Redirect {
            url: event.url,
            navigated: true,
        }
    }

    /// Returns whether the default alert was shown.
    fn error_message(&self, descriptor: &Arc<RequestDescriptor>, message: String) -> bool {
        if let Some(callback) = &descriptor.options().callbacks.handle_error_message {
            if callback(&message).is_veto() {
                return false;
            }
        }
        let mut event = ErrorMessageEvent {
            descriptor: descriptor.clone(),
            message,
        };
        if self.env.hooks().emit::<AjaxErrorMessage>(&mut event).is_veto() {
            return false;
        }
        self.env.dialogs().alert(&event.message);
        true
    }

    fn flash_messages(&self, descriptor: &Arc<RequestDescriptor>, messages: &[FlashMessage]) {
        if let Some(callback) = &descriptor.options().callbacks.handle_flash_messages {
            if callback(messages).is_veto() {
                return;
            }
        }
        let mut event = FlashMessagesEvent {
            descriptor: descriptor.clone(),
            messages: messages.to_vec(),
        };
        self.env.hooks().emit::<AjaxFlashMessages>(&mut event);
    }

    fn validation_errors(&self, descriptor: &Arc<RequestDescriptor>, fields: &FieldErrors) {
        let form = descriptor.form();
        if let Some(callback) = &descriptor.options().callbacks.handle_validation_errors {
            if callback(form, fields).is_veto() {
                return;
            }
        }
        let mut event = ValidationErrorsEvent {
            descriptor: descriptor.clone(),
            form,
            fields: fields.clone(),
        };
        self.env.hooks().emit::<AjaxValidationErrors>(&mut event);
    }

    async fn load_assets(&self, assets: &AssetList) -> bool {
        match self.env.assets().load(assets).await {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "failed to load assets");
                false
            }
        }
    }
}
