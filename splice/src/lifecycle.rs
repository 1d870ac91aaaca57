//! One request from construction to completion.
//!
//! ```text
//! Created → Validating → Confirming → Sending → Updating → Dispatching → Settled
//!              ↓             ↓           ↓          ↓
//!           Aborted       Aborted     Aborted    Failed
//! ```
//!
//! Construction errors are returned by [`Request::new`]. Vetoes end the
//! request with [`Completion::Aborted`]; a refused update ends it with
//! [`SpliceError::UpdateAborted`]. No stage is retried.

use crate::{
    attributes::handler_attribute,
    confirm::{Confirmation, ConfirmationGate},
    descriptor::RequestDescriptor,
    dispatch::{Dispatched, OutcomeDispatcher},
    environment::Environment,
    hooks::{AjaxSetup, AjaxStart, SetupEvent, StartEvent},
    options::RequestOptions,
    transport::TransportClient,
    update::{PartialUpdateEngine, UpdateReport},
};
use splice_core::{
    ConfirmFailure, ConstructionError, ElementEvent, ElementId, HandlerName, NormalizedOutcome,
    SpliceError,
};
use std::{fmt, sync::Arc};
use tracing::{Instrument, debug, info_span, warn};

/// Stages of a request, as reported in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Defined but not started.
    Created,
    /// Setup hook and form validation.
    Validating,
    /// Waiting on the confirmation gate.
    Confirming,
    /// Waiting on the network.
    Sending,
    /// Applying partials.
    Updating,
    /// Running outcome handlers.
    Dispatching,
    /// Finished normally.
    Settled,
    /// Stopped by a veto.
    Aborted,
    /// Stopped because the update was refused.
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Why a request stopped before reaching the network.
#[derive(Debug)]
pub enum AbortReason {
    /// An `ajaxSetup` listener vetoed.
    SetupVetoed,
    /// Native form validation failed.
    InvalidForm,
    /// The user or a listener declined the prompt.
    ConfirmationDenied,
    /// Confirmation listeners failed or timed out.
    ConfirmationFailed(ConfirmFailure),
    /// An `ajaxStart` listener vetoed.
    StartVetoed,
}

/// A request that reached the dispatch phase.
#[derive(Debug)]
pub struct Settlement {
    /// The normalized response.
    pub outcome: NormalizedOutcome,
    /// What the update phase wrote.
    pub update: UpdateReport,
    /// What the dispatcher did.
    pub dispatched: Dispatched,
}

/// How a request ended.
#[derive(Debug)]
pub enum Completion {
    /// Stopped before the network call; nothing was sent.
    Aborted(AbortReason),
    /// Went all the way through.
    Settled(Settlement),
}

impl Completion {
    /// The settlement, if the request was sent.
    pub fn settlement(&self) -> Option<&Settlement> {
        match self {
            Completion::Settled(settlement) => Some(settlement),
            Completion::Aborted(_) => None,
        }
    }

    /// Whether the request stopped before the network call.
    pub fn is_aborted(&self) -> bool {
        matches!(self, Completion::Aborted(_))
    }
}

/// A single request. Each trigger creates a fresh one.
#[derive(Debug)]
pub struct Request {
    env: Environment,
    handler: HandlerName,
    element: Option<ElementId>,
    options: RequestOptions,
}

impl Request {
    /// Define a request.
    ///
    /// Fails if the handler is missing or malformed, or if `element` is not
    /// part of the document.
    pub fn new(
        env: &Environment,
        element: Option<ElementId>,
        handler: &str,
        options: RequestOptions,
    ) -> Result<Self, ConstructionError> {
        if let Some(element) = element {
            if !env.document().contains(element) {
                return Err(ConstructionError::UnknownElement);
            }
        }
        Ok(Self {
            env: env.clone(),
            handler: HandlerName::parse(handler)?,
            element,
            options,
        })
    }

    /// Define a request from the `data-request*` attributes of `element`.
    pub fn from_element(env: &Environment, element: ElementId) -> Result<Self, ConstructionError> {
        let options = RequestOptions::from_element(env.document().as_ref(), element)?;
        let handler = handler_attribute(env.document().as_ref(), element)
            .ok_or(ConstructionError::MissingHandler)?;
        Self::new(env, Some(element), &handler, options)
    }

    /// The handler.
    pub fn handler(&self) -> &HandlerName {
        &self.handler
    }

    /// The trigger element.
    pub fn element(&self) -> Option<ElementId> {
        self.element
    }

    /// The options the request will start with.
    pub fn options(&self) -> &RequestOptions {
        &self.options
    }

    /// Adjust the options before sending.
    pub fn options_mut(&mut self) -> &mut RequestOptions {
        &mut self.options
    }

    /// Run the request to completion.
    pub async fn send(self) -> Result<Completion, SpliceError> {
        let span = info_span!(
            "ajax_request",
            handler = %self.handler,
            element = self.element.map(|el| el.0),
        );
        self.run().instrument(span).await
    }

    async fn run(self) -> Result<Completion, SpliceError> {
        let Request {
            env,
            handler,
            element,
            options,
        } = self;
        let stage = |stage: Stage| debug!(%stage, "entering stage");
        stage(Stage::Validating);

        let mut setup = SetupEvent::new(handler.clone(), element, options);
        if env.hooks().emit::<AjaxSetup>(&mut setup).is_veto() {
            return Ok(aborted(AbortReason::SetupVetoed));
        }
        let descriptor = Arc::new(RequestDescriptor::resolve(
            &env,
            handler,
            element,
            setup.into_options(),
        ));

        if descriptor.options().browser_validate {
            if let Some(form) = descriptor.form() {
                if !env.document().check_validity(form) {
                    return Ok(aborted(AbortReason::InvalidForm));
                }
            }
        }

        stage(Stage::Confirming);
        match ConfirmationGate::new(&env).confirm(&descriptor).await {
            Ok(Confirmation::Denied) => return Ok(aborted(AbortReason::ConfirmationDenied)),
            Ok(_) => {}
            Err(err) => {
                warn!(error = %err, "confirmation failed");
                return Ok(aborted(AbortReason::ConfirmationFailed(err)));
            }
        }

        let mut start = StartEvent {
            descriptor: descriptor.clone(),
        };
        if env.hooks().emit::<AjaxStart>(&mut start).is_veto() {
            return Ok(aborted(AbortReason::StartVetoed));
        }

        stage(Stage::Sending);
        let notify = |event: ElementEvent| {
            if let Some(element) = descriptor.element() {
                env.document().dispatch_event(element, event);
            }
        };
        notify(ElementEvent::Promise);
        let outcome = TransportClient::new(&env).send(&descriptor).await;

        let update = match outcome.payload() {
            Some(payload) => {
                stage(Stage::Updating);
                let payload = Arc::new(payload.clone());
                PartialUpdateEngine::new(&env)
                    .apply(&descriptor, &payload)
                    .await
                    .inspect_err(|err| {
                        debug!(stage = %Stage::Failed, reason = %err, "update refused")
                    })?
            }
            None => UpdateReport::default(),
        };

        stage(Stage::Dispatching);
        let dispatched = OutcomeDispatcher::new(&env).dispatch(&descriptor, &outcome).await;
        notify(if dispatched.is_success() {
            ElementEvent::Done
        } else {
            ElementEvent::Fail
        });
        notify(ElementEvent::Always);

        stage(Stage::Settled);
        Ok(Completion::Settled(Settlement {
            outcome,
            update,
            dispatched,
        }))
    }
}

fn aborted(reason: AbortReason) -> Completion {
    debug!(stage = %Stage::Aborted, ?reason, "request aborted");
    Completion::Aborted(reason)
}
