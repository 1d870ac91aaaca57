//! Applying returned partials to the document.

use crate::{
    descriptor::RequestDescriptor,
    environment::Environment,
    hooks::{AjaxBeforeUpdate, BeforeUpdateEvent},
    options::UpdateMode,
};
use splice_core::{ElementEvent, ElementId, HookError, SuccessPayload, UpdateAbort, Verdict};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// One partial as it was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedPartial {
    /// Partial name.
    pub partial: String,
    /// Bare selector, without the mode prefix.
    pub selector: String,
    /// Merge mode.
    pub mode: UpdateMode,
    /// Elements written to; empty when the selector matched nothing.
    pub elements: Vec<ElementId>,
}

/// What the update phase did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Partials in application order.
    pub applied: Vec<AppliedPartial>,
}

impl UpdateReport {
    /// Whether no element was touched.
    pub fn is_empty(&self) -> bool {
        self.applied.iter().all(|partial| partial.elements.is_empty())
    }
}

/// Writes partials into the document.
pub struct PartialUpdateEngine<'a> {
    env: &'a Environment,
}

impl<'a> PartialUpdateEngine<'a> {
    /// Update the document of `env`.
    pub fn new(env: &'a Environment) -> Self {
        Self { env }
    }

    /// Apply every partial of `payload`.
    ///
    /// Nothing is written if the `before_update` callback or an
    /// `ajaxBeforeUpdate` listener objects. An empty partial set resolves at
    /// once without broadcasting. Otherwise the future resolves on the frame
    /// after the last write.
    pub async fn apply(
        &self,
        descriptor: &Arc<RequestDescriptor>,
        payload: &Arc<SuccessPayload>,
    ) -> Result<UpdateReport, UpdateAbort> {
        let options = descriptor.options();
        if let Some(callback) = &options.callbacks.before_update {
            if callback(payload).is_veto() {
                return Err(UpdateAbort::CallbackVetoed);
            }
        }
        if payload.partials.is_empty() {
            return Ok(UpdateReport::default());
        }

        let event = BeforeUpdateEvent {
            descriptor: descriptor.clone(),
            payload: payload.clone(),
        };
        let broadcast = self.env.hooks().emit_async::<AjaxBeforeUpdate>(&event);
        let verdict = match self.env.config().before_update_timeout {
            Some(limit) => tokio::time::timeout(limit, broadcast)
                .await
                .unwrap_or_else(|_| Err(HookError::Timeout(limit))),
            None => broadcast.await,
        }
        .inspect_err(|err| warn!(error = %err, "ajaxBeforeUpdate listener failed"))?;
        if verdict == Verdict::Veto {
            return Err(UpdateAbort::HookVetoed);
        }

        let document = self.env.document();
        let sanitizer = self.env.sanitizer();
        let mut report = UpdateReport::default();
        for (partial, content) in &payload.partials {
            let target = options.update.get(partial).unwrap_or(partial);
            let (mode, selector) = UpdateMode::parse(target);
            let elements = document.select(selector);
            if !elements.is_empty() {
                let content = sanitizer.sanitize(content);
                for &element in &elements {
                    let existing = match mode {
                        UpdateMode::Replace => String::new(),
                        _ => document.inner_html(element).unwrap_or_default(),
                    };
                    document.set_inner_html(element, &mode.merge(&existing, &content));
                    document.dispatch_event(element, ElementEvent::Update);
                }
            }
            trace!(partial, selector, ?mode, matched = elements.len(), "applied partial");
            report.applied.push(AppliedPartial {
                partial: partial.clone(),
                selector: selector.to_owned(),
                mode,
                elements,
            });
        }

        self.env.frames().next_frame().await;
        debug!(partials = report.applied.len(), "update settled");
        Ok(report)
    }
}
