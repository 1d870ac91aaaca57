//! The optional confirmation step before a request is sent.

use crate::{
    descriptor::RequestDescriptor,
    environment::Environment,
    hooks::{AjaxConfirmMessage, ConfirmMessageEvent},
};
use splice_core::{ConfirmFailure, HookPoint, Verdict};
use std::sync::Arc;
use tracing::debug;

/// Result of the confirmation step.
///
/// While the gate's future is suspended on listeners the request is pending;
/// it only ever resolves to one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// No prompt was configured.
    NotNeeded,
    /// The user (or a listener) approved.
    Approved,
    /// The user (or a listener) declined.
    Denied,
}

impl Confirmation {
    /// Whether the request may be sent.
    pub fn permits(self) -> bool {
        !matches!(self, Confirmation::Denied)
    }
}

impl From<bool> for Confirmation {
    fn from(approved: bool) -> Self {
        if approved {
            Confirmation::Approved
        } else {
            Confirmation::Denied
        }
    }
}

/// Decides whether a request may proceed.
///
/// The per-request callback owns the decision when present. Otherwise the
/// `ajaxConfirmMessage` listeners decide, or a native dialog when there are
/// none.
pub struct ConfirmationGate<'a> {
    env: &'a Environment,
}

impl<'a> ConfirmationGate<'a> {
    /// Gate against `env`.
    pub fn new(env: &'a Environment) -> Self {
        Self { env }
    }

    /// Run the gate.
    pub async fn confirm(
        &self,
        descriptor: &Arc<RequestDescriptor>,
    ) -> Result<Confirmation, ConfirmFailure> {
        let Some(message) = descriptor
            .options()
            .confirm
            .as_deref()
            .filter(|message| !message.is_empty())
        else {
            return Ok(Confirmation::NotNeeded);
        };

        if let Some(callback) = &descriptor.options().callbacks.handle_confirm_message {
            return Ok(callback(message).is_pass().into());
        }

        let hooks = self.env.hooks();
        if !hooks.has_listeners(AjaxConfirmMessage::NAME) {
            return Ok(self.env.dialogs().confirm(message).into());
        }

        debug!(prompt = message, "waiting on confirmation listeners");
        let event = ConfirmMessageEvent {
            descriptor: descriptor.clone(),
            message: message.to_owned(),
        };
        let broadcast = hooks.emit_async::<AjaxConfirmMessage>(&event);
        let verdict = match self.env.config().confirm_timeout {
            Some(limit) => tokio::time::timeout(limit, broadcast)
                .await
                .map_err(|_| ConfirmFailure::TimedOut(limit))??,
            None => broadcast.await?,
        };
        Ok((verdict == Verdict::Pass).into())
    }
}
