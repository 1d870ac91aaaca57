//! Error types for splice.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`SpliceError`] - Top-level error type returned by a request
//! - [`ConstructionError`] - Invalid element/handler/attributes, raised before anything runs
//! - [`TransportError`] - Network and classification failures (always folded into an error payload)
//! - [`HookError`] - Rejections from aggregated hook listeners
//! - [`UpdateAbort`] - The pre-update stage refused to touch the document
//! - [`ConfirmFailure`] - The confirmation stage failed operationally (distinct from a denial)

use std::time::Duration;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for splice operations.
#[derive(Error, Debug)]
pub enum SpliceError {
    /// The request could not be constructed.
    #[error("construction error: {0}")]
    Construction(#[from] ConstructionError),

    /// The update phase was aborted before any partial was applied.
    #[error("update aborted: {0}")]
    UpdateAborted(#[from] UpdateAbort),

    /// A custom error occurred.
    #[error(transparent)]
    Custom(BoxError),
}

/// Errors raised synchronously while building a request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    /// No handler name was supplied.
    #[error("a handler name is required")]
    MissingHandler,

    /// The handler name does not match `[namespace::]on<Name>`.
    #[error("invalid handler name `{0}`, expected `[namespace::]onName`")]
    InvalidHandler(String),

    /// The target element does not belong to the document.
    #[error("the target is not an element of the current document")]
    UnknownElement,

    /// A `data-*` attribute could not be parsed.
    #[error("invalid `{attribute}` attribute: {reason}")]
    InvalidAttribute {
        /// Attribute name.
        attribute: String,
        /// What was wrong with it.
        reason: String,
    },
}

/// Errors while obtaining or classifying a response.
#[derive(Error, Debug)]
pub enum TransportError {
    /// No response could be obtained at all.
    #[error("network error: {0}")]
    Network(#[source] BoxError),

    /// The request did not complete in time.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The server answered with an error status and a non-JSON body.
    #[error("server responded with status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// A JSON body could not be parsed.
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from aggregated hook listeners.
#[derive(Error, Debug)]
pub enum HookError {
    /// A listener rejected the broadcast.
    #[error("listener rejected: {0}")]
    Rejected(#[source] BoxError),

    /// A listener did not settle in time.
    #[error("listener timed out after {0:?}")]
    Timeout(Duration),
}

/// Reasons the update phase refused to apply partials.
#[derive(Error, Debug)]
pub enum UpdateAbort {
    /// The per-request `before_update` callback returned a veto.
    #[error("before-update callback vetoed the update")]
    CallbackVetoed,

    /// A global `ajaxBeforeUpdate` listener vetoed the update.
    #[error("ajaxBeforeUpdate listener vetoed the update")]
    HookVetoed,

    /// A global `ajaxBeforeUpdate` listener rejected.
    #[error("ajaxBeforeUpdate listener failed: {0}")]
    HookRejected(#[from] HookError),
}

/// Operational failures of the confirmation stage.
#[derive(Error, Debug)]
pub enum ConfirmFailure {
    /// An `ajaxConfirmMessage` listener rejected.
    #[error("confirmation listener failed: {0}")]
    HookRejected(#[from] HookError),

    /// No answer arrived within the configured window.
    #[error("confirmation timed out after {0:?}")]
    TimedOut(Duration),
}

impl From<BoxError> for SpliceError {
    fn from(err: BoxError) -> Self {
        SpliceError::Custom(err)
    }
}

impl From<BoxError> for HookError {
    fn from(err: BoxError) -> Self {
        HookError::Rejected(err)
    }
}

impl From<BoxError> for TransportError {
    fn from(err: BoxError) -> Self {
        TransportError::Network(err)
    }
}
