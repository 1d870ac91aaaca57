//! # splice-core
//!
//! Core traits and data for the splice request engine.
//!
//! This crate has minimal dependencies and is meant to be imported by
//! collaborators (hook listeners, document adapters, HTTP backends) that do
//! not need the engine itself.
//!
//! # Contents
//!
//! - **Hooks** ([`Verdict`], [`CancellableHook`], [`AggregatedHook`], [`HookPoint`]):
//!   the extension points a request broadcasts to.
//! - **Handlers** ([`HandlerName`]): validated server-side action names.
//! - **Bus** ([`HookBus`]): the registry listeners attach to, keyed by hook name.
//! - **Outcome** ([`NormalizedOutcome`]): what a network exchange turned into.
//! - **Collaborators** ([`Document`], [`Sanitizer`], [`Navigator`], [`Dialogs`],
//!   [`AssetLoader`], [`FrameScheduler`], [`TokenSource`], [`HttpBackend`]).
//! - **Wire** ([`WireRequest`], [`RawResponse`]): what the backend sends and receives.
//!
//! # Error Types
//!
//! - [`SpliceError`] - Top-level error type
//! - [`ConstructionError`] - Invalid request definition
//! - [`TransportError`] - Failed exchange, folded into an [`ErrorPayload`]
//! - [`HookError`] - Aggregated listener failures

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod bus;
mod dom;
mod error;
mod handler;
mod hook;
mod outcome;
mod platform;
mod response;
pub mod wire;

// Re-exports
pub use bus::{HookBus, ListenerHandle, hook_name};
pub use dom::{Document, ElementEvent, ElementId, FieldValue, FileData};
pub use error::{
    BoxError, ConfirmFailure, ConstructionError, HookError, SpliceError, TransportError,
    UpdateAbort,
};
pub use handler::HandlerName;
pub use hook::{
    AggregatedHook, AggregatedPoint, AsyncFn, CancellableHook, CancellablePoint,
    DynAggregatedHook, HookPoint, Verdict,
};
pub use outcome::{
    AssetList, ErrorPayload, FieldErrors, FlashMessage, KEY_ASSETS, KEY_ERROR_FIELDS,
    KEY_ERROR_MESSAGE, KEY_FLASH_MESSAGES, KEY_REDIRECT, NormalizedOutcome, SIDE_CHANNEL_PREFIX,
    SuccessPayload, TraceFrame,
};
pub use platform::{
    AssetLoader, BoxFuture, Dialogs, FrameScheduler, HttpBackend, Navigator, NoAssets, NoToken,
    PopStateCallback, Sanitizer, TokenSource,
};
pub use response::{IntoVerdict, verdict_of};
pub use wire::{RawResponse, RequestBody, WireRequest};
