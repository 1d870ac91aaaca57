//! # splice - Partial-Update Request Engine
//!
//! `splice` calls a named handler on the server and applies the response to
//! the current page without a navigation: partials are merged into the
//! document, then redirects, flash messages, assets and validation errors are
//! dispatched. Every step can be observed or vetoed through the global
//! [`HookBus`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use splice::prelude::*;
//!
//! let env = Environment::builder(document, backend, navigator, dialogs).build();
//! env.hooks().on::<AjaxRedirect, _>(|event: &mut RedirectEvent| event.url != "/forbidden");
//!
//! let request = env.request(
//!     Some(button),
//!     "onSave",
//!     RequestOptions::new().update("list", "@#items").flash(true),
//! )?;
//! match request.send().await? {
//!     Completion::Settled(settlement) => println!("{:?}", settlement.dispatched),
//!     Completion::Aborted(reason) => println!("not sent: {reason:?}"),
//! }
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod attributes;
mod config;
mod confirm;
mod descriptor;
mod dispatch;
mod environment;
pub mod hooks;
mod lifecycle;
mod options;
mod transport;
mod update;

pub use attributes::{
    ATTR_BROWSER_VALIDATE, ATTR_CONFIRM, ATTR_DATA, ATTR_FILES, ATTR_FLASH, ATTR_FORM,
    ATTR_HANDLER, ATTR_REDIRECT, ATTR_UPDATE, ATTR_URL, handler_attribute, parse_pairs,
};
pub use config::{DEFAULT_UNKNOWN_ERROR, EngineConfig};
pub use confirm::{Confirmation, ConfirmationGate};
pub use descriptor::RequestDescriptor;
pub use dispatch::{Dispatched, OutcomeDispatcher};
pub use environment::{Environment, EnvironmentBuilder};
pub use lifecycle::{AbortReason, Completion, Request, Settlement, Stage};
pub use options::{
    BeforeUpdateFn, Callbacks, FlashFn, RequestOptions, TextFn, UpdateMode, UpdateTargets,
    ValidationFn,
};
pub use transport::{TransportClient, classify};
pub use update::{AppliedPartial, PartialUpdateEngine, UpdateReport};

pub use splice_core::{
    AggregatedHook, AsyncFn, BoxError, CancellableHook, ConfirmFailure, ConstructionError,
    Document, ElementEvent, ElementId, ErrorPayload, FieldErrors, FieldValue, FileData,
    FlashMessage, HandlerName, HookBus, HookError, IntoVerdict, ListenerHandle, NormalizedOutcome,
    RawResponse, SpliceError, SuccessPayload, TransportError, UpdateAbort, Verdict, WireRequest,
};

/// Collaborator traits and wire types.
pub mod platform {
    pub use splice_core::{
        AssetList, AssetLoader, BoxFuture, Dialogs, FrameScheduler, HttpBackend, Navigator,
        NoAssets, NoToken, PopStateCallback, RequestBody, Sanitizer, TokenSource, wire,
    };
}

/// Standard collaborator implementations.
pub mod std_impls {
    #[cfg(feature = "reqwest")]
    pub use splice_std::ReqwestBackend;
    pub use splice_std::{
        CookieTokenSource, Element, FirstOf, HtmlSanitizer, MemoryDocument, MetaTokenSource,
        Passthrough, TokioFrames,
        hooks::{LoggingHook, TimeoutHook},
    };
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use splice_std::testing::*;
}

/// Prelude module - common imports for splice.
///
/// # Usage
///
/// ```rust,ignore
/// use splice::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        AsyncFn, Completion, ElementId, EngineConfig, Environment, HandlerName, Request,
        RequestOptions, SpliceError, Verdict,
        hooks::{
            AjaxBeforeUpdate, AjaxConfirmMessage, AjaxErrorMessage, AjaxFlashMessages,
            AjaxRedirect, AjaxSetup, AjaxStart, AjaxValidationErrors, BeforeUpdateEvent,
            ConfirmMessageEvent, ErrorMessageEvent, FlashMessagesEvent, RedirectEvent,
            SetupEvent, StartEvent, ValidationErrorsEvent,
        },
    };
}

#[cfg(feature = "macros")]
pub use splice_macros::handler;
