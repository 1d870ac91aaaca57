//! # splice-std
//!
//! Standard implementations for the splice request engine.
//!
//! This crate provides:
//! - **Documents**: [`MemoryDocument`], parsed and queried with `scraper`
//! - **Sanitizers**: [`HtmlSanitizer`] (ammonia), [`Passthrough`]
//! - **Token sources**: cookie and `<meta>` based
//! - **HTTP**: [`ReqwestBackend`] (feature `reqwest`)
//! - **Frames**: [`TokioFrames`] (feature `tokio`)
//! - **Standard hooks**: Logging, Timeout
//! - **Testing doubles**: see [`testing`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use splice_core;

// Modules
pub mod dom;
#[cfg(feature = "tokio")]
pub mod frames;
pub mod hooks;
#[cfg(feature = "reqwest")]
pub mod http;
pub mod sanitize;
pub mod testing;
pub mod token;

pub use dom::{Element, MemoryDocument};
#[cfg(feature = "tokio")]
pub use frames::TokioFrames;
#[cfg(feature = "reqwest")]
pub use http::ReqwestBackend;
pub use sanitize::{HtmlSanitizer, Passthrough};
pub use token::{CookieTokenSource, FirstOf, MetaTokenSource};
