//! Anti-forgery token sources.

use splice_core::{Document, TokenSource};
use std::sync::Arc;

/// Name of the cookie carrying the token.
pub const XSRF_COOKIE: &str = "XSRF-TOKEN";

/// Reads the token from a `Cookie`-style header string (`a=1; XSRF-TOKEN=...`).
#[derive(Debug, Clone)]
pub struct CookieTokenSource {
    cookies: String,
}

impl CookieTokenSource {
    /// Wrap a cookie string.
    pub fn new(cookies: impl Into<String>) -> Self {
        Self {
            cookies: cookies.into(),
        }
    }
}

impl TokenSource for CookieTokenSource {
    fn token(&self) -> Option<String> {
        let encoded = self.cookies.replace(';', "&");
        url::form_urlencoded::parse(encoded.as_bytes())
            .find(|(name, _)| name.trim() == XSRF_COOKIE)
            .map(|(_, value)| value.trim().to_owned())
            .filter(|value| !value.is_empty())
    }
}

/// Reads the token from `<meta name="csrf-token" content="...">`.
pub struct MetaTokenSource {
    document: Arc<dyn Document>,
}

impl MetaTokenSource {
    /// Read from `document`.
    pub fn new(document: Arc<dyn Document>) -> Self {
        Self { document }
    }
}

impl TokenSource for MetaTokenSource {
    fn token(&self) -> Option<String> {
        let meta = *self.document.select(r#"meta[name="csrf-token"]"#).first()?;
        self.document
            .attribute(meta, "content")
            .filter(|value| !value.is_empty())
    }
}

/// Tries each source in order.
pub struct FirstOf(pub Vec<Box<dyn TokenSource>>);

impl TokenSource for FirstOf {
    fn token(&self) -> Option<String> {
        self.0.iter().find_map(|source| source.token())
    }
}
