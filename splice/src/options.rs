//! Per-request options.
//!
//! [`RequestOptions`] is a typed option bag. Its fields are public so `ajaxSetup`
//! listeners can adjust them; the builder methods are the usual way to fill it.

use splice_core::{
    ElementId, FieldErrors, FlashMessage, IntoVerdict, SuccessPayload, Verdict, verdict_of,
};
use std::{fmt, sync::Arc};

/// How a partial is merged into its target elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UpdateMode {
    /// Replace the inner content.
    #[default]
    Replace,
    /// Add after the existing content (selector prefix `@`).
    Append,
    /// Add before the existing content (selector prefix `^`).
    Prepend,
}

impl UpdateMode {
    /// Split a target into its merge mode and the bare selector.
    pub fn parse(target: &str) -> (UpdateMode, &str) {
        if let Some(selector) = target.strip_prefix('@') {
            (UpdateMode::Append, selector)
        } else if let Some(selector) = target.strip_prefix('^') {
            (UpdateMode::Prepend, selector)
        } else {
            (UpdateMode::Replace, target)
        }
    }

    /// Merge `content` with the `existing` inner content.
    pub fn merge(self, existing: &str, content: &str) -> String {
        match self {
            UpdateMode::Replace => content.to_owned(),
            UpdateMode::Append => format!("{existing}{content}"),
            UpdateMode::Prepend => format!("{content}{existing}"),
        }
    }
}

/// Ordered mapping of partial name → target selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTargets(Vec<(String, String)>);

impl UpdateTargets {
    /// No targets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `partial` to `target`, replacing any existing mapping.
    pub fn insert(&mut self, partial: impl Into<String>, target: impl Into<String>) {
        let partial = partial.into();
        let target = target.into();
        match self.0.iter_mut().find(|(name, _)| *name == partial) {
            Some(entry) => entry.1 = target,
            None => self.0.push((partial, target)),
        }
    }

    /// The target for `partial`.
    pub fn get(&self, partial: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| name == partial)
            .map(|(_, target)| target.as_str())
    }

    /// The first partial name, used for non-JSON responses.
    pub fn first_partial(&self) -> Option<&str> {
        self.0.first().map(|(name, _)| name.as_str())
    }

    /// Whether no partial is requested.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Partial/target pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(p, t)| (p.as_str(), t.as_str()))
    }

    /// Partial names joined with `&`, as sent in the partials header.
    pub fn header_value(&self) -> String {
        self.0
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl fmt::Display for UpdateTargets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.header_value())
    }
}

impl<P: Into<String>, T: Into<String>> FromIterator<(P, T)> for UpdateTargets {
    fn from_iter<I: IntoIterator<Item = (P, T)>>(iter: I) -> Self {
        let mut targets = Self::new();
        for (partial, target) in iter {
            targets.insert(partial, target);
        }
        targets
    }
}

/// Inspects the payload before any partial is applied.
pub type BeforeUpdateFn = Arc<dyn Fn(&SuccessPayload) -> Verdict + Send + Sync>;
/// Receives a prompt, URL or message text.
pub type TextFn = Arc<dyn Fn(&str) -> Verdict + Send + Sync>;
/// Receives flash messages.
pub type FlashFn = Arc<dyn Fn(&[FlashMessage]) -> Verdict + Send + Sync>;
/// Receives the resolved form and field errors.
pub type ValidationFn = Arc<dyn Fn(Option<ElementId>, &FieldErrors) -> Verdict + Send + Sync>;

/// Per-request overrides of the default handling. A `Veto` suppresses both
/// the global hook and the default behaviour of that step.
#[derive(Clone, Default)]
pub struct Callbacks {
    /// Runs before partials are applied. A veto aborts the update.
    pub before_update: Option<BeforeUpdateFn>,
    /// Decides the confirmation prompt on its own: `Veto` denies, anything else approves.
    pub handle_confirm_message: Option<TextFn>,
    /// Sees the redirect URL first.
    pub handle_redirect_response: Option<TextFn>,
    /// Sees the error message first.
    pub handle_error_message: Option<TextFn>,
    /// Sees flash messages first.
    pub handle_flash_messages: Option<FlashFn>,
    /// Sees field validation errors first.
    pub handle_validation_errors: Option<ValidationFn>,
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("before_update", &self.before_update.is_some())
            .field("handle_confirm_message", &self.handle_confirm_message.is_some())
            .field("handle_redirect_response", &self.handle_redirect_response.is_some())
            .field("handle_error_message", &self.handle_error_message.is_some())
            .field("handle_flash_messages", &self.handle_flash_messages.is_some())
            .field("handle_validation_errors", &self.handle_validation_errors.is_some())
            .finish()
    }
}

fn text_fn<F, R>(f: F) -> TextFn
where
    F: Fn(&str) -> R + Send + Sync + 'static,
    R: IntoVerdict,
{
    Arc::new(move |text: &str| verdict_of(f(text)))
}

/// Options for one request.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Endpoint; defaults to the current page URL.
    pub url: Option<String>,
    /// Partials to request and where to put them.
    pub update: UpdateTargets,
    /// Confirmation prompt shown before sending.
    pub confirm: Option<String>,
    /// Redirect after a successful response.
    pub redirect: Option<String>,
    /// Ask the server for flash messages.
    pub flash: bool,
    /// Send as multipart, including file fields.
    pub files: bool,
    /// Extra payload; overrides form fields with the same name.
    pub data: Vec<(String, String)>,
    /// Run native form validation before sending.
    pub browser_validate: bool,
    /// Use this form instead of the element's enclosing form.
    pub form: Option<ElementId>,
    /// Per-request overrides.
    pub callbacks: Callbacks,
}

impl RequestOptions {
    /// Empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the endpoint.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Request `partial` and render it into `target` (`@` append, `^` prepend).
    pub fn update(mut self, partial: impl Into<String>, target: impl Into<String>) -> Self {
        self.update.insert(partial, target);
        self
    }

    /// Ask the user before sending.
    pub fn confirm(mut self, message: impl Into<String>) -> Self {
        self.confirm = Some(message.into());
        self
    }

    /// Redirect after success.
    pub fn redirect(mut self, url: impl Into<String>) -> Self {
        self.redirect = Some(url.into());
        self
    }

    /// Request flash messages.
    pub fn flash(mut self, enabled: bool) -> Self {
        self.flash = enabled;
        self
    }

    /// Enable multipart file upload.
    pub fn files(mut self, enabled: bool) -> Self {
        self.files = enabled;
        self
    }

    /// Add a payload entry, replacing an earlier one with the same key.
    pub fn data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        self.data.retain(|(k, _)| *k != key);
        self.data.push((key, value.into()));
        self
    }

    /// Validate the form natively before sending.
    pub fn browser_validate(mut self, enabled: bool) -> Self {
        self.browser_validate = enabled;
        self
    }

    /// Use an explicit form.
    pub fn form(mut self, form: ElementId) -> Self {
        self.form = Some(form);
        self
    }

    /// Inspect the payload before partials are applied; a veto aborts the update.
    pub fn before_update<F, R>(mut self, f: F) -> Self
    where
        F: Fn(&SuccessPayload) -> R + Send + Sync + 'static,
        R: IntoVerdict,
    {
        self.callbacks.before_update =
            Some(Arc::new(move |payload: &SuccessPayload| verdict_of(f(payload))));
        self
    }

    /// Decide the confirmation prompt yourself.
    pub fn handle_confirm_message<F, R>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> R + Send + Sync + 'static,
        R: IntoVerdict,
    {
        self.callbacks.handle_confirm_message = Some(text_fn(f));
        self
    }

    /// See the redirect URL first; a veto cancels the redirect.
    pub fn handle_redirect_response<F, R>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> R + Send + Sync + 'static,
        R: IntoVerdict,
    {
        self.callbacks.handle_redirect_response = Some(text_fn(f));
        self
    }

    /// See the error message first; a veto suppresses the alert.
    pub fn handle_error_message<F, R>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> R + Send + Sync + 'static,
        R: IntoVerdict,
    {
        self.callbacks.handle_error_message = Some(text_fn(f));
        self
    }

    /// See flash messages first.
    pub fn handle_flash_messages<F, R>(mut self, f: F) -> Self
    where
        F: Fn(&[FlashMessage]) -> R + Send + Sync + 'static,
        R: IntoVerdict,
    {
        self.callbacks.handle_flash_messages =
            Some(Arc::new(move |messages: &[FlashMessage]| verdict_of(f(messages))));
        self
    }

    /// See field validation errors first.
    pub fn handle_validation_errors<F, R>(mut self, f: F) -> Self
    where
        F: Fn(Option<ElementId>, &FieldErrors) -> R + Send + Sync + 'static,
        R: IntoVerdict,
    {
        self.callbacks.handle_validation_errors = Some(Arc::new(
            move |form: Option<ElementId>, fields: &FieldErrors| verdict_of(f(form, fields)),
        ));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_mode_prefixes() {
        assert_eq!(UpdateMode::parse("#list"), (UpdateMode::Replace, "#list"));
        assert_eq!(UpdateMode::parse("@#list"), (UpdateMode::Append, "#list"));
        assert_eq!(UpdateMode::parse("^#list"), (UpdateMode::Prepend, "#list"));
    }

    #[test]
    fn test_merge_order() {
        assert_eq!(UpdateMode::Append.merge("A", "B"), "AB");
        assert_eq!(UpdateMode::Prepend.merge("A", "B"), "BA");
        assert_eq!(UpdateMode::Replace.merge("A", "B"), "B");
    }

    #[test]
    fn test_targets_keep_insertion_order() {
        let targets: UpdateTargets = [("list", "#list"), ("count", "#count"), ("list", "@#list")]
            .into_iter()
            .collect();
        assert_eq!(targets.header_value(), "list&count");
        assert_eq!(targets.to_string(), "list&count");
        assert_eq!(targets.get("list"), Some("@#list"));
        assert_eq!(targets.first_partial(), Some("list"));
    }

    #[test]
    fn test_data_replaces_same_key() {
        let options = RequestOptions::new().data("a", "1").data("b", "2").data("a", "3");
        assert_eq!(
            options.data,
            vec![("b".to_string(), "2".to_string()), ("a".to_string(), "3".to_string())]
        );
    }

    #[test]
    fn test_callbacks_accept_any_verdict_type() {
        let options = RequestOptions::new()
            .handle_confirm_message(|_| false)
            .handle_error_message(|_| ())
            .before_update(|payload| payload.partials.is_empty());
        let confirm = options.callbacks.handle_confirm_message.unwrap();
        assert_eq!(confirm("Sure?"), Verdict::Veto);
        let error = options.callbacks.handle_error_message.unwrap();
        assert_eq!(error("x"), Verdict::Pass);
        assert!(options.callbacks.before_update.is_some());
    }
}
