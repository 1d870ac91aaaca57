//! Document abstraction the engine reads from and writes partials into.

use std::fmt;

/// Opaque handle for an element owned by a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A file selected in a file input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileData {
    /// Client-side file name.
    pub file_name: String,
    /// MIME type, if known.
    pub content_type: Option<String>,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// A value submitted by a form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// A plain text value.
    Text(String),
    /// A file upload.
    File(FileData),
}

impl FieldValue {
    /// The text value, if this is not a file.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::File(_) => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// Events the engine dispatches on elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementEvent {
    /// The request is about to hit the network.
    Promise,
    /// A partial was written into this element.
    Update,
    /// The request finished with a success dispatch.
    Done,
    /// The request finished with an error dispatch.
    Fail,
    /// The request finished either way.
    Always,
    /// A redirect only changed the location hash.
    Redirected,
}

impl ElementEvent {
    /// The DOM event name.
    pub fn name(self) -> &'static str {
        match self {
            ElementEvent::Promise => "ajaxPromise",
            ElementEvent::Update => "ajaxUpdate",
            ElementEvent::Done => "ajaxDone",
            ElementEvent::Fail => "ajaxFail",
            ElementEvent::Always => "ajaxAlways",
            ElementEvent::Redirected => "ajaxRedirected",
        }
    }
}

impl fmt::Display for ElementEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The page the engine operates on.
///
/// Implementations provide their own synchronization; every method takes `&self`.
pub trait Document: Send + Sync + 'static {
    /// Whether `element` belongs to this document.
    fn contains(&self, element: ElementId) -> bool;

    /// All elements matching a CSS selector, in document order.
    ///
    /// An unsupported or malformed selector matches nothing.
    fn select(&self, selector: &str) -> Vec<ElementId>;

    /// The inner HTML of an element.
    fn inner_html(&self, element: ElementId) -> Option<String>;

    /// Replace the inner HTML of an element.
    fn set_inner_html(&self, element: ElementId, html: &str);

    /// An attribute value.
    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    /// The element itself if it is a form, else its nearest form ancestor.
    fn closest_form(&self, element: ElementId) -> Option<ElementId>;

    /// Successful controls of a form, in document order.
    fn form_fields(&self, form: ElementId) -> Vec<(String, FieldValue)>;

    /// Run native constraint validation, showing the validity UI on failure.
    fn check_validity(&self, form: ElementId) -> bool;

    /// Dispatch a DOM event on an element.
    fn dispatch_event(&self, element: ElementId, event: ElementEvent);
}
