//! The normalized result of a network exchange.
//!
//! A response body is a JSON object whose keys are partial names, except for
//! keys starting with [`SIDE_CHANNEL_PREFIX`], which carry redirects, flash
//! messages, assets and validation errors.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Keys with this prefix are side-channel fields, never partials.
pub const SIDE_CHANNEL_PREFIX: &str = "X_WINTER_";
/// Forced redirect URL.
pub const KEY_REDIRECT: &str = "X_WINTER_REDIRECT";
/// Flash messages, keyed by level.
pub const KEY_FLASH_MESSAGES: &str = "X_WINTER_FLASH_MESSAGES";
/// Assets to load (`js`, `css`, `img` lists).
pub const KEY_ASSETS: &str = "X_WINTER_ASSETS";
/// Field-keyed validation messages.
pub const KEY_ERROR_FIELDS: &str = "X_WINTER_ERROR_FIELDS";
/// Top-level validation message.
pub const KEY_ERROR_MESSAGE: &str = "X_WINTER_ERROR_MESSAGE";

/// Validation messages per field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// A transient notification returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    /// Level such as `success`, `error`, `warning`, `info`.
    pub level: String,
    /// Message text.
    pub text: String,
}

/// Assets a response asks the page to load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetList {
    /// Script URLs.
    pub js: Vec<String>,
    /// Stylesheet URLs.
    pub css: Vec<String>,
    /// Image URLs to preload.
    pub img: Vec<String>,
}

impl AssetList {
    /// No asset of any kind.
    pub fn is_empty(&self) -> bool {
        self.js.is_empty() && self.css.is_empty() && self.img.is_empty()
    }
}

/// One frame of a server-side stack trace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceFrame {
    /// Source file.
    pub file: Option<String>,
    /// Line number.
    pub line: Option<u32>,
    /// Function name.
    pub function: Option<String>,
    /// Class name.
    pub class: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for Vec<String> {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(text) => vec![text],
            OneOrMany::Many(list) => list,
        }
    }
}

fn parse_field_errors(value: Value) -> Option<FieldErrors> {
    let map: BTreeMap<String, OneOrMany> = serde_json::from_value(value).ok()?;
    Some(map.into_iter().map(|(k, v)| (k, v.into())).collect())
}

fn parse_flash(value: Value) -> Vec<FlashMessage> {
    let Ok(map) = serde_json::from_value::<IndexMap<String, OneOrMany>>(value) else {
        return Vec::new();
    };
    map.into_iter()
        .flat_map(|(level, texts)| {
            Vec::<String>::from(texts)
                .into_iter()
                .map(move |text| FlashMessage {
                    level: level.clone(),
                    text,
                })
        })
        .collect()
}

fn partial_content(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

/// A response that went through the success branch of classification.
#[derive(Debug, Clone, PartialEq)]
pub struct SuccessPayload {
    /// Partial name → content, in the order the server sent them.
    pub partials: IndexMap<String, String>,
    /// Forced redirect URL.
    pub redirect: Option<String>,
    /// Flash messages.
    pub flash: Vec<FlashMessage>,
    /// Assets to load.
    pub assets: Option<AssetList>,
    /// Validation message carried by a soft failure.
    pub error_message: Option<String>,
    /// Field errors carried by a soft failure.
    pub error_fields: Option<FieldErrors>,
    /// `false` for the soft failure status, `true` otherwise.
    pub success: bool,
    /// The body as received (an object, or a string for non-JSON bodies).
    pub raw: Value,
}

impl SuccessPayload {
    /// Split a JSON object into partials and side-channel fields.
    ///
    /// A non-object JSON value becomes a payload with no partials.
    pub fn from_json(raw: Value, success: bool) -> Self {
        let mut payload = Self::empty(raw.clone(), success);
        let Value::Object(object) = raw else {
            return payload;
        };
        for (key, value) in object {
            if !key.starts_with(SIDE_CHANNEL_PREFIX) {
                if let Some(content) = partial_content(value) {
                    payload.partials.insert(key, content);
                }
                continue;
            }
            match key.as_str() {
                KEY_REDIRECT => payload.redirect = value.as_str().map(str::to_owned),
                KEY_FLASH_MESSAGES => payload.flash = parse_flash(value),
                KEY_ASSETS => payload.assets = serde_json::from_value(value).ok(),
                KEY_ERROR_FIELDS => payload.error_fields = parse_field_errors(value),
                KEY_ERROR_MESSAGE => payload.error_message = value.as_str().map(str::to_owned),
                _ => {}
            }
        }
        payload
    }

    /// Wrap an opaque text body, optionally as the content of one partial.
    pub fn from_text(partial: Option<&str>, text: String, success: bool) -> Self {
        let mut payload = Self::empty(Value::String(text.clone()), success);
        if let Some(name) = partial {
            payload.partials.insert(name.to_owned(), text);
        }
        payload
    }

    fn empty(raw: Value, success: bool) -> Self {
        Self {
            partials: IndexMap::new(),
            redirect: None,
            flash: Vec::new(),
            assets: None,
            error_message: None,
            error_fields: None,
            success,
            raw,
        }
    }

    /// Reinterpret a soft failure as an error for dispatch.
    pub fn to_error(&self) -> ErrorPayload {
        ErrorPayload {
            message: self.error_message.clone(),
            fields: self.error_fields.clone(),
            ..ErrorPayload::default()
        }
    }
}

fn text_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}

fn line_field(object: &Map<String, Value>) -> Option<u32> {
    match object.get("line")? {
        Value::Number(number) => number.as_u64().and_then(|line| u32::try_from(line).ok()),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn trace_field(object: &mut Map<String, Value>) -> Vec<TraceFrame> {
    let Some(Value::Array(frames)) = object.remove("trace") else {
        return Vec::new();
    };
    frames
        .into_iter()
        .filter_map(|frame| serde_json::from_value(frame).ok())
        .collect()
}

/// A response that went through the error branch, or a failed exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorPayload {
    /// Human readable message.
    pub message: Option<String>,
    /// Server exception class.
    pub exception: Option<String>,
    /// Source file of the exception.
    pub file: Option<String>,
    /// Source line of the exception.
    pub line: Option<u32>,
    /// Stack trace.
    pub trace: Vec<TraceFrame>,
    /// Field-keyed validation messages.
    pub fields: Option<FieldErrors>,
    /// HTTP status, when a response was received.
    pub status: Option<u16>,
}

impl ErrorPayload {
    /// A bare message with nothing else attached.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Read a JSON error body field by field.
    ///
    /// Fields of an unexpected shape are dropped; they never cost the message.
    /// The validation message takes precedence over the exception message.
    pub fn from_json(mut object: Map<String, Value>) -> Self {
        Self {
            message: text_field(&object, KEY_ERROR_MESSAGE)
                .or_else(|| text_field(&object, "message")),
            exception: text_field(&object, "exception"),
            file: text_field(&object, "file"),
            line: line_field(&object),
            trace: trace_field(&mut object),
            fields: object.remove(KEY_ERROR_FIELDS).and_then(parse_field_errors),
            status: None,
        }
    }

    /// Attach the HTTP status.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// An error with only a message, as opposed to one carrying validation
    /// detail. An empty field map carries no detail.
    pub fn is_generic(&self) -> bool {
        self.fields.as_ref().is_none_or(FieldErrors::is_empty)
    }
}

/// Exactly one of these is produced per request.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedOutcome {
    /// The success branch (2xx or soft failure).
    Success(SuccessPayload),
    /// The error branch.
    Error(ErrorPayload),
}

impl NormalizedOutcome {
    /// Whether dispatch should follow the success path.
    pub fn is_success(&self) -> bool {
        matches!(self, NormalizedOutcome::Success(payload) if payload.success)
    }

    /// The success payload, including soft failures.
    pub fn payload(&self) -> Option<&SuccessPayload> {
        match self {
            NormalizedOutcome::Success(payload) => Some(payload),
            NormalizedOutcome::Error(_) => None,
        }
    }
}
