//! Request/response shapes exchanged with the HTTP backend.

use crate::dom::FieldValue;

/// Marks the request as an XHR-style fragment request.
pub const HEADER_REQUESTED_WITH: &str = "X-Requested-With";
/// Value of [`HEADER_REQUESTED_WITH`].
pub const REQUESTED_WITH_VALUE: &str = "XMLHttpRequest";
/// Carries the handler name.
pub const HEADER_HANDLER: &str = "X-WINTER-REQUEST-HANDLER";
/// Carries the `&`-joined partial names.
pub const HEADER_PARTIALS: &str = "X-WINTER-REQUEST-PARTIALS";
/// Present (as `1`) when flash messages are requested.
pub const HEADER_FLASH: &str = "X-WINTER-REQUEST-FLASH";
/// Carries the anti-forgery token.
pub const HEADER_XSRF: &str = "X-XSRF-TOKEN";

/// The status code signalling "validation failed, partials still attached".
pub const SOFT_FAILURE_STATUS: u16 = 406;

/// Request body encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// `application/x-www-form-urlencoded` pairs.
    Form(Vec<(String, String)>),
    /// `multipart/form-data` parts.
    Multipart(Vec<(String, FieldValue)>),
}

impl RequestBody {
    /// Look up the first value for `key` (text values only).
    pub fn get(&self, key: &str) -> Option<&str> {
        match self {
            RequestBody::Form(pairs) => pairs
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value.as_str()),
            RequestBody::Multipart(parts) => parts
                .iter()
                .find(|(name, _)| name == key)
                .and_then(|(_, value)| value.as_text()),
        }
    }
}

/// A fully built POST request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireRequest {
    /// Target endpoint.
    pub url: String,
    /// Header name/value pairs in send order.
    pub headers: Vec<(String, String)>,
    /// Encoded payload.
    pub body: RequestBody,
}

impl WireRequest {
    /// Look up a header value (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// What the backend got back, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// `Content-Type` header, if any.
    pub content_type: Option<String>,
    /// Response body as text.
    pub body: String,
}

impl RawResponse {
    /// Build a JSON response.
    pub fn json(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: Some("application/json".to_owned()),
            body: body.into(),
        }
    }

    /// Build a plain-text/HTML response.
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: Some("text/html; charset=UTF-8".to_owned()),
            body: body.into(),
        }
    }

    /// Status is 2xx.
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Status is the soft failure code.
    pub fn is_soft_failure(&self) -> bool {
        self.status == SOFT_FAILURE_STATUS
    }

    /// `Content-Type` names JSON.
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.split(';').next().unwrap_or("").trim())
            .is_some_and(|mime| mime == "application/json" || mime.ends_with("+json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_detection_ignores_parameters() {
        let mut response = RawResponse::json(200, "{}");
        assert!(response.is_json());
        response.content_type = Some("application/problem+json; charset=utf-8".into());
        assert!(response.is_json());
        assert!(!RawResponse::text(200, "x").is_json());
    }

    #[test]
    fn test_status_classes() {
        assert!(RawResponse::text(204, "").is_ok());
        assert!(!RawResponse::text(406, "").is_ok());
        assert!(RawResponse::text(406, "").is_soft_failure());
    }
}
