//! Reading request definitions from `data-*` attributes.
//!
//! ```html
//! <button data-request="onSave"
//!         data-request-update="list: '@#items', status: '#status'"
//!         data-request-data="mode: 'quick'"
//!         data-request-flash>
//! ```

use crate::options::RequestOptions;
use splice_core::{ConstructionError, Document, ElementId};

/// Handler name.
pub const ATTR_HANDLER: &str = "data-request";
/// Endpoint override.
pub const ATTR_URL: &str = "data-request-url";
/// `partial: 'selector'` pairs.
pub const ATTR_UPDATE: &str = "data-request-update";
/// Confirmation prompt.
pub const ATTR_CONFIRM: &str = "data-request-confirm";
/// Redirect after success.
pub const ATTR_REDIRECT: &str = "data-request-redirect";
/// Request flash messages.
pub const ATTR_FLASH: &str = "data-request-flash";
/// Multipart upload.
pub const ATTR_FILES: &str = "data-request-files";
/// `key: 'value'` payload pairs.
pub const ATTR_DATA: &str = "data-request-data";
/// Selector of an explicit form.
pub const ATTR_FORM: &str = "data-request-form";
/// Native validation before sending.
pub const ATTR_BROWSER_VALIDATE: &str = "data-browser-validate";

fn invalid(attribute: &str, reason: impl Into<String>) -> ConstructionError {
    ConstructionError::InvalidAttribute {
        attribute: attribute.to_owned(),
        reason: reason.into(),
    }
}

/// Split at `separator` outside of quotes.
fn split_unquoted(
    attribute: &str,
    input: &str,
    separator: char,
) -> Result<Vec<String>, ConstructionError> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut quote = None;
    for c in input.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == separator => {
                parts.push(std::mem::take(&mut current));
                continue;
            }
            None => {}
        }
        current.push(c);
    }
    if quote.is_some() {
        return Err(invalid(attribute, "unterminated quote"));
    }
    parts.push(current);
    Ok(parts)
}

fn unquote(text: &str) -> &str {
    let text = text.trim();
    for q in ['"', '\''] {
        if let Some(inner) = text.strip_prefix(q).and_then(|t| t.strip_suffix(q)) {
            return inner;
        }
    }
    text
}

/// Parse `key: 'value', other: "value"` into ordered pairs. Surrounding braces
/// are optional.
pub fn parse_pairs(
    attribute: &str,
    input: &str,
) -> Result<Vec<(String, String)>, ConstructionError> {
    let trimmed = input.trim();
    let body = trimmed
        .strip_prefix('{')
        .and_then(|t| t.strip_suffix('}'))
        .unwrap_or(trimmed);

    let mut pairs = Vec::new();
    for segment in split_unquoted(attribute, body, ',')? {
        if segment.trim().is_empty() {
            continue;
        }
        let mut halves = split_unquoted(attribute, &segment, ':')?.into_iter();
        let (Some(key), Some(first)) = (halves.next(), halves.next()) else {
            return Err(invalid(
                attribute,
                format!("expected `key: value`, found `{}`", segment.trim()),
            ));
        };
        // Rejoin the rest so unquoted values may still contain `:`.
        let value = std::iter::once(first).chain(halves).collect::<Vec<_>>().join(":");
        let key = unquote(&key);
        if key.is_empty() {
            return Err(invalid(attribute, "empty key"));
        }
        pairs.push((key.to_owned(), unquote(&value).to_owned()));
    }
    Ok(pairs)
}

fn flag(value: Option<String>) -> bool {
    value.is_some_and(|v| !matches!(v.trim(), "false" | "0"))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// The handler named by `data-request`, if any.
pub fn handler_attribute(document: &dyn Document, element: ElementId) -> Option<String> {
    non_empty(document.attribute(element, ATTR_HANDLER))
}

impl RequestOptions {
    /// Read options from the `data-request-*` attributes of `element`.
    pub fn from_element(
        document: &dyn Document,
        element: ElementId,
    ) -> Result<Self, ConstructionError> {
        if !document.contains(element) {
            return Err(ConstructionError::UnknownElement);
        }
        let attr = |name: &str| document.attribute(element, name);

        let mut options = RequestOptions::new();
        options.url = non_empty(attr(ATTR_URL));
        options.confirm = non_empty(attr(ATTR_CONFIRM));
        options.redirect = non_empty(attr(ATTR_REDIRECT));
        options.flash = flag(attr(ATTR_FLASH));
        options.files = flag(attr(ATTR_FILES));
        options.browser_validate = flag(attr(ATTR_BROWSER_VALIDATE));

        if let Some(raw) = attr(ATTR_UPDATE) {
            options.update = parse_pairs(ATTR_UPDATE, &raw)?.into_iter().collect();
        }
        if let Some(raw) = attr(ATTR_DATA) {
            options = parse_pairs(ATTR_DATA, &raw)?
                .into_iter()
                .fold(options, |options, (key, value)| options.data(key, value));
        }
        if let Some(selector) = non_empty(attr(ATTR_FORM)) {
            let form = document
                .select(&selector)
                .first()
                .copied()
                .ok_or_else(|| invalid(ATTR_FORM, format!("`{selector}` matches no element")))?;
            options.form = Some(form);
        }
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use splice_std::{Element, MemoryDocument};

    #[test]
    fn test_parse_pairs_forms() {
        let pairs = parse_pairs(ATTR_UPDATE, "list: '@#items', 'status': \"#a, #b\"").unwrap();
        assert_eq!(
            pairs,
            vec![
                ("list".to_string(), "@#items".to_string()),
                ("status".to_string(), "#a, #b".to_string()),
            ]
        );
        assert_eq!(parse_pairs(ATTR_DATA, "{ n: 5 }").unwrap(), vec![("n".into(), "5".into())]);
        assert!(parse_pairs(ATTR_DATA, "  ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_pairs_rejects_garbage() {
        assert!(matches!(
            parse_pairs(ATTR_UPDATE, "list"),
            Err(ConstructionError::InvalidAttribute { .. })
        ));
        assert!(parse_pairs(ATTR_UPDATE, "list: '#x").is_err());
        assert!(parse_pairs(ATTR_UPDATE, ": '#x'").is_err());
    }

    #[test]
    fn test_from_element() {
        let doc = MemoryDocument::new();
        let form = doc.insert(None, Element::new("form").id("other"));
        let button = doc.insert(
            None,
            Element::new("button")
                .attr(ATTR_HANDLER, "onSave")
                .attr(ATTR_UPDATE, "list: '@#items'")
                .attr(ATTR_DATA, "mode: 'quick', mode: 'slow'")
                .attr(ATTR_CONFIRM, "Sure?")
                .attr(ATTR_FLASH, "")
                .attr(ATTR_FILES, "false")
                .attr(ATTR_FORM, "#other"),
        );

        let options = RequestOptions::from_element(&doc, button).unwrap();
        assert_eq!(handler_attribute(&doc, button).as_deref(), Some("onSave"));
        assert_eq!(options.update.get("list"), Some("@#items"));
        assert_eq!(options.data, vec![("mode".to_string(), "slow".to_string())]);
        assert_eq!(options.confirm.as_deref(), Some("Sure?"));
        assert!(options.flash);
        assert!(!options.files);
        assert_eq!(options.form, Some(form));
    }

    #[test]
    fn test_from_element_unknown_form() {
        let doc = MemoryDocument::new();
        let button = doc.insert(None, Element::new("button").attr(ATTR_FORM, "#nope"));
        assert!(RequestOptions::from_element(&doc, button).is_err());
        assert_eq!(
            RequestOptions::from_element(&doc, ElementId(99)).unwrap_err(),
            ConstructionError::UnknownElement
        );
    }
}
