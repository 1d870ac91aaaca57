//! Standard sanitizers.

use ammonia::Builder;
use splice_core::Sanitizer;

/// Form controls kept on top of ammonia's default tag set.
const FORM_TAGS: &[&str] = &[
    "form", "input", "button", "select", "option", "textarea", "label", "fieldset", "legend",
];

/// Attributes allowed on every kept tag.
const GENERIC_ATTRIBUTES: &[&str] = &[
    "id", "class", "name", "value", "type", "checked", "disabled", "placeholder", "required",
    "for", "selected", "multiple",
];

/// Inserts markup unchanged. Only for trusted servers and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Sanitizer for Passthrough {
    fn sanitize(&self, raw_html: &str) -> String {
        raw_html.to_owned()
    }
}

/// Allow-list sanitizer backed by [`ammonia`].
///
/// Anything not explicitly allowed is dropped: scripts and styles with their
/// content, unknown tags (their text survives), event handler attributes and
/// URLs outside the safe schemes. Ids, classes, `data-*` attributes and
/// form controls are kept so that later updates can target injected markup.
#[derive(Debug, Clone, Default)]
pub struct HtmlSanitizer {
    extra_tags: Vec<&'static str>,
    extra_attributes: Vec<&'static str>,
}

impl HtmlSanitizer {
    /// The default allow-list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also keep these tags.
    pub fn allow_tags(mut self, tags: impl IntoIterator<Item = &'static str>) -> Self {
        self.extra_tags.extend(tags);
        self
    }

    /// Also keep these attributes on every tag.
    pub fn allow_attributes(mut self, attributes: impl IntoIterator<Item = &'static str>) -> Self {
        self.extra_attributes.extend(attributes);
        self
    }

    fn builder(&self) -> Builder<'static> {
        let mut builder = Builder::default();
        builder
            .add_tags(FORM_TAGS.iter().copied())
            .add_tags(self.extra_tags.iter().copied())
            .add_generic_attributes(GENERIC_ATTRIBUTES.iter().copied())
            .add_generic_attributes(self.extra_attributes.iter().copied())
            .add_generic_attribute_prefixes(["data-"].iter().copied())
            .link_rel(None);
        builder
    }
}

impl Sanitizer for HtmlSanitizer {
    fn sanitize(&self, raw_html: &str) -> String {
        self.builder().clean(raw_html).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_scripts_and_handlers() {
        let dirty = concat!(
            r#"<p onclick="steal()">Hi<SCRIPT type="x">alert(1)</script></p>"#,
            r#"<a href="javascript:void(0)">x</a>"#,
        );
        assert_eq!(HtmlSanitizer::new().sanitize(dirty), "<p>Hi</p><a>x</a>");
    }

    #[test]
    fn test_unquoted_and_foreign_vectors() {
        let sanitizer = HtmlSanitizer::new();

        let svg = sanitizer.sanitize("<svg/onload=alert(1)>");
        assert!(!svg.contains("onload"), "{svg}");
        assert!(!svg.contains("svg"), "{svg}");

        assert_eq!(
            sanitizer.sanitize("<a href=javascript:alert(1)>x</a>"),
            "<a>x</a>"
        );

        let img = sanitizer.sanitize("<img src=x onerror=alert(1)>");
        assert!(!img.contains("onerror"), "{img}");

        let style = sanitizer.sanitize("<p style=\"background:url(javascript:x)\">a</p>");
        assert_eq!(style, "<p>a</p>");
    }

    #[test]
    fn test_keeps_plain_markup() {
        let clean = r#"<ul class="list"><li data-id="1">One</li></ul>"#;
        assert_eq!(HtmlSanitizer::new().sanitize(clean), clean);

        let form = concat!(
            r#"<form id="f"><input name="q" value="x">"#,
            r#"<button type="submit">Go</button></form>"#,
        );
        assert_eq!(HtmlSanitizer::new().sanitize(form), form);

        assert_eq!(Passthrough.sanitize("<script></script>"), "<script></script>");
    }

    #[test]
    fn test_extra_allow_list() {
        let sanitizer = HtmlSanitizer::new()
            .allow_tags(["video"])
            .allow_attributes(["controls"]);
        assert_eq!(
            sanitizer.sanitize("<video controls>v</video>"),
            r#"<video controls="">v</video>"#
        );
    }
}
