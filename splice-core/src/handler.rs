//! Server-side handler names.

use crate::error::ConstructionError;
use regex::Regex;
use std::{fmt, sync::LazyLock};

static HANDLER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\w+::)?on[A-Z]\w*$").expect("handler pattern is valid")
});

/// A validated handler name such as `onSave` or `blog::onPublish`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerName(String);

impl HandlerName {
    /// Validate `name` against `[namespace::]on<Name>`.
    pub fn parse(name: &str) -> Result<Self, ConstructionError> {
        if name.is_empty() {
            return Err(ConstructionError::MissingHandler);
        }
        if !HANDLER_PATTERN.is_match(name) {
            return Err(ConstructionError::InvalidHandler(name.to_owned()));
        }
        Ok(Self(name.to_owned()))
    }

    /// Wrap a name already validated at compile time by `handler!`.
    #[doc(hidden)]
    pub fn from_static(name: &'static str) -> Self {
        Self(name.to_owned())
    }

    /// The namespace before `::`, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.0.split_once("::").map(|(namespace, _)| namespace)
    }

    /// The name as sent to the server.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HandlerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for HandlerName {
    type Error = ConstructionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl std::str::FromStr for HandlerName {
    type Err = ConstructionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_well_formed_names() {
        for name in ["onSave", "onX", "onSave2", "blog::onPublish", "my_plugin::onRun_it"] {
            assert!(HandlerName::parse(name).is_ok(), "{name} should be valid");
        }
        assert_eq!(
            HandlerName::parse("blog::onPublish").unwrap().namespace(),
            Some("blog")
        );
    }

    #[test]
    fn test_rejects_malformed_names() {
        assert_eq!(HandlerName::parse(""), Err(ConstructionError::MissingHandler));
        for name in [
            "save", "on", "onsave", "Onsave", "::onSave", "a::b::onSave", "onSave!", " onSave",
        ] {
            assert_eq!(
                HandlerName::parse(name),
                Err(ConstructionError::InvalidHandler(name.to_string())),
                "{name} should be invalid"
            );
        }
    }
}
