//! Locators for remote-control element queries.
//!
//! Applications tag the widgets a test cares about with a custom widget id.
//! Tests refer to those widgets by bare name; the remote-control server wants
//! a strategy-qualified query, so a bare name `myButton` is sent as
//! `id=myButton`.
//!
//! Anything else carrying a `<strategy>=` prefix is already a full query and
//! passes through untouched: the stock strategies (`xpath=`, `css=`, ...) as
//! well as the widget strategies a user extension registers, such as `qx=`
//! (widget by user-data id) and `qxp=` (widget path like `myDialog/buttonOK`).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Prefix turning a bare widget name into an id query
pub const ID_PREFIX: &str = "id=";

/// Whether `input` starts with a strategy: a run of ASCII letters directly
/// followed by `=` (`qxp=a/b`, `xpath=//b`)
fn has_strategy(input: &str) -> bool {
    input
        .split_once('=')
        .is_some_and(|(head, _)| !head.is_empty() && head.chars().all(|c| c.is_ascii_alphabetic()))
}

/// A reference to one element on the page under test
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    /// Bare widget id, queried as `id=<name>`
    Id(String),
    /// Fully qualified query passed through verbatim (e.g. `xpath=//button`)
    Raw(String),
}

impl Locator {
    /// Locate an element by its custom widget id
    #[must_use]
    pub fn id(name: impl Into<String>) -> Self {
        Self::Id(name.into())
    }

    /// Use a fully qualified query as-is
    #[must_use]
    pub fn raw(query: impl Into<String>) -> Self {
        Self::Raw(query.into())
    }

    /// The query string sent to the remote-control server
    #[must_use]
    pub fn query(&self) -> String {
        match self {
            Self::Id(name) => format!("{ID_PREFIX}{name}"),
            Self::Raw(query) => query.clone(),
        }
    }

    /// Interpret user input: `id=x` and other strategy-qualified strings
    /// keep their strategy, anything else is a bare widget id
    #[must_use]
    pub fn parse(input: &str) -> Self {
        if let Some(name) = input.strip_prefix(ID_PREFIX) {
            return Self::id(name);
        }
        if has_strategy(input) {
            return Self::raw(input);
        }
        Self::id(input)
    }

    /// The bare name for id locators, the full query otherwise
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Id(name) | Self::Raw(name) => name,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.query())
    }
}

impl FromStr for Locator {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl Serialize for Locator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.query())
    }
}

impl<'de> Deserialize<'de> for Locator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let query = String::deserialize(deserializer)?;
        Ok(Self::parse(&query))
    }
}

impl From<&str> for Locator {
    fn from(name: &str) -> Self {
        Self::id(name)
    }
}

impl From<String> for Locator {
    fn from(name: String) -> Self {
        Self::Id(name)
    }
}

impl From<&Locator> for Locator {
    fn from(locator: &Locator) -> Self {
        locator.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_id_locator_query() {
        assert_eq!(Locator::id("myButton").query(), "id=myButton");
    }

    #[test]
    fn test_raw_locator_passthrough() {
        let locator = Locator::raw("xpath=//button[1]");
        assert_eq!(locator.query(), "xpath=//button[1]");
        assert_eq!(locator.name(), "xpath=//button[1]");
    }

    #[test]
    fn test_bare_str_becomes_id() {
        let locator: Locator = "w10".into();
        assert_eq!(locator, Locator::id("w10"));
        assert_eq!(locator.name(), "w10");
    }

    #[test]
    fn test_display_matches_query() {
        assert_eq!(Locator::id("myButton").to_string(), "id=myButton");
    }

    #[test]
    fn test_already_prefixed_name_is_not_special() {
        // A bare name is always prefixed; use Locator::raw for full queries
        assert_eq!(Locator::id("id=x").query(), "id=id=x");
    }

    #[test]
    fn test_parse() {
        assert_eq!(Locator::parse("myButton"), Locator::id("myButton"));
        assert_eq!(Locator::parse("id=myButton"), Locator::id("myButton"));
        assert_eq!(
            Locator::parse("xpath=//button"),
            Locator::raw("xpath=//button")
        );
        assert_eq!(Locator::parse("css=#b"), Locator::raw("css=#b"));
    }

    #[test]
    fn test_parse_widget_strategies() {
        assert_eq!(Locator::parse("qx=customButton").query(), "qx=customButton");
        assert_eq!(
            Locator::parse("qxp=myDialog/buttonOK"),
            Locator::raw("qxp=myDialog/buttonOK")
        );
    }

    #[test]
    fn test_parse_non_strategy_equals_is_id() {
        assert_eq!(Locator::parse("a-b=c"), Locator::id("a-b=c"));
        assert_eq!(Locator::parse("=x"), Locator::id("=x"));
    }

    #[test]
    fn test_widget_path_survives_yaml() {
        let locator = Locator::raw("qxp=myDialog/buttonOK");
        let yaml = serde_yaml_ng::to_string(&locator).unwrap();
        let back: Locator = serde_yaml_ng::from_str(&yaml).unwrap();
        assert_eq!(back, locator);
    }

    #[test]
    fn test_serializes_as_query() {
        let json = serde_json::to_string(&Locator::id("myButton")).unwrap();
        assert_eq!(json, r#""id=myButton""#);
        let back: Locator = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Locator::id("myButton"));
    }

    #[test]
    fn test_deserializes_bare_name() {
        let locator: Locator = serde_json::from_str(r#""myButton""#).unwrap();
        assert_eq!(locator, Locator::id("myButton"));
    }

    proptest! {
        #[test]
        fn prop_id_query_is_prefixed_name(name in "[A-Za-z0-9_-]{1,24}") {
            let locator = Locator::id(name.clone());
            prop_assert_eq!(locator.query(), format!("id={name}"));
            prop_assert_eq!(locator.name(), name.as_str());
        }

        #[test]
        fn prop_query_survives_serde(name in "[A-Za-z0-9_=-]{1,24}") {
            let locator = Locator::id(name);
            let json = serde_json::to_string(&locator).unwrap();
            let back: Locator = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(back, locator);
        }

        #[test]
        fn prop_raw_query_survives_serde(
            strategy in "(xpath|css|link|name|dom|qx|qxp)",
            target in "[A-Za-z0-9_/#=\\[\\]-]{0,24}",
        ) {
            let locator = Locator::raw(format!("{strategy}={target}"));
            let json = serde_json::to_string(&locator).unwrap();
            let back: Locator = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(back, locator);
        }
    }
}
