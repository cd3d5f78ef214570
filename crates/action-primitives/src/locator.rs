use serde::{Deserialize, Serialize};
use std::fmt;

/// How an element is addressed on the page.
///
/// Locators compare by value, which the scripted page relies on to match
/// interactions against its element table.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "by", content = "value", rename_all = "snake_case")]
pub enum Locator {
    Id(String),
    Name(String),
    ClassName(String),
    LinkText(String),
    XPath(String),
    Css(String),
    Tag(String),
}

impl Locator {
    pub fn id(value: impl Into<String>) -> Self {
        Locator::Id(value.into())
    }

    pub fn name(value: impl Into<String>) -> Self {
        Locator::Name(value.into())
    }

    pub fn class_name(value: impl Into<String>) -> Self {
        Locator::ClassName(value.into())
    }

    pub fn link_text(value: impl Into<String>) -> Self {
        Locator::LinkText(value.into())
    }

    pub fn xpath(value: impl Into<String>) -> Self {
        Locator::XPath(value.into())
    }

    pub fn css(value: impl Into<String>) -> Self {
        Locator::Css(value.into())
    }

    pub fn tag(value: impl Into<String>) -> Self {
        Locator::Tag(value.into())
    }

    pub fn strategy(&self) -> &'static str {
        match self {
            Locator::Id(_) => "id",
            Locator::Name(_) => "name",
            Locator::ClassName(_) => "class",
            Locator::LinkText(_) => "link",
            Locator::XPath(_) => "xpath",
            Locator::Css(_) => "css",
            Locator::Tag(_) => "tag",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Locator::Id(v)
            | Locator::Name(v)
            | Locator::ClassName(v)
            | Locator::LinkText(v)
            | Locator::XPath(v)
            | Locator::Css(v)
            | Locator::Tag(v) => v,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy(), self.value())
    }
}

/// Quote `value` as an XPath string literal.
///
/// XPath 1.0 has no escape sequences, so values holding both quote kinds are
/// assembled with `concat()`.
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{}'", value);
    }
    if !value.contains('"') {
        return format!("\"{}\"", value);
    }
    let parts: Vec<String> = value
        .split('\'')
        .map(|part| format!("'{}'", part))
        .collect();
    format!("concat({})", parts.join(", \"'\", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_strategy() {
        assert_eq!(Locator::id("qty").to_string(), "id=qty");
        assert_eq!(
            Locator::link_text("Vendor Collaboration").to_string(),
            "link=Vendor Collaboration"
        );
    }

    #[test]
    fn xpath_literal_quoting() {
        assert_eq!(xpath_literal("MH12AB1234"), "'MH12AB1234'");
        assert_eq!(xpath_literal("O'Neil"), "\"O'Neil\"");
        assert_eq!(
            xpath_literal("a'b\"c"),
            "concat('a', \"'\", 'b\"c')"
        );
    }
}
