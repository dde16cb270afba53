//! Link value objects

use serde::Serialize;

/// A hyperlink target.
///
/// Only `href` is required; `title` and `templated` are optional HAL
/// attributes and are omitted from serialized output when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    /// Target URL
    pub href: String,
    /// Optional human-readable title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Whether `href` is a URI template
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templated: Option<bool>,
}

impl Link {
    /// Create a link to the given URL
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            title: None,
            templated: None,
        }
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Mark the href as a URI template
    pub fn with_templated(mut self, templated: bool) -> Self {
        self.templated = Some(templated);
        self
    }
}

/// A link together with its relation name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedLink {
    /// Relation name (e.g. `"self"`)
    pub name: String,
    /// The link target
    pub link: Link,
}

impl NamedLink {
    /// Pair a relation name with a link
    pub fn new(name: impl Into<String>, link: Link) -> Self {
        Self {
            name: name.into(),
            link,
        }
    }
}
