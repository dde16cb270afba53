//! The hypermedia resource container

use crate::fields::Fields;
use crate::link::NamedLink;
use serde_json::Value;

/// A hypermedia resource: named properties, links, and embedded
/// sub-resources.
///
/// Resources are produced empty and populated by a wrapping engine; they
/// remain plain mutable values afterward, so callers may keep amending
/// them. Links and embedded resources preserve insertion order; properties
/// are a case-insensitive bag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resource {
    properties: Fields,
    links: Vec<NamedLink>,
    embedded: Vec<Resource>,
}

impl Resource {
    /// Create an empty resource
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property. Last write wins on name collision (ignoring case).
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(name, value);
    }

    /// Look up a property value by name, ignoring case
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Property names in no particular order
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.names()
    }

    /// The property bag
    pub fn properties(&self) -> &Fields {
        &self.properties
    }

    /// Append a link
    pub fn add_link(&mut self, link: NamedLink) {
        self.links.push(link);
    }

    /// Append several links, preserving order
    pub fn add_links(&mut self, links: impl IntoIterator<Item = NamedLink>) {
        self.links.extend(links);
    }

    /// Links in insertion order
    pub fn links(&self) -> &[NamedLink] {
        &self.links
    }

    /// Append an embedded sub-resource
    pub fn embed(&mut self, resource: Resource) {
        self.embedded.push(resource);
    }

    /// Embedded sub-resources in insertion order
    pub fn embedded(&self) -> &[Resource] {
        &self.embedded
    }
}
