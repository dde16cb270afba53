//! harp resource primitives
//!
//! This crate provides the hypermedia output model shared by the harp
//! workspace, with no dependency on the policy or wrapping machinery:
//!
//! - Case-insensitive property bag
//! - Link and named-link value objects
//! - The resource container (properties, links, embedded resources)
//!
//! Values are `serde_json::Value`, so any downstream serializer (HAL+JSON
//! or otherwise) can consume a [`Resource`] directly.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fields;
pub mod link;
pub mod resource;

// Re-export commonly used types
pub use fields::Fields;
pub use link::{Link, NamedLink};
pub use resource::Resource;
