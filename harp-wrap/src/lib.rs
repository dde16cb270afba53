//! harp wrapping engine
//!
//! This crate turns typed domain objects into hypermedia resources
//! according to declarative, reusable policies:
//!
//! - Immutable [`WrapPolicy`] snapshots built fluently
//! - Symbolic expression trees with introspection instead of per-type
//!   serialization code
//! - The wrapping engine for single objects, lazy collections, and
//!   collections embedded into an envelope resource
//! - The [`ActionResolver`] seam for URL synthesis
//!
//! ```
//! use harp_wrap::{getter, wrap, WrapPolicy};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! #[serde(rename_all = "PascalCase")]
//! struct Order { reference: String }
//!
//! let policy = WrapPolicy::<Order>::new()
//!     .with_camel_case()
//!     .property(getter!(Order => Reference))
//!     .build();
//!
//! let order = Order { reference: "A-1".into() };
//! let resource = wrap(&order, &policy, None)?;
//! assert_eq!(resource.get("reference"), Some(&"A-1".into()));
//! # Ok::<(), harp_wrap::WrapError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod compiled;
pub mod error;
pub mod expr;
pub mod naming;
pub mod policy;
pub mod resolver;
pub mod rules;
pub mod wrapper;

// Re-export the resource primitives
pub use harp_resource::{Fields, Link, NamedLink, Resource};

// Re-export our own types
pub use compiled::{CompiledGetter, CompiledPolicy};
pub use error::{Result, WrapError};
pub use expr::{ActionCall, ArgExpr, Getter};
pub use policy::{CollectionWrapPolicy, LinkRuleBuilder, PropertyRuleBuilder, WrapPolicy};
pub use resolver::{ActionRequest, ActionResolver, RoutingError};
pub use rules::{LinkRule, PropertyWrap};
pub use wrapper::{wrap, wrap_all, wrap_collection, ResourceStream};
