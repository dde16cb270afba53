//! Symbolic expressions
//!
//! Policies do not store compiled accessors; they store small symbolic
//! expression trees that can be inspected without being evaluated. This
//! module provides:
//!
//! - The untyped [`Expr`] tree (parameters, constants, member accesses,
//!   method calls)
//! - Introspection: member-chain name resolution and the typed-parameter
//!   finder
//! - Evaluation against a serialized instance, including the one-time
//!   constant-vs-per-instance classification of call arguments
//! - Typed construction facades: [`Getter`], [`ArgExpr`], [`ActionCall`]

pub mod ast;
pub mod eval;
pub mod introspect;
pub mod typed;

pub use ast::{CallExpr, Expr, NamedArg, ParamExpr};
pub use eval::{BoundArg, Env};
pub use introspect::{member_chain, params_of, params_of_type, resolve_name};
pub use typed::{ActionCall, ArgExpr, Getter};
