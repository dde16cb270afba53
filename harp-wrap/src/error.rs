//! Error types for the wrapping engine

use crate::resolver::RoutingError;
use thiserror::Error;

/// Wrapping engine error types
#[derive(Debug, Error)]
pub enum WrapError {
    /// Invalid argument passed to a policy or rule constructor.
    #[error("Invalid construction: {0}")]
    Construction(String),
    /// A captured link expression is not a single direct method call.
    #[error("Unsupported expression: {0}")]
    UnsupportedExpression(String),
    /// No explicit name was supplied and none could be derived from the
    /// getter expression.
    #[error("Unable to infer a property name: {0}")]
    NameInference(String),
    /// An expression did not match the serialized instance (wrong member
    /// name, access through null, non-object target) or referenced an
    /// unbound parameter.
    #[error("Expression evaluation failed: {0}")]
    Evaluation(String),
    /// The action resolver could not produce a URL. Propagated verbatim.
    #[error("Routing failed: {0}")]
    Routing(#[from] RoutingError),
    /// Serializing the wrapped instance failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Internal invariant was violated.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, WrapError>;
