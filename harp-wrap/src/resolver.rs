//! Action resolver boundary
//!
//! The engine never builds URLs itself. A [`LinkRule`](crate::LinkRule)
//! names a controller, an action, and a parameter map; turning those into a
//! concrete URL is the job of an [`ActionResolver`] implementation, which
//! also owns any request context (scheme, host) it needs.

use serde_json::Value;
use thiserror::Error;

/// Everything the engine knows about a link target when it asks a resolver
/// for a URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRequest {
    /// Target controller name
    pub controller: String,
    /// Target action name
    pub action: String,
    /// Merged parameters in deterministic order: call arguments first, then
    /// literal query parameters, then callback-produced parameters. Later
    /// sources already replaced earlier values on name collision.
    pub parameters: Vec<(String, Value)>,
}

impl ActionRequest {
    /// Look up a parameter value by name
    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameters
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}

/// Routing failure reported by an [`ActionResolver`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no route for {controller}/{action}: {reason}")]
pub struct RoutingError {
    /// Controller the engine asked for
    pub controller: String,
    /// Action the engine asked for
    pub action: String,
    /// Resolver-specific explanation
    pub reason: String,
}

impl RoutingError {
    /// Build a routing error for the given request
    pub fn for_request(request: &ActionRequest, reason: impl Into<String>) -> Self {
        Self {
            controller: request.controller.clone(),
            action: request.action.clone(),
            reason: reason.into(),
        }
    }
}

/// Turns an abstract action reference into a URL.
///
/// Implementations are consulted synchronously during link resolution; any
/// failure is surfaced to the `wrap` caller unchanged. When no resolver is
/// supplied to a wrap call the whole linking phase is skipped instead.
pub trait ActionResolver {
    /// Produce a URL for the given action request
    fn action_url(&self, request: &ActionRequest) -> Result<String, RoutingError>;
}
