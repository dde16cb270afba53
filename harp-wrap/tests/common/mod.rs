//! Shared test doubles for the wrapping suites

use harp_wrap::{ActionRequest, ActionResolver, RoutingError};
use serde_json::Value;
use std::sync::Mutex;

/// Resolver double: records every request and returns a deterministic URL
/// of the form `https://api.test/<controller>/<action>?<query>`.
///
/// Spaces in parameter values are emitted percent-encoded so tests can
/// observe the engine decoding resolver output.
pub struct RecordingResolver {
    requests: Mutex<Vec<ActionRequest>>,
}

impl RecordingResolver {
    pub fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests seen so far, in call order
    pub fn requests(&self) -> Vec<ActionRequest> {
        self.requests.lock().expect("resolver lock").clone()
    }
}

impl ActionResolver for RecordingResolver {
    fn action_url(&self, request: &ActionRequest) -> Result<String, RoutingError> {
        self.requests
            .lock()
            .expect("resolver lock")
            .push(request.clone());

        let mut url = format!("https://api.test/{}/{}", request.controller, request.action);
        for (i, (name, value)) in request.parameters.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(name);
            url.push('=');
            url.push_str(&render(value));
        }
        Ok(url)
    }
}

fn render(value: &Value) -> String {
    let text = match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    text.replace(' ', "%20")
}

/// Resolver double that fails every request.
pub struct FailingResolver;

impl ActionResolver for FailingResolver {
    fn action_url(&self, request: &ActionRequest) -> Result<String, RoutingError> {
        Err(RoutingError::for_request(request, "no route table loaded"))
    }
}
