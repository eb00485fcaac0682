//! Element removal strategy seam.

use std::sync::Arc;

use axum::response::Response;

/// The ordered set of selectors configured for removal.
///
/// Read-only at request time; built once at startup and shared across
/// strategies and requests.
#[derive(Debug, Clone)]
pub struct RemovalRules {
    selectors: Arc<Vec<String>>,
}

impl RemovalRules {
    /// Create a rule set from configured selectors.
    pub fn new(selectors: Vec<String>) -> Self {
        Self {
            selectors: Arc::new(selectors),
        }
    }

    /// The configured selectors, in order.
    pub fn selectors(&self) -> &[String] {
        &self.selectors
    }
}

/// A strategy that removes configured elements from an HTML response body.
///
/// Implementations are pure transducers: they preserve status and headers,
/// never fail on malformed input, and surface underlying stream read
/// failures through the returned body as transport-level errors.
pub trait ElementRemover: Send + Sync {
    /// Rewrite the response body in place of the original.
    fn rewrite(&self, response: Response) -> Response;
}
