//! HTML transformation subsystem.
//!
//! # Data Flow
//! ```text
//! origin response
//!     → classify.rs (content type eligible?)
//!         → no:  pass through byte-identical
//!         → yes: dispatcher picks a strategy
//!             → streaming.rs (lol_html over the live stream)   [preferred]
//!             → buffered.rs  (whole-body pattern matching)     [fallback]
//! ```
//!
//! # Design Decisions
//! - Strategies share the ElementRemover seam so tests can pin either one
//! - The capability probe runs once at startup; the per-call check is a
//!   cheap branch on the probed strategy
//! - Transformers never fail; stream read errors surface on the body

pub mod buffered;
pub mod classify;
pub mod remover;
pub mod streaming;

pub use remover::{ElementRemover, RemovalRules};

use axum::http::header::CONTENT_TYPE;
use axum::response::Response;

use crate::config::TransformConfig;
use crate::observability::metrics;
use buffered::BufferedRemover;
use streaming::StreamingRemover;

/// Chooses between pass-through, streaming removal and buffered removal.
pub struct TransformDispatcher {
    content_types: Vec<String>,
    streaming: Option<StreamingRemover>,
    buffered: BufferedRemover,
}

impl TransformDispatcher {
    /// Build the dispatcher from configuration, probing the streaming
    /// capability once.
    pub fn new(config: &TransformConfig) -> Self {
        let rules = RemovalRules::new(config.selectors.clone());
        let buffered = BufferedRemover::new(&rules, config.max_buffer_bytes);

        let streaming = if config.streaming {
            match StreamingRemover::new(rules) {
                Ok(remover) => Some(remover),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "Streaming rewriter unavailable, using buffered fallback"
                    );
                    None
                }
            }
        } else {
            None
        };

        Self {
            content_types: config
                .content_types
                .iter()
                .map(|t| t.to_lowercase())
                .collect(),
            streaming,
            buffered,
        }
    }

    /// True when a response with this content type should be rewritten.
    pub fn should_transform(&self, content_type: Option<&str>) -> bool {
        classify::should_transform(content_type, &self.content_types)
    }

    /// Rewrite the response body with the best available strategy.
    pub fn transform(&self, response: Response) -> Response {
        match &self.streaming {
            Some(streaming) => {
                metrics::record_transform("streaming");
                streaming.rewrite(response)
            }
            None => {
                metrics::record_transform("buffered");
                self.buffered.rewrite(response)
            }
        }
    }

    /// Classify the response and either pass it through untouched or
    /// rewrite its body.
    pub fn apply(&self, response: Response) -> Response {
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        if self.should_transform(content_type.as_deref()) {
            self.transform(response)
        } else {
            response
        }
    }
}
