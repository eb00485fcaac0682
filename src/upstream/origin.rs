//! Origin fetch client.

use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use futures_util::TryStreamExt;
use thiserror::Error;

use crate::config::{TimeoutConfig, UpstreamConfig};
use crate::upstream::headers::{forward_headers, response_headers};
use crate::upstream::url::build_target_url;

/// Error raised while reaching the origin.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The HTTP client could not be constructed.
    #[error("failed to build origin client: {0}")]
    Client(#[source] reqwest::Error),

    /// The origin fetch itself failed.
    #[error("origin request failed: {0}")]
    Request(#[source] reqwest::Error),
}

/// Client for the configured origin site.
pub struct Origin {
    client: reqwest::Client,
    config: UpstreamConfig,
}

impl Origin {
    /// Build the origin client.
    ///
    /// Redirects are never followed; they pass through for the client to
    /// handle. Compressed origin bodies are decoded transparently so the
    /// transform layer always sees identity-encoded bytes.
    pub fn new(config: UpstreamConfig, timeouts: &TimeoutConfig) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(UpstreamError::Client)?;
        Ok(Self { client, config })
    }

    /// Forward a client request to the origin and adapt the response.
    pub async fn forward(&self, request: Request<Body>) -> Result<Response, UpstreamError> {
        let (parts, body) = request.into_parts();
        let target = build_target_url(&self.config, parts.uri.path(), parts.uri.query());
        let headers = forward_headers(&parts.headers, &self.config.forward_headers);

        tracing::debug!(target = %target, method = %parts.method, "Fetching from origin");

        let mut builder = self
            .client
            .request(parts.method.clone(), target.as_str())
            .headers(headers);
        if parts.method != Method::GET && parts.method != Method::HEAD {
            builder = builder.body(reqwest::Body::wrap_stream(body.into_data_stream()));
        }

        let origin_response = builder.send().await.map_err(UpstreamError::Request)?;

        let status = origin_response.status();
        let headers = response_headers(
            origin_response.headers(),
            &self.config.exclude_response_headers,
        );
        let stream = origin_response.bytes_stream().map_err(axum::Error::new);

        let mut response = Response::new(Body::from_stream(stream));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        Ok(response)
    }
}
