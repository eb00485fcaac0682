//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the visibility proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream origin and header forwarding rules.
    pub upstream: UpstreamConfig,

    /// HTML transformation settings.
    pub transform: TransformConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream origin configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Origin URL of the proxied site (e.g., "https://your-site.example.com").
    ///
    /// Required; also settable via the `ORIGIN_URL` environment variable.
    pub origin: String,

    /// Mount path of the application (e.g., "/post"), prepended to the
    /// request path when fetching from the origin.
    pub mount_path: String,

    /// Fetch root content regardless of where the app is mounted
    /// (preview mode). When set, `mount_path` is not prepended.
    pub proxy_target_root: bool,

    /// Request headers forwarded to the origin.
    pub forward_headers: Vec<String>,

    /// Origin response headers excluded from the client response.
    /// These are managed by the proxy or the transport itself.
    pub exclude_response_headers: Vec<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            origin: String::new(),
            mount_path: String::new(),
            proxy_target_root: false,
            forward_headers: vec![
                "accept".to_string(),
                "accept-language".to_string(),
                "user-agent".to_string(),
                "cookie".to_string(),
                "cache-control".to_string(),
            ],
            exclude_response_headers: vec![
                "content-encoding".to_string(),
                "content-length".to_string(),
                "transfer-encoding".to_string(),
                "connection".to_string(),
            ],
        }
    }
}

/// HTML transformation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Selectors for elements to remove from proxied HTML.
    pub selectors: Vec<String>,

    /// Content-type substrings eligible for transformation.
    /// Anything else passes through unchanged.
    pub content_types: Vec<String>,

    /// Use the streaming rewriter when available.
    pub streaming: bool,

    /// Maximum body size the buffered fallback will materialize.
    pub max_buffer_bytes: usize,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            selectors: vec![".w-condition-invisible".to_string()],
            content_types: vec!["text/html".to_string()],
            streaming: true,
            max_buffer_bytes: 16 * 1024 * 1024,
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_the_edge_layer_contract() {
        let config = ProxyConfig::default();
        assert_eq!(config.transform.selectors, vec![".w-condition-invisible"]);
        assert_eq!(config.transform.content_types, vec!["text/html"]);
        assert!(config.transform.streaming);
        assert!(config
            .upstream
            .exclude_response_headers
            .contains(&"content-length".to_string()));
        assert!(config.upstream.origin.is_empty());
    }

    #[test]
    fn minimal_toml_parses_with_defaults() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [upstream]
            origin = "https://site.example.com"
            "#,
        )
        .unwrap();
        assert_eq!(config.upstream.origin, "https://site.example.com");
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.transform.selectors, vec![".w-condition-invisible"]);
    }
}
