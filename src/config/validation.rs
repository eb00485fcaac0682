//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Fail fast on a missing or unusable origin before any fetch happens
//! - Validate value ranges (timeouts and buffer limits nonzero)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A semantic configuration error.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error(
        "upstream origin is not set; set `upstream.origin` or the ORIGIN_URL \
         environment variable (e.g. https://your-site.example.com)"
    )]
    MissingOrigin,

    #[error("upstream origin {0:?} is not a valid http(s) URL: {1}")]
    InvalidOrigin(String, String),

    #[error("listener bind address {0:?} is not a valid socket address")]
    InvalidBindAddress(String),

    #[error("{0} must be nonzero")]
    ZeroValue(&'static str),
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.upstream.origin.is_empty() {
        errors.push(ValidationError::MissingOrigin);
    } else {
        match Url::parse(&config.upstream.origin) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(url) => errors.push(ValidationError::InvalidOrigin(
                config.upstream.origin.clone(),
                format!("unsupported scheme {:?}", url.scheme()),
            )),
            Err(e) => errors.push(ValidationError::InvalidOrigin(
                config.upstream.origin.clone(),
                e.to_string(),
            )),
        }
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroValue("timeouts.connect_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroValue("timeouts.request_secs"));
    }
    if config.transform.max_buffer_bytes == 0 {
        errors.push(ValidationError::ZeroValue("transform.max_buffer_bytes"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> ProxyConfig {
        let mut config = ProxyConfig::default();
        config.upstream.origin = "https://site.example.com".to_string();
        config
    }

    #[test]
    fn accepts_a_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn missing_origin_fails_fast() {
        let config = ProxyConfig::default();
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::MissingOrigin));
    }

    #[test]
    fn rejects_non_http_origin() {
        let mut config = valid_config();
        config.upstream.origin = "ftp://site.example.com".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::InvalidOrigin(..)));
    }

    #[test]
    fn collects_every_error() {
        let mut config = ProxyConfig::default();
        config.listener.bind_address = "not-an-address".to_string();
        config.timeouts.request_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
