//! Visibility-cleaning reverse proxy.
//!
//! Fetches pages from a fixed upstream origin, removes elements the
//! origin's visual builder marks as conditionally invisible from HTML
//! responses, and passes all other content through unchanged.

pub mod config;
pub mod http;
pub mod observability;
pub mod transform;
pub mod upstream;

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use transform::TransformDispatcher;
