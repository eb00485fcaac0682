//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, request id)
//!     → upstream::Origin (forward to the configured origin)
//!     → transform::TransformDispatcher (pass through or rewrite)
//!     → Send to client
//! ```

pub mod server;

pub use server::HttpServer;
