//! Upstream origin subsystem.
//!
//! # Data Flow
//! ```text
//! client request
//!     → url.rs (origin + mount path + query)
//!     → headers.rs (allow-listed forward headers)
//!     → origin.rs (fetch, no redirect following)
//!     → headers.rs (scrubbed response headers + marker)
//!     → http::Response<Body> handed to the transform layer
//! ```
//!
//! # Design Decisions
//! - One fixed origin per process; no routing, no load balancing
//! - Transport errors propagate unchanged; no retries
//! - Request bodies stream upstream without buffering

pub mod headers;
pub mod origin;
pub mod url;

pub use origin::{Origin, UpstreamError};
