//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → limits.rs (reject bodies over the configured size)
//!     → headers.rs (CORS, hardening response headers)
//!     → Pass to handlers
//! ```
//!
//! # Design Decisions
//! - Oversized bodies are rejected before any handler runs
//! - TLS termination is optional (tls.rs)

pub mod headers;
pub mod limits;
pub mod tls;

pub use tls::load_tls_config;
