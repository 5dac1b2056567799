//! HTTP middleware and extractors.
//!
//! # Request pipeline (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (correlate logs, Sentry events and responses)
//! 4. CORS (browser SPA origin)
//!
//! Authentication is not a layer: handlers that need a caller take the
//! [`CurrentUser`] extractor, so the identity arrives as an explicit argument
//! rather than ambient request state.

pub mod auth;
pub mod request_id;

pub use auth::{CurrentUser, authorize};
pub use request_id::request_id_middleware;
