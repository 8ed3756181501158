//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (CSP, framing, caching)
//! 5. Session layer (tower-sessions with in-memory store; per-visitor locks
//!    are taken by the `ClientStorage` extractor)
//! 6. Under construction (redirect unfinished route trees)
//! 7. Rate limiting on the chat API (governor)

pub mod client_storage;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;
pub mod under_construction;

pub use client_storage::ClientStorage;
pub use rate_limit::chat_rate_limiter;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::{VisitorSessions, create_session_layer};
pub use under_construction::under_construction_middleware;
