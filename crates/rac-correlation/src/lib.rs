//! rac-correlation: tags every inbound HTTP request with a correlation id,
//! binds it into a request-scoped logging context while the request is
//! handled, and clears the binding afterward.

pub mod config;
pub mod context;
pub mod correlation;
pub mod error;
mod extract;
pub mod middleware;
pub mod server;

pub use context::LogContext;
pub use correlation::{CorrelationId, CORRELATION_ID_HEADER, CORRELATION_ID_KEY};
pub use error::Error;
pub use middleware::{correlation_id, CorrelationSettings};
