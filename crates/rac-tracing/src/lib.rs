//! Tracing setup shared by the rac-correlation services: subscriber
//! initialisation, optional OTLP export, and request span builders.

pub mod config;
pub mod otlp;
pub mod spans;

pub use config::{LogFormat, OtlpProtocol, TracingConfig};
pub use otlp::{init_tracing, TracingGuard};
