//! # werkhof-observability
//!
//! Observability-Crate fuer Werkhof:
//! - Health-Check-Endpunkt (`/health`) mit Datenbank-Probe
//! - Structured Logging via tracing-subscriber
//! - Request-Timing Middleware

pub mod health;
pub mod logging;
pub mod middleware;

pub use health::{db_probe, health_router, DbProbe, HealthResponse, HealthState, HealthStatus};
pub use logging::logging_initialisieren;
pub use middleware::{request_trace_layer, timing_middleware};
