//! Observability setup for personabot: structured logging with optional
//! OpenTelemetry span export.

pub mod tracing_setup;
