//! Observability setup for processes embedding the resolution engine.

pub mod tracing_setup;
