//! Structured logging for the catalog application.
//!
//! This crate provides:
//! - `StructuredLayer` - `tracing` layer emitting JSON or human-readable entries
//! - `LogSink` - Where formatted entries go (browser console, stderr, memory)
//! - `init_logging` - Install the layer as the global subscriber

mod logging;
mod sink;

pub use logging::*;
pub use sink::*;
