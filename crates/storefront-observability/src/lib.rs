//! Observability setup for storefront tools.
//!
//! Library crates only emit `tracing` events; binaries call
//! [`init_logging`] once at startup to decide where they go.

mod logging;

pub use logging::*;
