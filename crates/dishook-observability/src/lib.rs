//! dishook observability
//!
//! Tracing subscriber setup shared by the dishook binaries.

pub mod logging;

pub use logging::{init_logging, level_from_env, LogFormat};
