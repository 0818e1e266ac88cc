//! Shared utilities for the assembly decision engine.

pub mod logging;
pub mod percent;

pub use logging::init_tracing;
pub use percent::format_percent;
