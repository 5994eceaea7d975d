//! Logging facilities for Horizon Grid.
//!
//! Horizon Grid uses the `tracing` crate for instrumentation. Nothing is
//! printed unless the application installs a subscriber:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_grid=debug,horizon_grid_core::broadcast=trace")
//!     .init();
//! ```

/// Span names used throughout Horizon Grid.
pub mod span_names {
    /// Broadcast publish span.
    pub const PUBLISH: &str = "horizon_grid::publish";
    /// Cell lifecycle span.
    pub const CELL: &str = "horizon_grid::cell";
    /// Matrix mutation span.
    pub const MATRIX: &str = "horizon_grid::matrix";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "horizon_grid_core";
    /// Broadcast channel target.
    pub const BROADCAST: &str = "horizon_grid_core::broadcast";
    /// Cell renderer target.
    pub const CELL: &str = "horizon_grid::cell";
    /// Shared matrix target.
    pub const MATRIX: &str = "horizon_grid::matrix";
    /// Configuration loading target.
    pub const CONFIG: &str = "horizon_grid::config";
    /// Value formatting target.
    pub const FORMAT: &str = "horizon_grid::format";
    /// Date formatting target.
    pub const DATE: &str = "horizon_grid::date";
    /// Long-press recognizer target.
    pub const GESTURE: &str = "horizon_grid::gesture";
    /// Performance spans.
    pub const PERF: &str = "horizon_grid::perf";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Useful for timing an operation in a profiler that consumes spans.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Enter a new performance span named `name`.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: targets::PERF, "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

/// Trace-level event under the core target.
#[macro_export]
macro_rules! grid_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: $crate::logging::targets::CORE, $($arg)*)
    };
}

/// Debug-level event under the core target.
#[macro_export]
macro_rules! grid_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: $crate::logging::targets::CORE, $($arg)*)
    };
}

/// Warn-level event under the core target.
#[macro_export]
macro_rules! grid_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: $crate::logging::targets::CORE, $($arg)*)
    };
}
