//! Logging and tracing facilities for Horizon Datasource.
//!
//! Horizon Datasource uses the `tracing` crate for instrumentation. Nothing is
//! printed unless the application installs a subscriber:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("horizon_datasource=debug")
//!         .init();
//! }
//! ```
//!
//! Store mutations log at `trace`, dispatched update batches and section
//! toggles at `debug`, and dropped batches (no bound view) at `trace`.

/// Span names used throughout Horizon Datasource for tracing.
pub mod span_names {
    /// Update batch dispatch span.
    pub const DISPATCH: &str = "horizon_datasource::dispatch";
    /// Section toggle span.
    pub const TOGGLE: &str = "horizon_datasource::toggle";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "horizon_datasource_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_datasource_core::signal";
    /// Item store mutations.
    pub const STORE: &str = "horizon_datasource::store";
    /// Update batch dispatch to bound views.
    pub const DISPATCH: &str = "horizon_datasource::dispatch";
    /// Cell and supplementary view registration.
    pub const REGISTRY: &str = "horizon_datasource::registry";
    /// Accordion section expansion.
    pub const ACCORDION: &str = "horizon_datasource::accordion";
}

/// A guard that keeps a tracing span entered until it is dropped.
///
/// This is useful for tracking the duration of operations.
#[derive(Debug)]
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::debug_span!(target: "horizon_datasource::perf", "perf", operation = name);
        Self {
            _span: span.entered(),
        }
    }
}
