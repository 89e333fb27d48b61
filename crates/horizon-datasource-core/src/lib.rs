//! Core systems for Horizon Datasource.
//!
//! This crate provides the pieces the data source adapters are built on:
//!
//! - **Signal/Slot System**: Type-safe change notification for adapter observers
//! - **Errors**: The [`DataSourceError`] taxonomy shared by every adapter operation
//! - **Logging**: `tracing` targets and performance spans
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_datasource_core::Signal;
//!
//! let section_toggled = Signal::<(usize, bool)>::new();
//!
//! let conn_id = section_toggled.connect(|(section, expanded)| {
//!     println!("section {} expanded: {}", section, expanded);
//! });
//!
//! section_toggled.emit((2, true));
//! section_toggled.disconnect(conn_id);
//! ```

mod error;
pub mod logging;
pub mod signal;

pub use error::{DataSourceError, Result};
pub use logging::PerfSpan;
pub use signal::{ConnectionId, Signal};
