//! Horizon Datasource - data source adapters for table and collection views.
//!
//! This is the main crate. It re-exports the core signal, error and logging
//! APIs and adds the adapters themselves.
//!
//! # Example
//!
//! ```
//! use horizon_datasource::model::{AccordionAdapter, DataSource};
//! use horizon_datasource::config::AdapterConfig;
//!
//! let config = AdapterConfig::new().with_sections_to_keep_open([0]);
//! let accordion: AccordionAdapter<&str, &str, ()> = AccordionAdapter::new(
//!     vec!["Pinned", "More"],
//!     vec![vec!["first"], vec!["second", "third"]],
//! )?
//! .with_config(&config);
//!
//! assert_eq!(accordion.item_count(0), 1);
//! assert_eq!(accordion.item_count(1), 0);
//! # Ok::<(), horizon_datasource::DataSourceError>(())
//! ```

pub use horizon_datasource_core::*;

pub mod config;
pub mod model;
