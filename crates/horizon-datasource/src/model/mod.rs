//! Data source adapters for table and collection views.
//!
//! An adapter owns the items a list view displays and keeps the view in step
//! with them. Callers mutate the adapter; the adapter computes the minimal
//! row and section operations and hands them to the bound view as one batch.
//!
//! # Core Types
//!
//! - `Location`: a `(section, item)` position
//! - `ItemStore`: sectioned storage that turns mutations into `UpdateOp`s
//! - `ViewRegistry`: identifier to (factory, configuration) table for cells,
//!   headers and footers
//! - `UpdateTarget`: the trait a bound view implements to receive batches
//! - `DataSource`: the queries a view makes against its adapter
//!
//! # Adapters
//!
//! - `ArrayAdapter`: flat or sectioned list of items
//! - `AccordionAdapter`: sectioned list whose sections expand and collapse
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use parking_lot::Mutex;
//! use horizon_datasource::model::{
//!     ArrayAdapter, Location, RowAnimation, UpdateOp, UpdateTarget,
//! };
//!
//! #[derive(Default)]
//! struct Log(Mutex<Vec<String>>);
//!
//! impl UpdateTarget for Log {
//!     fn apply(&self, op: &UpdateOp, _animation: RowAnimation) {
//!         self.0.lock().push(op.name().to_string());
//!     }
//! }
//!
//! let adapter: ArrayAdapter<(), &str, ()> = ArrayAdapter::new(vec!["a", "b", "c"]);
//! let view = Arc::new(Log::default());
//! adapter.bind_view(&view);
//!
//! adapter.move_item(Location::row(0), Location::row(2)).unwrap();
//! assert_eq!(adapter.all_items(), vec!["b", "c", "a"]);
//! assert_eq!(*view.0.lock(), vec!["move_row"]);
//! ```
//!
//! # Data Flow
//!
//! ```text
//! caller ──> adapter ──> ItemStore ──> [UpdateOp]
//!                                          │
//!                    ┌─────────────────────┤
//!                    v                     v
//!             bound view             updates_committed
//!            (UpdateTarget)              (Signal)
//! ```

mod accordion;
mod adapter;
mod dispatch;
mod expansion;
mod location;
mod protocol;
mod registry;
mod store;
mod update;

pub use accordion::AccordionAdapter;
pub use adapter::{ArrayAdapter, DataSourceSignals};
pub use dispatch::UpdateDispatcher;
pub use expansion::{ExpansionChange, ExpansionState};
pub use location::{Location, locations_for_indexes, locations_in_range};
pub use protocol::{DataSource, FallbackDataSource, ProtocolCall, ProtocolValue};
pub use registry::{
    AccordionHeaderConfigurator, CellConfigurator, CellIdentifierResolver, Registration,
    RegistrationKind, SupplementaryConfigurator, SupplementaryIdentifierResolver,
    SupplementaryKind, ViewFactory, ViewRegistry, default_identifier,
};
pub use store::{ItemStore, Section};
pub use update::{RowAnimation, UpdateBatch, UpdateOp, UpdateTarget};
