//! The protocol a list view uses to query its data source.
//!
//! [`DataSource`] covers the calls every adapter answers itself: counts,
//! item lookup and reverse lookup. Everything else a view may ask (titles,
//! heights, selection, editing) is a [`ProtocolCall`] that adapters forward
//! to an optional [`FallbackDataSource`].

use super::location::Location;
use super::registry::SupplementaryKind;

/// The queries a list view makes against its data source.
///
/// # Example
///
/// ```
/// use horizon_datasource::model::{ArrayAdapter, DataSource, Location};
///
/// let adapter: ArrayAdapter<(), &str, ()> = ArrayAdapter::new(vec!["a", "b"]);
///
/// assert_eq!(adapter.section_count(), 1);
/// assert_eq!(adapter.item_count(0), 2);
/// assert_eq!(adapter.item_at(Location::row(1)), Some("b"));
/// assert_eq!(adapter.location_of(&"a"), Some(Location::row(0)));
/// ```
pub trait DataSource: Send + Sync {
    /// The item type.
    type Item;

    /// Returns the number of sections.
    fn section_count(&self) -> usize;

    /// Returns the number of rows the view should show in `section`.
    ///
    /// Returns 0 for sections that do not exist.
    fn item_count(&self, section: usize) -> usize;

    /// Returns the item at `location`, or `None` if there is none.
    fn item_at(&self, location: Location) -> Option<Self::Item>;

    /// Returns the location of the first item equal to `item`.
    fn location_of(&self, item: &Self::Item) -> Option<Location>;
}

/// A view protocol method that adapters do not answer themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolCall {
    /// The user selected a row.
    DidSelectRow(Location),
    /// The user deselected a row.
    DidDeselectRow(Location),
    /// Title text for a section header or footer.
    TitleForSupplementary {
        /// Header or footer.
        kind: SupplementaryKind,
        /// The section asked about.
        section: usize,
    },
    /// Height of a section header or footer.
    HeightForSupplementary {
        /// Header or footer.
        kind: SupplementaryKind,
        /// The section asked about.
        section: usize,
    },
    /// Whether a row may be edited.
    CanEditRow(Location),
    /// Whether a row may be reordered.
    CanMoveRow(Location),
    /// The user committed a delete on a row.
    CommitDelete(Location),
}

impl ProtocolCall {
    /// Returns the method name, for logging and errors.
    pub fn method(&self) -> &'static str {
        match self {
            Self::DidSelectRow(_) => "did_select_row",
            Self::DidDeselectRow(_) => "did_deselect_row",
            Self::TitleForSupplementary { .. } => "title_for_supplementary",
            Self::HeightForSupplementary { .. } => "height_for_supplementary",
            Self::CanEditRow(_) => "can_edit_row",
            Self::CanMoveRow(_) => "can_move_row",
            Self::CommitDelete(_) => "commit_delete",
        }
    }
}

/// The answer to a forwarded protocol call.
#[derive(Debug, Clone, PartialEq)]
pub enum ProtocolValue {
    /// The call has no return value.
    Unit,
    /// A yes/no answer.
    Bool(bool),
    /// A length, such as a header height.
    Length(f32),
    /// Text, such as a header title.
    Text(String),
}

/// Receives the protocol calls an adapter does not own.
///
/// Adapters hold the fallback weakly; keep it alive elsewhere.
pub trait FallbackDataSource: Send + Sync {
    /// Handles `call`, or returns `None` to decline it.
    fn handle(&self, call: &ProtocolCall) -> Option<ProtocolValue>;
}
