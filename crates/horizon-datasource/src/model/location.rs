//! Locations for addressing items in sectioned data sources.
//!
//! A [`Location`] is the `(section, item)` pair a list view uses to identify
//! one row. It carries no validity of its own: whether a location exists is a
//! question for the store it is used with.

use std::collections::BTreeSet;
use std::ops::Range;

/// The position of one item: a section index and an item offset within it.
///
/// Locations order by section first, then by item, which is the order rows
/// appear on screen.
///
/// # Example
///
/// ```
/// use horizon_datasource::model::Location;
///
/// let location = Location::new(1, 4);
/// assert_eq!(location.section(), 1);
/// assert_eq!(location.item(), 4);
/// assert!(Location::new(0, 9) < location);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Location {
    section: usize,
    item: usize,
}

impl Location {
    /// Creates a location from a section index and item offset.
    #[inline]
    pub const fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }

    /// Shorthand for a location in section 0, the only section of a
    /// non-sectioned data source.
    #[inline]
    pub const fn row(item: usize) -> Self {
        Self::new(0, item)
    }

    /// Returns the section index.
    #[inline]
    pub const fn section(&self) -> usize {
        self.section
    }

    /// Returns the item offset within the section.
    #[inline]
    pub const fn item(&self) -> usize {
        self.item
    }

    /// Returns a location in the same section at a different offset.
    #[inline]
    pub const fn sibling(&self, item: usize) -> Self {
        Self::new(self.section, item)
    }
}

impl From<(usize, usize)> for Location {
    fn from((section, item): (usize, usize)) -> Self {
        Self::new(section, item)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.section, self.item)
    }
}

/// Returns one location per offset in `range`, all in `section`.
pub fn locations_in_range(range: Range<usize>, section: usize) -> Vec<Location> {
    range.map(|item| Location::new(section, item)).collect()
}

/// Returns one location per offset in `indexes`, ascending, all in `section`.
pub fn locations_for_indexes(indexes: &BTreeSet<usize>, section: usize) -> Vec<Location> {
    indexes
        .iter()
        .map(|&item| Location::new(section, item))
        .collect()
}
