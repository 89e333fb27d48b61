//! Sectioned item storage with change computation.
//!
//! [`ItemStore`] holds the adapter's items and turns every structural
//! mutation into the [`UpdateOp`]s a bound view needs to follow along. It has
//! no locking and no knowledge of views; the adapters wrap it.
//!
//! Every mutating method validates its arguments completely before touching
//! any state. On error the store is unchanged.

use std::collections::BTreeSet;
use std::ops::Range;

use horizon_datasource_core::{DataSourceError, Result};

use super::location::{Location, locations_for_indexes, locations_in_range};
use super::update::UpdateOp;

/// One section: an optional label and its ordered items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<S, T> {
    label: Option<S>,
    items: Vec<T>,
}

impl<S, T> Section<S, T> {
    fn labelled(label: S, items: Vec<T>) -> Self {
        Self {
            label: Some(label),
            items,
        }
    }

    fn unlabelled(items: Vec<T>) -> Self {
        Self { label: None, items }
    }

    /// Returns the section label. Non-sectioned stores have no labels.
    pub fn label(&self) -> Option<&S> {
        self.label.as_ref()
    }

    /// Returns the section's items in order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Returns the number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the section has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// An ordered, optionally sectioned collection of items.
///
/// A non-sectioned store always has exactly one unlabelled section. A
/// sectioned store has any number of labelled sections, including none.
///
/// # Example
///
/// ```
/// use horizon_datasource::model::{ItemStore, Location, UpdateOp};
///
/// let mut store: ItemStore<(), &str> = ItemStore::new(vec!["a", "b", "c"]);
/// let ops = store.move_item(Location::row(0), Location::row(2)).unwrap();
///
/// assert_eq!(store.items_in_section(0).unwrap(), &["b", "c", "a"]);
/// assert_eq!(
///     ops,
///     vec![UpdateOp::MoveRow { from: Location::row(0), to: Location::row(2) }]
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemStore<S, T> {
    sections: Vec<Section<S, T>>,
    sectioned: bool,
}

impl<S, T> Default for ItemStore<S, T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<S, T> ItemStore<S, T> {
    /// Creates a non-sectioned store holding `items`.
    pub fn new(items: Vec<T>) -> Self {
        Self {
            sections: vec![Section::unlabelled(items)],
            sectioned: false,
        }
    }

    /// Creates a sectioned store from parallel lists of labels and items.
    ///
    /// Fails with `CountMismatch` if the lists differ in length.
    pub fn with_sections(labels: Vec<S>, items: Vec<Vec<T>>) -> Result<Self> {
        Ok(Self {
            sections: Self::zip_sections(labels, items)?,
            sectioned: true,
        })
    }

    fn zip_sections(labels: Vec<S>, items: Vec<Vec<T>>) -> Result<Vec<Section<S, T>>> {
        if labels.len() != items.len() {
            return Err(DataSourceError::count_mismatch(labels.len(), items.len()));
        }
        Ok(labels
            .into_iter()
            .zip(items)
            .map(|(label, items)| Section::labelled(label, items))
            .collect())
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Returns `true` if the store was built from labelled sections.
    pub fn is_sectioned(&self) -> bool {
        self.sectioned
    }

    /// Returns the number of sections.
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Returns the total number of items across all sections.
    pub fn item_count(&self) -> usize {
        self.sections.iter().map(Section::len).sum()
    }

    /// Returns all sections in order.
    pub fn sections(&self) -> &[Section<S, T>] {
        &self.sections
    }

    /// Returns the section at `section`, if it exists.
    pub fn section(&self, section: usize) -> Option<&Section<S, T>> {
        self.sections.get(section)
    }

    /// Returns the label of `section`, if it exists and is labelled.
    pub fn section_label(&self, section: usize) -> Option<&S> {
        self.sections.get(section).and_then(Section::label)
    }

    /// Returns the items of `section`.
    pub fn items_in_section(&self, section: usize) -> Result<&[T]> {
        self.check_section(section)?;
        Ok(self.sections[section].items())
    }

    /// Returns every item, section by section.
    pub fn all_items(&self) -> impl Iterator<Item = &T> {
        self.sections.iter().flat_map(|section| section.items.iter())
    }

    /// Returns the item at `location`, if it exists.
    pub fn get(&self, location: Location) -> Option<&T> {
        self.sections
            .get(location.section())
            .and_then(|section| section.items.get(location.item()))
    }

    /// Returns the location of the first item equal to `item`.
    pub fn position(&self, item: &T) -> Option<Location>
    where
        T: PartialEq,
    {
        self.position_where(item, |_| true)
    }

    /// Like [`position`](Self::position), skipping sections for which
    /// `include` returns false.
    pub fn position_where(&self, item: &T, include: impl Fn(usize) -> bool) -> Option<Location>
    where
        T: PartialEq,
    {
        self.sections
            .iter()
            .enumerate()
            .filter(|(section, _)| include(*section))
            .find_map(|(section, s)| {
                s.items
                    .iter()
                    .position(|candidate| candidate == item)
                    .map(|offset| Location::new(section, offset))
            })
    }

    /// Checks that `section` exists and returns its length.
    pub fn check_section(&self, section: usize) -> Result<usize> {
        self.sections
            .get(section)
            .map(Section::len)
            .ok_or_else(|| DataSourceError::section_out_of_range(section, self.sections.len()))
    }

    /// Checks that `location` addresses an existing item.
    pub fn check_location(&self, location: Location) -> Result<()> {
        let len = self.check_section(location.section())?;
        if location.item() >= len {
            return Err(DataSourceError::index_out_of_range(
                location.section(),
                location.item(),
                len,
            ));
        }
        Ok(())
    }

    fn require_sectioned(&self, operation: &'static str) -> Result<()> {
        if self.sectioned {
            Ok(())
        } else {
            Err(DataSourceError::NotSectioned { operation })
        }
    }

    // -------------------------------------------------------------------------
    // Row mutations
    // -------------------------------------------------------------------------

    /// Appends `items` to the end of `section`.
    pub fn append(&mut self, items: Vec<T>, section: usize) -> Result<Vec<UpdateOp>> {
        let len = self.check_section(section)?;
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let added = items.len();
        self.sections[section].items.extend(items);
        Ok(vec![UpdateOp::InsertRows(locations_in_range(
            len..len + added,
            section,
        ))])
    }

    /// Inserts `items` at `offsets` in `section`.
    ///
    /// Offsets refer to the section as it was before the call and may be in
    /// any order. Items are placed as if inserted simultaneously: pairs are
    /// stably sorted by offset, and the k-th pair in that order ends up at
    /// `offset + k`. Items sharing an offset keep their relative order.
    pub fn insert(
        &mut self,
        items: Vec<T>,
        offsets: &[usize],
        section: usize,
    ) -> Result<Vec<UpdateOp>> {
        let len = self.check_section(section)?;
        if items.len() != offsets.len() {
            return Err(DataSourceError::count_mismatch(offsets.len(), items.len()));
        }
        if let Some(&offset) = offsets.iter().find(|&&offset| offset > len) {
            return Err(DataSourceError::index_out_of_range(section, offset, len));
        }
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut pairs: Vec<(usize, T)> = offsets.iter().copied().zip(items).collect();
        pairs.sort_by_key(|(offset, _)| *offset);

        let locations: Vec<Location> = pairs
            .iter()
            .enumerate()
            .map(|(k, (offset, _))| Location::new(section, offset + k))
            .collect();

        let existing = std::mem::take(&mut self.sections[section].items);
        let mut merged = Vec::with_capacity(existing.len() + pairs.len());
        let mut pending = pairs.into_iter().peekable();
        for (index, item) in existing.into_iter().enumerate() {
            while let Some((_, new_item)) = pending.next_if(|(offset, _)| *offset == index) {
                merged.push(new_item);
            }
            merged.push(item);
        }
        merged.extend(pending.map(|(_, new_item)| new_item));
        self.sections[section].items = merged;

        Ok(vec![UpdateOp::InsertRows(locations)])
    }

    /// Replaces the item at `location`.
    pub fn replace_at(&mut self, location: Location, item: T) -> Result<Vec<UpdateOp>> {
        self.check_location(location)?;
        self.sections[location.section()].items[location.item()] = item;
        Ok(vec![UpdateOp::ReloadRows(vec![location])])
    }

    /// Removes the items in `range` from `section`.
    pub fn remove_range(&mut self, range: Range<usize>, section: usize) -> Result<Vec<UpdateOp>> {
        let len = self.check_section(section)?;
        if range.start > range.end {
            return Err(DataSourceError::index_out_of_range(section, range.start, len));
        }
        if range.end > len {
            return Err(DataSourceError::index_out_of_range(section, range.end - 1, len));
        }
        if range.is_empty() {
            return Ok(Vec::new());
        }

        let locations = locations_in_range(range.clone(), section);
        self.sections[section].items.drain(range);
        Ok(vec![UpdateOp::DeleteRows(locations)])
    }

    /// Removes the items at `indexes` from `section`.
    pub fn remove_indexes(
        &mut self,
        indexes: &BTreeSet<usize>,
        section: usize,
    ) -> Result<Vec<UpdateOp>> {
        let len = self.check_section(section)?;
        if let Some(&last) = indexes.last()
            && last >= len
        {
            return Err(DataSourceError::index_out_of_range(section, last, len));
        }
        if indexes.is_empty() {
            return Ok(Vec::new());
        }

        let mut offset = 0;
        self.sections[section].items.retain(|_| {
            let keep = !indexes.contains(&offset);
            offset += 1;
            keep
        });
        Ok(vec![UpdateOp::DeleteRows(locations_for_indexes(
            indexes, section,
        ))])
    }

    /// Removes the item at `location`.
    pub fn remove_at(&mut self, location: Location) -> Result<Vec<UpdateOp>> {
        self.check_location(location)?;
        self.sections[location.section()]
            .items
            .remove(location.item());
        Ok(vec![UpdateOp::DeleteRows(vec![location])])
    }

    /// Moves the item at `from` so that it ends up at `to`.
    ///
    /// `to` is interpreted against the sequence after the item has been
    /// removed from `from`, so it is the item's final location. Moving within
    /// one section therefore accepts `to.item()` up to `len - 1`, and moving
    /// across sections up to the destination's current length.
    pub fn move_item(&mut self, from: Location, to: Location) -> Result<Vec<UpdateOp>> {
        self.check_location(from)?;
        let destination_len = self.check_section(to.section())?;
        let limit = if from.section() == to.section() {
            destination_len - 1
        } else {
            destination_len
        };
        if to.item() > limit {
            return Err(DataSourceError::index_out_of_range(
                to.section(),
                to.item(),
                destination_len,
            ));
        }
        if from == to {
            return Ok(Vec::new());
        }

        let item = self.sections[from.section()].items.remove(from.item());
        self.sections[to.section()].items.insert(to.item(), item);
        Ok(vec![UpdateOp::MoveRow { from, to }])
    }

    // -------------------------------------------------------------------------
    // Whole-store and section mutations
    // -------------------------------------------------------------------------

    /// Replaces everything with a single unlabelled section.
    ///
    /// The store becomes non-sectioned.
    pub fn replace_items(&mut self, items: Vec<T>) -> Vec<UpdateOp> {
        self.sections = vec![Section::unlabelled(items)];
        self.sectioned = false;
        vec![UpdateOp::ReloadAll]
    }

    /// Replaces everything with labelled sections.
    ///
    /// The store becomes sectioned.
    pub fn replace_sections(&mut self, labels: Vec<S>, items: Vec<Vec<T>>) -> Result<Vec<UpdateOp>> {
        self.sections = Self::zip_sections(labels, items)?;
        self.sectioned = true;
        Ok(vec![UpdateOp::ReloadAll])
    }

    /// Removes every item.
    ///
    /// A non-sectioned store keeps its single, now empty, section. A
    /// sectioned store drops all of its sections.
    pub fn remove_all(&mut self) -> Vec<UpdateOp> {
        if self.sectioned {
            self.sections.clear();
        } else {
            self.sections = vec![Section::unlabelled(Vec::new())];
        }
        vec![UpdateOp::ReloadAll]
    }

    /// Appends a labelled section. Sectioned stores only.
    pub fn append_section(&mut self, label: S, items: Vec<T>) -> Result<Vec<UpdateOp>> {
        self.require_sectioned("append_section")?;
        let index = self.sections.len();
        self.sections.push(Section::labelled(label, items));
        Ok(vec![UpdateOp::InsertSections(vec![index])])
    }

    /// Removes the section at `section`. Sectioned stores only.
    pub fn remove_section(&mut self, section: usize) -> Result<Vec<UpdateOp>> {
        self.require_sectioned("remove_section")?;
        self.check_section(section)?;
        self.sections.remove(section);
        Ok(vec![UpdateOp::DeleteSections(vec![section])])
    }

    /// Removes the last section. Sectioned stores only.
    pub fn remove_last_section(&mut self) -> Result<Vec<UpdateOp>> {
        self.require_sectioned("remove_last_section")?;
        match self.sections.len().checked_sub(1) {
            Some(last) => self.remove_section(last),
            None => Err(DataSourceError::section_out_of_range(0, 0)),
        }
    }
}
