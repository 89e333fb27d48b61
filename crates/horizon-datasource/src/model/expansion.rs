//! Section expansion state for accordion data sources.
//!
//! A section is open when it is expanded or pinned in the always-open set.
//! [`ExpansionState`] only tracks indices; it reports which sections became
//! visible or hidden and leaves turning that into row updates to the adapter.

use std::collections::BTreeSet;

/// Sections whose visibility changed in one transition, each ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionChange {
    /// Sections that were hidden and are now open.
    pub opened: Vec<usize>,
    /// Sections that were open and are now hidden.
    pub closed: Vec<usize>,
}

impl ExpansionChange {
    /// Returns `true` if no section changed visibility.
    pub fn is_empty(&self) -> bool {
        self.opened.is_empty() && self.closed.is_empty()
    }
}

/// Expanded and always-open section indices.
///
/// # Example
///
/// ```
/// use horizon_datasource::model::ExpansionState;
///
/// let mut state = ExpansionState::new(false, [0]);
/// assert!(state.is_open(0));
///
/// state.toggle(1);
/// let change = state.toggle(2);
/// assert_eq!(change.opened, vec![2]);
/// assert_eq!(change.closed, vec![1]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: BTreeSet<usize>,
    always_open: BTreeSet<usize>,
    allow_multiple: bool,
}

impl ExpansionState {
    /// Creates a state with every section collapsed.
    pub fn new(allow_multiple: bool, always_open: impl IntoIterator<Item = usize>) -> Self {
        Self {
            expanded: BTreeSet::new(),
            always_open: always_open.into_iter().collect(),
            allow_multiple,
        }
    }

    /// Returns `true` if `section` is expanded or always open.
    pub fn is_open(&self, section: usize) -> bool {
        self.expanded.contains(&section) || self.always_open.contains(&section)
    }

    /// Returns `true` if `section` was expanded by a toggle.
    pub fn is_expanded(&self, section: usize) -> bool {
        self.expanded.contains(&section)
    }

    /// Returns `true` if `section` can never collapse.
    pub fn is_always_open(&self, section: usize) -> bool {
        self.always_open.contains(&section)
    }

    /// Returns the expanded sections, ascending.
    pub fn expanded_sections(&self) -> impl Iterator<Item = usize> + '_ {
        self.expanded.iter().copied()
    }

    /// Returns the always-open sections, ascending.
    pub fn always_open_sections(&self) -> impl Iterator<Item = usize> + '_ {
        self.always_open.iter().copied()
    }

    /// Returns whether several sections may be expanded at once.
    pub fn allows_multiple(&self) -> bool {
        self.allow_multiple
    }

    /// Sets whether several sections may be expanded at once.
    ///
    /// Only affects later toggles; sections already expanded stay expanded.
    pub fn set_allow_multiple(&mut self, allow: bool) {
        self.allow_multiple = allow;
    }

    /// Flips `section` between expanded and collapsed.
    ///
    /// Always-open sections ignore toggles. When only one section may be
    /// expanded, expanding `section` collapses every other expanded section.
    pub fn toggle(&mut self, section: usize) -> ExpansionChange {
        if self.always_open.contains(&section) {
            return ExpansionChange::default();
        }

        if self.expanded.remove(&section) {
            return ExpansionChange {
                opened: Vec::new(),
                closed: vec![section],
            };
        }

        let closed = if self.allow_multiple {
            Vec::new()
        } else {
            let others = std::mem::take(&mut self.expanded);
            others
                .into_iter()
                .filter(|other| !self.always_open.contains(other))
                .collect()
        };
        self.expanded.insert(section);
        ExpansionChange {
            opened: vec![section],
            closed,
        }
    }

    /// Collapses every expanded section.
    pub fn collapse_all(&mut self) -> ExpansionChange {
        let expanded = std::mem::take(&mut self.expanded);
        ExpansionChange {
            opened: Vec::new(),
            closed: expanded
                .into_iter()
                .filter(|section| !self.always_open.contains(section))
                .collect(),
        }
    }

    /// Replaces the always-open set.
    ///
    /// Only sections below `section_count` are reported as changed.
    pub fn set_always_open(
        &mut self,
        always_open: impl IntoIterator<Item = usize>,
        section_count: usize,
    ) -> ExpansionChange {
        let before = self.clone();
        self.always_open = always_open.into_iter().collect();

        let mut change = ExpansionChange::default();
        let touched: BTreeSet<usize> = before
            .always_open
            .union(&self.always_open)
            .copied()
            .filter(|&section| section < section_count)
            .collect();
        for section in touched {
            match (before.is_open(section), self.is_open(section)) {
                (false, true) => change.opened.push(section),
                (true, false) => change.closed.push(section),
                _ => {}
            }
        }
        change
    }

    /// Shifts expanded indices for a section inserted at `index`.
    ///
    /// The new section starts collapsed.
    pub fn section_inserted(&mut self, index: usize) {
        self.expanded = self
            .expanded
            .iter()
            .map(|&section| if section >= index { section + 1 } else { section })
            .collect();
    }

    /// Drops the flag of the section removed at `index` and shifts the rest.
    pub fn section_removed(&mut self, index: usize) {
        self.expanded = self
            .expanded
            .iter()
            .filter(|&&section| section != index)
            .map(|&section| if section > index { section - 1 } else { section })
            .collect();
    }

    /// Collapses everything without reporting a change.
    ///
    /// Used when the whole content is replaced and the view reloads anyway.
    pub fn reset(&mut self) {
        self.expanded.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initially_collapsed() {
        let state = ExpansionState::new(true, []);
        assert!(!state.is_open(0));
        assert_eq!(state.expanded_sections().count(), 0);
    }

    #[test]
    fn test_toggle_round_trip() {
        let mut state = ExpansionState::new(false, []);
        let change = state.toggle(3);
        assert_eq!(change.opened, vec![3]);
        assert!(state.is_open(3));

        let change = state.toggle(3);
        assert_eq!(change.closed, vec![3]);
        assert_eq!(state, ExpansionState::new(false, []));
    }

    #[test]
    fn test_single_expansion_collapses_others() {
        let mut state = ExpansionState::new(false, []);
        state.toggle(0);
        let change = state.toggle(1);

        assert_eq!(change.opened, vec![1]);
        assert_eq!(change.closed, vec![0]);
        assert!(!state.is_open(0));
        assert!(state.is_open(1));
    }

    #[test]
    fn test_multiple_expansion() {
        let mut state = ExpansionState::new(true, []);
        state.toggle(0);
        let change = state.toggle(1);

        assert!(change.closed.is_empty());
        assert_eq!(state.expanded_sections().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_always_open_ignores_toggle() {
        let mut state = ExpansionState::new(false, [0]);
        assert!(state.toggle(0).is_empty());
        assert!(state.is_open(0));

        state.toggle(1);
        assert!(state.is_open(0));
        assert!(state.is_open(1));
    }

    #[test]
    fn test_set_always_open_reports_visibility() {
        let mut state = ExpansionState::new(true, [0]);
        state.toggle(2);

        let change = state.set_always_open([1, 2, 9], 4);
        assert_eq!(change.opened, vec![1]);
        assert_eq!(change.closed, vec![0]);
        assert!(state.is_open(2));
    }

    #[test]
    fn test_collapse_all() {
        let mut state = ExpansionState::new(true, [1]);
        state.toggle(0);
        state.toggle(2);

        let change = state.collapse_all();
        assert_eq!(change.closed, vec![0, 2]);
        assert!(state.is_open(1));
        assert!(!state.is_open(0));
    }

    #[test]
    fn test_section_insert_and_remove_shift_flags() {
        let mut state = ExpansionState::new(true, []);
        state.toggle(1);
        state.toggle(3);

        state.section_inserted(2);
        assert_eq!(state.expanded_sections().collect::<Vec<_>>(), vec![1, 4]);
        assert!(!state.is_open(2));

        state.section_removed(1);
        assert_eq!(state.expanded_sections().collect::<Vec<_>>(), vec![3]);
    }
}
