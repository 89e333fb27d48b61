//! Accordion data source: sections that expand and collapse.
//!
//! [`AccordionAdapter`] wraps a sectioned [`ArrayAdapter`] and hides the rows
//! of collapsed sections from the view. Section headers stay visible; a host
//! typically toggles a section when its header is tapped.
//!
//! Toggling sends one batch that deletes the rows of every section that just
//! closed and inserts the rows of every section that just opened, so the
//! view animates them together. Row operations from ordinary mutations are
//! filtered the same way: a change inside a collapsed section never reaches
//! the view.
//!
//! # Example
//!
//! ```
//! use horizon_datasource::model::{AccordionAdapter, DataSource};
//!
//! let accordion: AccordionAdapter<&str, u32, ()> =
//!     AccordionAdapter::new(vec!["Odd", "Even"], vec![vec![1, 3], vec![2]]).unwrap();
//!
//! assert_eq!(accordion.item_count(0), 0);
//! accordion.toggle_section(0).unwrap();
//! assert_eq!(accordion.item_count(0), 2);
//!
//! accordion.toggle_section(1).unwrap();
//! assert_eq!(accordion.item_count(0), 0);
//! assert_eq!(accordion.item_count(1), 1);
//! ```

use std::collections::BTreeSet;
use std::ops::Deref;
use std::sync::Arc;

use parking_lot::RwLock;

use horizon_datasource_core::logging::{span_names, targets};
use horizon_datasource_core::{DataSourceError, PerfSpan, Result};

use super::adapter::{ArrayAdapter, SectionPolicy};
use super::expansion::{ExpansionChange, ExpansionState};
use super::location::{Location, locations_in_range};
use super::protocol::DataSource;
use super::registry::default_identifier;
use super::store::{ItemStore, Section};
use super::update::UpdateOp;
use crate::config::AdapterConfig;

struct SharedExpansion {
    state: RwLock<ExpansionState>,
}

impl SectionPolicy for SharedExpansion {
    fn is_section_visible(&self, section: usize) -> bool {
        self.state.read().is_open(section)
    }

    fn section_inserted(&self, section: usize) {
        self.state.write().section_inserted(section);
    }

    fn section_removed(&self, section: usize) {
        self.state.write().section_removed(section);
    }

    fn sections_reset(&self) {
        self.state.write().reset();
    }
}

/// A sectioned data source whose sections can be collapsed.
///
/// Dereferences to [`ArrayAdapter`] for mutations, registration and
/// binding. Counts and items reported through [`DataSource`] only cover open
/// sections.
pub struct AccordionAdapter<S, T, V> {
    inner: ArrayAdapter<S, T, V>,
    expansion: Arc<SharedExpansion>,
}

impl<S, T, V> std::fmt::Debug for AccordionAdapter<S, T, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccordionAdapter")
            .field("inner", &self.inner)
            .field("expansion", &*self.expansion.state.read())
            .finish()
    }
}

impl<S, T, V> Deref for AccordionAdapter<S, T, V> {
    type Target = ArrayAdapter<S, T, V>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<S, T, V> AccordionAdapter<S, T, V>
where
    S: Send + Sync + 'static,
    T: Clone + PartialEq + Send + Sync + 'static,
    V: 'static,
{
    /// Creates an accordion with every section collapsed and only one
    /// section expandable at a time.
    pub fn new(labels: Vec<S>, items: Vec<Vec<T>>) -> Result<Self> {
        let expansion = Arc::new(SharedExpansion {
            state: RwLock::new(ExpansionState::default()),
        });
        let inner = ArrayAdapter::with_sections(labels, items)?
            .with_section_policy(Arc::clone(&expansion) as Arc<dyn SectionPolicy>);
        Ok(Self { inner, expansion })
    }

    /// Applies row animation, multiple expansion and the always-open set
    /// from `config`.
    ///
    /// Meant for construction time: nothing is sent to a bound view.
    pub fn with_config(self, config: &AdapterConfig) -> Self {
        {
            let mut state = self.expansion.state.write();
            state.set_allow_multiple(config.allow_multiple_expanded_sections);
            state.set_always_open(config.sections_to_keep_open.iter().copied(), 0);
        }
        let Self { inner, expansion } = self;
        Self {
            inner: inner.with_config(config),
            expansion,
        }
    }

    /// Returns the wrapped adapter.
    pub fn inner(&self) -> &ArrayAdapter<S, T, V> {
        &self.inner
    }

    /// Returns `true` if `section` shows its rows.
    pub fn is_section_open(&self, section: usize) -> bool {
        self.expansion.state.read().is_open(section)
    }

    /// Returns `true` if `section` is in the always-open set.
    pub fn is_section_always_open(&self, section: usize) -> bool {
        self.expansion.state.read().is_always_open(section)
    }

    /// Returns the sections expanded by toggles, ascending.
    pub fn expanded_sections(&self) -> Vec<usize> {
        self.expansion.state.read().expanded_sections().collect()
    }

    /// Returns the items of `section` if it is open, otherwise nothing.
    pub fn visible_items(&self, section: usize) -> Result<Vec<T>> {
        let items = self.inner.items_in_section(section)?;
        if self.is_section_open(section) {
            Ok(items)
        } else {
            Ok(Vec::new())
        }
    }

    /// Returns whether several sections may be expanded at once.
    pub fn allows_multiple_expanded_sections(&self) -> bool {
        self.expansion.state.read().allows_multiple()
    }

    /// Sets whether several sections may be expanded at once.
    ///
    /// Takes effect on the next toggle.
    pub fn set_allow_multiple_expanded_sections(&self, allow: bool) {
        self.expansion.state.write().set_allow_multiple(allow);
    }

    /// Returns the always-open sections.
    pub fn sections_to_keep_open(&self) -> BTreeSet<usize> {
        self.expansion.state.read().always_open_sections().collect()
    }

    /// Replaces the always-open set.
    ///
    /// Sections that become visible or hidden are sent to the view as one
    /// batch.
    pub fn set_sections_to_keep_open(
        &self,
        sections: impl IntoIterator<Item = usize>,
    ) -> Result<()> {
        self.inner.ensure_idle()?;
        let (change, ops) = {
            let store = self.inner.store();
            let change = self
                .expansion
                .state
                .write()
                .set_always_open(sections, store.section_count());
            let ops = visibility_ops(&store, &change);
            (change, ops)
        };
        self.publish(change, ops);
        Ok(())
    }

    /// Flips `section` between expanded and collapsed.
    ///
    /// Returns `false` without sending anything if `section` is always open.
    /// When only one section may be expanded, the previously expanded section
    /// collapses in the same batch.
    pub fn toggle_section(&self, section: usize) -> Result<bool> {
        let _perf = PerfSpan::new(span_names::TOGGLE);
        self.inner.ensure_idle()?;

        let (change, ops) = {
            let store = self.inner.store();
            store.check_section(section)?;
            let change = self.expansion.state.write().toggle(section);
            let ops = visibility_ops(&store, &change);
            (change, ops)
        };

        if change.is_empty() {
            tracing::debug!(target: targets::ACCORDION, section, "section is always open; toggle ignored");
            return Ok(false);
        }
        tracing::debug!(
            target: targets::ACCORDION,
            section,
            opened = ?change.opened,
            closed = ?change.closed,
            "section toggled"
        );
        self.publish(change, ops);
        Ok(true)
    }

    /// Collapses every section that is not always open.
    pub fn collapse_all(&self) -> Result<()> {
        self.inner.ensure_idle()?;
        let (change, ops) = {
            let store = self.inner.store();
            let change = self.expansion.state.write().collapse_all();
            let ops = visibility_ops(&store, &change);
            (change, ops)
        };
        self.publish(change, ops);
        Ok(())
    }

    fn publish(&self, change: ExpansionChange, ops: Vec<UpdateOp>) {
        self.inner.commit_unfiltered(ops);
        let toggled = &self.inner.signals().section_toggled;
        for section in change.closed {
            toggled.emit((section, false));
        }
        for section in change.opened {
            toggled.emit((section, true));
        }
    }

    // -------------------------------------------------------------------------
    // Section headers
    // -------------------------------------------------------------------------

    /// Registers the section header view under `identifier`.
    ///
    /// `configure` receives the view, the section label, the section index
    /// and whether the section is open.
    pub fn register_accordion_header<F, C>(
        &self,
        identifier: impl Into<String>,
        factory: F,
        configure: C,
    ) -> Result<()>
    where
        F: Fn() -> V + Send + Sync + 'static,
        C: Fn(&mut V, Option<&S>, usize, bool) + Send + Sync + 'static,
    {
        self.inner.registry_mut().register_accordion_header(
            identifier,
            Arc::new(factory),
            Arc::new(configure),
        )
    }

    /// Registers the section header under the identifier derived from
    /// `Header`'s type name.
    pub fn register_accordion_header_type<Header, F, C>(&self, factory: F, configure: C) -> Result<()>
    where
        Header: ?Sized + 'static,
        F: Fn() -> V + Send + Sync + 'static,
        C: Fn(&mut V, Option<&S>, usize, bool) + Send + Sync + 'static,
    {
        self.register_accordion_header(default_identifier::<Header>(), factory, configure)
    }

    /// Builds and configures the header for `section`.
    pub fn create_accordion_header(&self, section: usize) -> Result<(String, V)>
    where
        S: Clone,
    {
        let (identifier, registration) = {
            let registry = self.inner.registry();
            let identifier = registry.resolve_accordion_header()?;
            let registration = registry
                .accordion_header(&identifier)
                .cloned()
                .ok_or_else(|| DataSourceError::unknown_identifier(&identifier))?;
            (identifier, registration)
        };
        let label = self.header_label(section)?;

        let mut view = registration.create();
        (registration.configuration())(&mut view, label.as_ref(), section, self.is_section_open(section));
        Ok((identifier, view))
    }

    /// Configures a reused header `view` for `section`.
    pub fn configure_accordion_header(&self, view: &mut V, section: usize) -> Result<String>
    where
        S: Clone,
    {
        let (identifier, configure) = {
            let registry = self.inner.registry();
            let identifier = registry.resolve_accordion_header()?;
            let configure = registry
                .accordion_header(&identifier)
                .map(|registration| Arc::clone(registration.configuration()))
                .ok_or_else(|| DataSourceError::unknown_identifier(&identifier))?;
            (identifier, configure)
        };
        let label = self.header_label(section)?;

        configure(view, label.as_ref(), section, self.is_section_open(section));
        Ok(identifier)
    }

    fn header_label(&self, section: usize) -> Result<Option<S>>
    where
        S: Clone,
    {
        let store = self.inner.store();
        store.check_section(section)?;
        Ok(store.section_label(section).cloned())
    }
}

impl<S, T, V> DataSource for AccordionAdapter<S, T, V>
where
    S: Send + Sync + 'static,
    T: Clone + PartialEq + Send + Sync + 'static,
    V: 'static,
{
    type Item = T;

    fn section_count(&self) -> usize {
        self.inner.section_count()
    }

    fn item_count(&self, section: usize) -> usize {
        self.inner.item_count(section)
    }

    fn item_at(&self, location: Location) -> Option<T> {
        self.inner.item_at(location)
    }

    fn location_of(&self, item: &T) -> Option<Location> {
        self.inner.location_of(item)
    }
}

/// Row deletes for sections that closed, then row inserts for sections that
/// opened.
fn visibility_ops<S, T>(store: &ItemStore<S, T>, change: &ExpansionChange) -> Vec<UpdateOp> {
    let rows = |sections: &[usize]| -> Vec<Location> {
        sections
            .iter()
            .flat_map(|&section| {
                let len = store.section(section).map_or(0, Section::len);
                locations_in_range(0..len, section)
            })
            .collect()
    };
    vec![
        UpdateOp::DeleteRows(rows(&change.closed)),
        UpdateOp::InsertRows(rows(&change.opened)),
    ]
}
