//! The array-backed data source adapter.
//!
//! [`ArrayAdapter`] owns an [`ItemStore`], a [`ViewRegistry`] and an
//! [`UpdateDispatcher`]. Every mutation runs in three steps: the store is
//! changed under its lock, the lock is released, and the resulting
//! operations are sent to the bound view as one batch. Observers are told
//! about committed batches through [`DataSourceSignals`].
//!
//! # Example
//!
//! ```
//! use horizon_datasource::model::{ArrayAdapter, DataSource, Location};
//!
//! let adapter: ArrayAdapter<String, &str, String> =
//!     ArrayAdapter::with_sections(
//!         vec!["Fruit".to_string(), "Veg".to_string()],
//!         vec![vec!["apple", "pear"], vec!["leek"]],
//!     )
//!     .unwrap();
//!
//! adapter.register_cell("Plain", String::new, |view: &mut String, item: &&str, _| {
//!     view.push_str(item);
//! })
//! .unwrap();
//!
//! adapter.append(vec!["kale"], 1).unwrap();
//! assert_eq!(adapter.item_count(1), 2);
//!
//! let (identifier, view) = adapter.create_cell(Location::new(1, 1)).unwrap();
//! assert_eq!(identifier, "Plain");
//! assert_eq!(view, "kale");
//! ```

use std::collections::BTreeSet;
use std::ops::Range;
use std::sync::{Arc, Weak};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use horizon_datasource_core::logging::targets;
use horizon_datasource_core::{DataSourceError, Result, Signal};

use super::dispatch::UpdateDispatcher;
use super::location::{Location, locations_in_range};
use super::protocol::{DataSource, FallbackDataSource, ProtocolCall, ProtocolValue};
use super::registry::{
    CellConfigurator, RegistrationKind, SupplementaryConfigurator, SupplementaryKind, ViewRegistry,
    default_identifier,
};
use super::store::{ItemStore, Section};
use super::update::{RowAnimation, UpdateBatch, UpdateOp, UpdateTarget};
use crate::config::AdapterConfig;

/// Signals emitted by data source adapters.
pub struct DataSourceSignals {
    /// Emitted after every non-empty update batch, whether or not a view is
    /// bound to receive it.
    pub updates_committed: Signal<UpdateBatch>,
    /// Emitted with `(section, open)` for each accordion section whose
    /// visibility changed.
    pub section_toggled: Signal<(usize, bool)>,
}

impl Default for DataSourceSignals {
    fn default() -> Self {
        Self {
            updates_committed: Signal::new(),
            section_toggled: Signal::new(),
        }
    }
}

/// Decides which sections currently show their rows.
///
/// Installed by adapters that hide sections; row operations in hidden
/// sections never reach the view. Section operations are reported so the
/// policy can keep its indices in step with the store.
pub(crate) trait SectionPolicy: Send + Sync {
    fn is_section_visible(&self, section: usize) -> bool;
    fn section_inserted(&self, section: usize);
    fn section_removed(&self, section: usize);
    fn sections_reset(&self);
}

/// A data source backed by an in-memory list of items, optionally split into
/// labelled sections.
///
/// `S` is the section label type, `T` the item type and `V` the host's view
/// type produced by registered factories.
pub struct ArrayAdapter<S, T, V> {
    store: RwLock<ItemStore<S, T>>,
    registry: RwLock<ViewRegistry<S, T, V>>,
    dispatcher: UpdateDispatcher,
    fallback: RwLock<Option<Weak<dyn FallbackDataSource>>>,
    policy: Option<Arc<dyn SectionPolicy>>,
    signals: DataSourceSignals,
}

impl<S, T, V> std::fmt::Debug for ArrayAdapter<S, T, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let store = self.store.read();
        f.debug_struct("ArrayAdapter")
            .field("sections", &store.section_count())
            .field("items", &store.item_count())
            .field("sectioned", &store.is_sectioned())
            .field("registry", &*self.registry.read())
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}

impl<S, T, V> ArrayAdapter<S, T, V>
where
    S: Send + Sync + 'static,
    T: Clone + PartialEq + Send + Sync + 'static,
    V: 'static,
{
    /// Creates a non-sectioned adapter holding `items`.
    pub fn new(items: Vec<T>) -> Self {
        Self::from_store(ItemStore::new(items))
    }

    /// Creates a sectioned adapter. `labels` and `items` must have equal
    /// lengths.
    pub fn with_sections(labels: Vec<S>, items: Vec<Vec<T>>) -> Result<Self> {
        Ok(Self::from_store(ItemStore::with_sections(labels, items)?))
    }

    fn from_store(store: ItemStore<S, T>) -> Self {
        Self {
            store: RwLock::new(store),
            registry: RwLock::new(ViewRegistry::new()),
            dispatcher: UpdateDispatcher::default(),
            fallback: RwLock::new(None),
            policy: None,
            signals: DataSourceSignals::default(),
        }
    }

    /// Applies the row animation from `config`.
    pub fn with_config(self, config: &AdapterConfig) -> Self {
        self.with_row_animation(config.row_animation)
    }

    /// Sets the animation attached to update batches.
    pub fn with_row_animation(self, animation: RowAnimation) -> Self {
        self.dispatcher.set_animation(animation);
        self
    }

    pub(crate) fn with_section_policy(mut self, policy: Arc<dyn SectionPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Returns the adapter's signals.
    pub fn signals(&self) -> &DataSourceSignals {
        &self.signals
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Read access to the underlying store.
    ///
    /// Do not hold the guard across a mutation of this adapter.
    pub fn store(&self) -> RwLockReadGuard<'_, ItemStore<S, T>> {
        self.store.read()
    }

    /// Returns `true` if the adapter was built from labelled sections.
    pub fn is_sectioned(&self) -> bool {
        self.store.read().is_sectioned()
    }

    /// Returns the total number of items across all sections.
    pub fn len(&self) -> usize {
        self.store.read().item_count()
    }

    /// Returns `true` if no section holds any item.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns every item, in section order.
    pub fn all_items(&self) -> Vec<T> {
        self.store.read().all_items().cloned().collect()
    }

    /// Returns the items of `section`, hidden or not.
    pub fn items_in_section(&self, section: usize) -> Result<Vec<T>> {
        Ok(self.store.read().items_in_section(section)?.to_vec())
    }

    /// Returns the label of `section`, if it has one.
    pub fn section_label(&self, section: usize) -> Option<S>
    where
        S: Clone,
    {
        self.store.read().section_label(section).cloned()
    }

    /// Returns the labels of every section, in order.
    ///
    /// Non-sectioned adapters have no labels.
    pub fn section_labels(&self) -> Vec<S>
    where
        S: Clone,
    {
        self.store
            .read()
            .sections()
            .iter()
            .filter_map(|section| section.label().cloned())
            .collect()
    }

    /// Returns the item at `location`, hidden or not.
    pub fn get(&self, location: Location) -> Option<T> {
        self.store.read().get(location).cloned()
    }

    fn is_section_visible(&self, section: usize) -> bool {
        self.policy
            .as_ref()
            .is_none_or(|policy| policy.is_section_visible(section))
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Appends `items` to the end of `section`.
    pub fn append(&self, items: Vec<T>, section: usize) -> Result<()> {
        self.mutate("append", |store| store.append(items, section))
    }

    /// Inserts `items` at `offsets` in `section`.
    ///
    /// Offsets refer to the section before the call; see
    /// [`ItemStore::insert`].
    pub fn insert(&self, items: Vec<T>, offsets: &[usize], section: usize) -> Result<()> {
        self.mutate("insert", |store| store.insert(items, offsets, section))
    }

    /// Replaces the item at `location`.
    pub fn replace_at(&self, location: Location, item: T) -> Result<()> {
        self.mutate("replace_at", |store| store.replace_at(location, item))
    }

    /// Replaces all content with `items` in a single unlabelled section.
    pub fn replace_items(&self, items: Vec<T>) -> Result<()> {
        self.mutate("replace_items", |store| Ok(store.replace_items(items)))
    }

    /// Replaces all content with labelled sections.
    pub fn replace_sections(&self, labels: Vec<S>, items: Vec<Vec<T>>) -> Result<()> {
        self.mutate("replace_sections", |store| {
            store.replace_sections(labels, items)
        })
    }

    /// Removes the items in `range` from `section`.
    pub fn remove_range(&self, range: Range<usize>, section: usize) -> Result<()> {
        self.mutate("remove_range", |store| store.remove_range(range, section))
    }

    /// Removes the items at `indexes` from `section`.
    pub fn remove_indexes(&self, indexes: &BTreeSet<usize>, section: usize) -> Result<()> {
        self.mutate("remove_indexes", |store| {
            store.remove_indexes(indexes, section)
        })
    }

    /// Removes the item at `location`.
    pub fn remove_at(&self, location: Location) -> Result<()> {
        self.mutate("remove_at", |store| store.remove_at(location))
    }

    /// Removes every item; see [`ItemStore::remove_all`].
    pub fn remove_all(&self) -> Result<()> {
        self.mutate("remove_all", |store| Ok(store.remove_all()))
    }

    /// Moves the item at `from` so that it ends up at `to`.
    pub fn move_item(&self, from: Location, to: Location) -> Result<()> {
        self.mutate("move_item", |store| store.move_item(from, to))
    }

    /// Appends a labelled section holding `items`.
    pub fn append_section(&self, label: S, items: Vec<T>) -> Result<()> {
        self.mutate("append_section", |store| store.append_section(label, items))
    }

    /// Removes `section`.
    pub fn remove_section(&self, section: usize) -> Result<()> {
        self.mutate("remove_section", |store| store.remove_section(section))
    }

    /// Removes the last section.
    pub fn remove_last_section(&self) -> Result<()> {
        self.mutate("remove_last_section", |store| store.remove_last_section())
    }

    fn mutate<F>(&self, operation: &'static str, f: F) -> Result<()>
    where
        F: FnOnce(&mut ItemStore<S, T>) -> Result<Vec<UpdateOp>>,
    {
        self.dispatcher.ensure_idle()?;
        let ops = f(&mut self.store.write())?;
        tracing::trace!(target: targets::STORE, operation, ops = ops.len(), "store mutated");
        self.commit(ops);
        Ok(())
    }

    fn commit(&self, ops: Vec<UpdateOp>) {
        let Some(policy) = &self.policy else {
            self.commit_unfiltered(ops);
            return;
        };

        let (ops, toggled) = filter_through_policy(policy.as_ref(), &self.store.read(), ops);
        self.commit_unfiltered(ops);
        for event in toggled {
            self.signals.section_toggled.emit(event);
        }
    }

    /// Dispatches `ops` as they are, bypassing the section policy.
    pub(crate) fn commit_unfiltered(&self, ops: Vec<UpdateOp>) {
        let batch = self.dispatcher.dispatch(ops);
        if !batch.is_empty() {
            self.signals.updates_committed.emit(batch);
        }
    }

    pub(crate) fn ensure_idle(&self) -> Result<()> {
        self.dispatcher.ensure_idle()
    }

    // -------------------------------------------------------------------------
    // Binding
    // -------------------------------------------------------------------------

    /// Binds the view that receives update batches.
    ///
    /// The view is held weakly.
    pub fn bind_view<U: UpdateTarget + 'static>(&self, view: &Arc<U>) {
        self.dispatcher.bind(view);
    }

    /// Unbinds the current view. Later batches are only signalled.
    pub fn unbind_view(&self) {
        self.dispatcher.unbind();
    }

    /// Returns `true` if a live view is bound.
    pub fn is_view_bound(&self) -> bool {
        self.dispatcher.is_bound()
    }

    /// Returns the animation attached to update batches.
    pub fn row_animation(&self) -> RowAnimation {
        self.dispatcher.animation()
    }

    /// Sets the animation attached to later update batches.
    pub fn set_row_animation(&self, animation: RowAnimation) {
        self.dispatcher.set_animation(animation);
    }

    /// Sets the object that answers forwarded protocol calls.
    ///
    /// The fallback is held weakly.
    pub fn set_fallback<F: FallbackDataSource + 'static>(&self, fallback: &Arc<F>) {
        let weak: Weak<F> = Arc::downgrade(fallback);
        let weak: Weak<dyn FallbackDataSource> = weak;
        *self.fallback.write() = Some(weak);
    }

    /// Removes the fallback.
    pub fn clear_fallback(&self) {
        *self.fallback.write() = None;
    }

    /// Forwards a protocol call the adapter does not answer itself.
    ///
    /// Fails with `UnhandledProtocolMethod` when there is no live fallback
    /// or the fallback declines the call.
    pub fn forward(&self, call: ProtocolCall) -> Result<ProtocolValue> {
        let fallback = self.fallback.read().as_ref().and_then(Weak::upgrade);
        fallback
            .and_then(|fallback| fallback.handle(&call))
            .ok_or(DataSourceError::UnhandledProtocolMethod {
                method: call.method(),
            })
    }

    // -------------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------------

    pub(crate) fn registry(&self) -> RwLockReadGuard<'_, ViewRegistry<S, T, V>> {
        self.registry.read()
    }

    pub(crate) fn registry_mut(&self) -> RwLockWriteGuard<'_, ViewRegistry<S, T, V>> {
        self.registry.write()
    }

    /// Registers a cell factory and configuration under `identifier`.
    pub fn register_cell<F, C>(
        &self,
        identifier: impl Into<String>,
        factory: F,
        configure: C,
    ) -> Result<()>
    where
        F: Fn() -> V + Send + Sync + 'static,
        C: Fn(&mut V, &T, Location) + Send + Sync + 'static,
    {
        self.registry
            .write()
            .register_cell(identifier, Arc::new(factory), Arc::new(configure))
    }

    /// Registers a cell under the identifier derived from `Cell`'s type name.
    pub fn register_cell_type<Cell, F, C>(&self, factory: F, configure: C) -> Result<()>
    where
        Cell: ?Sized + 'static,
        F: Fn() -> V + Send + Sync + 'static,
        C: Fn(&mut V, &T, Location) + Send + Sync + 'static,
    {
        self.register_cell(default_identifier::<Cell>(), factory, configure)
    }

    /// Registers a header or footer view under `identifier`.
    pub fn register_supplementary_view<F, C>(
        &self,
        kind: SupplementaryKind,
        identifier: impl Into<String>,
        factory: F,
        configure: C,
    ) -> Result<()>
    where
        F: Fn() -> V + Send + Sync + 'static,
        C: Fn(&mut V, SupplementaryKind, Location) + Send + Sync + 'static,
    {
        self.registry.write().register_supplementary(
            kind,
            identifier,
            Arc::new(factory),
            Arc::new(configure),
        )
    }

    /// Registers a header or footer view under the identifier derived from
    /// `View`'s type name.
    pub fn register_supplementary_view_type<View, F, C>(
        &self,
        kind: SupplementaryKind,
        factory: F,
        configure: C,
    ) -> Result<()>
    where
        View: ?Sized + 'static,
        F: Fn() -> V + Send + Sync + 'static,
        C: Fn(&mut V, SupplementaryKind, Location) + Send + Sync + 'static,
    {
        self.register_supplementary_view(kind, default_identifier::<View>(), factory, configure)
    }

    /// Sets the closure that picks a cell identifier for an item.
    ///
    /// Needed once more than one cell is registered.
    pub fn set_cell_identifier_resolver<F>(&self, resolver: F)
    where
        F: Fn(Option<&T>, Location) -> String + Send + Sync + 'static,
    {
        self.registry.write().set_cell_resolver(Some(Arc::new(resolver)));
    }

    /// Removes the cell identifier resolver.
    pub fn clear_cell_identifier_resolver(&self) {
        self.registry.write().set_cell_resolver(None);
    }

    /// Sets the closure that picks a header or footer identifier.
    pub fn set_supplementary_identifier_resolver<F>(&self, resolver: F)
    where
        F: Fn(SupplementaryKind, Location) -> String + Send + Sync + 'static,
    {
        self.registry
            .write()
            .set_supplementary_resolver(Some(Arc::new(resolver)));
    }

    /// Removes the supplementary identifier resolver.
    pub fn clear_supplementary_identifier_resolver(&self) {
        self.registry.write().set_supplementary_resolver(None);
    }

    /// Returns the identifiers registered for `kind`, sorted.
    pub fn registered_identifiers(&self, kind: RegistrationKind) -> Vec<String> {
        self.registry.read().identifiers(kind)
    }

    /// Returns the cell identifier for the item at `location`.
    pub fn cell_identifier(&self, location: Location) -> Result<String> {
        let item = self.item_for_cell(location)?;
        self.resolve_cell(&item, location)
    }

    /// Returns the configuration closure registered under `identifier`.
    pub fn cell_configuration(&self, identifier: &str) -> Option<CellConfigurator<T, V>> {
        self.registry.read().cell_configuration(identifier)
    }

    /// Returns the header or footer identifier for `location`.
    pub fn supplementary_identifier(
        &self,
        kind: SupplementaryKind,
        location: Location,
    ) -> Result<String> {
        self.store.read().check_section(location.section())?;
        // Resolvers may call back into the adapter, so none run under the lock.
        let resolver = self.registry.read().supplementary_resolver();
        match resolver {
            Some(resolver) => Ok(resolver(kind, location)),
            None => self.registry.read().resolve_supplementary(kind, location),
        }
    }

    /// Returns the header or footer configuration closure for `identifier`.
    pub fn supplementary_configuration(
        &self,
        identifier: &str,
        kind: SupplementaryKind,
    ) -> Option<SupplementaryConfigurator<V>> {
        self.registry
            .read()
            .supplementary_configuration(identifier, kind)
    }

    // -------------------------------------------------------------------------
    // View construction
    // -------------------------------------------------------------------------

    /// Builds and configures the cell for `location`.
    ///
    /// Returns the identifier used along with the view.
    pub fn create_cell(&self, location: Location) -> Result<(String, V)> {
        let item = self.item_for_cell(location)?;
        let identifier = self.resolve_cell(&item, location)?;
        let registration = self
            .registry
            .read()
            .cell(&identifier)
            .cloned()
            .ok_or_else(|| DataSourceError::unknown_identifier(&identifier))?;

        let mut view = registration.create();
        (registration.configuration())(&mut view, &item, location);
        Ok((identifier, view))
    }

    /// Configures a reused cell `view` for `location`.
    pub fn configure_cell(&self, view: &mut V, location: Location) -> Result<String> {
        let item = self.item_for_cell(location)?;
        let identifier = self.resolve_cell(&item, location)?;
        let configure = self
            .registry
            .read()
            .cell_configuration(&identifier)
            .ok_or_else(|| DataSourceError::unknown_identifier(&identifier))?;

        configure(view, &item, location);
        Ok(identifier)
    }

    /// Builds and configures the header or footer for `location`.
    pub fn create_supplementary_view(
        &self,
        kind: SupplementaryKind,
        location: Location,
    ) -> Result<(String, V)> {
        let identifier = self.supplementary_identifier(kind, location)?;
        let registration = self
            .registry
            .read()
            .supplementary(&identifier, kind)
            .cloned()
            .ok_or_else(|| DataSourceError::unknown_identifier(&identifier))?;

        let mut view = registration.create();
        (registration.configuration())(&mut view, kind, location);
        Ok((identifier, view))
    }

    /// Configures a reused header or footer `view` for `location`.
    pub fn configure_supplementary_view(
        &self,
        view: &mut V,
        kind: SupplementaryKind,
        location: Location,
    ) -> Result<String> {
        let identifier = self.supplementary_identifier(kind, location)?;
        let configure = self
            .supplementary_configuration(&identifier, kind)
            .ok_or_else(|| DataSourceError::unknown_identifier(&identifier))?;

        configure(view, kind, location);
        Ok(identifier)
    }

    fn resolve_cell(&self, item: &T, location: Location) -> Result<String> {
        let resolver = self.registry.read().cell_resolver();
        match resolver {
            Some(resolver) => Ok(resolver(Some(item), location)),
            None => self.registry.read().resolve_cell(Some(item), location),
        }
    }

    fn item_for_cell(&self, location: Location) -> Result<T> {
        let store = self.store.read();
        let items = store.items_in_section(location.section())?;
        items.get(location.item()).cloned().ok_or_else(|| {
            DataSourceError::index_out_of_range(location.section(), location.item(), items.len())
        })
    }
}

impl<S, T, V> DataSource for ArrayAdapter<S, T, V>
where
    S: Send + Sync + 'static,
    T: Clone + PartialEq + Send + Sync + 'static,
    V: 'static,
{
    type Item = T;

    fn section_count(&self) -> usize {
        self.store.read().section_count()
    }

    fn item_count(&self, section: usize) -> usize {
        if !self.is_section_visible(section) {
            return 0;
        }
        self.store.read().section(section).map_or(0, Section::len)
    }

    fn item_at(&self, location: Location) -> Option<T> {
        if !self.is_section_visible(location.section()) {
            return None;
        }
        self.get(location)
    }

    fn location_of(&self, item: &T) -> Option<Location> {
        self.store
            .read()
            .position_where(item, |section| self.is_section_visible(section))
    }
}

/// Drops row operations in hidden sections and keeps the policy's section
/// indices in step with section operations.
///
/// The policy may key visibility on section indices, so inserting or
/// removing sections can reveal or hide a surviving section. Those sections
/// get row deletes (pre-batch indices) or inserts (post-batch indices)
/// appended after the section operation.
///
/// Returns the filtered operations and `(section, open)` for each surviving
/// section whose visibility changed.
fn filter_through_policy<S, T>(
    policy: &dyn SectionPolicy,
    store: &ItemStore<S, T>,
    ops: Vec<UpdateOp>,
) -> (Vec<UpdateOp>, Vec<(usize, bool)>) {
    let visible = |locations: Vec<Location>| -> Vec<Location> {
        locations
            .into_iter()
            .filter(|location| policy.is_section_visible(location.section()))
            .collect()
    };

    let mut filtered = Vec::with_capacity(ops.len());
    let mut toggled = Vec::new();
    for op in ops {
        match op {
            UpdateOp::InsertRows(locations) => filtered.push(UpdateOp::InsertRows(visible(locations))),
            UpdateOp::DeleteRows(locations) => filtered.push(UpdateOp::DeleteRows(visible(locations))),
            UpdateOp::ReloadRows(locations) => filtered.push(UpdateOp::ReloadRows(visible(locations))),
            UpdateOp::MoveRow { from, to } => match (
                policy.is_section_visible(from.section()),
                policy.is_section_visible(to.section()),
            ) {
                (true, true) => filtered.push(UpdateOp::MoveRow { from, to }),
                (true, false) => filtered.push(UpdateOp::DeleteRows(vec![from])),
                (false, true) => filtered.push(UpdateOp::InsertRows(vec![to])),
                (false, false) => {}
            },
            UpdateOp::InsertSections(sections) => {
                let survivors = survivors_after_insert(store.section_count(), &sections);
                let before = visibility(policy, survivors.iter().map(|&(old, _)| old));
                for &section in &sections {
                    policy.section_inserted(section);
                }
                filtered.push(UpdateOp::InsertSections(sections));
                filtered.extend(revealed_or_hidden(policy, store, &survivors, &before, &mut toggled));
            }
            UpdateOp::DeleteSections(sections) => {
                let survivors = survivors_after_delete(store.section_count(), &sections);
                let before = visibility(policy, survivors.iter().map(|&(old, _)| old));
                for &section in sections.iter().rev() {
                    policy.section_removed(section);
                }
                filtered.push(UpdateOp::DeleteSections(sections));
                filtered.extend(revealed_or_hidden(policy, store, &survivors, &before, &mut toggled));
            }
            UpdateOp::ReloadAll => {
                policy.sections_reset();
                filtered.push(UpdateOp::ReloadAll);
            }
        }
    }
    (filtered, toggled)
}

/// `(old, new)` indices of the sections that existed before `inserted` (post-batch
/// indices, ascending) were added, given the post-batch section count.
fn survivors_after_insert(count: usize, inserted: &[usize]) -> Vec<(usize, usize)> {
    let mut shift = 0;
    (0..count)
        .filter_map(|new| {
            if inserted.binary_search(&new).is_ok() {
                shift += 1;
                None
            } else {
                Some((new - shift, new))
            }
        })
        .collect()
}

/// `(old, new)` indices of the sections left after `deleted` (pre-batch
/// indices, ascending) were removed, given the post-batch section count.
fn survivors_after_delete(count: usize, deleted: &[usize]) -> Vec<(usize, usize)> {
    let mut shift = 0;
    (0..count + deleted.len())
        .filter_map(|old| {
            if deleted.binary_search(&old).is_ok() {
                shift += 1;
                None
            } else {
                Some((old, old - shift))
            }
        })
        .collect()
}

fn visibility(policy: &dyn SectionPolicy, sections: impl Iterator<Item = usize>) -> Vec<bool> {
    sections.map(|section| policy.is_section_visible(section)).collect()
}

fn revealed_or_hidden<S, T>(
    policy: &dyn SectionPolicy,
    store: &ItemStore<S, T>,
    survivors: &[(usize, usize)],
    before: &[bool],
    toggled: &mut Vec<(usize, bool)>,
) -> [UpdateOp; 2] {
    let mut hidden = Vec::new();
    let mut revealed = Vec::new();
    for (&(old, new), &was_visible) in survivors.iter().zip(before) {
        let len = store.section(new).map_or(0, Section::len);
        match (was_visible, policy.is_section_visible(new)) {
            (true, false) => {
                hidden.extend(locations_in_range(0..len, old));
                toggled.push((new, false));
            }
            (false, true) => {
                revealed.extend(locations_in_range(0..len, new));
                toggled.push((new, true));
            }
            _ => {}
        }
    }
    [UpdateOp::DeleteRows(hidden), UpdateOp::InsertRows(revealed)]
}
