//! Registration of cell and supplementary view factories.
//!
//! The registry maps reuse identifiers to a factory that builds a blank view
//! and a closure that configures a view for a particular item. When the bound
//! view asks for a cell, the registry decides which identifier applies
//! (through a resolver closure, or the sole registration) and hands back the
//! matching configuration.
//!
//! Identifiers are plain strings. [`default_identifier`] derives one from a
//! type name for callers that register one view type per identifier.
//!
//! Cells, supplementary views and accordion headers share one identifier
//! namespace, mirroring the reuse queue of a table or collection view. Reusing
//! an identifier for a different kind of registration is rejected, because
//! the configuration closures have different signatures.

use std::collections::HashMap;
use std::sync::Arc;

use horizon_datasource_core::logging::targets;
use horizon_datasource_core::{DataSourceError, Result};

use super::location::Location;

/// Builds a blank view instance.
pub type ViewFactory<V> = Arc<dyn Fn() -> V + Send + Sync>;

/// Configures a cell for the item at a location.
pub type CellConfigurator<T, V> = Arc<dyn Fn(&mut V, &T, Location) + Send + Sync>;

/// Configures a header or footer view.
pub type SupplementaryConfigurator<V> =
    Arc<dyn Fn(&mut V, SupplementaryKind, Location) + Send + Sync>;

/// Configures an accordion section header: `(view, label, section, expanded)`.
pub type AccordionHeaderConfigurator<S, V> =
    Arc<dyn Fn(&mut V, Option<&S>, usize, bool) + Send + Sync>;

/// Picks the cell identifier for an item and location.
pub type CellIdentifierResolver<T> = Arc<dyn Fn(Option<&T>, Location) -> String + Send + Sync>;

/// Picks the supplementary view identifier for a kind and location.
pub type SupplementaryIdentifierResolver =
    Arc<dyn Fn(SupplementaryKind, Location) -> String + Send + Sync>;

/// Which supplementary view is being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupplementaryKind {
    /// Section header.
    Header,
    /// Section footer.
    Footer,
}

impl SupplementaryKind {
    /// Returns a lowercase name, for logging and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Footer => "footer",
        }
    }
}

/// The kind of view an identifier is registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistrationKind {
    /// A row cell.
    Cell,
    /// A header or footer view.
    SupplementaryView,
    /// An accordion section header.
    AccordionHeader,
}

impl RegistrationKind {
    /// Returns a lowercase name, for logging and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cell => "cell",
            Self::SupplementaryView => "supplementary view",
            Self::AccordionHeader => "accordion header",
        }
    }
}

/// Derives an identifier from a type's name, without its module path.
///
/// ```
/// use horizon_datasource::model::default_identifier;
///
/// struct TitleCell;
/// assert_eq!(default_identifier::<TitleCell>(), "TitleCell");
/// ```
pub fn default_identifier<C: ?Sized + 'static>() -> String {
    let full = std::any::type_name::<C>();
    let (path, generics) = full.split_at(full.find('<').unwrap_or(full.len()));
    let name = path.rsplit("::").next().unwrap_or(path);
    format!("{name}{generics}")
}

/// A factory plus configuration closure stored under one identifier.
pub struct Registration<V, C> {
    factory: ViewFactory<V>,
    configure: C,
}

impl<V, C: Clone> Clone for Registration<V, C> {
    fn clone(&self) -> Self {
        Self {
            factory: Arc::clone(&self.factory),
            configure: self.configure.clone(),
        }
    }
}

impl<V, C> Registration<V, C> {
    /// Builds a blank view.
    pub fn create(&self) -> V {
        (self.factory)()
    }

    /// Returns the configuration closure.
    pub fn configuration(&self) -> &C {
        &self.configure
    }
}

/// Registered cells of one data source.
type CellTable<T, V> = HashMap<String, Registration<V, CellConfigurator<T, V>>>;
type SupplementaryTable<V> =
    HashMap<(SupplementaryKind, String), Registration<V, SupplementaryConfigurator<V>>>;
type HeaderTable<S, V> = HashMap<String, Registration<V, AccordionHeaderConfigurator<S, V>>>;

/// The identifier -> (factory, configuration) table of a data source.
///
/// `S` is the section label type, `T` the item type and `V` the host's view
/// handle type.
pub struct ViewRegistry<S, T, V> {
    kinds: HashMap<String, RegistrationKind>,
    cells: CellTable<T, V>,
    supplementary: SupplementaryTable<V>,
    accordion_headers: HeaderTable<S, V>,
    cell_resolver: Option<CellIdentifierResolver<T>>,
    supplementary_resolver: Option<SupplementaryIdentifierResolver>,
}

impl<S, T, V> Default for ViewRegistry<S, T, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, T, V> std::fmt::Debug for ViewRegistry<S, T, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewRegistry")
            .field("cells", &self.identifiers(RegistrationKind::Cell))
            .field(
                "supplementary",
                &self.identifiers(RegistrationKind::SupplementaryView),
            )
            .field(
                "accordion_headers",
                &self.identifiers(RegistrationKind::AccordionHeader),
            )
            .field("cell_resolver", &self.cell_resolver.is_some())
            .field("supplementary_resolver", &self.supplementary_resolver.is_some())
            .finish()
    }
}

impl<S, T, V> ViewRegistry<S, T, V> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            kinds: HashMap::new(),
            cells: HashMap::new(),
            supplementary: HashMap::new(),
            accordion_headers: HashMap::new(),
            cell_resolver: None,
            supplementary_resolver: None,
        }
    }

    fn claim(&mut self, identifier: &str, kind: RegistrationKind) -> Result<()> {
        match self.kinds.get(identifier) {
            Some(&existing) if existing != kind => Err(DataSourceError::DuplicateKindConflict {
                identifier: identifier.to_string(),
                existing: existing.name(),
                requested: kind.name(),
            }),
            Some(_) => {
                tracing::debug!(target: targets::REGISTRY, identifier, kind = kind.name(), "replacing registration");
                Ok(())
            }
            None => {
                tracing::debug!(target: targets::REGISTRY, identifier, kind = kind.name(), "registering");
                self.kinds.insert(identifier.to_string(), kind);
                Ok(())
            }
        }
    }

    /// Registers a cell factory and configuration under `identifier`.
    ///
    /// Registering the same identifier again replaces the earlier entry.
    pub fn register_cell(
        &mut self,
        identifier: impl Into<String>,
        factory: ViewFactory<V>,
        configure: CellConfigurator<T, V>,
    ) -> Result<()> {
        let identifier = identifier.into();
        self.claim(&identifier, RegistrationKind::Cell)?;
        self.cells
            .insert(identifier, Registration { factory, configure });
        Ok(())
    }

    /// Registers a header or footer view under `identifier`.
    ///
    /// Headers and footers are looked up by kind, so one identifier may be
    /// registered for both.
    pub fn register_supplementary(
        &mut self,
        kind: SupplementaryKind,
        identifier: impl Into<String>,
        factory: ViewFactory<V>,
        configure: SupplementaryConfigurator<V>,
    ) -> Result<()> {
        let identifier = identifier.into();
        self.claim(&identifier, RegistrationKind::SupplementaryView)?;
        self.supplementary
            .insert((kind, identifier), Registration { factory, configure });
        Ok(())
    }

    /// Registers an accordion section header under `identifier`.
    pub fn register_accordion_header(
        &mut self,
        identifier: impl Into<String>,
        factory: ViewFactory<V>,
        configure: AccordionHeaderConfigurator<S, V>,
    ) -> Result<()> {
        let identifier = identifier.into();
        self.claim(&identifier, RegistrationKind::AccordionHeader)?;
        self.accordion_headers
            .insert(identifier, Registration { factory, configure });
        Ok(())
    }

    /// Sets or clears the closure that picks cell identifiers.
    pub fn set_cell_resolver(&mut self, resolver: Option<CellIdentifierResolver<T>>) {
        self.cell_resolver = resolver;
    }

    /// Sets or clears the closure that picks supplementary view identifiers.
    pub fn set_supplementary_resolver(&mut self, resolver: Option<SupplementaryIdentifierResolver>) {
        self.supplementary_resolver = resolver;
    }

    /// Returns a handle to the cell resolver, if one is set.
    pub fn cell_resolver(&self) -> Option<CellIdentifierResolver<T>> {
        self.cell_resolver.clone()
    }

    /// Returns a handle to the supplementary resolver, if one is set.
    pub fn supplementary_resolver(&self) -> Option<SupplementaryIdentifierResolver> {
        self.supplementary_resolver.clone()
    }

    /// Returns the identifiers registered for `kind`, sorted.
    pub fn identifiers(&self, kind: RegistrationKind) -> Vec<String> {
        let mut identifiers: Vec<String> = self
            .kinds
            .iter()
            .filter(|(_, k)| **k == kind)
            .map(|(identifier, _)| identifier.clone())
            .collect();
        identifiers.sort();
        identifiers
    }

    /// Returns the identifier for the cell at `location`.
    ///
    /// Uses the resolver if one is set. Otherwise the only registered cell
    /// is used; with several registrations this fails with
    /// `AmbiguousIdentifier`, and with none with `NoRegistration`.
    pub fn resolve_cell(&self, item: Option<&T>, location: Location) -> Result<String> {
        if let Some(resolver) = &self.cell_resolver {
            return Ok(resolver(item, location));
        }
        sole_identifier(self.cells.keys(), RegistrationKind::Cell.name())
    }

    /// Returns the identifier for the supplementary view of `kind` at `location`.
    pub fn resolve_supplementary(&self, kind: SupplementaryKind, location: Location) -> Result<String> {
        if let Some(resolver) = &self.supplementary_resolver {
            return Ok(resolver(kind, location));
        }
        sole_identifier(
            self.supplementary
                .keys()
                .filter(|(k, _)| *k == kind)
                .map(|(_, identifier)| identifier),
            kind.name(),
        )
    }

    /// Returns the identifier for accordion section headers.
    pub fn resolve_accordion_header(&self) -> Result<String> {
        sole_identifier(
            self.accordion_headers.keys(),
            RegistrationKind::AccordionHeader.name(),
        )
    }

    /// Returns the cell registration for `identifier`.
    pub fn cell(&self, identifier: &str) -> Option<&Registration<V, CellConfigurator<T, V>>> {
        self.cells.get(identifier)
    }

    /// Returns the cell configuration closure for `identifier`.
    pub fn cell_configuration(&self, identifier: &str) -> Option<CellConfigurator<T, V>> {
        self.cells
            .get(identifier)
            .map(|registration| Arc::clone(&registration.configure))
    }

    /// Returns the supplementary registration for `identifier` and `kind`.
    pub fn supplementary(
        &self,
        identifier: &str,
        kind: SupplementaryKind,
    ) -> Option<&Registration<V, SupplementaryConfigurator<V>>> {
        self.supplementary.get(&(kind, identifier.to_string()))
    }

    /// Returns the supplementary configuration closure for `identifier` and `kind`.
    pub fn supplementary_configuration(
        &self,
        identifier: &str,
        kind: SupplementaryKind,
    ) -> Option<SupplementaryConfigurator<V>> {
        self.supplementary(identifier, kind)
            .map(|registration| Arc::clone(&registration.configure))
    }

    /// Returns the accordion header registration for `identifier`.
    pub fn accordion_header(
        &self,
        identifier: &str,
    ) -> Option<&Registration<V, AccordionHeaderConfigurator<S, V>>> {
        self.accordion_headers.get(identifier)
    }
}

fn sole_identifier<'a>(
    mut identifiers: impl Iterator<Item = &'a String>,
    kind: &'static str,
) -> Result<String> {
    match (identifiers.next(), identifiers.count()) {
        (Some(identifier), 0) => Ok(identifier.clone()),
        (Some(_), rest) => Err(DataSourceError::AmbiguousIdentifier {
            kind,
            candidates: rest + 1,
        }),
        (None, _) => Err(DataSourceError::NoRegistration { kind }),
    }
}
