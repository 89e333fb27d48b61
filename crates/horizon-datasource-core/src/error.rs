//! Error types for Horizon Datasource.
//!
//! Every variant describes a misuse of the adapter contract. Errors are raised
//! synchronously by the call that broke the contract, and the failing call
//! leaves the adapter untouched.

/// Result type alias for data source operations.
pub type Result<T> = std::result::Result<T, DataSourceError>;

/// Errors that can occur when mutating or querying a data source adapter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataSourceError {
    /// An item offset lies outside its section.
    #[error("item {item} is out of range for section {section} ({len} items)")]
    IndexOutOfRange {
        section: usize,
        item: usize,
        len: usize,
    },

    /// A section index lies outside the store.
    #[error("section {section} is out of range ({count} sections)")]
    SectionOutOfRange { section: usize, count: usize },

    /// Two parallel lists that must have equal lengths do not.
    #[error("count mismatch: expected {expected} entries, got {actual}")]
    CountMismatch { expected: usize, actual: usize },

    /// More than one view is registered and no resolver was supplied.
    #[error("{candidates} {kind} registrations and no identifier resolver")]
    AmbiguousIdentifier { kind: &'static str, candidates: usize },

    /// Nothing is registered for the requested kind of view.
    #[error("no {kind} is registered")]
    NoRegistration { kind: &'static str },

    /// A resolver produced an identifier that has no registration.
    #[error("no registration for identifier '{identifier}'")]
    UnknownIdentifier { identifier: String },

    /// A protocol method was forwarded but nothing handled it.
    #[error("protocol method '{method}' is not handled and no fallback accepted it")]
    UnhandledProtocolMethod { method: &'static str },

    /// An identifier was re-registered for an incompatible kind of view.
    #[error("identifier '{identifier}' is registered as {existing}, cannot register it as {requested}")]
    DuplicateKindConflict {
        identifier: String,
        existing: &'static str,
        requested: &'static str,
    },

    /// A section-level operation was called on a non-sectioned store.
    #[error("{operation} requires a sectioned data source")]
    NotSectioned { operation: &'static str },

    /// A mutation was attempted while an update batch was being applied.
    #[error("an update batch is still being applied to the bound view")]
    BatchInProgress,

    /// Adapter configuration could not be parsed.
    #[error("invalid adapter configuration: {0}")]
    Config(String),
}

impl DataSourceError {
    /// Create an item out-of-range error.
    pub fn index_out_of_range(section: usize, item: usize, len: usize) -> Self {
        Self::IndexOutOfRange { section, item, len }
    }

    /// Create a section out-of-range error.
    pub fn section_out_of_range(section: usize, count: usize) -> Self {
        Self::SectionOutOfRange { section, count }
    }

    /// Create a count mismatch error.
    pub fn count_mismatch(expected: usize, actual: usize) -> Self {
        Self::CountMismatch { expected, actual }
    }

    /// Create an unknown identifier error.
    pub fn unknown_identifier(identifier: impl Into<String>) -> Self {
        Self::UnknownIdentifier {
            identifier: identifier.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns `true` for the out-of-range family of errors.
    pub fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            Self::IndexOutOfRange { .. } | Self::SectionOutOfRange { .. }
        )
    }
}
