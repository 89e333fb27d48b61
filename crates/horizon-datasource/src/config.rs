//! Adapter configuration.
//!
//! [`AdapterConfig`] gathers the tunables of the adapters in one
//! serializable struct. Build it in code with the `with_*` methods, or load
//! it from TOML:
//!
//! ```
//! use horizon_datasource::config::AdapterConfig;
//! use horizon_datasource::model::RowAnimation;
//!
//! let config = AdapterConfig::from_toml_str(r#"
//! row_animation = "fade"
//! allow_multiple_expanded_sections = true
//! sections_to_keep_open = [0]
//! "#).unwrap();
//!
//! assert_eq!(config.row_animation, RowAnimation::Fade);
//! assert!(config.sections_to_keep_open.contains(&0));
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use horizon_datasource_core::{DataSourceError, Result};

use crate::model::RowAnimation;

/// Settings shared by the array and accordion adapters.
///
/// Missing TOML keys fall back to the defaults: automatic animation, one
/// expanded section at a time, nothing kept open.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Animation attached to every update batch.
    pub row_animation: RowAnimation,
    /// Whether an accordion may have several sections expanded at once.
    pub allow_multiple_expanded_sections: bool,
    /// Accordion sections that are always open.
    pub sections_to_keep_open: BTreeSet<usize>,
}

impl AdapterConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the row animation.
    pub fn with_row_animation(mut self, animation: RowAnimation) -> Self {
        self.row_animation = animation;
        self
    }

    /// Set whether several accordion sections may be expanded at once.
    pub fn with_multiple_expanded_sections(mut self, allow: bool) -> Self {
        self.allow_multiple_expanded_sections = allow;
        self
    }

    /// Set the always-open accordion sections.
    pub fn with_sections_to_keep_open(mut self, sections: impl IntoIterator<Item = usize>) -> Self {
        self.sections_to_keep_open = sections.into_iter().collect();
        self
    }

    /// Parses a configuration from TOML text.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| DataSourceError::config(e.to_string()))
    }

    /// Serializes the configuration to TOML text.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| DataSourceError::config(e.to_string()))
    }
}
