//! Read-only service registry with query support.

use crate::{
    definition::ServiceDefinition,
    error::{CatalogError, Result},
    loader::{Catalog, CatalogLoader},
};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::info;
use userscout_core::ServiceName;

/// Immutable, cheaply clonable view over a merged service catalog.
///
/// The registry is built once and never mutated, so clones can be handed to
/// any number of concurrent readers without locking.
#[derive(Debug, Clone, Default)]
pub struct ServiceRegistry {
    /// Definitions indexed by case-insensitive service name
    definitions: Arc<Catalog>,
}

impl ServiceRegistry {
    /// Create a registry over an already merged catalog.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            definitions: Arc::new(catalog),
        }
    }

    /// Create a registry from individual definitions.
    ///
    /// A later definition replaces an earlier one with the same name.
    #[must_use]
    pub fn from_definitions(definitions: impl IntoIterator<Item = ServiceDefinition>) -> Self {
        let mut catalog = Catalog::new();
        for definition in definitions {
            catalog.remove(&definition.name);
            catalog.insert(definition.name.clone(), definition);
        }
        Self::new(catalog)
    }

    /// Create a registry and load all definitions from the given loader.
    ///
    /// # Errors
    /// Returns error if loading fails.
    pub fn load_from(loader: &CatalogLoader) -> Result<Self> {
        let registry = Self::new(loader.load()?);
        info!(count = registry.len(), "service registry ready");
        Ok(registry)
    }

    /// Create a registry over the bundled definition sources.
    ///
    /// # Errors
    /// Returns error if a bundled source is corrupt.
    pub fn bundled() -> Result<Self> {
        Self::load_from(&CatalogLoader::bundled())
    }

    /// Get a service definition by case-insensitive name.
    ///
    /// # Errors
    /// Returns error if the service is not found.
    pub fn get(&self, name: &str) -> Result<&ServiceDefinition> {
        ServiceName::new(name)
            .ok()
            .and_then(|key| self.definitions.get(&key))
            .ok_or_else(|| CatalogError::NotFound {
                name: name.to_string(),
            })
    }

    /// Check if a service exists in the registry.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_ok()
    }

    /// Get the total number of services in the registry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the registry holds no services.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Iterate over all definitions in case-insensitive name order.
    pub fn iter(&self) -> impl Iterator<Item = &ServiceDefinition> {
        self.definitions.values()
    }

    /// Sorted service names, excluding NSFW services unless asked to include them.
    #[must_use]
    pub fn list_names(&self, include_nsfw: bool) -> Vec<String> {
        self.visible(include_nsfw)
            .map(|def| def.name.to_string())
            .collect()
    }

    /// Services tagged with `category` (case-insensitive).
    #[must_use]
    pub fn get_by_category(&self, category: &str, include_nsfw: bool) -> Catalog {
        self.visible(include_nsfw)
            .filter(|def| def.has_category(category))
            .map(|def| (def.name.clone(), def.clone()))
            .collect()
    }

    /// Distinct category tags in use, lower-cased and sorted.
    #[must_use]
    pub fn categories(&self, include_nsfw: bool) -> BTreeSet<String> {
        self.visible(include_nsfw)
            .flat_map(|def| def.categories.iter().map(|c| c.to_lowercase()))
            .collect()
    }

    fn visible(&self, include_nsfw: bool) -> impl Iterator<Item = &ServiceDefinition> {
        self.definitions
            .values()
            .filter(move |def| include_nsfw || !def.is_nsfw())
    }
}
