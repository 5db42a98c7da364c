//! Service definition loading and merging.
//!
//! A catalog is built from one or more JSON sources, each an object mapping
//! service names to definitions. Sources are merged in lexicographic order of
//! their identifiers; a later source's definition replaces an earlier one
//! with the same (case-insensitive) name as a whole record.

use crate::{
    definition::{RawServiceDefinition, ServiceDefinition},
    error::{CatalogError, Result},
};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use userscout_core::ServiceName;

/// Merged catalog keyed by case-insensitive service name.
pub type Catalog = BTreeMap<ServiceName, ServiceDefinition>;

/// Definition sources compiled into the library.
const BUNDLED_SOURCES: &[(&str, &str)] = &[
    (
        "bundled/services.json",
        include_str!("../data/services.json"),
    ),
    (
        "bundled/services.nsfw.json",
        include_str!("../data/services.nsfw.json"),
    ),
];

/// One raw definition payload and the identifier it is ordered by.
#[derive(Debug, Clone)]
pub struct DefinitionSource {
    id: String,
    contents: String,
}

impl DefinitionSource {
    /// Create a source from an identifier and its JSON text.
    #[must_use]
    pub fn new(id: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            contents: contents.into(),
        }
    }

    /// Get the source identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Loader that merges service definition sources into a [`Catalog`].
#[derive(Debug, Clone, Default)]
pub struct CatalogLoader {
    sources: Vec<DefinitionSource>,
}

impl CatalogLoader {
    /// Create a loader with no sources.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loader over the definition sources bundled with the library.
    #[must_use]
    pub fn bundled() -> Self {
        BUNDLED_SOURCES
            .iter()
            .fold(Self::new(), |loader, (id, contents)| {
                loader.with_source(*id, *contents)
            })
    }

    /// Create a loader over every `*.json` file in a directory.
    ///
    /// Sub-directories are not searched. Source identifiers are file names.
    ///
    /// # Errors
    /// Returns error if the directory doesn't exist or a file can't be read.
    pub fn from_dir(definitions_dir: impl Into<PathBuf>) -> Result<Self> {
        let definitions_dir = definitions_dir.into();

        if !definitions_dir.is_dir() {
            return Err(CatalogError::DirectoryNotFound {
                path: definitions_dir.display().to_string(),
            });
        }

        let mut loader = Self::new();

        for entry in std::fs::read_dir(&definitions_dir)? {
            let path = entry?.path();

            if !Self::is_definition_file(&path) {
                continue;
            }

            let id = path
                .file_name()
                .and_then(|s| s.to_str())
                .map_or_else(|| path.display().to_string(), ToString::to_string);
            let contents = std::fs::read_to_string(&path)?;

            debug!(source_id = %id, dir = %definitions_dir.display(), "discovered definition source");
            loader = loader.with_source(id, contents);
        }

        Ok(loader)
    }

    /// Add an in-memory source.
    #[must_use]
    pub fn with_source(mut self, id: impl Into<String>, contents: impl Into<String>) -> Self {
        self.sources.push(DefinitionSource::new(id, contents));
        self
    }

    /// Source identifiers in merge order.
    #[must_use]
    pub fn source_ids(&self) -> Vec<&str> {
        self.ordered_sources().into_iter().map(DefinitionSource::id).collect()
    }

    /// Parse and merge every source.
    ///
    /// Malformed or incomplete entries are logged and skipped.
    ///
    /// # Errors
    /// Returns [`CatalogError::NoSources`] if the loader has no sources, and
    /// a parse error if any source as a whole is not a JSON object.
    pub fn load(&self) -> Result<Catalog> {
        if self.sources.is_empty() {
            return Err(CatalogError::NoSources);
        }

        let mut catalog = Catalog::new();

        for source in self.ordered_sources() {
            let accepted = Self::merge_source(source, &mut catalog)?;
            debug!(source_id = %source.id, accepted, "merged definition source");
        }

        info!(
            count = catalog.len(),
            sources = self.sources.len(),
            "loaded service catalog"
        );

        Ok(catalog)
    }

    fn ordered_sources(&self) -> Vec<&DefinitionSource> {
        let mut ordered: Vec<&DefinitionSource> = self.sources.iter().collect();
        ordered.sort_by(|a, b| a.id.cmp(&b.id));
        ordered
    }

    fn is_definition_file(path: &Path) -> bool {
        path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json")
    }

    /// Merge one source into the catalog, returning how many entries it contributed.
    fn merge_source(source: &DefinitionSource, catalog: &mut Catalog) -> Result<usize> {
        let root: Value =
            serde_json::from_str(&source.contents).map_err(|e| CatalogError::SourceParse {
                source_id: source.id.clone(),
                source: e,
            })?;

        let Value::Object(entries) = root else {
            return Err(CatalogError::InvalidSource {
                source_id: source.id.clone(),
                reason: "top level must be an object keyed by service name".to_string(),
            });
        };

        let mut accepted = 0;

        for (name, value) in entries {
            // Schema and other meta keys
            if name.starts_with('$') {
                continue;
            }

            let raw = match RawServiceDefinition::from_value(value) {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(
                        source_id = %source.id,
                        service = %name,
                        error = %e,
                        "skipping malformed service definition"
                    );
                    continue;
                }
            };

            let definition = match ServiceDefinition::from_raw(&name, raw) {
                Ok(definition) => definition,
                Err(e) => {
                    debug!(
                        source_id = %source.id,
                        service = %name,
                        error = %e,
                        "skipping incomplete service definition"
                    );
                    continue;
                }
            };

            // Remove first so the later spelling of the name replaces the key too.
            if catalog.remove(&definition.name).is_some() {
                debug!(
                    source_id = %source.id,
                    service = %definition.name,
                    "service definition replaced by later source"
                );
            }

            catalog.insert(definition.name.clone(), definition);
            accepted += 1;
        }

        Ok(accepted)
    }
}
