//! Userscout Catalog - Service definition system for username probing.
//!
//! This crate provides the core types and functionality for managing service
//! definitions. It merges JSON definition sources, holds the result in memory
//! and answers read-only queries over it.
//!
//! # Architecture
//!
//! - **Definition Types** ([`definition`]): Strongly-typed service definitions
//! - **Loader** ([`loader`]): Bundled and directory sources, merged by identifier order
//! - **Registry** ([`registry`]): Immutable in-memory catalog with query support
//! - **Errors** ([`error`]): Catalog-specific error types
//!
//! # Example
//!
//! ```rust
//! use userscout_catalog::{CatalogLoader, ServiceRegistry};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = ServiceRegistry::load_from(&CatalogLoader::bundled())?;
//!
//! let github = registry.get("github")?;
//! println!("{} -> {}", github.name(), github.url);
//!
//! for name in registry.list_names(false) {
//!     println!("{name}");
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod definition;
pub mod error;
pub mod loader;
pub mod registry;

// Re-export commonly used types
pub use definition::{ErrorType, ServiceDefinition, URL_PLACEHOLDER};
pub use error::{CatalogError, Result};
pub use loader::{Catalog, CatalogLoader, DefinitionSource};
pub use registry::ServiceRegistry;
