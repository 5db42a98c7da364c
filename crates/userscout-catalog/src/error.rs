//! Error types for the catalog subsystem.

use thiserror::Error;

/// Errors that can occur while loading or querying service definitions.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// No definition sources were discovered at all
    #[error("no service definition sources found")]
    NoSources,

    /// A whole source failed to parse as JSON
    #[error("failed to parse service definitions in {source_id}: {source}")]
    SourceParse {
        /// Identifier of the offending source
        source_id: String,
        /// JSON parse error
        #[source]
        source: serde_json::Error,
    },

    /// A source parsed but is not shaped like a definition map
    #[error("invalid service definition source {source_id}: {reason}")]
    InvalidSource {
        /// Identifier of the offending source
        source_id: String,
        /// Reason the source was rejected
        reason: String,
    },

    /// A single definition is incomplete or malformed
    #[error("invalid service definition for {name}: {reason}")]
    InvalidDefinition {
        /// Service name as it appeared in the source
        name: String,
        /// Reason for validation failure
        reason: String,
    },

    /// Service not present in the registry
    #[error("service definition not found: {name}")]
    NotFound {
        /// The service name that was not found
        name: String,
    },

    /// Definition directory not found
    #[error("service definitions directory not found at {path}")]
    DirectoryNotFound {
        /// Expected directory path
        path: String,
    },

    /// I/O error while reading definition files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
