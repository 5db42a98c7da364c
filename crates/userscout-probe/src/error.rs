use thiserror::Error;
use userscout_catalog::CatalogError;

/// Errors that abort a whole check call.
///
/// Per-probe failures never surface here; they are reported in-band on the
/// corresponding [`ProbeResult`](crate::ProbeResult).
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Username is empty or whitespace-only
    #[error("username must not be empty")]
    InvalidUsername,

    /// Catalog could not be loaded
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Default HTTP transport could not be constructed
    #[error("failed to create HTTP transport: {0}")]
    Transport(String),

    /// Engine settings are unusable
    #[error("invalid probe configuration: {0}")]
    Config(String),
}

/// Result type for probe operations.
pub type Result<T> = std::result::Result<T, ProbeError>;
