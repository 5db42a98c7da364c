//! Userscout Core - Foundation crate for the userscout username prober.
//!
//! This crate provides shared types, error handling and configuration
//! management that the catalog, probe and CLI crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared newtypes (`ServiceName`)
//!
//! # Example
//!
//! ```rust
//! use userscout_core::{AppConfig, ServiceName};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! assert_eq!(config.probe.timeout_secs, 30);
//!
//! let name = ServiceName::new("GitHub")?;
//! assert!(name.matches("github"));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{
    AppConfig, CatalogConfig, ProbeConfig, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
pub use error::{ConfigError, ConfigResult, CoreError, Result};
pub use types::ServiceName;
