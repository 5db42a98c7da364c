//! Userscout Probe - Concurrent username probing.
//!
//! This crate checks whether a username exists on the services of a
//! [`ServiceRegistry`](userscout_catalog::ServiceRegistry). Each check fans
//! out one HTTP GET per selected service, joins them under a shared
//! deadline, and decides found/not-found per service from the response.
//!
//! # Features
//!
//! - Concurrent probing with an optional cap on in-flight requests
//! - One shared deadline per check, plus external cancellation
//! - Status-code and body-message evaluation heuristics
//! - Per-probe failures reported in-band, never aborting the check
//! - Injectable [`HttpTransport`] for testing
//!
//! # Example
//!
//! ```rust,no_run
//! use userscout_catalog::ServiceRegistry;
//! use userscout_probe::ProbeEngine;
//! use std::time::Duration;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = ServiceRegistry::bundled()?;
//! let engine = ProbeEngine::builder(registry)
//!     .with_services(["GitHub", "GitLab"])
//!     .with_timeout(Duration::from_secs(10))
//!     .build()?;
//!
//! for result in engine.check_one("alice").await? {
//!     println!("{}: {}", result.service_name, result.found);
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

pub mod engine;
pub mod error;
pub mod evaluation;
#[allow(missing_docs)]
pub mod filter;
pub mod result;
pub mod transport;
#[allow(missing_docs)]
pub mod url_builder;

// Re-export commonly used types
pub use engine::{check, CheckOptions, ProbeEngine, ProbeEngineBuilder};
pub use error::{ProbeError, Result};
pub use evaluation::evaluate;
pub use filter::{parse_service_list, ServiceSelection};
pub use result::{ProbeResult, UsernameCheckSummary, NOTE_TIMEOUT};
pub use transport::{HttpTransport, ReqwestTransport, TransportError, TransportResponse};
pub use url_builder::build_profile_url;
