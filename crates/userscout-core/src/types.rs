//! Shared types used across userscout.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Name of a probed service, compared case-insensitively.
///
/// The original spelling is kept for display while equality, hashing and
/// ordering all use the lower-cased form, so `GitHub` and `github` are the
/// same key in any map or set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServiceName {
    display: String,
    folded: String,
}

impl ServiceName {
    /// Create a new `ServiceName`.
    ///
    /// Surrounding whitespace is trimmed.
    ///
    /// # Errors
    /// Returns error if the name is empty after trimming.
    pub fn new(name: impl Into<String>) -> Result<Self, CoreError> {
        let name = name.into();
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(CoreError::Validation(
                "service name cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            folded: trimmed.to_lowercase(),
            display: trimmed.to_string(),
        })
    }

    /// Get the name as originally spelled.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.display
    }

    /// Get the lower-cased comparison key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.folded
    }

    /// Case-insensitive comparison against a plain string.
    #[must_use]
    pub fn matches(&self, other: &str) -> bool {
        self.folded == other.trim().to_lowercase()
    }
}

impl PartialEq for ServiceName {
    fn eq(&self, other: &Self) -> bool {
        self.folded == other.folded
    }
}

impl Eq for ServiceName {}

impl Hash for ServiceName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.folded.hash(state);
    }
}

impl PartialOrd for ServiceName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ServiceName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.folded.cmp(&other.folded)
    }
}

impl TryFrom<String> for ServiceName {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ServiceName> for String {
    fn from(name: ServiceName) -> Self {
        name.display
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display)
    }
}
