//! Per-probe outcome records.

use serde::Serialize;
use userscout_core::ServiceName;

/// Note recorded on a probe abandoned at the deadline or by cancellation.
pub const NOTE_TIMEOUT: &str = "timeout";

/// Outcome of probing one service for one username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    /// Probed service
    pub service_name: ServiceName,
    /// Username as supplied by the caller
    pub username: String,
    /// Whether the profile appears to exist
    pub found: bool,
    /// Profile URL that was requested
    pub profile_url: String,
    /// Observed HTTP status; absent when no response arrived
    pub status_code: Option<u16>,
    /// Diagnostic note for failed probes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ProbeResult {
    /// Result for a probe that received a response.
    #[must_use]
    pub fn completed(
        service_name: ServiceName,
        username: impl Into<String>,
        profile_url: impl Into<String>,
        status: u16,
        found: bool,
    ) -> Self {
        Self {
            service_name,
            username: username.into(),
            found,
            profile_url: profile_url.into(),
            status_code: Some(status),
            note: None,
        }
    }

    /// Result for a probe that got no usable response.
    #[must_use]
    pub fn failed(
        service_name: ServiceName,
        username: impl Into<String>,
        profile_url: impl Into<String>,
        note: impl Into<String>,
    ) -> Self {
        Self {
            service_name,
            username: username.into(),
            found: false,
            profile_url: profile_url.into(),
            status_code: None,
            note: Some(note.into()),
        }
    }

    /// Whether the probe was abandoned at the deadline.
    #[must_use]
    pub fn timed_out(&self) -> bool {
        self.note.as_deref() == Some(NOTE_TIMEOUT)
    }
}

/// All results for one username of a multi-username check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsernameCheckSummary {
    /// Checked username
    pub username: String,
    /// One result per selected service
    pub results: Vec<ProbeResult>,
}

impl UsernameCheckSummary {
    /// Number of services reporting the profile as found.
    #[must_use]
    pub fn found_count(&self) -> usize {
        self.results.iter().filter(|r| r.found).count()
    }
}
