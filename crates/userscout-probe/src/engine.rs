//! Probe engine for checking usernames across many services.
//!
//! This module provides the [`ProbeEngine`] which fans out one HTTP probe per
//! selected service, joins them under a shared deadline, and turns every
//! outcome (including failures) into a [`ProbeResult`].

use crate::error::{ProbeError, Result};
use crate::evaluation::evaluate;
use crate::filter::ServiceSelection;
use crate::result::{ProbeResult, UsernameCheckSummary, NOTE_TIMEOUT};
use crate::transport::{HttpTransport, ReqwestTransport, TransportError};
use crate::url_builder::build_profile_url;
use futures::stream::{FuturesUnordered, StreamExt};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use userscout_catalog::{ServiceDefinition, ServiceRegistry};
use userscout_core::{ProbeConfig, ServiceName, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};

/// Builder for [`ProbeEngine`].
pub struct ProbeEngineBuilder {
    registry: ServiceRegistry,
    services: Vec<String>,
    timeout: Duration,
    include_nsfw: bool,
    user_agent: String,
    max_concurrent_probes: Option<usize>,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl ProbeEngineBuilder {
    fn new(registry: ServiceRegistry) -> Self {
        Self {
            registry,
            services: Vec::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            include_nsfw: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_concurrent_probes: None,
            transport: None,
        }
    }

    /// Apply every setting from a `[probe]` configuration section.
    #[must_use]
    pub fn with_config(self, config: &ProbeConfig) -> Self {
        let builder = self
            .with_services(config.services.iter().cloned())
            .with_timeout(Duration::from_secs(config.timeout_secs))
            .with_include_nsfw(config.include_nsfw)
            .with_user_agent(config.user_agent.clone());

        match config.max_concurrent_probes {
            Some(max) => builder.with_max_concurrent_probes(max),
            None => builder,
        }
    }

    /// Restrict probing to the named services. Empty means all.
    #[must_use]
    pub fn with_services<I, S>(mut self, services: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.services = services.into_iter().map(Into::into).collect();
        self
    }

    /// Set the deadline shared by all probes of one check.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Include services flagged NSFW.
    #[must_use]
    pub fn with_include_nsfw(mut self, include_nsfw: bool) -> Self {
        self.include_nsfw = include_nsfw;
        self
    }

    /// Set the user agent of the default transport.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Cap the number of probes in flight at once.
    #[must_use]
    pub fn with_max_concurrent_probes(mut self, max: usize) -> Self {
        self.max_concurrent_probes = Some(max);
        self
    }

    /// Use a custom transport instead of the default HTTP client.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the engine.
    ///
    /// # Errors
    /// Returns error if the timeout or concurrency cap is zero, or if the
    /// default transport cannot be created.
    pub fn build(self) -> Result<ProbeEngine> {
        if self.timeout.is_zero() {
            return Err(ProbeError::Config("timeout must be positive".to_string()));
        }
        if self.max_concurrent_probes == Some(0) {
            return Err(ProbeError::Config(
                "max_concurrent_probes must be at least 1".to_string(),
            ));
        }

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(&self.user_agent, self.timeout)?),
        };

        let selection = ServiceSelection::new(self.services, self.include_nsfw);
        for name in selection.unknown_names(&self.registry) {
            warn!(service = %name, "requested service is not in the catalog");
        }

        Ok(ProbeEngine {
            registry: self.registry,
            selection,
            timeout: self.timeout,
            max_concurrent_probes: self.max_concurrent_probes,
            transport,
        })
    }
}

/// Checks usernames against the selected services of a catalog.
///
/// One engine owns one transport, shared by every probe of every call.
pub struct ProbeEngine {
    /// Catalog the targets are selected from
    registry: ServiceRegistry,
    /// Allow-list and NSFW flag
    selection: ServiceSelection,
    /// Deadline shared by all probes of one check
    timeout: Duration,
    /// Optional cap on in-flight probes; `None` runs every probe at once
    max_concurrent_probes: Option<usize>,
    /// HTTP transport
    transport: Arc<dyn HttpTransport>,
}

impl ProbeEngine {
    /// Start building an engine over `registry`.
    #[must_use]
    pub fn builder(registry: ServiceRegistry) -> ProbeEngineBuilder {
        ProbeEngineBuilder::new(registry)
    }

    /// Names of the services a check would probe, sorted case-insensitively.
    #[must_use]
    pub fn selected_services(&self) -> Vec<ServiceName> {
        self.selection
            .select(&self.registry)
            .into_iter()
            .map(|def| def.name.clone())
            .collect()
    }

    /// Deadline shared by all probes of one check.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Check one username against every selected service.
    ///
    /// Returns exactly one result per selected service, sorted by service
    /// name. Probe failures are reported in-band.
    ///
    /// # Errors
    /// Returns [`ProbeError::InvalidUsername`] if `username` is blank; no
    /// request is made in that case.
    pub async fn check_one(&self, username: &str) -> Result<Vec<ProbeResult>> {
        self.check_one_with_cancel(username, &CancellationToken::new())
            .await
    }

    /// Like [`check_one`](Self::check_one), abandoning in-flight probes when
    /// `cancel` fires. Abandoned probes are reported as timeouts.
    pub async fn check_one_with_cancel(
        &self,
        username: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<ProbeResult>> {
        if username.trim().is_empty() {
            return Err(ProbeError::InvalidUsername);
        }

        let targets = self.selection.select(&self.registry);
        let deadline = Instant::now() + self.timeout;
        let limit = self
            .max_concurrent_probes
            .unwrap_or(targets.len())
            .max(1);

        let mut pending = targets.into_iter();
        let mut in_flight = FuturesUnordered::new();
        let mut results = Vec::with_capacity(pending.len());

        loop {
            // Respect concurrency limit
            while in_flight.len() < limit {
                let Some(definition) = pending.next() else {
                    break;
                };
                in_flight.push(self.probe(definition, username, deadline, cancel));
            }

            match in_flight.next().await {
                Some(result) => results.push(result),
                None => break,
            }
        }

        results.sort_by(|a, b| a.service_name.cmp(&b.service_name));

        info!(
            username,
            selected = results.len(),
            found = results.iter().filter(|r| r.found).count(),
            failed = results.iter().filter(|r| r.note.is_some()).count(),
            "username check complete"
        );

        Ok(results)
    }

    /// Check several usernames one after another.
    ///
    /// Usernames are keyed case-insensitively under their first-seen
    /// spelling; a repeated username keeps the results of its last check.
    ///
    /// # Errors
    /// Returns the first error from any individual check.
    pub async fn check_many<I, S>(&self, usernames: I) -> Result<BTreeMap<String, Vec<ProbeResult>>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.check_many_with_cancel(usernames, &CancellationToken::new())
            .await
    }

    /// Like [`check_many`](Self::check_many) with external cancellation.
    pub async fn check_many_with_cancel<I, S>(
        &self,
        usernames: I,
        cancel: &CancellationToken,
    ) -> Result<BTreeMap<String, Vec<ProbeResult>>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let summaries = self.check_many_summaries_with_cancel(usernames, cancel).await?;

        let mut spellings: HashMap<String, String> = HashMap::new();
        let mut checked = BTreeMap::new();

        for summary in summaries {
            let key = spellings
                .entry(summary.username.to_lowercase())
                .or_insert_with(|| summary.username.clone())
                .clone();
            checked.insert(key, summary.results);
        }

        Ok(checked)
    }

    /// Check several usernames, keeping one summary per input in input order.
    ///
    /// # Errors
    /// Returns the first error from any individual check.
    pub async fn check_many_summaries<I, S>(&self, usernames: I) -> Result<Vec<UsernameCheckSummary>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.check_many_summaries_with_cancel(usernames, &CancellationToken::new())
            .await
    }

    /// Like [`check_many_summaries`](Self::check_many_summaries) with
    /// external cancellation.
    pub async fn check_many_summaries_with_cancel<I, S>(
        &self,
        usernames: I,
        cancel: &CancellationToken,
    ) -> Result<Vec<UsernameCheckSummary>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut summaries = Vec::new();

        for username in usernames {
            let username = username.as_ref();
            let results = self.check_one_with_cancel(username, cancel).await?;
            summaries.push(UsernameCheckSummary {
                username: username.to_string(),
                results,
            });
        }

        Ok(summaries)
    }

    /// Probe a single service, never failing.
    async fn probe(
        &self,
        definition: &ServiceDefinition,
        username: &str,
        deadline: Instant,
        cancel: &CancellationToken,
    ) -> ProbeResult {
        let profile_url = build_profile_url(definition, username);
        let request = self
            .transport
            .get(&profile_url, definition.error_type.needs_body());

        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => Err(TransportError::Timeout),
            response = tokio::time::timeout_at(deadline, request) => {
                response.unwrap_or(Err(TransportError::Timeout))
            }
        };

        match outcome {
            Ok(response) => {
                let found = evaluate(definition, response.status, response.body.as_deref());
                debug!(
                    service = %definition.name,
                    status = response.status,
                    found,
                    "probe complete"
                );
                ProbeResult::completed(
                    definition.name.clone(),
                    username,
                    profile_url,
                    response.status,
                    found,
                )
            }
            Err(TransportError::Timeout) => {
                debug!(service = %definition.name, "probe abandoned at deadline");
                ProbeResult::failed(definition.name.clone(), username, profile_url, NOTE_TIMEOUT)
            }
            Err(e) => {
                debug!(service = %definition.name, error = %e, "probe failed");
                ProbeResult::failed(definition.name.clone(), username, profile_url, e.kind())
            }
        }
    }
}

/// Options for the one-shot [`check`] function.
#[derive(Clone, Default)]
pub struct CheckOptions {
    /// Allow-list of service names; empty means all
    pub services: Vec<String>,
    /// Shared deadline; defaults to 30 seconds
    pub timeout: Option<Duration>,
    /// Include services flagged NSFW
    pub include_nsfw: bool,
    /// Transport override; defaults to a fresh HTTP client
    pub transport: Option<Arc<dyn HttpTransport>>,
}

/// Check one username with a transient engine.
///
/// The engine and its transport are dropped before this returns, whether the
/// check succeeded or not.
///
/// # Errors
/// Returns error if the username is blank or the engine cannot be built.
pub async fn check(
    registry: &ServiceRegistry,
    username: &str,
    options: CheckOptions,
) -> Result<Vec<ProbeResult>> {
    let mut builder = ProbeEngine::builder(registry.clone())
        .with_services(options.services)
        .with_include_nsfw(options.include_nsfw);

    if let Some(timeout) = options.timeout {
        builder = builder.with_timeout(timeout);
    }
    if let Some(transport) = options.transport {
        builder = builder.with_transport(transport);
    }

    let engine = builder.build()?;
    engine.check_one(username).await
}
