#![allow(clippy::must_use_candidate)]

use std::collections::BTreeSet;
use userscout_catalog::{ServiceDefinition, ServiceRegistry};
use userscout_core::ServiceName;

/// Which services a check call probes.
///
/// A service is selected iff NSFW services are included or it is not flagged
/// NSFW, and the allow-list is empty or names it (case-insensitively).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceSelection {
    allow_list: BTreeSet<ServiceName>,
    include_nsfw: bool,
}

impl ServiceSelection {
    /// Build a selection from an allow-list. Blank names are ignored.
    pub fn new<I, S>(services: I, include_nsfw: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let allow_list = services
            .into_iter()
            .filter_map(|name| ServiceName::new(name).ok())
            .collect();

        Self {
            allow_list,
            include_nsfw,
        }
    }

    /// Selection that probes every safe-for-work service.
    pub fn all() -> Self {
        Self::default()
    }

    /// Names on the allow-list; empty means every service.
    pub fn allow_list(&self) -> &BTreeSet<ServiceName> {
        &self.allow_list
    }

    pub fn matches(&self, definition: &ServiceDefinition) -> bool {
        (self.include_nsfw || !definition.is_nsfw())
            && (self.allow_list.is_empty() || self.allow_list.contains(&definition.name))
    }

    /// Selected definitions in case-insensitive name order.
    pub fn select<'a>(&self, registry: &'a ServiceRegistry) -> Vec<&'a ServiceDefinition> {
        registry.iter().filter(|def| self.matches(def)).collect()
    }

    /// Allow-listed names the registry does not know about.
    pub fn unknown_names(&self, registry: &ServiceRegistry) -> Vec<ServiceName> {
        self.allow_list
            .iter()
            .filter(|name| !registry.contains(name.as_str()))
            .cloned()
            .collect()
    }
}

/// Split a comma-separated service list, trimming entries and dropping empties.
pub fn parse_service_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(name: &str, nsfw: bool) -> ServiceDefinition {
        ServiceDefinition::new(
            ServiceName::new(name).expect("valid name"),
            format!("https://{name}.example/{{}}"),
        )
        .with_nsfw(nsfw)
    }

    fn registry() -> ServiceRegistry {
        ServiceRegistry::from_definitions([
            definition("alpha", false),
            definition("Beta", false),
            definition("gamma", false),
            definition("Delta", true),
        ])
    }

    fn names(selected: &[&ServiceDefinition]) -> Vec<String> {
        selected.iter().map(|def| def.name.to_string()).collect()
    }

    #[test]
    fn test_all_excludes_nsfw() {
        let registry = registry();
        let selected = ServiceSelection::all().select(&registry);
        assert_eq!(names(&selected), vec!["alpha", "Beta", "gamma"]);
    }

    #[test]
    fn test_include_nsfw() {
        let registry = registry();
        let selected = ServiceSelection::new(Vec::<String>::new(), true).select(&registry);
        assert_eq!(selected.len(), 4);
    }

    #[test]
    fn test_allow_list_restricts_selection() {
        let registry = registry();
        let selected = ServiceSelection::new(["gamma"], false).select(&registry);
        assert_eq!(names(&selected), vec!["gamma"]);
    }

    #[test]
    fn test_allow_list_case_insensitive() {
        let registry = registry();
        let selected = ServiceSelection::new(["BETA", "Alpha"], false).select(&registry);
        assert_eq!(names(&selected), vec!["alpha", "Beta"]);
    }

    #[test]
    fn test_allow_list_does_not_override_nsfw_flag() {
        let registry = registry();
        assert!(ServiceSelection::new(["delta"], false)
            .select(&registry)
            .is_empty());
        assert_eq!(
            ServiceSelection::new(["delta"], true).select(&registry).len(),
            1
        );
    }

    #[test]
    fn test_blank_allow_list_entries_ignored() {
        let selection = ServiceSelection::new(["", "  "], false);
        assert!(selection.allow_list().is_empty());
        assert_eq!(selection.select(&registry()).len(), 3);
    }

    #[test]
    fn test_unknown_names() {
        let selection = ServiceSelection::new(["alpha", "myspace"], false);
        let unknown = selection.unknown_names(&registry());
        assert_eq!(unknown.len(), 1);
        assert_eq!(unknown[0].as_str(), "myspace");
    }

    #[test]
    fn test_parse_service_list() {
        assert_eq!(
            parse_service_list(" github, Reddit ,,gitlab "),
            vec!["github", "Reddit", "gitlab"]
        );
        assert!(parse_service_list("").is_empty());
        assert!(parse_service_list(" , ").is_empty());
    }
}
