use userscout_catalog::{ServiceDefinition, URL_PLACEHOLDER};

/// Substitute `username` into the service's profile URL template.
///
/// The username is inserted as given; only the caller's emptiness check
/// looks at surrounding whitespace.
#[must_use]
pub fn build_profile_url(definition: &ServiceDefinition, username: &str) -> String {
    definition.url.replace(URL_PLACEHOLDER, username)
}
