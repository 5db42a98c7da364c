//! Found/not-found verdicts from an observed HTTP response.

use userscout_catalog::{ErrorType, ServiceDefinition};

/// Decide whether a profile exists given the response to its probe.
///
/// - `status_code`: 404 is not found, any 2xx/3xx is found, everything else
///   is not found.
/// - `message`: a non-empty body containing any configured error message
///   (case-insensitive) is not found; otherwise found iff 2xx/3xx.
/// - anything else: found iff 2xx/3xx, body ignored.
#[must_use]
pub fn evaluate(definition: &ServiceDefinition, status: u16, body: Option<&str>) -> bool {
    match definition.error_type {
        ErrorType::StatusCode => status != 404 && is_success(status),
        ErrorType::Message => {
            !contains_error_message(definition, body.unwrap_or_default()) && is_success(status)
        }
        ErrorType::Other(_) => is_success(status),
    }
}

fn is_success(status: u16) -> bool {
    (200..400).contains(&status)
}

fn contains_error_message(definition: &ServiceDefinition, body: &str) -> bool {
    if body.is_empty() {
        return false;
    }

    let body = body.to_lowercase();
    definition
        .error_messages
        .iter()
        .filter(|message| !message.is_empty())
        .any(|message| body.contains(&message.to_lowercase()))
}
