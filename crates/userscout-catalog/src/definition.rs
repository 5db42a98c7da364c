//! Service definition types.
//!
//! A service definition describes how to probe one external site for a
//! username: the profile URL template and the heuristic used to decide
//! whether the profile exists.

use crate::error::{CatalogError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use userscout_core::ServiceName;

/// Token in a URL template that is replaced by the username.
pub const URL_PLACEHOLDER: &str = "{}";

/// Heuristic used to turn an HTTP response into a found/not-found verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum ErrorType {
    /// A 404 means the profile does not exist
    StatusCode,
    /// The body carries an error message when the profile does not exist
    Message,
    /// Anything else; evaluated with the plain status-range fallback
    Other(String),
}

impl ErrorType {
    /// Whether evaluating this heuristic needs the response body.
    #[must_use]
    pub fn needs_body(&self) -> bool {
        matches!(self, Self::Message)
    }
}

impl Default for ErrorType {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for ErrorType {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "status_code" => Self::StatusCode,
            "message" => Self::Message,
            _ => Self::Other(value),
        }
    }
}

impl From<ErrorType> for String {
    fn from(value: ErrorType) -> Self {
        match value {
            ErrorType::StatusCode => "status_code".to_string(),
            ErrorType::Message => "message".to_string(),
            ErrorType::Other(raw) => raw,
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StatusCode => f.write_str("status_code"),
            Self::Message => f.write_str("message"),
            Self::Other(raw) => f.write_str(raw),
        }
    }
}

/// Complete definition of one probed service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceDefinition {
    /// Unique, case-insensitive service name
    pub name: ServiceName,

    /// Profile URL template containing [`URL_PLACEHOLDER`]
    pub url: String,

    /// Service homepage (informational)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_main: Option<String>,

    /// Alternate probe URL from the source data (carried, not used)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_probe: Option<String>,

    /// Evaluation heuristic
    pub error_type: ErrorType,

    /// Body substrings meaning "not found" (only used with [`ErrorType::Message`])
    pub error_messages: Vec<String>,

    /// NSFW flag; absent is treated as `false`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_nsfw: Option<bool>,

    /// Free-form tags
    pub categories: Vec<String>,

    /// Username pattern from the source data (carried, not evaluated)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex_check: Option<String>,

    /// Request method from the source data (carried, probes always GET)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_method: Option<String>,

    /// Request payload from the source data (carried, probes send no body)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_payload: Option<Value>,
}

impl ServiceDefinition {
    /// Create a definition with the given name and URL template and every
    /// other field at its default.
    #[must_use]
    pub fn new(name: ServiceName, url: impl Into<String>) -> Self {
        Self {
            name,
            url: url.into(),
            url_main: None,
            url_probe: None,
            error_type: ErrorType::default(),
            error_messages: Vec::new(),
            is_nsfw: None,
            categories: Vec::new(),
            regex_check: None,
            request_method: None,
            request_payload: None,
        }
    }

    /// Set the evaluation heuristic.
    #[must_use]
    pub fn with_error_type(mut self, error_type: ErrorType) -> Self {
        self.error_type = error_type;
        self
    }

    /// Set the "not found" body messages. Empty strings are dropped.
    #[must_use]
    pub fn with_error_messages<I, S>(mut self, messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.error_messages = messages
            .into_iter()
            .map(Into::into)
            .filter(|m| !m.is_empty())
            .collect();
        self
    }

    /// Set the NSFW flag.
    #[must_use]
    pub fn with_nsfw(mut self, is_nsfw: bool) -> Self {
        self.is_nsfw = Some(is_nsfw);
        self
    }

    /// Set the category tags.
    #[must_use]
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Get the service name.
    #[must_use]
    pub fn name(&self) -> &ServiceName {
        &self.name
    }

    /// Whether the service is flagged NSFW.
    #[must_use]
    pub fn is_nsfw(&self) -> bool {
        self.is_nsfw.unwrap_or(false)
    }

    /// Case-insensitive category membership.
    #[must_use]
    pub fn has_category(&self, category: &str) -> bool {
        let wanted = category.trim().to_lowercase();
        self.categories.iter().any(|c| c.to_lowercase() == wanted)
    }

    /// Validate the definition for completeness.
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(CatalogError::InvalidDefinition {
                name: self.name.to_string(),
                reason: "url cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Build a validated definition from a raw source entry.
    pub(crate) fn from_raw(name: &str, raw: RawServiceDefinition) -> Result<Self> {
        let name = ServiceName::new(name).map_err(|e| CatalogError::InvalidDefinition {
            name: name.to_string(),
            reason: e.to_string(),
        })?;

        let definition = Self {
            name,
            url: raw.url.unwrap_or_default(),
            url_main: raw.url_main,
            url_probe: raw.url_probe,
            error_type: raw.error_type.map(ErrorType::from).unwrap_or_default(),
            error_messages: raw.error_messages,
            is_nsfw: raw.is_nsfw,
            categories: raw.categories.unwrap_or_default(),
            regex_check: raw.regex_check,
            request_method: raw.request_method,
            request_payload: raw.request_payload,
        };

        definition.validate()?;
        Ok(definition)
    }
}

/// One entry as it appears in a definition source.
///
/// Field names are matched case-insensitively: keys are lowercased by
/// [`RawServiceDefinition::from_value`] before decoding.
#[derive(Debug, Deserialize)]
pub(crate) struct RawServiceDefinition {
    #[serde(default)]
    url: Option<String>,

    #[serde(default, rename = "urlmain")]
    url_main: Option<String>,

    #[serde(default, rename = "urlprobe")]
    url_probe: Option<String>,

    #[serde(default, rename = "errortype")]
    error_type: Option<String>,

    #[serde(default, rename = "errormsg", deserialize_with = "deserialize_messages")]
    error_messages: Vec<String>,

    #[serde(default, rename = "regexcheck")]
    regex_check: Option<String>,

    #[serde(default, rename = "isnsfw")]
    is_nsfw: Option<bool>,

    #[serde(default)]
    categories: Option<Vec<String>>,

    #[serde(default)]
    request_method: Option<String>,

    #[serde(default)]
    request_payload: Option<Value>,
}

impl RawServiceDefinition {
    /// Decode one source entry, ignoring the case of its field names.
    ///
    /// When two keys differ only in case, the later one in the entry wins.
    pub(crate) fn from_value(value: Value) -> serde_json::Result<Self> {
        let value = match value {
            Value::Object(fields) => Value::Object(
                fields
                    .into_iter()
                    .map(|(key, field)| (key.to_lowercase(), field))
                    .collect(),
            ),
            other => other,
        };

        serde_json::from_value(value)
    }
}

/// Accept `errorMsg` as a single string or a list of strings.
fn deserialize_messages<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(normalize_messages(value))
}

/// Flatten a string-or-list value into non-empty strings, in source order.
/// Non-string list items and any other shape are ignored.
fn normalize_messages(value: Option<Value>) -> Vec<String> {
    match value {
        Some(Value::String(message)) if !message.is_empty() => vec![message],
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(message) if !message.is_empty() => Some(message),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}
