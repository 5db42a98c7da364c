#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use userscout_catalog::{ErrorType, ServiceDefinition, ServiceRegistry};
use userscout_core::ServiceName;
use userscout_probe::{HttpTransport, TransportError, TransportResponse};

/// Scripted reply for one URL.
#[derive(Debug, Clone)]
pub enum Reply {
    Respond {
        status: u16,
        body: String,
        delay: Duration,
    },
    Fail(TransportError),
}

impl Reply {
    pub fn status(status: u16) -> Self {
        Self::Respond {
            status,
            body: String::new(),
            delay: Duration::ZERO,
        }
    }

    pub fn body(status: u16, body: &str) -> Self {
        Self::Respond {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(status: u16, delay: Duration) -> Self {
        Self::Respond {
            status,
            body: String::new(),
            delay,
        }
    }
}

/// In-memory transport answering from a per-URL script.
///
/// Unscripted URLs answer 404. Every request is counted and recorded along
/// with whether the body was asked for.
pub struct ScriptedTransport {
    replies: HashMap<String, Reply>,
    requests: AtomicUsize,
    seen: Mutex<Vec<(String, bool)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            replies: HashMap::new(),
            requests: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn reply(mut self, url: &str, reply: Reply) -> Self {
        self.replies.insert(url.to_string(), reply);
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<(String, bool)> {
        self.seen.lock().expect("seen lock").clone()
    }

    pub fn body_requested(&self, url: &str) -> Option<bool> {
        self.seen()
            .into_iter()
            .find(|(seen, _)| seen == url)
            .map(|(_, read_body)| read_body)
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get(&self, url: &str, read_body: bool) -> Result<TransportResponse, TransportError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .expect("seen lock")
            .push((url.to_string(), read_body));

        match self.replies.get(url).cloned().unwrap_or(Reply::status(404)) {
            Reply::Respond {
                status,
                body,
                delay,
            } => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok(TransportResponse {
                    status,
                    body: read_body.then_some(body),
                })
            }
            Reply::Fail(error) => Err(error),
        }
    }
}

pub fn service(name: &str, error_type: ErrorType) -> ServiceDefinition {
    ServiceDefinition::new(
        ServiceName::new(name).expect("valid name"),
        format!("https://{}.example/{{}}", name.to_lowercase()),
    )
    .with_error_type(error_type)
}

pub fn url(service: &str, username: &str) -> String {
    format!("https://{}.example/{username}", service.to_lowercase())
}

/// Four status-code services, one of them NSFW, and one message service.
pub fn registry() -> ServiceRegistry {
    ServiceRegistry::from_definitions([
        service("alpha", ErrorType::StatusCode),
        service("beta", ErrorType::StatusCode),
        service("gamma", ErrorType::StatusCode),
        service("delta", ErrorType::StatusCode).with_nsfw(true),
        service("Forum", ErrorType::Message)
            .with_error_messages(["No such user", "Page not found"]),
    ])
}
