//! Blocking client for the upstream domain registrar API
//!
//! Responses are kept as raw bytes so the proxy can relay them unchanged.

pub mod payload;

use std::io::{self, Read};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

pub use payload::{Addon, PurchasePayload, RegisterRequest, PLACEHOLDER_PRICE};

#[derive(Error, Debug)]
pub enum RegistrarError {
    #[error("Registrar responded with status {status}")]
    Status { status: u16, body: Vec<u8> },

    #[error("Registrar unreachable: {0}")]
    Transport(String),

    #[error("Failed to read registrar response: {0}")]
    Read(#[from] io::Error),
}

impl RegistrarError {
    /// Upstream error body if there was one, otherwise the error message.
    /// Used for server-side logging.
    pub fn detail(&self) -> String {
        match self {
            RegistrarError::Status { body, .. } if !body.is_empty() => {
                String::from_utf8_lossy(body).into_owned()
            }
            other => other.to_string(),
        }
    }
}

/// A successful upstream response
#[derive(Debug, Clone, PartialEq)]
pub struct Upstream {
    pub status: u16,
    pub body: Vec<u8>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckAvailability<'a> {
    domain_names: &'a [String],
}

#[derive(Clone)]
pub struct RegistrarClient {
    base_url: String,
    auth_header: String,
    agent: ureq::Agent,
}

impl RegistrarClient {
    pub fn new(base_url: impl Into<String>, auth_header: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            auth_header: auth_header.into(),
            agent: ureq::AgentBuilder::new().build(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Bulk availability lookup
    pub fn check_availability(&self, domain_names: &[String]) -> Result<Upstream, RegistrarError> {
        let url = format!("{}/domains:checkAvailability", self.base_url);
        debug!("Checking {} domains", domain_names.len());
        self.send(self.agent.post(&url), Some(&CheckAvailability { domain_names }))
    }

    /// TLD pricing list
    pub fn tlds(&self) -> Result<Upstream, RegistrarError> {
        let url = format!("{}/tlds", self.base_url);
        self.send::<()>(self.agent.get(&url), None)
    }

    /// Purchase a domain
    pub fn register(&self, payload: &PurchasePayload) -> Result<Upstream, RegistrarError> {
        let url = format!("{}/domains", self.base_url);
        debug!("Registering {}", payload.domain.domain_name);
        self.send(self.agent.post(&url), Some(payload))
    }

    fn send<T: Serialize>(
        &self,
        request: ureq::Request,
        body: Option<&T>,
    ) -> Result<Upstream, RegistrarError> {
        let request = request.set("Authorization", &self.auth_header);
        let result = match body {
            Some(json) => request.send_json(json),
            None => request.call(),
        };

        match result {
            Ok(response) => {
                let status = response.status();
                let body = read_body(response)?;
                Ok(Upstream { status, body })
            }
            Err(ureq::Error::Status(status, response)) => {
                let body = read_body(response).unwrap_or_default();
                Err(RegistrarError::Status { status, body })
            }
            Err(ureq::Error::Transport(transport)) => {
                Err(RegistrarError::Transport(transport.to_string()))
            }
        }
    }
}

fn read_body(response: ureq::Response) -> io::Result<Vec<u8>> {
    let mut body = Vec::new();
    response.into_reader().read_to_end(&mut body)?;
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let client = RegistrarClient::new("https://api.example.test/core/v1/", "Basic x");
        assert_eq!(client.base_url(), "https://api.example.test/core/v1");
    }

    #[test]
    fn availability_body_shape() {
        let names = vec!["example.com".to_string(), "example.io".to_string()];
        let json = serde_json::to_string(&CheckAvailability { domain_names: &names }).unwrap();
        assert_eq!(json, r#"{"domainNames":["example.com","example.io"]}"#);
    }

    #[test]
    fn detail_prefers_upstream_body() {
        let err = RegistrarError::Status {
            status: 402,
            body: br#"{"error":"insufficient_funds"}"#.to_vec(),
        };
        assert_eq!(err.detail(), r#"{"error":"insufficient_funds"}"#);

        let empty = RegistrarError::Status { status: 503, body: Vec::new() };
        assert_eq!(empty.detail(), "Registrar responded with status 503");
    }

    #[test]
    fn unreachable_registrar_is_transport_error() {
        let client = RegistrarClient::new("http://127.0.0.1:1", "Basic x");
        match client.tlds() {
            Err(RegistrarError::Transport(_)) => {}
            other => panic!("expected transport error, got {other:?}"),
        }
    }
}
