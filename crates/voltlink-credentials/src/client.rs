//! Wire-level operations against a counterparty's credentials endpoint.

use crate::error::CredentialsError;
use std::sync::Arc;
use voltlink_transport::{HttpClient, HttpMethod, HttpRequest};
use voltlink_types::{Credentials, Envelope};

/// Thin client for the credentials module of one counterparty.
///
/// Parses the envelope and nothing more; interpreting non-success status
/// codes is the caller's job.
pub struct CredentialsClient {
    transport: Arc<dyn HttpClient>,
}

impl CredentialsClient {
    pub fn new(transport: Arc<dyn HttpClient>) -> Self {
        Self { transport }
    }

    fn send<T: serde::de::DeserializeOwned>(
        &self,
        request: HttpRequest,
    ) -> Result<Envelope<T>, CredentialsError> {
        let response = self.transport.send(&request)?;
        Ok(serde_json::from_str(&response.body)?)
    }

    pub fn post(
        &self,
        endpoint_url: &str,
        token: &str,
        credentials: &Credentials,
    ) -> Result<Envelope<Credentials>, CredentialsError> {
        self.send(
            HttpRequest::new(HttpMethod::Post, endpoint_url)
                .with_token(Some(token.to_owned()))
                .with_body(serde_json::to_string(credentials)?),
        )
    }

    pub fn put(
        &self,
        endpoint_url: &str,
        token: &str,
        credentials: &Credentials,
    ) -> Result<Envelope<Credentials>, CredentialsError> {
        self.send(
            HttpRequest::new(HttpMethod::Put, endpoint_url)
                .with_token(Some(token.to_owned()))
                .with_body(serde_json::to_string(credentials)?),
        )
    }

    pub fn delete(
        &self,
        endpoint_url: &str,
        token: &str,
    ) -> Result<Envelope<serde_json::Value>, CredentialsError> {
        self.send(
            HttpRequest::new(HttpMethod::Delete, endpoint_url).with_token(Some(token.to_owned())),
        )
    }
}
