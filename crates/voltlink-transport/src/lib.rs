//! The request/response call abstraction the trust engine talks through.
//!
//! The core never opens sockets itself: every outbound exchange goes
//! through the [`HttpClient`] trait, so tests can wire two platforms
//! together in-process while production uses the blocking `reqwest`
//! implementation. Retries, TLS, and connection pooling are transport
//! concerns and stay behind this seam; the core performs no implicit
//! retry on a transport fault.

use thiserror::Error;

/// HTTP methods the protocol uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// One outbound protocol call.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    /// Bearer token identifying the caller. Absent only when the caller
    /// genuinely holds no token; the receiver rejects such calls itself.
    pub token: Option<String>,
    /// JSON body, if any.
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            token: None,
            body: None,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }
}

/// The raw response to an outbound call.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Transport-level failures: connection errors, timeouts, malformed URLs.
///
/// Opaque to the core; protocol-level failures travel inside the envelope
/// body of a successful transport exchange instead.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("transport error: {0}")]
    Other(String),
}

/// Synchronous request/response transport.
pub trait HttpClient: Send + Sync {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Blocking `reqwest` implementation of [`HttpClient`].
pub struct ReqwestHttpClient {
    client: reqwest::blocking::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestHttpClient {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
            HttpMethod::Put => self.client.put(&request.url),
            HttpMethod::Delete => self.client.delete(&request.url),
        };

        if let Some(token) = &request.token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder
                .header("Content-Type", "application/json")
                .body(body.clone());
        }

        tracing::debug!(
            method = request.method.as_str(),
            url = %request.url,
            "sending protocol request"
        );

        let response = builder.send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder_sets_fields() {
        let request = HttpRequest::new(HttpMethod::Post, "https://peer.example/credentials")
            .with_token(Some("tok".into()))
            .with_body("{}".into());
        assert_eq!(request.method.as_str(), "POST");
        assert_eq!(request.token.as_deref(), Some("tok"));
        assert_eq!(request.body.as_deref(), Some("{}"));
    }
}
