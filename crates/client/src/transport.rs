//! The HTTP boundary of the data store

use idstore_core::{Error, Result};
use idstore_security::{Headers, HttpMethod, Request};
use std::time::Duration;
use tracing::debug;

/// Raw response handed back by a transport
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: Headers,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_error(&self) -> bool {
        !self.is_success()
    }
}

/// Executes one signed request.
///
/// Implementations own connection handling, TLS, timeouts and any retry
/// policy; failures are reported as `Error::Transport`.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &Request) -> Result<Response>;
}

/// Blocking HTTP transport backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(30))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::transport("client", e))?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: &Request) -> Result<Response> {
        let url = request.full_url();
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, url.clone());
        for (name, value) in request.headers.iter() {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder
            .send()
            .map_err(|e| Error::transport(url.as_str(), e))?;

        let status = response.status().as_u16();
        let mut headers = Headers::new();
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                headers.insert(name.as_str(), value);
            }
        }
        let body = response
            .bytes()
            .map_err(|e| Error::transport(url.as_str(), e))?
            .to_vec();

        debug!(method = %request.method, %url, status, bytes = body.len(), "HTTP exchange");

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}
