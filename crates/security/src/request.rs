//! Outbound request model

use idstore_core::{Error, Result};
use std::fmt;
use url::Url;

/// HTTP methods the data store issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Header list that preserves insertion order and matches names
/// case-insensitively
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name`, replacing any header with the same name in place
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .0
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(slot) => slot.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Remove `name`, returning its value if it was set
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self
            .0
            .iter()
            .position(|(existing, _)| existing.eq_ignore_ascii_case(name))?;
        Some(self.0.remove(index).1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One outbound call: method, target, query, headers and raw body.
///
/// Query parameters embedded in the href are lifted into `query` so that
/// the signer sees every parameter exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: HttpMethod,
    url: Url,
    pub query: Vec<(String, String)>,
    pub headers: Headers,
    pub body: Option<Vec<u8>>,
}

impl Request {
    /// Build a request for an absolute href
    pub fn new(method: HttpMethod, href: &str) -> Result<Self> {
        let mut url = Url::parse(href)
            .map_err(|e| Error::invalid_request(href, format!("malformed URI: {e}")))?;

        if url.host_str().is_none() {
            return Err(Error::invalid_request(href, "URI has no host"));
        }

        let query = url.query_pairs().into_owned().collect();
        url.set_query(None);
        url.set_fragment(None);

        Ok(Self {
            method,
            url,
            query,
            headers: Headers::new(),
            body: None,
        })
    }

    /// Append query parameters
    pub fn with_query<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Target without query string
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Host header value: `host` or `host:port` for non-default ports
    pub fn host_header(&self) -> Result<String> {
        let host = self
            .url
            .host_str()
            .ok_or_else(|| Error::invalid_request(self.url.as_str(), "URI has no host"))?;

        Ok(match self.url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        })
    }

    /// Target including the query string, as sent on the wire
    pub fn full_url(&self) -> Url {
        let mut url = self.url.clone();
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }
        url
    }

    /// Body bytes, or an empty slice when there is none
    pub fn payload(&self) -> &[u8] {
        self.body.as_deref().unwrap_or_default()
    }
}
