//! The data store: signed, cached access to remote resources

use crate::invalidation::{stale_on_save, DeleteInvalidation};
use crate::qualifier::HrefQualifier;
use crate::resource::{Resource, ResourceKind};
use crate::transport::{HttpTransport, Response, Transport};
use crate::walk::cache_walk;
use idstore_cache::{CacheManager, CacheStats};
use idstore_config::ClientConfig;
use idstore_core::{
    href_of, ApiKey, Clock, Error, NonceGenerator, ProtocolError, ResourceGraph, Result,
    SystemClock, UuidNonceGenerator, USER_AGENT_PREFIX,
};
use idstore_security::{HttpMethod, Request, Sauthc1Signer};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

const ACCEPT_HEADER: &str = "Accept";
const CONTENT_TYPE_HEADER: &str = "Content-Type";
const USER_AGENT_HEADER: &str = "User-Agent";
const APPLICATION_JSON: &str = "application/json";
const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Single authorized, cache-coherent access point to the remote service.
///
/// Every request is signed with the configured API key. Successful responses
/// are normalized into the owned `CacheManager`; writes and deletes evict the
/// entries they make stale. The store is `Send + Sync` and can be shared
/// between threads behind an `Arc`.
pub struct DataStore {
    api_key: ApiKey,
    qualifier: HrefQualifier,
    delete_rule: DeleteInvalidation,
    signer: Sauthc1Signer,
    transport: Arc<dyn Transport>,
    cache: CacheManager,
    user_agent: String,
}

impl fmt::Debug for DataStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataStore")
            .field("api_key", &self.api_key)
            .field("base_url", &self.qualifier.base_url())
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl DataStore {
    pub fn builder() -> DataStoreBuilder {
        DataStoreBuilder::new()
    }

    /// Base URL relative hrefs are resolved against
    pub fn base_url(&self) -> &str {
        self.qualifier.base_url()
    }

    /// Fetch the resource at `href`. Cached copies are returned without any
    /// network activity.
    pub fn fetch(&self, href: &str, query: &[(&str, &str)]) -> Result<ResourceGraph> {
        let href = self.qualifier.qualify(href);
        let graph = self.execute_request(HttpMethod::Get, &href, None, query)?;
        Ok(graph.unwrap_or_default())
    }

    /// Fetch the resource at `href` as a `Resource` of `kind`
    pub fn fetch_resource(
        &self,
        kind: ResourceKind,
        href: &str,
        query: &[(&str, &str)],
    ) -> Result<Resource> {
        self.fetch(href, query)
            .map(|graph| Resource::from_graph(kind, graph))
    }

    /// Create `resource` in the collection at `parent_href`. `options` are
    /// sent as query parameters. Server-assigned properties are merged back
    /// into `resource`.
    pub fn create(
        &self,
        parent_href: &str,
        resource: &mut Resource,
        options: &[(&str, &str)],
    ) -> Result<ResourceGraph> {
        let href = self.qualifier.qualify(parent_href);
        let result = self.save_resource(&href, resource, options)?;

        if !resource.descriptor().provider_account_access {
            resource.set_properties(result.clone());
        }
        Ok(result)
    }

    /// Persist pending changes of an existing resource
    pub fn save(&self, resource: &mut Resource) -> Result<ResourceGraph> {
        let href = resource.href().map(str::to_string).ok_or_else(|| {
            Error::validation(
                "save may only be called on resources that have already been persisted (they must have an href)",
            )
        })?;

        let href = self.qualifier.qualify(&href);
        debug!(
            %href,
            kind = %resource.kind(),
            changed = ?resource.dirty_properties().collect::<Vec<_>>(),
            "Saving resource"
        );
        let result = self.save_resource(&href, resource, &[])?;
        resource.set_properties(result.clone());
        Ok(result)
    }

    /// Delete `resource`, or only its `property` when given
    pub fn delete(&self, resource: &Resource, property: Option<&str>) -> Result<()> {
        let href = resource
            .href()
            .ok_or_else(|| Error::validation("cannot delete a resource without an href"))?;

        let href = match property {
            Some(property) => format!("{href}/{property}"),
            None => href.to_string(),
        };
        let href = self.qualifier.qualify(&href);

        self.execute_request(HttpMethod::Delete, &href, None, &[])?;
        self.evict(&self.delete_rule.stale_on_delete(&href));
        Ok(())
    }

    /// POST an arbitrary JSON body. Skips cache lookup and eviction rules;
    /// the response is still normalized into the cache.
    pub fn raw_request(&self, href: &str, body: &Value) -> Result<ResourceGraph> {
        let href = self.qualifier.qualify(href);
        let payload = serde_json::to_vec(body)?;

        let mut request = Request::new(HttpMethod::Post, &href)?.with_body(payload);
        self.apply_default_headers(&mut request);

        let response = self.send(request)?;
        let mut graph = into_graph(decode_body(&response)?);
        if href_of(&graph).is_some() {
            cache_walk(&mut graph, &self.cache);
        }
        Ok(graph)
    }

    /// Statistics of every cache region used so far
    pub fn cache_stats(&self) -> BTreeMap<String, CacheStats> {
        self.cache.stats()
    }

    pub fn cache(&self) -> &CacheManager {
        &self.cache
    }

    fn save_resource(
        &self,
        href: &str,
        resource: &Resource,
        query: &[(&str, &str)],
    ) -> Result<ResourceGraph> {
        for stale in stale_on_save(resource) {
            self.evict(&self.qualifier.qualify(&stale));
        }

        let graph = self.execute_request(HttpMethod::Post, href, Some(resource), query)?;
        Ok(graph.unwrap_or_default())
    }

    fn execute_request(
        &self,
        method: HttpMethod,
        href: &str,
        resource: Option<&Resource>,
        query: &[(&str, &str)],
    ) -> Result<Option<ResourceGraph>> {
        if method == HttpMethod::Get {
            if let Some(graph) = self.cached(href) {
                return Ok(Some(graph));
            }
        }

        let mut request = Request::new(method, href)?.with_query(query.iter().copied());
        if let Some(resource) = resource {
            request = request.with_body(resource.encode_body()?);
        }

        match resource {
            Some(resource) if resource.descriptor().form_data => {
                request.headers.insert(CONTENT_TYPE_HEADER, FORM_URLENCODED);
                request.headers.insert(USER_AGENT_HEADER, self.user_agent.as_str());
            }
            _ => self.apply_default_headers(&mut request),
        }

        let response = self.send(request)?;
        let mut result = decode_body(&response)?;

        if resource.is_some_and(|r| r.descriptor().provider_account_access) {
            result = json!({
                "isNewAccount": response.status == 201,
                "account": result,
            });
        }

        if method == HttpMethod::Delete {
            return Ok(None);
        }

        let mut graph = into_graph(result);
        let mapping_rules = resource.is_some_and(|r| r.descriptor().mapping_rules);
        if href_of(&graph).is_some() && !mapping_rules {
            cache_walk(&mut graph, &self.cache);
        }
        Ok(Some(graph))
    }

    /// Sign and execute `request`, turning error statuses into
    /// `Error::Protocol`
    fn send(&self, mut request: Request) -> Result<Response> {
        self.signer.sign(&mut request, &self.api_key)?;

        debug!(method = %request.method, url = %request.url(), "Sending request");
        let response = self.transport.execute(&request)?;

        if response.is_error() {
            let body = decode_body(&response).unwrap_or(Value::Null);
            let error = ProtocolError::from_body(response.status, &body);
            debug!(
                status = error.status,
                code = error.code,
                request_id = %error.request_id,
                "Request rejected"
            );
            return Err(error.into());
        }

        Ok(response)
    }

    fn apply_default_headers(&self, request: &mut Request) {
        request.headers.insert(ACCEPT_HEADER, APPLICATION_JSON);
        request.headers.insert(USER_AGENT_HEADER, self.user_agent.as_str());
        if !request.payload().is_empty() {
            request.headers.insert(CONTENT_TYPE_HEADER, APPLICATION_JSON);
        }
    }

    fn cached(&self, href: &str) -> Option<ResourceGraph> {
        let key = strip_query(href);
        let region = self.cache.region_for_href(key)?;
        match region.get(key)? {
            Value::Object(graph) => {
                trace!(href = key, region = region.name(), "Serving from cache");
                Some(graph)
            }
            _ => None,
        }
    }

    fn evict(&self, href: &str) {
        if let Some(region) = self.cache.region_for_href(href) {
            if region.delete(href) {
                debug!(href, region = region.name(), "Evicted cache entry");
            }
        }
    }
}

fn strip_query(href: &str) -> &str {
    href.split_once('?').map_or(href, |(path, _)| path)
}

/// Empty bodies decode to `null`
fn decode_body(response: &Response) -> Result<Value> {
    if response.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(&response.body)?)
}

fn into_graph(value: Value) -> ResourceGraph {
    match value {
        Value::Object(graph) => graph,
        _ => ResourceGraph::new(),
    }
}

fn default_user_agent() -> String {
    format!(
        "{USER_AGENT_PREFIX}/{} rust {}/{}",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// Builder for `DataStore`. Everything except the configuration has a
/// production default.
#[derive(Default)]
pub struct DataStoreBuilder {
    config: Option<ClientConfig>,
    transport: Option<Arc<dyn Transport>>,
    clock: Option<Arc<dyn Clock>>,
    nonces: Option<Arc<dyn NonceGenerator>>,
    user_agent: Option<String>,
}

impl DataStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Clock used for request timestamps and cache expiry
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn nonce_generator(mut self, nonces: Arc<dyn NonceGenerator>) -> Self {
        self.nonces = Some(nonces);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn build(self) -> Result<DataStore> {
        let config = self
            .config
            .ok_or_else(|| Error::configuration("data store requires a client configuration"))?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new()?),
        };
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let nonces = self
            .nonces
            .unwrap_or_else(|| Arc::new(UuidNonceGenerator));

        let cache = CacheManager::with_clock(config.cache, Arc::clone(&clock))?;
        let qualifier = HrefQualifier::new(&config.base_url);
        let delete_rule = DeleteInvalidation::new(qualifier.base_url())?;

        debug!(base_url = qualifier.base_url(), "Data store initialised");

        Ok(DataStore {
            api_key: config.api_key,
            qualifier,
            delete_rule,
            signer: Sauthc1Signer::new(clock, nonces),
            transport,
            cache,
            user_agent: self.user_agent.unwrap_or_else(default_user_agent),
        })
    }
}
