//! Client configuration: credential, base URL and cache settings
//!
//! `ClientConfig` is immutable once built and is consumed by the data store
//! builder. Construction validates everything a signed request depends on so
//! that configuration mistakes surface before the first network call.

use idstore_core::{ApiKey, Error, Result, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

/// Default time-to-live for cached resources
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);
/// Default time-to-idle for cached resources
pub const DEFAULT_TTI: Duration = Duration::from_secs(300);

/// Fully validated client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Credential used to sign every request
    pub api_key: ApiKey,
    /// Base URL relative hrefs are resolved against
    pub base_url: Url,
    /// Cache behaviour
    pub cache: CacheSettings,
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }
}

/// Expiration policy overrides for one cache region
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSettings {
    #[serde(default, with = "optional_secs")]
    pub ttl: Option<Duration>,
    #[serde(default, with = "optional_secs")]
    pub tti: Option<Duration>,
}

/// Cache configuration shared by every region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Whether responses are cached at all
    pub enabled: bool,
    /// Time-to-live applied to regions without an override
    #[serde(with = "secs")]
    pub default_ttl: Duration,
    /// Time-to-idle applied to regions without an override
    #[serde(with = "secs")]
    pub default_tti: Duration,
    /// Per-region overrides, keyed by region name
    pub regions: BTreeMap<String, RegionSettings>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            default_ttl: DEFAULT_TTL,
            default_tti: DEFAULT_TTI,
            regions: BTreeMap::new(),
        }
    }
}

impl CacheSettings {
    /// Caching switched off entirely
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Resolved `(ttl, tti)` for a region
    pub fn expiration_for(&self, region: &str) -> (Duration, Duration) {
        let overrides = self.regions.get(region).copied().unwrap_or_default();
        (
            overrides.ttl.unwrap_or(self.default_ttl),
            overrides.tti.unwrap_or(self.default_tti),
        )
    }

    /// Register an override for a region
    pub fn with_region(mut self, name: impl Into<String>, settings: RegionSettings) -> Self {
        self.regions.insert(name.into(), settings);
        self
    }
}

/// Builder for creating client configurations
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    api_key_id: Option<String>,
    api_key_secret: Option<String>,
    base_url: Option<String>,
    cache: CacheSettings,
}

impl ClientConfigBuilder {
    /// Create a new builder with default cache settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn api_key(mut self, id: impl Into<String>, secret: impl Into<String>) -> Self {
        self.api_key_id = Some(id.into());
        self.api_key_secret = Some(secret.into());
        self
    }

    pub fn api_key_id(mut self, id: impl Into<String>) -> Self {
        self.api_key_id = Some(id.into());
        self
    }

    pub fn api_key_secret(mut self, secret: impl Into<String>) -> Self {
        self.api_key_secret = Some(secret.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn cache(mut self, cache: CacheSettings) -> Self {
        self.cache = cache;
        self
    }

    pub fn cache_enabled(mut self, enabled: bool) -> Self {
        self.cache.enabled = enabled;
        self
    }

    pub fn default_ttl(mut self, ttl: Duration) -> Self {
        self.cache.default_ttl = ttl;
        self
    }

    pub fn default_tti(mut self, tti: Duration) -> Self {
        self.cache.default_tti = tti;
        self
    }

    /// Validate and build the configuration
    pub fn build(self) -> Result<ClientConfig> {
        let id = self
            .api_key_id
            .ok_or_else(|| Error::configuration("API key id is not configured"))?;
        let secret = self
            .api_key_secret
            .ok_or_else(|| Error::configuration("API key secret is not configured"))?;
        let api_key = ApiKey::new(id, secret)?;

        let base_url = parse_base_url(self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;

        Ok(ClientConfig {
            api_key,
            base_url,
            cache: self.cache,
        })
    }
}

/// Parse and validate a service base URL
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed)
        .map_err(|e| Error::configuration(format!("invalid base URL '{raw}': {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::configuration(format!(
            "base URL '{raw}' must use http or https"
        )));
    }
    if url.host_str().is_none() {
        return Err(Error::configuration(format!(
            "base URL '{raw}' has no host"
        )));
    }

    Ok(url)
}

mod secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

mod optional_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(duration) => serializer.serialize_some(&duration.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Option::<u64>::deserialize(deserializer).map(|secs| secs.map(Duration::from_secs))
    }
}
