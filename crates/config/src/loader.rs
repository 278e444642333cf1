//! Configuration loader for idstore
//!
//! Resolves a `ClientConfig` with the following precedence, lowest first:
//! built-in defaults, an `apiKey.properties` file, environment variables, and
//! finally values set explicitly on the loader.

use crate::config::{ClientConfig, ClientConfigBuilder};
use crate::properties::parse_properties;
use idstore_core::{
    constants::{
        API_KEY_FILE_NAME, API_KEY_ID_PROPERTY, API_KEY_SECRET_PROPERTY,
        IDSTORE_API_KEY_FILE_VAR, IDSTORE_API_KEY_ID_VAR, IDSTORE_API_KEY_SECRET_VAR,
        IDSTORE_BASE_URL_VAR, IDSTORE_CACHE_ENABLED_VAR, IDSTORE_CACHE_TTI_VAR,
        IDSTORE_CACHE_TTL_VAR,
    },
    Error, Result,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Configuration loader that handles precedence
#[derive(Debug, Default)]
pub struct ClientConfigLoader {
    /// Explicit properties file, bypassing discovery
    api_key_file: Option<PathBuf>,
    /// Explicit base URL, overriding everything else
    base_url: Option<String>,
    /// Whether the default `~/.idstore/apiKey.properties` is consulted
    skip_default_file: bool,
}

impl ClientConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the credential from this properties file
    pub fn api_key_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.api_key_file = Some(path.into());
        self
    }

    /// Override the base URL
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Do not look for a properties file in the home directory
    pub fn skip_default_file(mut self, skip: bool) -> Self {
        self.skip_default_file = skip;
        self
    }

    /// Load the configuration
    pub fn load(self) -> Result<ClientConfig> {
        let mut builder = ClientConfig::builder();

        if let Some(path) = self.properties_file() {
            builder = Self::apply_properties_file(builder, &path)?;
        }

        builder = Self::apply_env(builder)?;

        if let Some(base_url) = self.base_url {
            builder = builder.base_url(base_url);
        }

        builder.build()
    }

    /// Location of the properties file to read, if any
    fn properties_file(&self) -> Option<PathBuf> {
        if let Some(path) = &self.api_key_file {
            return Some(path.clone());
        }
        if let Ok(path) = std::env::var(IDSTORE_API_KEY_FILE_VAR) {
            return Some(PathBuf::from(path));
        }
        if self.skip_default_file {
            return None;
        }

        dirs::home_dir()
            .map(|home| home.join(".idstore").join(API_KEY_FILE_NAME))
            .filter(|path| path.is_file())
    }

    fn apply_properties_file(
        mut builder: ClientConfigBuilder,
        path: &Path,
    ) -> Result<ClientConfigBuilder> {
        debug!(path = %path.display(), "Reading API key properties");

        let content =
            fs::read_to_string(path).map_err(|e| Error::file_system(path, "read API key file", e))?;
        let props = parse_properties(&content);

        if let Some(id) = props.get(API_KEY_ID_PROPERTY) {
            builder = builder.api_key_id(id.clone());
        }
        if let Some(secret) = props.get(API_KEY_SECRET_PROPERTY) {
            builder = builder.api_key_secret(secret.clone());
        }

        Ok(builder)
    }

    fn apply_env(mut builder: ClientConfigBuilder) -> Result<ClientConfigBuilder> {
        if let Ok(id) = std::env::var(IDSTORE_API_KEY_ID_VAR) {
            builder = builder.api_key_id(id);
        }
        if let Ok(secret) = std::env::var(IDSTORE_API_KEY_SECRET_VAR) {
            builder = builder.api_key_secret(secret);
        }
        if let Ok(base_url) = std::env::var(IDSTORE_BASE_URL_VAR) {
            builder = builder.base_url(base_url);
        }
        if let Ok(enabled) = std::env::var(IDSTORE_CACHE_ENABLED_VAR) {
            builder = builder.cache_enabled(parse_bool(IDSTORE_CACHE_ENABLED_VAR, &enabled)?);
        }
        if let Ok(ttl) = std::env::var(IDSTORE_CACHE_TTL_VAR) {
            builder = builder.default_ttl(parse_secs(IDSTORE_CACHE_TTL_VAR, &ttl)?);
        }
        if let Ok(tti) = std::env::var(IDSTORE_CACHE_TTI_VAR) {
            builder = builder.default_tti(parse_secs(IDSTORE_CACHE_TTI_VAR, &tti)?);
        }

        Ok(builder)
    }
}

fn parse_bool(variable: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::configuration(format!(
            "{variable} must be a boolean, got '{other}'"
        ))),
    }
}

fn parse_secs(variable: &str, value: &str) -> Result<Duration> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| Error::configuration(format!("{variable} must be a number of seconds")))
}
