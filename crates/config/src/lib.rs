//! Configuration for the idstore client
//!
//! Holds the credential, the service base URL and the cache settings the
//! data store is constructed from, and loads them from an `apiKey.properties`
//! file and the environment.

pub mod config;
pub mod loader;
pub mod properties;

pub use config::{CacheSettings, ClientConfig, ClientConfigBuilder, RegionSettings};
pub use loader::ClientConfigLoader;
pub use properties::parse_properties;
