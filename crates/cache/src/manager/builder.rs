//! Cache manager builder and initialization

use super::CacheManager;
use idstore_config::{CacheSettings, RegionSettings};
use idstore_core::{Clock, Result, SystemClock};
use std::sync::Arc;
use std::time::Duration;

/// Builder for CacheManager
#[derive(Debug)]
pub struct CacheManagerBuilder {
    settings: CacheSettings,
    clock: Option<Arc<dyn Clock>>,
}

impl CacheManagerBuilder {
    pub fn new() -> Self {
        Self {
            settings: CacheSettings::default(),
            clock: None,
        }
    }

    pub fn with_settings(mut self, settings: CacheSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.settings.enabled = enabled;
        self
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.settings.default_ttl = ttl;
        self
    }

    pub fn with_default_tti(mut self, tti: Duration) -> Self {
        self.settings.default_tti = tti;
        self
    }

    pub fn with_region(mut self, name: impl Into<String>, settings: RegionSettings) -> Self {
        self.settings.regions.insert(name.into(), settings);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Validate the settings and build the manager
    pub fn build(self) -> Result<CacheManager> {
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        CacheManager::with_clock(self.settings, clock)
    }
}

impl Default for CacheManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
