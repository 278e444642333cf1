//! Cache manager owning the regions of one data store

mod builder;
mod statistics;

pub use builder::CacheManagerBuilder;
pub use statistics::CacheStats;

use crate::region::CacheRegion;
use crate::regions::{is_known_region, region_name_for, validate_region_names};
use dashmap::DashMap;
use idstore_config::CacheSettings;
use idstore_core::{Clock, Result, SystemClock};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Owns the named regions of one data store and creates them on demand
#[derive(Debug)]
pub struct CacheManager {
    settings: CacheSettings,
    clock: Arc<dyn Clock>,
    regions: DashMap<String, Arc<CacheRegion>>,
}

impl CacheManager {
    /// Create a manager backed by the system clock
    pub fn new(settings: CacheSettings) -> Result<Self> {
        Self::with_clock(settings, Arc::new(SystemClock))
    }

    /// Create a manager whose regions age entries with `clock`
    pub fn with_clock(settings: CacheSettings, clock: Arc<dyn Clock>) -> Result<Self> {
        validate_region_names(settings.regions.keys().map(String::as_str))?;

        debug!(
            enabled = settings.enabled,
            default_ttl = ?settings.default_ttl,
            default_tti = ?settings.default_tti,
            overrides = settings.regions.len(),
            "Cache manager initialised"
        );

        Ok(Self {
            settings,
            clock,
            regions: DashMap::new(),
        })
    }

    pub fn builder() -> CacheManagerBuilder {
        CacheManagerBuilder::new()
    }

    /// Get cache settings
    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    pub fn is_enabled(&self) -> bool {
        self.settings.enabled
    }

    /// Region called `name`, created on first use. Unknown names, and every
    /// name while caching is disabled, yield `None`.
    pub fn region_for(&self, name: &str) -> Option<Arc<CacheRegion>> {
        if !self.settings.enabled || !is_known_region(name) {
            return None;
        }

        let region = self
            .regions
            .entry(name.to_string())
            .or_insert_with(|| {
                let (ttl, tti) = self.settings.expiration_for(name);
                debug!(region = name, ?ttl, ?tti, "Creating cache region");
                Arc::new(CacheRegion::new(name, ttl, tti, Arc::clone(&self.clock)))
            })
            .clone();

        Some(region)
    }

    /// Region responsible for `href`
    pub fn region_for_href(&self, href: &str) -> Option<Arc<CacheRegion>> {
        region_name_for(href).and_then(|name| self.region_for(name))
    }

    /// Statistics of every region created so far, keyed by region name
    pub fn stats(&self) -> BTreeMap<String, CacheStats> {
        self.regions
            .iter()
            .map(|region| (region.key().clone(), region.value().stats()))
            .collect()
    }

    /// Statistics of one region, if it has been created
    pub fn region_stats(&self, name: &str) -> Option<CacheStats> {
        self.regions.get(name).map(|region| region.stats())
    }

    /// Drop every cached entry in every region
    pub fn clear(&self) {
        for region in self.regions.iter() {
            region.clear();
        }
    }
}
