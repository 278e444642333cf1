//! Resource cache for idstore
//!
//! The cache is partitioned into named regions, one per resource category
//! (`accounts`, `groups`, `customData`, ...). Each region keeps its own
//! expiration policy and usage statistics. A `CacheManager` owns the regions
//! of exactly one data store and creates them on first use.

pub mod entry;
pub mod manager;
pub mod region;
pub mod regions;

pub use entry::CacheEntry;
pub use manager::{CacheManager, CacheManagerBuilder, CacheStats};
pub use region::{CacheLookup, CacheRegion};
pub use regions::{is_known_region, region_name_for, KNOWN_REGIONS};

// Settings are defined next to the rest of the client configuration
pub use idstore_config::{CacheSettings, RegionSettings};
