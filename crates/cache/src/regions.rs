//! The fixed set of cache regions and the href → region mapping

use idstore_core::{Error, Result, CUSTOM_DATA_PROP_NAME};
use std::collections::HashSet;

/// Region names that may hold cached resources
pub const KNOWN_REGIONS: &[&str] = &[
    "applications",
    "directories",
    "accounts",
    "groups",
    "groupMemberships",
    "accountMemberships",
    "tenants",
    "customData",
    "provider",
    "providerData",
    "organizations",
    "accountStoreMappings",
];

pub fn is_known_region(name: &str) -> bool {
    KNOWN_REGIONS.contains(&name)
}

/// Derive the cache region of an href.
///
/// Custom data hrefs (anything containing `/customData`) map to their last
/// path segment, which is either `customData` itself or the name of a single
/// field. Everything else maps to the owning collection, i.e. the
/// second-to-last segment. `None` means the href is never cached.
pub fn region_name_for(href: &str) -> Option<&str> {
    let path = href
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/');

    let mut segments = path.rsplit('/');
    let last = segments.next()?;

    let region = if path.contains(&format!("/{CUSTOM_DATA_PROP_NAME}")) {
        last
    } else {
        segments.next()?
    };

    is_known_region(region).then_some(region)
}

/// Check that configured region names are known and that no two categories
/// share a name.
pub fn validate_region_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for name in KNOWN_REGIONS {
        if !seen.insert(*name) {
            return Err(Error::configuration(format!(
                "cache region '{name}' is declared more than once"
            )));
        }
    }

    for name in names {
        if !is_known_region(name) {
            return Err(Error::configuration(format!(
                "unknown cache region '{name}'; expected one of {}",
                KNOWN_REGIONS.join(", ")
            )));
        }
    }

    Ok(())
}
