//! Response graph normalization
//!
//! A response body may embed any number of identified resources. Walking it
//! caches every identified object on its own and leaves href stubs behind in
//! the parents, so each resource has exactly one cached copy.

use idstore_cache::CacheManager;
use idstore_core::{href_of, is_cacheable, stub, ResourceGraph, ITEMS_PROP_NAME};
use serde_json::Value;
use tracing::trace;

/// Normalize `graph` in place and cache every identified object in it.
///
/// Collections replace each member with a stub and are never cached
/// themselves. Single resources replace identified children with stubs
/// (keeping an expanded child's `items`) and are cached once flattened, as
/// long as more than the href remains.
pub fn cache_walk(graph: &mut ResourceGraph, cache: &CacheManager) {
    if let Some(Value::Array(items)) = graph.get_mut(ITEMS_PROP_NAME) {
        for item in items.iter_mut() {
            let Value::Object(member) = &mut *item else {
                continue;
            };
            cache_walk(member, cache);
            if let Some(replacement) = href_of(member).map(stub) {
                *item = Value::Object(replacement);
            }
        }
        return;
    }

    for (name, value) in graph.iter_mut() {
        let Value::Object(child) = &mut *value else {
            continue;
        };
        let Some(href) = href_of(child).map(str::to_string) else {
            continue;
        };

        cache_walk(child, cache);

        let mut replacement = stub(&href);
        if let Some(items) = child.remove(ITEMS_PROP_NAME) {
            replacement.insert(ITEMS_PROP_NAME.to_string(), items);
        }
        trace!(property = %name, %href, "replaced nested resource with stub");
        *value = Value::Object(replacement);
    }

    if is_cacheable(graph) {
        store(graph, cache);
    }
}

fn store(graph: &ResourceGraph, cache: &CacheManager) {
    let Some(href) = href_of(graph) else {
        return;
    };
    if let Some(region) = cache.region_for_href(href) {
        region.put(href, Value::Object(graph.clone()));
    }
}
