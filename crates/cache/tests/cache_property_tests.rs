//! Property-based tests for cache regions and region-name derivation

use chrono::{TimeZone, Utc};
use idstore_cache::{region_name_for, CacheRegion, KNOWN_REGIONS};
use idstore_core::testing::ManualClock;
use proptest::prelude::*;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
enum Op {
    Put(u8),
    Get(u8),
    Delete(u8),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..8).prop_map(Op::Put),
        (0u8..8).prop_map(Op::Get),
        (0u8..8).prop_map(Op::Delete),
    ]
}

fn region() -> CacheRegion {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    ));
    CacheRegion::new(
        "accounts",
        Duration::from_secs(300),
        Duration::from_secs(300),
        clock,
    )
}

proptest! {
    /// `size` tracks the number of distinct live keys, whatever the sequence
    #[test]
    fn size_matches_live_keys(ops in prop::collection::vec(arb_op(), 0..64)) {
        let region = region();
        let mut live = HashSet::new();
        let mut puts = 0;
        let mut lookups = 0;

        for op in ops {
            match op {
                Op::Put(k) => {
                    region.put(format!("k{k}"), json!(k));
                    live.insert(k);
                    puts += 1;
                }
                Op::Get(k) => {
                    let hit = region.get(&format!("k{k}")).is_some();
                    prop_assert_eq!(hit, live.contains(&k));
                    lookups += 1;
                }
                Op::Delete(k) => {
                    let removed = region.delete(&format!("k{k}"));
                    prop_assert_eq!(removed, live.remove(&k));
                }
            }
        }

        let stats = region.stats();
        prop_assert_eq!(stats.size, live.len() as u64);
        prop_assert_eq!(stats.puts, puts);
        prop_assert_eq!(stats.hits + stats.misses, lookups);
        prop_assert_eq!(stats.expirations, 0);
    }

    /// Region names are always drawn from the known set
    #[test]
    fn derived_regions_are_known(
        segments in prop::collection::vec("[a-zA-Z0-9_]{1,12}", 0..6),
        trailing_slash in any::<bool>(),
    ) {
        let mut href = format!("https://api.stormpath.com/v1/{}", segments.join("/"));
        if trailing_slash {
            href.push('/');
        }

        if let Some(region) = region_name_for(&href) {
            prop_assert!(KNOWN_REGIONS.contains(&region));
        }
        prop_assert_eq!(region_name_for(&href), region_name_for(&href));
    }

    /// Every known collection maps its member hrefs to itself
    #[test]
    fn member_hrefs_map_to_their_collection(
        index in 0..KNOWN_REGIONS.len(),
        id in "[a-zA-Z0-9]{1,22}",
    ) {
        let collection = KNOWN_REGIONS[index];
        prop_assume!(collection != "customData" && !id.starts_with("customData"));

        let href = format!("https://api.stormpath.com/v1/{collection}/{id}");
        prop_assert_eq!(region_name_for(&href), Some(collection));
    }
}
