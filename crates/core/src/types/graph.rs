//! Resource graphs: ordered JSON objects keyed by property name

use crate::constants::HREF_PROP_NAME;
use serde_json::{Map, Value};

/// An ordered mapping of property names to JSON values
pub type ResourceGraph = Map<String, Value>;

/// Identity field of a graph, if present and non-empty
pub fn href_of(graph: &ResourceGraph) -> Option<&str> {
    graph
        .get(HREF_PROP_NAME)
        .and_then(Value::as_str)
        .filter(|href| !href.is_empty())
}

/// A graph is worth caching only when it carries more than its identity
pub fn is_cacheable(graph: &ResourceGraph) -> bool {
    href_of(graph).is_some() && graph.len() > 1
}

/// Graph reduced to its identity field
pub fn stub(href: &str) -> ResourceGraph {
    let mut graph = Map::new();
    graph.insert(HREF_PROP_NAME.to_string(), Value::String(href.to_string()));
    graph
}
