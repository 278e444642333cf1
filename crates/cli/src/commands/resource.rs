use super::Connection;
use eyre::{eyre, WrapErr};
use idstore_client::{Resource, ResourceKind};
use serde_json::Value;

pub fn get(connection: &Connection, href: &str, query: &[String]) -> eyre::Result<()> {
    let params = parse_query(query)?;
    let store = connection.data_store()?;

    let graph = store
        .fetch(href, &params)
        .wrap_err_with(|| format!("failed to fetch {href}"))?;

    println!("{}", serde_json::to_string_pretty(&Value::Object(graph))?);
    Ok(())
}

pub fn delete(connection: &Connection, href: &str, property: Option<&str>) -> eyre::Result<()> {
    let store = connection.data_store()?;
    let resource = Resource::from_href(ResourceKind::Generic, href);

    store
        .delete(&resource, property)
        .wrap_err_with(|| format!("failed to delete {href}"))?;

    tracing::info!("✓ Deleted {}", property.map_or_else(|| href.to_string(), |p| format!("{href}/{p}")));
    Ok(())
}

/// Split `key=value` arguments
pub fn parse_query(raw: &[String]) -> eyre::Result<Vec<(&str, &str)>> {
    raw.iter()
        .map(|pair| {
            pair.split_once('=')
                .filter(|(key, _)| !key.is_empty())
                .ok_or_else(|| eyre!("query parameter '{pair}' must look like key=value"))
        })
        .collect()
}
