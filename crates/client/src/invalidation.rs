//! Cache eviction rules for writes and deletes

use crate::resource::{
    Resource, APPLICATION_PROP_NAME, DEFAULT_ACCOUNT_STORE_PROP_NAME,
    DEFAULT_GROUP_STORE_PROP_NAME,
};
use idstore_core::{Error, Result, CUSTOM_DATA_PROP_NAME};
use regex::Regex;
use tracing::debug;

/// Hrefs whose cached copies go stale once `resource` is written.
///
/// Saving custom data through its owner replaces the owner's
/// `<href>/customData` container. Changing an account store mapping's
/// default flags changes the default stores embedded in its application.
pub fn stale_on_save(resource: &Resource) -> Vec<String> {
    let descriptor = resource.descriptor();
    let mut stale = Vec::new();

    if descriptor.custom_data_storage {
        // new resources have no href
        if let Some(href) = resource.href().filter(|_| resource.has_custom_data_changes()) {
            stale.push(format!("{href}/{CUSTOM_DATA_PROP_NAME}"));
        }
    } else if descriptor.account_store_mapping && default_store_changed(resource) {
        match resource.reference_href(APPLICATION_PROP_NAME) {
            Some(application) => stale.push(application.to_string()),
            None => debug!("account store mapping has no application; nothing to evict"),
        }
    }

    stale
}

fn default_store_changed(resource: &Resource) -> bool {
    if resource.is_new() {
        resource.flag(DEFAULT_ACCOUNT_STORE_PROP_NAME) || resource.flag(DEFAULT_GROUP_STORE_PROP_NAME)
    } else {
        resource.is_dirty(DEFAULT_ACCOUNT_STORE_PROP_NAME)
            || resource.is_dirty(DEFAULT_GROUP_STORE_PROP_NAME)
    }
}

/// Eviction rule for deletes, bound to one service base URL.
///
/// Deleting a single custom data field
/// (`<base>/<collection>/<id>/customData/<field>`) changes the whole
/// container, so the container's href is evicted instead of the field's.
#[derive(Debug, Clone)]
pub struct DeleteInvalidation {
    custom_data_field: Regex,
}

impl DeleteInvalidation {
    pub fn new(base_url: &str) -> Result<Self> {
        let pattern = format!(
            r"^({}/[^/]+/[^/]+/{CUSTOM_DATA_PROP_NAME})/[^/]+/?$",
            regex::escape(base_url.trim_end_matches('/'))
        );
        let custom_data_field = Regex::new(&pattern).map_err(|e| {
            Error::configuration(format!("invalid base URL '{base_url}' for eviction rules: {e}"))
        })?;

        Ok(Self { custom_data_field })
    }

    /// Cache key to evict after a successful DELETE of `href`
    pub fn stale_on_delete(&self, href: &str) -> String {
        match self
            .custom_data_field
            .captures(href)
            .and_then(|captures| captures.get(1))
        {
            Some(container) => container.as_str().to_string(),
            None => href.to_string(),
        }
    }
}
