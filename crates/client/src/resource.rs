//! Resources as plain property graphs plus a descriptor table
//!
//! A `Resource` is an ordered property map with a record of which properties
//! have pending local changes. Per-kind behaviour (which collection a kind
//! lives in, whether it carries custom data, how it is encoded on the wire)
//! comes from the static `ResourceDescriptor` of its `ResourceKind`, never
//! from per-type code.

use idstore_core::{href_of, ResourceGraph, CUSTOM_DATA_PROP_NAME};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

pub const APPLICATION_PROP_NAME: &str = "application";
pub const DEFAULT_ACCOUNT_STORE_PROP_NAME: &str = "isDefaultAccountStore";
pub const DEFAULT_GROUP_STORE_PROP_NAME: &str = "isDefaultGroupStore";

/// How a property of a resource kind relates to other resources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A plain value
    Property,
    /// A reference to a single resource
    BelongsTo(ResourceKind),
    /// A collection of resources
    HasMany(ResourceKind),
    /// The embedded custom data container
    CustomData,
}

/// Static description of one resource kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// Collection the kind's hrefs live under, if it is addressable
    pub collection: Option<&'static str>,
    /// Carries an embedded `customData` container
    pub custom_data_storage: bool,
    /// Links an account store to an application
    pub account_store_mapping: bool,
    /// Sent as `application/x-www-form-urlencoded`
    pub form_data: bool,
    /// Responses are returned as-is and never cached
    pub mapping_rules: bool,
    /// Responses are wrapped in `{isNewAccount, account}`
    pub provider_account_access: bool,
    /// Known associations; unlisted names are plain properties
    pub fields: &'static [(&'static str, FieldKind)],
}

impl ResourceDescriptor {
    const fn plain(collection: Option<&'static str>) -> Self {
        Self {
            collection,
            custom_data_storage: false,
            account_store_mapping: false,
            form_data: false,
            mapping_rules: false,
            provider_account_access: false,
            fields: &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Account,
    AccountLink,
    AccountMembership,
    AccountStoreMapping,
    Application,
    AttributeStatementMappingRules,
    CustomData,
    Directory,
    Factor,
    Group,
    GroupMembership,
    Organization,
    PasswordGrantRequest,
    ProviderAccountAccess,
    ProviderData,
    Tenant,
    /// Anything without dedicated behaviour
    Generic,
}

use FieldKind::{BelongsTo, CustomData as CustomDataField, HasMany};
use ResourceKind as K;

const ACCOUNT_FIELDS: &[(&str, FieldKind)] = &[
    ("directory", BelongsTo(K::Directory)),
    ("tenant", BelongsTo(K::Tenant)),
    ("customData", CustomDataField),
    ("groups", HasMany(K::Group)),
    ("groupMemberships", HasMany(K::GroupMembership)),
    ("providerData", BelongsTo(K::ProviderData)),
    ("factors", HasMany(K::Factor)),
];

const GROUP_FIELDS: &[(&str, FieldKind)] = &[
    ("directory", BelongsTo(K::Directory)),
    ("tenant", BelongsTo(K::Tenant)),
    ("customData", CustomDataField),
    ("accounts", HasMany(K::Account)),
    ("accountMemberships", HasMany(K::GroupMembership)),
];

const APPLICATION_FIELDS: &[(&str, FieldKind)] = &[
    ("tenant", BelongsTo(K::Tenant)),
    ("customData", CustomDataField),
    ("accounts", HasMany(K::Account)),
    ("groups", HasMany(K::Group)),
    ("accountStoreMappings", HasMany(K::AccountStoreMapping)),
    ("defaultAccountStoreMapping", BelongsTo(K::AccountStoreMapping)),
    ("defaultGroupStoreMapping", BelongsTo(K::AccountStoreMapping)),
];

const DIRECTORY_FIELDS: &[(&str, FieldKind)] = &[
    ("tenant", BelongsTo(K::Tenant)),
    ("customData", CustomDataField),
    ("accounts", HasMany(K::Account)),
    ("groups", HasMany(K::Group)),
];

const TENANT_FIELDS: &[(&str, FieldKind)] = &[
    ("customData", CustomDataField),
    ("applications", HasMany(K::Application)),
    ("directories", HasMany(K::Directory)),
    ("organizations", HasMany(K::Organization)),
];

const ORGANIZATION_FIELDS: &[(&str, FieldKind)] = &[
    ("tenant", BelongsTo(K::Tenant)),
    ("customData", CustomDataField),
    ("accounts", HasMany(K::Account)),
    ("groups", HasMany(K::Group)),
];

const MEMBERSHIP_FIELDS: &[(&str, FieldKind)] = &[
    ("account", BelongsTo(K::Account)),
    ("group", BelongsTo(K::Group)),
];

const ACCOUNT_STORE_MAPPING_FIELDS: &[(&str, FieldKind)] = &[
    ("application", BelongsTo(K::Application)),
    ("accountStore", BelongsTo(K::Generic)),
];

const ACCOUNT_LINK_FIELDS: &[(&str, FieldKind)] = &[
    ("leftAccount", BelongsTo(K::Account)),
    ("rightAccount", BelongsTo(K::Account)),
];

const FACTOR_FIELDS: &[(&str, FieldKind)] = &[("account", BelongsTo(K::Account))];

const PROVIDER_ACCESS_FIELDS: &[(&str, FieldKind)] =
    &[("providerData", BelongsTo(K::ProviderData))];

impl ResourceKind {
    pub fn descriptor(self) -> ResourceDescriptor {
        let custom_data_storage = |collection: &'static str,
                                   fields: &'static [(&'static str, FieldKind)]| ResourceDescriptor {
            custom_data_storage: true,
            fields,
            ..ResourceDescriptor::plain(Some(collection))
        };

        match self {
            K::Account => custom_data_storage("accounts", ACCOUNT_FIELDS),
            K::Group => custom_data_storage("groups", GROUP_FIELDS),
            K::Application => custom_data_storage("applications", APPLICATION_FIELDS),
            K::Directory => custom_data_storage("directories", DIRECTORY_FIELDS),
            K::Tenant => custom_data_storage("tenants", TENANT_FIELDS),
            K::Organization => custom_data_storage("organizations", ORGANIZATION_FIELDS),
            K::AccountStoreMapping => ResourceDescriptor {
                account_store_mapping: true,
                fields: ACCOUNT_STORE_MAPPING_FIELDS,
                ..ResourceDescriptor::plain(Some("accountStoreMappings"))
            },
            K::GroupMembership => ResourceDescriptor {
                fields: MEMBERSHIP_FIELDS,
                ..ResourceDescriptor::plain(Some("groupMemberships"))
            },
            K::AccountMembership => ResourceDescriptor {
                fields: MEMBERSHIP_FIELDS,
                ..ResourceDescriptor::plain(Some("accountMemberships"))
            },
            K::AccountLink => ResourceDescriptor {
                fields: ACCOUNT_LINK_FIELDS,
                ..ResourceDescriptor::plain(Some("accountLinks"))
            },
            K::Factor => ResourceDescriptor {
                fields: FACTOR_FIELDS,
                ..ResourceDescriptor::plain(Some("factors"))
            },
            K::AttributeStatementMappingRules => ResourceDescriptor {
                mapping_rules: true,
                ..ResourceDescriptor::plain(None)
            },
            K::PasswordGrantRequest => ResourceDescriptor {
                form_data: true,
                ..ResourceDescriptor::plain(None)
            },
            K::ProviderAccountAccess => ResourceDescriptor {
                provider_account_access: true,
                fields: PROVIDER_ACCESS_FIELDS,
                ..ResourceDescriptor::plain(None)
            },
            K::CustomData => ResourceDescriptor::plain(Some("customData")),
            K::ProviderData => ResourceDescriptor::plain(Some("providerData")),
            K::Generic => ResourceDescriptor::plain(None),
        }
    }

    /// Association kind of `field`; unlisted names are plain properties
    pub fn field_kind(self, field: &str) -> FieldKind {
        self.descriptor()
            .fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, kind)| *kind)
            .unwrap_or(FieldKind::Property)
    }
}

/// A resource graph together with its pending local changes
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    kind: ResourceKind,
    properties: ResourceGraph,
    dirty: BTreeSet<String>,
}

impl Resource {
    /// An empty, not yet persisted resource
    pub fn new(kind: ResourceKind) -> Self {
        Self::from_graph(kind, ResourceGraph::new())
    }

    /// A resource whose properties reflect server state
    pub fn from_graph(kind: ResourceKind, properties: ResourceGraph) -> Self {
        Self {
            kind,
            properties,
            dirty: BTreeSet::new(),
        }
    }

    /// A persisted resource known only by its href
    pub fn from_href(kind: ResourceKind, href: impl Into<String>) -> Self {
        Self::from_graph(kind, idstore_core::stub(&href.into()))
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn descriptor(&self) -> ResourceDescriptor {
        self.kind.descriptor()
    }

    pub fn href(&self) -> Option<&str> {
        href_of(&self.properties)
    }

    /// Not yet persisted, i.e. no href assigned by the server
    pub fn is_new(&self) -> bool {
        self.href().is_none()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Set a property and record it as a pending change
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let name = name.into();
        self.properties.insert(name.clone(), value.into());
        self.dirty.insert(name);
        self
    }

    pub fn is_dirty(&self, name: &str) -> bool {
        self.dirty.contains(name)
    }

    pub fn dirty_properties(&self) -> impl Iterator<Item = &str> {
        self.dirty.iter().map(String::as_str)
    }

    pub fn properties(&self) -> &ResourceGraph {
        &self.properties
    }

    /// Replace every property with server state and forget pending changes
    pub fn set_properties(&mut self, properties: ResourceGraph) {
        self.properties = properties;
        self.dirty.clear();
    }

    /// Href of a single-resource association such as `application`. Names
    /// the kind does not declare as `BelongsTo` yield `None`.
    pub fn reference_href(&self, name: &str) -> Option<&str> {
        if !matches!(self.kind.field_kind(name), FieldKind::BelongsTo(_)) {
            return None;
        }
        self.properties
            .get(name)
            .and_then(Value::as_object)
            .and_then(href_of)
    }

    /// Boolean property, treating absence as `false`
    pub fn flag(&self, name: &str) -> bool {
        self.properties
            .get(name)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Whether the embedded custom data container has pending changes
    pub fn has_custom_data_changes(&self) -> bool {
        self.kind.field_kind(CUSTOM_DATA_PROP_NAME) == FieldKind::CustomData
            && self.is_dirty(CUSTOM_DATA_PROP_NAME)
    }

    /// Properties sent on a write. New resources send everything; persisted
    /// ones send only what changed.
    pub fn write_properties(&self) -> ResourceGraph {
        if self.is_new() {
            return self.properties.clone();
        }

        self.properties
            .iter()
            .filter(|(name, _)| self.dirty.contains(name.as_str()))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    /// Request body for a write, encoded per the kind's wire format
    pub fn encode_body(&self) -> serde_json::Result<Vec<u8>> {
        let properties = self.write_properties();
        if self.descriptor().form_data {
            return Ok(form_encode(&properties).into_bytes());
        }
        serde_json::to_vec(&properties)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

fn form_encode(properties: &ResourceGraph) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (name, value) in properties {
        match value {
            Value::Null => {}
            Value::String(text) => {
                serializer.append_pair(name, text);
            }
            other => {
                serializer.append_pair(name, &other.to_string());
            }
        }
    }
    serializer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_resource_has_no_href() {
        let mut account = Resource::new(ResourceKind::Account);
        assert!(account.is_new());

        account.set("email", "a@b.c");
        assert!(account.is_dirty("email"));
        assert_eq!(account.write_properties().len(), 1);
    }

    #[test]
    fn test_persisted_resource_writes_only_changes() {
        let graph = json!({"href": "/accounts/1", "email": "a@b.c", "givenName": "A"});
        let mut account = Resource::from_graph(ResourceKind::Account, graph.as_object().cloned().unwrap());

        account.set("givenName", "B");

        let body = account.write_properties();
        assert_eq!(body.len(), 1);
        assert_eq!(body.get("givenName"), Some(&json!("B")));
    }

    #[test]
    fn test_set_properties_clears_changes() {
        let mut account = Resource::from_href(ResourceKind::Account, "/accounts/1");
        account.set("customData", json!({"color": "red"}));
        assert!(account.has_custom_data_changes());

        account.set_properties(idstore_core::stub("/accounts/1"));
        assert!(!account.has_custom_data_changes());
        assert_eq!(account.dirty_properties().count(), 0);
    }

    #[test]
    fn test_custom_data_changes_need_a_custom_data_field() {
        let mut mapping = Resource::from_href(ResourceKind::AccountStoreMapping, "/accountStoreMappings/1");
        mapping.set("customData", json!({"color": "red"}));
        assert!(!mapping.has_custom_data_changes());

        let mut group = Resource::from_href(ResourceKind::Group, "/groups/1");
        group.set("customData", json!({"color": "red"}));
        assert!(group.has_custom_data_changes());
    }

    #[test]
    fn test_form_data_body() {
        let mut grant = Resource::new(ResourceKind::PasswordGrantRequest);
        grant
            .set("grant_type", "password")
            .set("username", "me@example.com")
            .set("password", "p@ss word");

        let body = String::from_utf8(grant.encode_body().unwrap()).unwrap();
        assert_eq!(
            body,
            "grant_type=password&username=me%40example.com&password=p%40ss+word"
        );
    }

    #[test]
    fn test_descriptor_table() {
        assert!(ResourceKind::Account.descriptor().custom_data_storage);
        assert!(ResourceKind::AccountStoreMapping.descriptor().account_store_mapping);
        assert!(!ResourceKind::AccountStoreMapping.descriptor().custom_data_storage);
        assert_eq!(
            ResourceKind::AccountStoreMapping.field_kind("application"),
            FieldKind::BelongsTo(ResourceKind::Application)
        );
        assert_eq!(ResourceKind::Account.field_kind("email"), FieldKind::Property);
        assert_eq!(ResourceKind::Group.descriptor().collection, Some("groups"));
    }

    #[test]
    fn test_reference_href_and_flags() {
        let graph = json!({
            "href": "/accountStoreMappings/1",
            "application": {"href": "/applications/9"},
            "isDefaultAccountStore": true
        });
        let mapping = Resource::from_graph(
            ResourceKind::AccountStoreMapping,
            graph.as_object().cloned().unwrap(),
        );

        assert_eq!(mapping.reference_href("application"), Some("/applications/9"));
        assert_eq!(mapping.reference_href("isDefaultAccountStore"), None);
        assert!(mapping.flag(DEFAULT_ACCOUNT_STORE_PROP_NAME));
        assert!(!mapping.flag(DEFAULT_GROUP_STORE_PROP_NAME));
    }
}
