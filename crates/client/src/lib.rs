//! Client data store for the idstore identity service
//!
//! `DataStore` turns resource CRUD calls into SAuthc1-signed HTTP requests,
//! caches single-resource responses per region and evicts entries that a
//! write or delete makes stale.
//!
//! ```no_run
//! use idstore_client::DataStore;
//! use idstore_config::ClientConfigLoader;
//!
//! # fn main() -> idstore_core::Result<()> {
//! let config = ClientConfigLoader::new().load()?;
//! let store = DataStore::builder().config(config).build()?;
//! let tenant = store.fetch("/tenants/current", &[])?;
//! println!("{}", serde_json::Value::Object(tenant));
//! # Ok(())
//! # }
//! ```

pub mod data_store;
pub mod invalidation;
pub mod qualifier;
pub mod resource;
pub mod transport;
pub mod walk;

pub use data_store::{DataStore, DataStoreBuilder};
pub use qualifier::HrefQualifier;
pub use resource::{FieldKind, Resource, ResourceDescriptor, ResourceKind};
pub use transport::{HttpTransport, Response, Transport};
pub use walk::cache_walk;
