use clap::{Args, Subcommand};
use eyre::WrapErr;
use idstore_client::DataStore;
use idstore_config::ClientConfigLoader;
use std::path::PathBuf;

pub mod resource;
pub mod stats;

/// Options shared by every command that talks to the service
#[derive(Args, Debug, Clone, Default)]
pub struct Connection {
    /// Path to an apiKey.properties file
    #[arg(long, global = true, value_name = "FILE")]
    pub api_key_file: Option<PathBuf>,

    /// Service base URL (overrides IDSTORE_BASE_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Disable the resource cache
    #[arg(long, global = true)]
    pub no_cache: bool,
}

impl Connection {
    /// Load configuration and build a data store
    pub fn data_store(&self) -> eyre::Result<DataStore> {
        let mut loader = ClientConfigLoader::new();
        if let Some(path) = &self.api_key_file {
            loader = loader.api_key_file(path);
        }
        if let Some(base_url) = &self.base_url {
            loader = loader.base_url(base_url);
        }

        let mut config = loader
            .load()
            .wrap_err("failed to load client configuration")?;
        if self.no_cache {
            config.cache.enabled = false;
        }

        DataStore::builder()
            .config(config)
            .build()
            .wrap_err("failed to initialise the data store")
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a resource and print it as JSON
    Get {
        /// Resource href, absolute or relative to the base URL
        href: String,

        /// Query parameters as key=value (repeatable)
        #[arg(short, long = "query", value_name = "KEY=VALUE")]
        query: Vec<String>,
    },

    /// Delete a resource, or one of its custom data fields
    Delete {
        /// Resource href, absolute or relative to the base URL
        href: String,

        /// Delete only this property below the href
        #[arg(long)]
        property: Option<String>,
    },

    /// Fetch resources and report per-region cache statistics
    Stats {
        /// Hrefs to fetch before reporting
        hrefs: Vec<String>,

        /// How many times each href is fetched
        #[arg(long, default_value = "2")]
        repeat: usize,
    },
}

impl Commands {
    pub fn execute(self, connection: &Connection) -> eyre::Result<()> {
        match self {
            Commands::Get { href, query } => resource::get(connection, &href, &query),
            Commands::Delete { href, property } => {
                resource::delete(connection, &href, property.as_deref())
            }
            Commands::Stats { hrefs, repeat } => stats::execute(connection, &hrefs, repeat),
        }
    }
}
