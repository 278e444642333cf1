/// Constants used throughout the idstore codebase
// Resource graph property names
pub const HREF_PROP_NAME: &str = "href";
pub const ITEMS_PROP_NAME: &str = "items";
pub const CUSTOM_DATA_PROP_NAME: &str = "customData";

// Service defaults
pub const DEFAULT_SERVER_HOST: &str = "api.stormpath.com";
pub const DEFAULT_API_VERSION: u32 = 1;
pub const DEFAULT_BASE_URL: &str = "https://api.stormpath.com/v1";

// Environment variable names
pub const IDSTORE_API_KEY_ID_VAR: &str = "IDSTORE_API_KEY_ID";
pub const IDSTORE_API_KEY_SECRET_VAR: &str = "IDSTORE_API_KEY_SECRET";
pub const IDSTORE_API_KEY_FILE_VAR: &str = "IDSTORE_API_KEY_FILE";
pub const IDSTORE_BASE_URL_VAR: &str = "IDSTORE_BASE_URL";
pub const IDSTORE_CACHE_ENABLED_VAR: &str = "IDSTORE_CACHE_ENABLED";
pub const IDSTORE_CACHE_TTL_VAR: &str = "IDSTORE_CACHE_TTL";
pub const IDSTORE_CACHE_TTI_VAR: &str = "IDSTORE_CACHE_TTI";

// Keys inside an apiKey.properties file
pub const API_KEY_ID_PROPERTY: &str = "apiKey.id";
pub const API_KEY_SECRET_PROPERTY: &str = "apiKey.secret";
pub const API_KEY_FILE_NAME: &str = "apiKey.properties";

// Client identification
pub const USER_AGENT_PREFIX: &str = "idstore-client";
