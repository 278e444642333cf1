use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Result type alias for idstore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for idstore operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Non-2xx response from the remote service
    #[error(transparent)]
    Protocol(Box<ProtocolError>),

    /// Failure reported by the transport (connection, DNS, TLS)
    #[error("transport error for '{endpoint}': {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Local precondition failures
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Missing or invalid configuration
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// A request that cannot be signed or sent
    #[error("invalid request for '{url}': {message}")]
    InvalidRequest { url: String, message: String },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// File system operations
    #[error("file system {operation} operation failed for '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },
}

/// Error body returned by the remote service alongside a non-2xx status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "camelCase", default)]
#[error("HTTP {status}, error code {code}: {message}")]
pub struct ProtocolError {
    pub status: u16,
    pub code: u32,
    pub message: String,
    pub developer_message: String,
    pub more_info: String,
    pub request_id: String,
}

impl ProtocolError {
    /// Build from a decoded error body, falling back to the HTTP status when
    /// the body does not carry one.
    pub fn from_body(http_status: u16, body: &serde_json::Value) -> Self {
        let mut error: ProtocolError = serde_json::from_value(body.clone()).unwrap_or_default();
        if error.status == 0 {
            error.status = http_status;
        }
        if error.message.is_empty() {
            error.message = format!("request failed with HTTP status {http_status}");
        }
        error
    }
}

impl From<ProtocolError> for Error {
    fn from(error: ProtocolError) -> Self {
        Error::Protocol(Box::new(error))
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Json {
            message: error.to_string(),
            source: error,
        }
    }
}

// Helper methods for creating errors with context
impl Error {
    /// Create a transport error wrapping the collaborator's failure
    #[must_use]
    pub fn transport(
        endpoint: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::Transport {
            endpoint: endpoint.into(),
            source: source.into(),
        }
    }

    /// Create a validation error
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Create an invalid request error
    #[must_use]
    pub fn invalid_request(url: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidRequest {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a file system error with context
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    /// Whether the remote service rejected the request
    pub fn is_protocol(&self) -> bool {
        matches!(self, Error::Protocol(_))
    }

    /// HTTP status of a protocol error
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Protocol(error) => Some(error.status),
            _ => None,
        }
    }
}
