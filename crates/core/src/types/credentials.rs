//! API key credential used to sign every outbound request

use crate::errors::{Error, Result};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Immutable `(id, secret)` pair. The secret is wiped from memory on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ApiKey {
    id: String,
    secret: String,
}

impl ApiKey {
    /// Create a new key, rejecting empty components
    pub fn new(id: impl Into<String>, secret: impl Into<String>) -> Result<Self> {
        let id = id.into();
        let secret = secret.into();

        if id.trim().is_empty() {
            return Err(Error::configuration("API key id cannot be empty"));
        }
        if secret.trim().is_empty() {
            return Err(Error::configuration("API key secret cannot be empty"));
        }

        Ok(Self { id, secret })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKey")
            .field("id", &self.id)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_components() {
        assert!(matches!(
            ApiKey::new("", "secret"),
            Err(Error::Configuration { .. })
        ));
        assert!(matches!(
            ApiKey::new("id", "  "),
            Err(Error::Configuration { .. })
        ));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let key = ApiKey::new("MyId", "Shush!").unwrap();
        let rendered = format!("{key:?}");
        assert!(rendered.contains("MyId"));
        assert!(!rendered.contains("Shush!"));
    }
}
