//! Resolve relative hrefs against the service base URL

use url::Url;

/// Turns `/accounts/1` into `<base>/accounts/1`; absolute hrefs pass through
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HrefQualifier {
    base_url: String,
}

impl HrefQualifier {
    pub fn new(base_url: &Url) -> Self {
        Self {
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn qualify(&self, href: &str) -> String {
        if is_absolute(href) {
            return href.to_string();
        }

        if href.starts_with('/') {
            format!("{}{href}", self.base_url)
        } else {
            format!("{}/{href}", self.base_url)
        }
    }
}

fn is_absolute(href: &str) -> bool {
    Url::parse(href).is_ok_and(|url| url.has_host())
}
