//! Library configuration.
//!
//! The base URL and catalog profile are fixed for the lifetime of a [`crate::ContentOps`]
//! instance; nothing here is read from ambient global state.

use crate::catalog::CatalogProfile;
use crate::error::{OpsError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://social-toolkit.ti.trilogy.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpsConfig {
    /// Root of the remote REST resource tree.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Which catalog variant is exposed.
    #[serde(default)]
    pub profile: CatalogProfile,

    /// Per-request timeout in seconds (`0` = no timeout).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum response body size (bytes). `None` = unlimited.
    #[serde(default)]
    pub max_response_bytes: Option<usize>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for OpsConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            profile: CatalogProfile::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_response_bytes: None,
        }
    }
}

impl OpsConfig {
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// Parse and validate the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse, is not `http(s)`, or cannot carry a path.
    pub fn parsed_base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            OpsError::Config(format!("Invalid baseUrl '{}': {e}", self.base_url))
        })?;
        let scheme = url.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(OpsError::Config(format!(
                "Invalid baseUrl '{}': unsupported URL scheme '{scheme}'",
                self.base_url
            )));
        }
        if url.cannot_be_a_base() {
            return Err(OpsError::Config(format!(
                "Invalid baseUrl '{}': URL cannot carry a path",
                self.base_url
            )));
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_timeout_disables_timeout() {
        let cfg = OpsConfig {
            timeout_secs: 0,
            ..OpsConfig::default()
        };
        assert_eq!(cfg.timeout(), None);
        assert_eq!(
            OpsConfig::default().timeout(),
            Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        );
    }

    #[test]
    fn rejects_non_http_base_url() {
        let err = OpsConfig::with_base_url("ftp://example.com")
            .parsed_base_url()
            .unwrap_err();
        assert!(err.to_string().contains("unsupported URL scheme"));

        let err = OpsConfig::with_base_url("not a url")
            .parsed_base_url()
            .unwrap_err();
        assert!(err.to_string().contains("Invalid baseUrl"));
    }

    #[test]
    fn deserializes_camel_case_with_defaults() {
        let cfg: OpsConfig =
            serde_json::from_str(r#"{"baseUrl":"http://localhost:8080","profile":"public"}"#)
                .expect("config");
        assert_eq!(cfg.base_url, "http://localhost:8080");
        assert_eq!(cfg.profile, CatalogProfile::Public);
        assert_eq!(cfg.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(cfg.max_response_bytes, None);
    }
}
