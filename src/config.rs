//! Endpoint configuration shared by every request

use reqwest::Url;

use crate::constants::{CGI_ENDPOINT, DEFAULT_BASE_URL};
use crate::error::{Error, Result};

/// Immutable client configuration
///
/// Holds the CGI endpoint path and the base URL it is resolved against.
/// There are no setters: a value is fixed for as long as it lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    base_url: Url,
    endpoint: &'static str,
}

impl ServiceConfig {
    /// Create a configuration for the service reachable at `base_url`
    ///
    /// The base URL must be an absolute `http` or `https` URL.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::Configuration(format!("Invalid base URL '{base_url}': {e}")))?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::Configuration(format!(
                "Unsupported URL scheme '{}', expected http or https",
                base_url.scheme()
            )));
        }

        Ok(Self {
            base_url,
            endpoint: CGI_ENDPOINT,
        })
    }

    /// Create a configuration for a service on the local machine
    pub fn with_default_base_url() -> Result<Self> {
        Self::new(DEFAULT_BASE_URL)
    }

    /// The base URL requests are resolved against
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The CGI endpoint path
    #[must_use]
    pub const fn endpoint(&self) -> &'static str {
        self.endpoint
    }

    /// The absolute URL of the CGI endpoint
    #[must_use]
    pub fn cgi_url(&self) -> String {
        // The endpoint is absolute, so joining replaces any base path
        self.base_url
            .join(self.endpoint)
            .map_or_else(|_| format!("{}{}", self.base_url, self.endpoint), String::from)
    }
}
