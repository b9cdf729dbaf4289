//! Async HTTP clients for fetching license data from upstream package registries.
//!
//! Each registry module adds a `*_license(name)` method to [`RegistryClient`]
//! that returns a [`Resolution`] on success and a [`RegistryError`] on transport
//! failures or non-success statuses. [`RegistryClient::resolve`] is the
//! best-effort entry point used by the scan pipeline: it never fails and maps
//! every error to an `Unknown` license.

pub mod crates_io;
pub mod maven;
pub mod npm;
pub mod pypi;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::RegistryConfig;
use crate::error::RegistryError;
use crate::models::{Ecosystem, LicenseSource, UNKNOWN_LICENSE};

/// License text for one package plus how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub license: String,
    pub source: LicenseSource,
}

impl Resolution {
    pub fn registry(license: impl Into<String>) -> Self {
        Self {
            license: license.into(),
            source: LicenseSource::Registry,
        }
    }

    pub fn defaulted(license: impl Into<String>) -> Self {
        Self {
            license: license.into(),
            source: LicenseSource::Defaulted,
        }
    }

    pub fn unresolved() -> Self {
        Self {
            license: UNKNOWN_LICENSE.to_string(),
            source: LicenseSource::Unresolved,
        }
    }

    pub fn not_queried() -> Self {
        Self {
            license: UNKNOWN_LICENSE.to_string(),
            source: LicenseSource::NotQueried,
        }
    }

    /// Wrap a license field extracted from a registry body; blank means unresolved.
    fn from_field(license: Option<String>) -> Self {
        match license {
            Some(l) if !l.trim().is_empty() => Self::registry(l),
            _ => Self::unresolved(),
        }
    }
}

/// HTTP client shared by every registry lookup in a scan.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    http: reqwest::Client,
    config: RegistryConfig,
}

impl RegistryClient {
    /// Build a client with the configured user agent and per-request timeout.
    pub fn new(config: &RegistryConfig) -> Result<Self, RegistryError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    pub fn max_concurrent_lookups(&self) -> usize {
        self.config.max_concurrent_lookups.max(1)
    }

    /// Look up the license for `name` in the registry that serves `ecosystem`.
    ///
    /// Go modules have no registry consulted here and always come back
    /// [`LicenseSource::NotQueried`].
    pub async fn resolve(&self, ecosystem: Ecosystem, name: &str) -> Resolution {
        let result = match ecosystem {
            Ecosystem::JavaScript => self.npm_license(name).await,
            Ecosystem::Python => self.pypi_license(name).await,
            Ecosystem::Java => self.maven_license(name).await,
            Ecosystem::Rust => self.crates_license(name).await,
            Ecosystem::Go => return Resolution::not_queried(),
        };

        match result {
            Ok(resolution) => {
                debug!(
                    %ecosystem,
                    package = name,
                    license = %resolution.license,
                    source = %resolution.source,
                    "license resolved"
                );
                resolution
            }
            Err(e) => {
                warn!(%ecosystem, package = name, error = %e, "license lookup failed");
                Resolution::unresolved()
            }
        }
    }

    /// GET `url` and decode the body as JSON, treating non-2xx as an error.
    async fn get_json(&self, url: &str) -> Result<Value, RegistryError> {
        let response = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RegistryError::Status {
                status: response.status().as_u16(),
            });
        }

        Ok(response.json().await?)
    }
}

/// Join a configured base URL and a path without doubling the slash.
fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
