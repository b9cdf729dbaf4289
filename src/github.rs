//! Fetching root-level manifests from a public GitHub repository.

use std::path::Path;

use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::analyzer::is_known_manifest;
use crate::config::GithubConfig;
use crate::error::GithubError;

/// `owner/repo` parsed out of a repository URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    pub owner: String,
    pub repo: String,
}

impl RepositoryRef {
    /// Parse an `http(s)` repository URL. The last two path segments are the
    /// owner and repository; a trailing `.git` is dropped.
    pub fn from_url(repo_url: &str) -> Result<Self, GithubError> {
        let invalid = || GithubError::InvalidUrl(repo_url.to_string());

        let url = Url::parse(repo_url.trim()).map_err(|_| invalid())?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid());
        }

        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();

        let [.., owner, repo] = segments[..] else {
            return Err(invalid());
        };
        let repo = repo.strip_suffix(".git").unwrap_or(repo);
        if repo.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

/// One entry of the repository contents listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentEntry {
    pub name: String,
    /// `null` for directories and submodules.
    pub download_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    api_url: String,
}

impl GithubClient {
    pub fn new(config: &GithubConfig) -> Result<Self, GithubError> {
        let http = reqwest::Client::builder()
            .user_agent(format!("license-scanner/{}", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    /// List the repository's root directory.
    pub async fn list_root(&self, repo: &RepositoryRef) -> Result<Vec<ContentEntry>, GithubError> {
        let url = format!("{}/repos/{}/{}/contents", self.api_url, repo.owner, repo.repo);

        let response = self
            .http
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GithubError::RepositoryNotFound {
                status: response.status().as_u16(),
            });
        }

        Ok(response.json().await?)
    }

    /// Download every known manifest at the repository root into `dest`.
    ///
    /// Returns the names of the files written. A manifest whose download
    /// fails is logged and left out.
    pub async fn fetch_manifests(
        &self,
        repo: &RepositoryRef,
        dest: &Path,
    ) -> Result<Vec<String>, GithubError> {
        let entries = self.list_root(repo).await?;
        let mut fetched = Vec::new();

        for entry in entries.iter().filter(|e| is_known_manifest(&e.name)) {
            let Some(download_url) = entry.download_url.as_deref() else {
                continue;
            };

            match self.download(download_url).await {
                Ok(body) => {
                    tokio::fs::write(dest.join(&entry.name), body).await?;
                    debug!(repo = %repo.full_name(), manifest = %entry.name, "manifest downloaded");
                    fetched.push(entry.name.clone());
                }
                Err(e) => {
                    warn!(repo = %repo.full_name(), manifest = %entry.name, error = %e, "manifest download failed");
                }
            }
        }

        info!(repo = %repo.full_name(), manifests = fetched.len(), "fetched repository manifests");
        Ok(fetched)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, GithubError> {
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}
