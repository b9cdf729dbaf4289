//! Error types for each stage of the scan pipeline.

use thiserror::Error;

/// Failure to read or parse a single manifest file.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid XML: {0}")]
    Xml(String),

    /// The document parsed but does not have the expected shape.
    #[error("unexpected manifest structure: {0}")]
    Invalid(String),
}

/// Failure of a single registry lookup.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Registry responded with a non-success status code.
    #[error("registry returned status {status}")]
    Status { status: u16 },
}

/// Failure while fetching manifests from a hosted repository.
#[derive(Debug, Error)]
pub enum GithubError {
    #[error("invalid repository URL: {0}")]
    InvalidUrl(String),

    /// The contents listing call did not succeed.
    #[error("Repository not found")]
    RepositoryNotFound { status: u16 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to store manifest: {0}")]
    Io(#[from] std::io::Error),
}
