//! Per-ecosystem manifest parsers and the license resolution step they share.
//!
//! A [`ManifestParser`] only turns manifest text into [`DeclaredDependency`]
//! pairs. [`analyze`] reads the file, runs the parser, then resolves each
//! dependency's license through the [`RegistryClient`] with at most
//! `max_concurrent_lookups` requests in flight. Records always come back in
//! manifest order.

use std::path::Path;

use futures::stream::{self, StreamExt};

use crate::error::ManifestError;
use crate::license::classify;
use crate::models::{DependencyRecord, Ecosystem, LicenseSource, RiskLevel};
use crate::registry::{RegistryClient, Resolution};

pub mod go;
pub mod java;
pub mod node;
pub mod python;
pub mod rust;

/// A `(name, version)` pair as written in a manifest, before any lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredDependency {
    pub name: String,
    pub version: String,
}

impl DeclaredDependency {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    fn into_record(self, ecosystem: Ecosystem, resolution: Resolution) -> DependencyRecord {
        // Ecosystems we never query are not penalised for the missing license.
        let risk = match resolution.source {
            LicenseSource::NotQueried => RiskLevel::Low,
            _ => classify(&resolution.license),
        };

        DependencyRecord {
            name: self.name,
            declared_version: self.version,
            license: resolution.license,
            ecosystem,
            risk,
            license_source: resolution.source,
        }
    }
}

pub trait ManifestParser: Send + Sync {
    /// File name this parser handles, e.g. `package.json`.
    fn manifest(&self) -> &'static str;

    fn ecosystem(&self) -> Ecosystem;

    fn parse(&self, content: &str) -> Result<Vec<DeclaredDependency>, ManifestError>;
}

/// Every supported manifest, in the order a directory is scanned.
pub const MANIFEST_PARSERS: [&dyn ManifestParser; 5] = [
    &node::NodeParser,
    &python::PythonParser,
    &java::MavenParser,
    &rust::CargoParser,
    &go::GoModParser,
];

/// Whether `file_name` is one of the manifests in [`MANIFEST_PARSERS`].
pub fn is_known_manifest(file_name: &str) -> bool {
    MANIFEST_PARSERS.iter().any(|p| p.manifest() == file_name)
}

/// Parse the manifest at `path` and resolve a license for each dependency.
pub async fn analyze(
    parser: &dyn ManifestParser,
    path: &Path,
    registry: &RegistryClient,
) -> Result<Vec<DependencyRecord>, ManifestError> {
    let content = tokio::fs::read_to_string(path).await?;
    let declared = parser.parse(&content)?;
    Ok(resolve_all(registry, parser.ecosystem(), declared).await)
}

/// Resolve licenses with bounded concurrency, preserving input order.
pub async fn resolve_all(
    registry: &RegistryClient,
    ecosystem: Ecosystem,
    declared: Vec<DeclaredDependency>,
) -> Vec<DependencyRecord> {
    stream::iter(declared)
        .map(|dep| async move {
            let resolution = registry.resolve(ecosystem, &dep.name).await;
            dep.into_record(ecosystem, resolution)
        })
        .buffered(registry.max_concurrent_lookups())
        .collect()
        .await
}
