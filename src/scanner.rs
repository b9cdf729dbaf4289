//! Directory scan: run every manifest parser that applies and build the report.

use std::path::Path;

use tracing::{info, warn};

use crate::analyzer::{self, MANIFEST_PARSERS};
use crate::config::RegistryConfig;
use crate::error::RegistryError;
use crate::models::{DependencyRecord, Ecosystem, ManifestFailure, ScanReport};
use crate::registry::RegistryClient;
use crate::report::assemble;

/// Output of [`Scanner::collect`], before report assembly.
#[derive(Debug, Default)]
pub struct CollectedDependencies {
    /// Records from all manifests, concatenated in manifest-table order.
    pub records: Vec<DependencyRecord>,
    /// Ecosystems whose manifest produced at least one record.
    pub ecosystems: Vec<Ecosystem>,
    pub failures: Vec<ManifestFailure>,
}

#[derive(Debug, Clone)]
pub struct Scanner {
    registry: RegistryClient,
}

impl Scanner {
    pub fn new(registry: RegistryClient) -> Self {
        Self { registry }
    }

    pub fn from_config(config: &RegistryConfig) -> Result<Self, RegistryError> {
        Ok(Self::new(RegistryClient::new(config)?))
    }

    pub fn registry(&self) -> &RegistryClient {
        &self.registry
    }

    /// Parse and resolve every supported manifest directly inside `dir`.
    ///
    /// A manifest that fails to read or parse is logged, recorded in
    /// `failures` and otherwise skipped; it never aborts the scan.
    pub async fn collect(&self, dir: &Path) -> CollectedDependencies {
        let mut collected = CollectedDependencies::default();

        for parser in MANIFEST_PARSERS {
            let path = dir.join(parser.manifest());
            if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
                continue;
            }

            info!(manifest = parser.manifest(), ecosystem = %parser.ecosystem(), "analyzing manifest");

            match analyzer::analyze(parser, &path, &self.registry).await {
                Ok(records) => {
                    info!(
                        manifest = parser.manifest(),
                        dependencies = records.len(),
                        "manifest analyzed"
                    );
                    if !records.is_empty() {
                        collected.ecosystems.push(parser.ecosystem());
                        collected.records.extend(records);
                    }
                }
                Err(e) => {
                    warn!(manifest = parser.manifest(), error = %e, "skipping manifest");
                    collected.failures.push(ManifestFailure {
                        manifest: parser.manifest().to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        collected
    }

    /// Scan `dir` and assemble the full [`ScanReport`].
    ///
    /// The project name is the directory's final path component.
    pub async fn scan(&self, dir: &Path) -> ScanReport {
        let project_name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| dir.display().to_string());

        self.scan_as(dir, project_name).await
    }

    /// Like [`scan`](Self::scan) but with an explicit project name, used when
    /// `dir` is a temporary staging directory.
    pub async fn scan_as(&self, dir: &Path, project_name: impl Into<String>) -> ScanReport {
        let collected = self.collect(dir).await;
        let mut report = assemble(collected.records, collected.ecosystems, project_name);
        report.manifest_errors = collected.failures;
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LicenseSource, RiskLevel};
    use tempfile::TempDir;

    fn scanner() -> Scanner {
        Scanner::from_config(&RegistryConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_empty_directory() {
        let dir = TempDir::new().unwrap();
        let report = scanner().scan(dir.path()).await;

        assert_eq!(report.total_dependency_count, 0);
        assert!(report.ecosystems_seen.is_empty());
        assert!(report.manifest_errors.is_empty());
        assert_eq!(report.overall_risk, RiskLevel::Low);
    }

    #[tokio::test]
    async fn test_go_only_scan_needs_no_network() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("go.mod"),
            "module m\n\nrequire (\n\tgithub.com/foo/bar v1.2.3\n)\n",
        )
        .unwrap();

        let report = scanner().scan(dir.path()).await;
        assert_eq!(report.ecosystems_seen, vec![Ecosystem::Go]);
        assert_eq!(report.total_dependency_count, 1);
        assert_eq!(report.dependencies[0].license, "Unknown");
        assert_eq!(report.dependencies[0].license_source, LicenseSource::NotQueried);
        assert_eq!(report.overall_risk, RiskLevel::Low);
        // "Unknown" still raises an issue even though the risk stays low
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].title, "Unknown License");
    }

    #[tokio::test]
    async fn test_malformed_manifest_is_reported_not_fatal() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("package.json"), "{ not json").unwrap();
        std::fs::write(dir.path().join("go.mod"), "require (\n  a.io/x v1.0.0\n)\n").unwrap();

        let report = scanner().scan(dir.path()).await;
        assert_eq!(report.ecosystems_seen, vec![Ecosystem::Go]);
        assert_eq!(report.manifest_errors.len(), 1);
        assert_eq!(report.manifest_errors[0].manifest, "package.json");
    }

    #[tokio::test]
    async fn test_empty_manifest_not_counted_as_ecosystem() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("package.json"), "{\"name\": \"x\"}").unwrap();

        let report = scanner().scan_as(dir.path(), "owner/repo").await;
        assert_eq!(report.project_name, "owner/repo");
        assert!(report.ecosystems_seen.is_empty());
        assert!(report.manifest_errors.is_empty());
    }
}
