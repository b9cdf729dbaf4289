use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fallback license text when a registry cannot tell us anything.
pub const UNKNOWN_LICENSE: &str = "Unknown";

/// A single declared dependency with its resolved license.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRecord {
    pub name: String,
    #[serde(rename = "version")]
    pub declared_version: String,
    pub license: String,
    #[serde(rename = "language")]
    pub ecosystem: Ecosystem,
    pub risk: RiskLevel,
    pub license_source: LicenseSource,
}

/// Coarse license permissiveness tier. Ordered so that `max` yields the most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ecosystem {
    JavaScript,
    Python,
    Java,
    Rust,
    Go,
}

impl std::fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ecosystem::JavaScript => write!(f, "JavaScript"),
            Ecosystem::Python => write!(f, "Python"),
            Ecosystem::Java => write!(f, "Java"),
            Ecosystem::Rust => write!(f, "Rust"),
            Ecosystem::Go => write!(f, "Go"),
        }
    }
}

/// Where the license text on a [`DependencyRecord`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseSource {
    /// Read from the registry response for this package.
    Registry,
    /// Placeholder value that was not verified against the package.
    Defaulted,
    /// Lookup failed or the registry had no license field.
    Unresolved,
    /// The ecosystem has no registry lookup.
    NotQueried,
}

impl std::fmt::Display for LicenseSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LicenseSource::Registry => write!(f, "registry"),
            LicenseSource::Defaulted => write!(f, "defaulted"),
            LicenseSource::Unresolved => write!(f, "unresolved"),
            LicenseSource::NotQueried => write!(f, "not queried"),
        }
    }
}

/// A compliance concern raised by one dependency's license.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: RiskLevel,
    pub title: String,
    pub package: String,
    pub description: String,
    pub recommendation: String,
}

/// A manifest that was present but contributed nothing because it failed to load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestFailure {
    pub manifest: String,
    pub reason: String,
}

/// Dependencies per risk tier, counted before the `dependencies` list is truncated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl RiskCounts {
    pub fn record(&mut self, risk: RiskLevel) {
        match risk {
            RiskLevel::Low => self.low += 1,
            RiskLevel::Medium => self.medium += 1,
            RiskLevel::High => self.high += 1,
        }
    }

    pub fn get(&self, risk: RiskLevel) -> usize {
        match risk {
            RiskLevel::Low => self.low,
            RiskLevel::Medium => self.medium,
            RiskLevel::High => self.high,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub project_name: String,
    #[serde(rename = "scan_date")]
    pub scan_timestamp: DateTime<Utc>,
    #[serde(rename = "languages")]
    pub ecosystems_seen: Vec<Ecosystem>,
    /// Size of the full merged dependency set, before `dependencies` is truncated.
    #[serde(rename = "total_dependencies")]
    pub total_dependency_count: usize,
    #[serde(rename = "unique_licenses")]
    pub unique_license_count: usize,
    #[serde(rename = "risk_level")]
    pub overall_risk: RiskLevel,
    #[serde(default)]
    pub risk_counts: RiskCounts,
    pub dependencies: Vec<DependencyRecord>,
    pub license_distribution: BTreeMap<String, usize>,
    pub issues: Vec<Issue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub manifest_errors: Vec<ManifestFailure>,
}
