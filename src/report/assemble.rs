use std::collections::BTreeMap;

use chrono::Utc;

use crate::models::{
    DependencyRecord, Ecosystem, Issue, RiskCounts, RiskLevel, ScanReport, UNKNOWN_LICENSE,
};

/// Dependencies carried in the report body; `total_dependency_count` still counts all.
pub const MAX_REPORTED_DEPENDENCIES: usize = 50;
pub const MAX_REPORTED_ISSUES: usize = 10;

/// Build a [`ScanReport`] from the merged dependency records of one scan.
///
/// The license histogram, unique-license count, per-tier counts, overall risk
/// and issue list are all computed over every record; only the `dependencies`
/// and `issues` lists in the result are truncated.
pub fn assemble(
    records: Vec<DependencyRecord>,
    ecosystems_seen: Vec<Ecosystem>,
    project_name: impl Into<String>,
) -> ScanReport {
    let license_distribution = license_distribution(&records);
    let issues: Vec<Issue> = records
        .iter()
        .filter_map(issue_for)
        .take(MAX_REPORTED_ISSUES)
        .collect();
    let overall_risk = records
        .iter()
        .map(|r| r.risk)
        .max()
        .unwrap_or(RiskLevel::Low);
    let mut risk_counts = RiskCounts::default();
    for record in &records {
        risk_counts.record(record.risk);
    }

    let total_dependency_count = records.len();
    let mut dependencies = records;
    dependencies.truncate(MAX_REPORTED_DEPENDENCIES);

    ScanReport {
        project_name: project_name.into(),
        scan_timestamp: Utc::now(),
        ecosystems_seen,
        total_dependency_count,
        unique_license_count: license_distribution.len(),
        overall_risk,
        risk_counts,
        dependencies,
        license_distribution,
        issues,
        manifest_errors: Vec::new(),
    }
}

/// Count records per exact (case-sensitive) license string.
fn license_distribution(records: &[DependencyRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.license.clone()).or_insert(0) += 1;
    }
    counts
}

/// Raise at most one issue per record.
///
/// The copyleft check matches upper-case `GPL` only, unlike
/// [`classify`](crate::license::classify) which is case-insensitive.
fn issue_for(dep: &DependencyRecord) -> Option<Issue> {
    let package = format!("{} v{}", dep.name, dep.declared_version);

    if dep.license.contains("GPL") {
        Some(Issue {
            severity: RiskLevel::High,
            title: format!("{} Conflict", dep.license),
            package,
            description: "Strong copyleft license requires source code disclosure".to_string(),
            recommendation: format!(
                "Replace {} with a permissive alternative or comply with {} terms",
                dep.name, dep.license
            ),
        })
    } else if dep.license == UNKNOWN_LICENSE {
        Some(Issue {
            severity: RiskLevel::Medium,
            title: "Unknown License".to_string(),
            package,
            description: "Cannot determine usage rights".to_string(),
            recommendation: format!(
                "Contact {} maintainer for license clarification",
                dep.name
            ),
        })
    } else {
        None
    }
}
