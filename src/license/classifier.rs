use crate::models::RiskLevel;

/// Classify a free-text license string into a risk tier.
///
/// Matching is case-insensitive and the first rule that fires wins:
/// - contains `gpl` or `agpl` → [`RiskLevel::High`]
/// - equals `unknown` or contains `unlicensed` → [`RiskLevel::Medium`]
/// - anything else, including the empty string → [`RiskLevel::Low`]
///
/// This is independent of the case-sensitive `GPL` check used when
/// raising issues in [`crate::report::assemble`].
pub fn classify(license: &str) -> RiskLevel {
    let lower = license.to_lowercase();

    if lower.contains("gpl") || lower.contains("agpl") {
        return RiskLevel::High;
    }

    if lower == "unknown" || lower.contains("unlicensed") {
        return RiskLevel::Medium;
    }

    RiskLevel::Low
}
