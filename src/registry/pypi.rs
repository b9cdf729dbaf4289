use serde_json::Value;

use super::{endpoint, RegistryClient, Resolution};
use crate::error::RegistryError;

impl RegistryClient {
    /// Fetch the license for a Python package from PyPI.
    pub async fn pypi_license(&self, name: &str) -> Result<Resolution, RegistryError> {
        let url = endpoint(&self.config.pypi_url, &format!("pypi/{}/json", name));

        let data = self.get_json(&url).await?;
        Ok(Resolution::from_field(extract_license(&data)))
    }
}

/// Read `info.license`, falling back to the first `License ::` trove classifier.
fn extract_license(data: &Value) -> Option<String> {
    let info = data.get("info")?;

    let declared = info
        .get("license")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|l| !l.is_empty());
    if let Some(license) = declared {
        return Some(license.to_string());
    }

    // "License :: OSI Approved :: BSD License" → "BSD License"
    info.get("classifiers")?
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .find(|c| c.contains("License ::"))
        .and_then(|c| c.rsplit("::").next())
        .map(|l| l.trim().to_string())
}
