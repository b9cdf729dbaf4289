use serde_json::Value;

use super::{endpoint, RegistryClient, Resolution};
use crate::error::RegistryError;

impl RegistryClient {
    /// Fetch the license for a crate from crates.io.
    ///
    /// crates.io refuses requests without an identifying `User-Agent`; the
    /// client sends the configured one on every call.
    pub async fn crates_license(&self, name: &str) -> Result<Resolution, RegistryError> {
        let url = endpoint(&self.config.crates_url, &format!("api/v1/crates/{}", name));

        let data = self.get_json(&url).await?;
        Ok(Resolution::from_field(extract_license(&data)))
    }
}

/// `crate.license`, or the license of the newest entry in `versions`.
fn extract_license(data: &Value) -> Option<String> {
    data.pointer("/crate/license")
        .and_then(Value::as_str)
        .or_else(|| data.pointer("/versions/0/license").and_then(Value::as_str))
        .map(str::to_string)
}
