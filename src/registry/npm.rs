use serde_json::Value;

use super::{endpoint, RegistryClient, Resolution};
use crate::error::RegistryError;

impl RegistryClient {
    /// Fetch the license of the latest published version of an npm package.
    pub async fn npm_license(&self, name: &str) -> Result<Resolution, RegistryError> {
        // Scoped packages need URL encoding: @scope/pkg → %40scope%2Fpkg
        let encoded_name = name.replace('@', "%40").replace('/', "%2F");
        let url = endpoint(&self.config.npm_url, &encoded_name);

        let data = self.get_json(&url).await?;
        Ok(Resolution::from_field(extract_license(&data)))
    }
}

/// Follow `dist-tags.latest` into `versions` and read its `license`.
///
/// Older packages publish `{ "type": "MIT", "url": ... }` instead of a string.
fn extract_license(data: &Value) -> Option<String> {
    let latest = data
        .get("dist-tags")
        .and_then(|d| d.get("latest"))
        .and_then(Value::as_str)
        .unwrap_or_default();

    let license = data
        .get("versions")
        .and_then(|vs| vs.get(latest))
        .and_then(|v| v.get("license"))?;

    match license {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj.get("type").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}
