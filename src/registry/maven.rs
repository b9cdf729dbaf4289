use quick_xml::events::Event;
use quick_xml::Reader;
use serde_json::Value;
use tracing::debug;

use super::{endpoint, RegistryClient, Resolution};
use crate::error::RegistryError;

/// The search API carries no license data, so any hit is reported with this
/// value and labeled [`LicenseSource::Defaulted`](crate::models::LicenseSource).
pub const MAVEN_PLACEHOLDER_LICENSE: &str = "Apache-2.0";

impl RegistryClient {
    /// Look up a Maven artifact on Maven Central.
    ///
    /// The `name` is expected in `groupId:artifactId` format (as stored in our models).
    pub async fn maven_license(&self, name: &str) -> Result<Resolution, RegistryError> {
        let Some((group_id, artifact_id)) = name.split_once(':') else {
            return Ok(Resolution::unresolved());
        };

        let url = endpoint(
            &self.config.maven_search_url,
            &format!(
                "solrsearch/select?q=g:{}+AND+a:{}&rows=1&wt=json",
                group_id, artifact_id
            ),
        );
        let data = self.get_json(&url).await?;

        let Some(doc) = data
            .pointer("/response/docs")
            .and_then(Value::as_array)
            .and_then(|docs| docs.first())
        else {
            return Ok(Resolution::unresolved());
        };

        if self.config.resolve_maven_pom {
            if let Some(version) = doc.get("latestVersion").and_then(Value::as_str) {
                match self.maven_pom_license(group_id, artifact_id, version).await {
                    Ok(Some(license)) => return Ok(Resolution::registry(license)),
                    Ok(None) => {}
                    Err(e) => debug!(package = name, error = %e, "POM license lookup failed"),
                }
            }
        }

        Ok(Resolution::defaulted(MAVEN_PLACEHOLDER_LICENSE))
    }

    /// Download `{group}/{artifact}/{version}/{artifact}-{version}.pom` and read its license.
    async fn maven_pom_license(
        &self,
        group_id: &str,
        artifact_id: &str,
        version: &str,
    ) -> Result<Option<String>, RegistryError> {
        let url = endpoint(
            &self.config.maven_repo_url,
            &format!(
                "{}/{}/{}/{}-{}.pom",
                group_id.replace('.', "/"),
                artifact_id,
                version,
                artifact_id,
                version
            ),
        );

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(RegistryError::Status {
                status: response.status().as_u16(),
            });
        }

        let pom = response.text().await?;
        Ok(extract_license_from_pom(&pom))
    }
}

/// First `<licenses><license><name>` text in a POM document.
fn extract_license_from_pom(xml: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut path: Vec<Vec<u8>> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => path.push(e.local_name().as_ref().to_vec()),
            Ok(Event::End(_)) => {
                path.pop();
            }
            Ok(Event::Text(text)) if is_license_name(&path) => {
                return text
                    .unescape()
                    .ok()
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty());
            }
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
    }
}

fn is_license_name(path: &[Vec<u8>]) -> bool {
    match path {
        [.., licenses, license, name] => {
            licenses.as_slice() == b"licenses"
                && license.as_slice() == b"license"
                && name.as_slice() == b"name"
        }
        _ => false,
    }
}
