use serde::Deserialize;
use toml::Value;

use super::{DeclaredDependency, ManifestParser};
use crate::error::ManifestError;
use crate::models::Ecosystem;

#[derive(Debug, Deserialize)]
struct CargoManifest {
    #[serde(default)]
    dependencies: toml::Table,
}

/// Parser for the `[dependencies]` table of a `Cargo.toml`.
pub struct CargoParser;

impl ManifestParser for CargoParser {
    fn manifest(&self) -> &'static str {
        "Cargo.toml"
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Rust
    }

    fn parse(&self, content: &str) -> Result<Vec<DeclaredDependency>, ManifestError> {
        let manifest: CargoManifest = toml::from_str(content)?;

        manifest
            .dependencies
            .into_iter()
            .map(|(name, spec)| {
                let version = match &spec {
                    Value::String(v) => v.clone(),
                    // { version = "1", features = [...] }, or a path/git table without one
                    Value::Table(t) => t
                        .get("version")
                        .and_then(Value::as_str)
                        .unwrap_or("latest")
                        .to_string(),
                    other => {
                        return Err(ManifestError::Invalid(format!(
                            "dependency `{}` has unsupported value {}",
                            name, other
                        )))
                    }
                };
                Ok(DeclaredDependency::new(name, version))
            })
            .collect()
    }
}
