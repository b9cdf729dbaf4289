use serde_json::{Map, Value};

use super::{DeclaredDependency, ManifestParser};
use crate::error::ManifestError;
use crate::models::Ecosystem;

/// Parser for `package.json`.
pub struct NodeParser;

impl ManifestParser for NodeParser {
    fn manifest(&self) -> &'static str {
        "package.json"
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::JavaScript
    }

    fn parse(&self, content: &str) -> Result<Vec<DeclaredDependency>, ManifestError> {
        parse_package_json(content)
    }
}

/// Extract `dependencies` and `devDependencies`.
///
/// The two maps are merged like an object spread: a package listed in both
/// keeps its first position but takes the `devDependencies` version.
fn parse_package_json(content: &str) -> Result<Vec<DeclaredDependency>, ManifestError> {
    let json: Value = serde_json::from_str(content)?;
    let root = json
        .as_object()
        .ok_or_else(|| ManifestError::Invalid("package.json root is not an object".into()))?;

    let mut merged: Map<String, Value> = Map::new();
    for section in ["dependencies", "devDependencies"] {
        match root.get(section) {
            None => {}
            Some(Value::Object(pkgs)) => {
                for (name, version) in pkgs {
                    merged.insert(name.clone(), version.clone());
                }
            }
            Some(_) => {
                return Err(ManifestError::Invalid(format!(
                    "`{}` is not an object",
                    section
                )))
            }
        }
    }

    merged
        .into_iter()
        .map(|(name, version)| {
            let range = version.as_str().ok_or_else(|| {
                ManifestError::Invalid(format!("version of `{}` is not a string", name))
            })?;
            let version = range.trim_start_matches(|c| c == '^' || c == '~');
            Ok(DeclaredDependency::new(name, version))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_package_json() {
        let json = r#"{
  "name": "my-app",
  "dependencies": {
    "express": "^4.18.2",
    "lodash": "~4.17.21"
  },
  "devDependencies": {
    "jest": "29.0.0"
  }
}"#;
        let deps = parse_package_json(json).unwrap();
        assert_eq!(
            deps,
            vec![
                DeclaredDependency::new("express", "4.18.2"),
                DeclaredDependency::new("lodash", "4.17.21"),
                DeclaredDependency::new("jest", "29.0.0"),
            ]
        );
    }

    #[test]
    fn test_dev_dependency_overrides_in_place() {
        let json = r#"{
  "dependencies": { "typescript": "^4.0.0", "react": "^18.2.0" },
  "devDependencies": { "typescript": "^5.4.0" }
}"#;
        let deps = parse_package_json(json).unwrap();
        assert_eq!(deps.len(), 2);
        assert_eq!(deps[0], DeclaredDependency::new("typescript", "5.4.0"));
        assert_eq!(deps[1].name, "react");
    }

    #[test]
    fn test_no_dependency_sections() {
        let deps = parse_package_json(r#"{ "name": "empty" }"#).unwrap();
        assert!(deps.is_empty());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            parse_package_json("{ \"dependencies\": "),
            Err(ManifestError::Json(_))
        ));
    }

    #[test]
    fn test_non_string_version_fails() {
        let json = r#"{ "dependencies": { "local": { "path": "../local" } } }"#;
        assert!(matches!(
            parse_package_json(json),
            Err(ManifestError::Invalid(_))
        ));
    }
}
