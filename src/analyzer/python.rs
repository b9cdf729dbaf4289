use super::{DeclaredDependency, ManifestParser};
use crate::error::ManifestError;
use crate::models::Ecosystem;

/// Parser for pip `requirements.txt`.
pub struct PythonParser;

impl ManifestParser for PythonParser {
    fn manifest(&self) -> &'static str {
        "requirements.txt"
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Python
    }

    fn parse(&self, content: &str) -> Result<Vec<DeclaredDependency>, ManifestError> {
        parse_requirements_txt(content)
    }
}

/// One requirement per non-blank, non-comment line.
///
/// `==`, `>=` and `<=` are treated as separators: `django>=4.2` yields
/// (`django`, `4.2`) and a bare `requests` yields (`requests`, `latest`).
fn parse_requirements_txt(content: &str) -> Result<Vec<DeclaredDependency>, ManifestError> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| {
            let spaced = line
                .replace("==", " ")
                .replace(">=", " ")
                .replace("<=", " ");
            let mut tokens = spaced.split_whitespace();

            let name = tokens.next().ok_or_else(|| {
                ManifestError::Invalid(format!("requirement without a package name: {}", line))
            })?;
            let version = tokens.next().unwrap_or("latest");

            Ok(DeclaredDependency::new(name, version))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_requirements_txt() {
        let content = "# comment\n\
                       requests==2.28.1\n\
                       \n\
                       flask>=2.0.0\n\
                       numpy<=1.24.0\n\
                       rich\n";

        let deps = parse_requirements_txt(content).unwrap();
        assert_eq!(
            deps,
            vec![
                DeclaredDependency::new("requests", "2.28.1"),
                DeclaredDependency::new("flask", "2.0.0"),
                DeclaredDependency::new("numpy", "1.24.0"),
                DeclaredDependency::new("rich", "latest"),
            ]
        );
    }

    #[test]
    fn test_indented_comment_is_skipped() {
        let deps = parse_requirements_txt("   # pinned below\ndjango==4.2.0\n").unwrap();
        assert_eq!(deps, vec![DeclaredDependency::new("django", "4.2.0")]);
    }

    #[test]
    fn test_operator_only_line_fails() {
        assert!(parse_requirements_txt("==\n").is_err());
    }
}
