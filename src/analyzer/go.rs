use super::{DeclaredDependency, ManifestParser};
use crate::error::ManifestError;
use crate::models::Ecosystem;

/// Parser for `go.mod`.
///
/// Only `require ( ... )` blocks are read; single-line `require` directives,
/// `replace` and `exclude` are ignored. No registry is consulted for Go modules.
pub struct GoModParser;

impl ManifestParser for GoModParser {
    fn manifest(&self) -> &'static str {
        "go.mod"
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Go
    }

    fn parse(&self, content: &str) -> Result<Vec<DeclaredDependency>, ManifestError> {
        Ok(parse_go_mod(content))
    }
}

fn parse_go_mod(content: &str) -> Vec<DeclaredDependency> {
    let mut deps = Vec::new();
    let mut in_require = false;

    for line in content.lines().map(str::trim) {
        if !in_require {
            in_require = line
                .strip_prefix("require")
                .is_some_and(|rest| rest.trim_start().starts_with('('));
            continue;
        }

        if line == ")" {
            in_require = false;
            continue;
        }

        if line.is_empty() || line.starts_with("//") {
            continue;
        }

        let mut parts = line.split_whitespace();
        if let (Some(name), Some(version)) = (parts.next(), parts.next()) {
            deps.push(DeclaredDependency::new(name, version));
        }
    }

    deps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_require_block() {
        let content = "module example.com/app\n\
                       \n\
                       go 1.21\n\
                       \n\
                       require (\n\
                       \tgithub.com/foo/bar v1.2.3\n\
                       \t// pinned for CVE fix\n\
                       \tgolang.org/x/text v0.14.0 // indirect\n\
                       )\n";

        assert_eq!(
            parse_go_mod(content),
            vec![
                DeclaredDependency::new("github.com/foo/bar", "v1.2.3"),
                DeclaredDependency::new("golang.org/x/text", "v0.14.0"),
            ]
        );
    }

    #[test]
    fn test_lines_outside_block_are_ignored() {
        let content = "module example.com/app\n\
                       require github.com/single/line v1.0.0\n\
                       replace github.com/a/b => ../b\n";
        assert!(parse_go_mod(content).is_empty());
    }

    #[test]
    fn test_multiple_blocks() {
        let content = "require (\n  a.io/x v1.0.0\n)\n\nrequire (\n  b.io/y v2.0.0\n)\n";
        let deps = parse_go_mod(content);
        assert_eq!(deps.len(), 2);
        assert_eq!(deps[1].name, "b.io/y");
    }

    #[test]
    fn test_empty_block() {
        assert!(parse_go_mod("module m\nrequire (\n)\n").is_empty());
    }
}
