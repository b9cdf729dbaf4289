use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

use super::{DeclaredDependency, ManifestParser};
use crate::error::ManifestError;
use crate::models::Ecosystem;

const MAVEN_POM_NS: &[u8] = b"http://maven.apache.org/POM/4.0.0";

/// Parser for Maven `pom.xml`.
///
/// Only elements in the Maven 4.0.0 namespace are considered; a POM without the
/// `xmlns` declaration yields no dependencies.
pub struct MavenParser;

impl ManifestParser for MavenParser {
    fn manifest(&self) -> &'static str {
        "pom.xml"
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Java
    }

    fn parse(&self, content: &str) -> Result<Vec<DeclaredDependency>, ManifestError> {
        parse_pom_xml(content)
    }
}

#[derive(Clone, Copy)]
enum Coordinate {
    GroupId,
    ArtifactId,
    Version,
}

impl Coordinate {
    fn from_local_name(name: &[u8]) -> Option<Self> {
        match name {
            b"groupId" => Some(Self::GroupId),
            b"artifactId" => Some(Self::ArtifactId),
            b"version" => Some(Self::Version),
            _ => None,
        }
    }
}

/// A `<dependency>` element that is still open.
struct OpenDependency {
    depth: usize,
    group_id: Option<String>,
    artifact_id: Option<String>,
    version: Option<String>,
}

impl OpenDependency {
    fn new(depth: usize) -> Self {
        Self {
            depth,
            group_id: None,
            artifact_id: None,
            version: None,
        }
    }

    /// First occurrence of each coordinate wins.
    fn set(&mut self, coordinate: Coordinate, value: String) {
        let slot = match coordinate {
            Coordinate::GroupId => &mut self.group_id,
            Coordinate::ArtifactId => &mut self.artifact_id,
            Coordinate::Version => &mut self.version,
        };
        slot.get_or_insert(value);
    }

    fn finish(self) -> Option<DeclaredDependency> {
        let group_id = self.group_id?;
        let artifact_id = self.artifact_id?;
        let version = self
            .version
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "latest".to_string());
        Some(DeclaredDependency::new(
            format!("{}:{}", group_id, artifact_id),
            version,
        ))
    }
}

/// Collect every namespaced `<dependency>` at any depth (including
/// `dependencyManagement` and plugin dependencies). Elements missing
/// `groupId` or `artifactId` are skipped.
fn parse_pom_xml(content: &str) -> Result<Vec<DeclaredDependency>, ManifestError> {
    let mut reader = NsReader::from_str(content);

    let mut deps = Vec::new();
    let mut depth: usize = 0;
    let mut open: Vec<OpenDependency> = Vec::new();
    // Coordinate element being read: (which, its depth, accumulated text)
    let mut capture: Option<(Coordinate, usize, String)> = None;

    loop {
        let (ns, event) = reader
            .read_resolved_event()
            .map_err(|e| ManifestError::Xml(e.to_string()))?;

        match event {
            Event::Start(e) => {
                depth += 1;
                if !is_maven(&ns) {
                    continue;
                }
                let local = e.local_name();
                if local.as_ref() == b"dependency" {
                    open.push(OpenDependency::new(depth));
                } else if let Some(coordinate) = Coordinate::from_local_name(local.as_ref()) {
                    if open.last().is_some_and(|d| d.depth + 1 == depth) {
                        capture = Some((coordinate, depth, String::new()));
                    }
                }
            }
            Event::Empty(e) => {
                // `<version/>` is present but empty
                if !is_maven(&ns) {
                    continue;
                }
                if let Some(coordinate) = Coordinate::from_local_name(e.local_name().as_ref()) {
                    if let Some(dep) = open.last_mut().filter(|d| d.depth == depth) {
                        dep.set(coordinate, String::new());
                    }
                }
            }
            Event::Text(text) => {
                if let Some((_, _, buf)) = capture.as_mut() {
                    let text = text
                        .unescape()
                        .map_err(|e| ManifestError::Xml(e.to_string()))?;
                    buf.push_str(&text);
                }
            }
            Event::CData(cdata) => {
                if let Some((_, _, buf)) = capture.as_mut() {
                    let text = std::str::from_utf8(&cdata)
                        .map_err(|e| ManifestError::Xml(e.to_string()))?;
                    buf.push_str(text);
                }
            }
            Event::End(_) => {
                if capture.as_ref().is_some_and(|(_, at, _)| *at == depth) {
                    if let (Some((coordinate, _, value)), Some(dep)) =
                        (capture.take(), open.last_mut())
                    {
                        dep.set(coordinate, value.trim().to_string());
                    }
                }
                if open.last().is_some_and(|d| d.depth == depth) {
                    if let Some(dep) = open.pop().and_then(OpenDependency::finish) {
                        deps.push(dep);
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(deps)
}

fn is_maven(ns: &ResolveResult) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(uri)) if *uri == MAVEN_POM_NS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pom_xml() {
        let xml = r#"<?xml version="1.0"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <groupId>com.example</groupId>
  <version>1.0.0</version>
  <dependencies>
    <dependency>
      <groupId>org.apache.commons</groupId>
      <artifactId>commons-lang3</artifactId>
      <version>3.12.0</version>
    </dependency>
    <dependency>
      <groupId>junit</groupId>
      <artifactId>junit</artifactId>
      <scope>test</scope>
    </dependency>
  </dependencies>
</project>"#;

        let deps = parse_pom_xml(xml).unwrap();
        assert_eq!(
            deps,
            vec![
                DeclaredDependency::new("org.apache.commons:commons-lang3", "3.12.0"),
                DeclaredDependency::new("junit:junit", "latest"),
            ]
        );
    }

    #[test]
    fn test_dependency_without_group_is_skipped() {
        let xml = r#"<project xmlns="http://maven.apache.org/POM/4.0.0">
  <dependencies>
    <dependency><artifactId>orphan</artifactId><version>1.0</version></dependency>
    <dependency><groupId>g</groupId><artifactId>a</artifactId><version>2.0</version></dependency>
  </dependencies>
</project>"#;

        let deps = parse_pom_xml(xml).unwrap();
        assert_eq!(deps, vec![DeclaredDependency::new("g:a", "2.0")]);
    }

    #[test]
    fn test_exclusion_coordinates_are_ignored() {
        let xml = r#"<project xmlns="http://maven.apache.org/POM/4.0.0">
  <dependencies>
    <dependency>
      <groupId>org.springframework</groupId>
      <artifactId>spring-core</artifactId>
      <exclusions>
        <exclusion><groupId>commons-logging</groupId><artifactId>commons-logging</artifactId></exclusion>
      </exclusions>
      <version>5.3.23</version>
    </dependency>
  </dependencies>
</project>"#;

        let deps = parse_pom_xml(xml).unwrap();
        assert_eq!(
            deps,
            vec![DeclaredDependency::new("org.springframework:spring-core", "5.3.23")]
        );
    }

    #[test]
    fn test_managed_dependencies_are_included() {
        let xml = r#"<project xmlns="http://maven.apache.org/POM/4.0.0">
  <dependencyManagement>
    <dependencies>
      <dependency><groupId>io.netty</groupId><artifactId>netty-bom</artifactId><version>4.1.0</version></dependency>
    </dependencies>
  </dependencyManagement>
</project>"#;

        let deps = parse_pom_xml(xml).unwrap();
        assert_eq!(deps, vec![DeclaredDependency::new("io.netty:netty-bom", "4.1.0")]);
    }

    #[test]
    fn test_cdata_coordinates() {
        let xml = r#"<project xmlns="http://maven.apache.org/POM/4.0.0">
  <dependencies>
    <dependency>
      <groupId><![CDATA[com.example]]></groupId>
      <artifactId>widget</artifactId>
      <version><![CDATA[1.2]]></version>
    </dependency>
    <dependency>
      <groupId>org.acme</groupId>
      <artifactId>split</artifactId>
      <version>2.<![CDATA[0-<rc1>]]></version>
    </dependency>
  </dependencies>
</project>"#;

        let deps = parse_pom_xml(xml).unwrap();
        assert_eq!(
            deps,
            vec![
                DeclaredDependency::new("com.example:widget", "1.2"),
                DeclaredDependency::new("org.acme:split", "2.0-<rc1>"),
            ]
        );
    }

    #[test]
    fn test_pom_without_namespace_yields_nothing() {
        let xml = r#"<project>
  <dependencies>
    <dependency><groupId>junit</groupId><artifactId>junit</artifactId></dependency>
  </dependencies>
</project>"#;

        assert!(parse_pom_xml(xml).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_xml() {
        let xml = r#"<project xmlns="http://maven.apache.org/POM/4.0.0"><dependencies></project>"#;
        assert!(matches!(parse_pom_xml(xml), Err(ManifestError::Xml(_))));
    }
}
