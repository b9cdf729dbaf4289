use license_scanner::config::RegistryConfig;
use license_scanner::models::{Ecosystem, LicenseSource};
use license_scanner::registry::{RegistryClient, Resolution};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> RegistryClient {
    let uri = server.uri();
    RegistryClient::new(&RegistryConfig {
        npm_url: uri.clone(),
        pypi_url: uri.clone(),
        maven_search_url: uri.clone(),
        maven_repo_url: format!("{}/maven2", uri),
        crates_url: uri,
        user_agent: "license-scanner-tests/1.0".to_string(),
        ..RegistryConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_npm_latest_version_license() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/left-pad"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "left-pad",
            "dist-tags": { "latest": "1.3.0" },
            "versions": {
                "1.0.0": { "license": "BSD" },
                "1.3.0": { "license": "WTFPL" }
            }
        })))
        .mount(&server)
        .await;

    let resolution = client_for(&server).npm_license("left-pad").await.unwrap();
    assert_eq!(resolution, Resolution::registry("WTFPL"));
}

#[tokio::test]
async fn test_npm_not_found_resolves_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/no-such-package"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.npm_license("no-such-package").await.is_err());

    let resolution = client.resolve(Ecosystem::JavaScript, "no-such-package").await;
    assert_eq!(resolution.license, "Unknown");
    assert_eq!(resolution.source, LicenseSource::Unresolved);
}

#[tokio::test]
async fn test_pypi_classifier_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pypi/flask/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "info": {
                "license": "",
                "classifiers": [
                    "Framework :: Flask",
                    "License :: OSI Approved :: BSD License"
                ]
            }
        })))
        .mount(&server)
        .await;

    let resolution = client_for(&server)
        .resolve(Ecosystem::Python, "flask")
        .await;
    assert_eq!(resolution, Resolution::registry("BSD License"));
}

#[tokio::test]
async fn test_pypi_malformed_body_resolves_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pypi/broken/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let resolution = client_for(&server).resolve(Ecosystem::Python, "broken").await;
    assert_eq!(resolution, Resolution::unresolved());
}

#[tokio::test]
async fn test_crates_io_sends_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/crates/serde"))
        .and(header("user-agent", "license-scanner-tests/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "crate": { "name": "serde", "license": "MIT OR Apache-2.0" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resolution = client_for(&server).resolve(Ecosystem::Rust, "serde").await;
    assert_eq!(resolution, Resolution::registry("MIT OR Apache-2.0"));
}

#[tokio::test]
async fn test_maven_hit_is_defaulted_placeholder() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/solrsearch/select"))
        .and(query_param("rows", "1"))
        .and(query_param("wt", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": { "numFound": 1, "docs": [ { "g": "junit", "a": "junit", "latestVersion": "4.13.2" } ] }
        })))
        .mount(&server)
        .await;

    let resolution = client_for(&server).resolve(Ecosystem::Java, "junit:junit").await;
    assert_eq!(resolution.license, "Apache-2.0");
    assert_eq!(resolution.source, LicenseSource::Defaulted);
}

#[tokio::test]
async fn test_maven_no_docs_is_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/solrsearch/select"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": { "numFound": 0, "docs": [] }
        })))
        .mount(&server)
        .await;

    let resolution = client_for(&server)
        .resolve(Ecosystem::Java, "com.example:missing")
        .await;
    assert_eq!(resolution, Resolution::unresolved());
}

#[tokio::test]
async fn test_maven_pom_lookup_when_enabled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/solrsearch/select"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": { "docs": [ { "latestVersion": "1.2.13" } ] }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/maven2/ch/qos/logback/logback-classic/1.2.13/logback-classic-1.2.13.pom"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<project xmlns="http://maven.apache.org/POM/4.0.0">
  <licenses>
    <license><name>Eclipse Public License - v 1.0</name></license>
    <license><name>GNU Lesser General Public License</name></license>
  </licenses>
</project>"#,
        ))
        .mount(&server)
        .await;

    let uri = server.uri();
    let client = RegistryClient::new(&RegistryConfig {
        maven_search_url: uri.clone(),
        maven_repo_url: format!("{}/maven2", uri),
        resolve_maven_pom: true,
        ..RegistryConfig::default()
    })
    .unwrap();

    let resolution = client
        .resolve(Ecosystem::Java, "ch.qos.logback:logback-classic")
        .await;
    assert_eq!(resolution, Resolution::registry("Eclipse Public License - v 1.0"));
}

#[tokio::test]
async fn test_go_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let resolution = client_for(&server)
        .resolve(Ecosystem::Go, "github.com/foo/bar")
        .await;
    assert_eq!(resolution, Resolution::not_queried());
}
