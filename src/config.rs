use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

/// Root configuration structure, deserialized from `.license-scanner/config.toml`.
///
/// Every section is optional; missing keys fall back to [`Config::default`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub registry: RegistryConfig,
    pub github: GithubConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on a `/scan/upload` request body.
    pub max_upload_bytes: usize,
    /// Parent directory for per-request staging directories. Defaults to the
    /// system temp directory.
    pub scratch_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_upload_bytes: 10 * 1024 * 1024,
            scratch_dir: None,
        }
    }
}

/// Package registry endpoints and lookup behaviour.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub npm_url: String,
    pub pypi_url: String,
    pub maven_search_url: String,
    pub maven_repo_url: String,
    pub crates_url: String,
    /// Sent with every registry request; crates.io rejects anonymous clients.
    pub user_agent: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
    /// Maximum in-flight lookups per manifest.
    pub max_concurrent_lookups: usize,
    /// Fetch the artifact POM to find the real license instead of the
    /// Maven placeholder.
    pub resolve_maven_pom: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            npm_url: "https://registry.npmjs.org".to_string(),
            pypi_url: "https://pypi.org".to_string(),
            maven_search_url: "https://search.maven.org".to_string(),
            maven_repo_url: "https://repo1.maven.org/maven2".to_string(),
            crates_url: "https://crates.io".to_string(),
            user_agent: format!("license-scanner/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            max_concurrent_lookups: 8,
            resolve_maven_pom: false,
        }
    }
}

impl RegistryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub api_url: String,
    /// Timeout for the contents listing and manifest downloads.
    pub timeout_secs: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            timeout_secs: 60,
        }
    }
}

impl GithubConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `tracing` filter; `LICENSE_SCANNER_LOG` takes precedence.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Reject values that would make every lookup fail or stall.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.registry.max_concurrent_lookups > 0,
            "registry.max_concurrent_lookups must be at least 1"
        );
        ensure!(
            self.registry.timeout_secs > 0,
            "registry.timeout_secs must be greater than 0"
        );
        ensure!(
            self.github.timeout_secs > 0,
            "github.timeout_secs must be greater than 0"
        );
        Ok(())
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override`, the path passed via `--config`
/// 2. `./.license-scanner/config.toml`
/// 3. `~/.config/license-scanner/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(config_override: Option<&Path>) -> Result<Config> {
    let config = match locate_config(config_override) {
        Some(path) => read_config(&path)?,
        None => Config::default(),
    };
    config.validate()?;
    Ok(config)
}

fn locate_config(config_override: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = config_override {
        return Some(path.to_path_buf());
    }

    let local = Path::new(".license-scanner").join("config.toml");
    if local.exists() {
        return Some(local);
    }

    let home_config = dirs::home_dir()?
        .join(".config")
        .join("license-scanner")
        .join("config.toml");
    home_config.exists().then_some(home_config)
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Invalid config {}", path.display()))
}
