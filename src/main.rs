//! `license-scanner`: scan dependency manifests, resolve licenses from package
//! registries, and report compliance risk.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load config ([`config::load_config`]) and initialise `tracing`.
//! 3. `serve`: run the HTTP API ([`server::serve`]).
//! 4. `scan`: scan a local directory ([`scanner::Scanner`]) and render the
//!    report ([`report`]). Exit `1` when the overall risk is high.

mod cli;

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use cli::{Cli, Command, ReportFormat};
use license_scanner::config::{self, Config};
use license_scanner::models::RiskLevel;
use license_scanner::report;
use license_scanner::scanner::Scanner;
use license_scanner::server;

const LOG_ENV: &str = "LICENSE_SCANNER_LOG";

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("license-scanner error: {error:#}");
        std::process::exit(2);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut config = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            init_tracing(&config.logging.level)?;
            server::serve(&config).await
        }
        Command::Scan {
            path,
            report,
            verbose,
            quiet,
        } => {
            // Log lines share the terminal with the report; keep them quiet by default.
            init_tracing(if verbose { config.logging.level.as_str() } else { "warn" })?;
            let high_risk = scan(&config, &path, report, verbose, quiet).await?;
            if high_risk {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

/// Returns whether the overall risk is high.
async fn scan(
    config: &Config,
    path: &Path,
    format: ReportFormat,
    verbose: bool,
    quiet: bool,
) -> Result<bool> {
    let path = path
        .canonicalize()
        .with_context(|| format!("cannot access {}", path.display()))?;
    anyhow::ensure!(path.is_dir(), "{} is not a directory", path.display());

    let scanner = Scanner::from_config(&config.registry).context("failed to build registry client")?;

    let spinner = (!quiet && format == ReportFormat::Terminal).then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Scanning {}", path.display()));
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    });

    let scan_report = scanner.scan(&path).await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    match format {
        ReportFormat::Terminal => report::terminal::render(&scan_report, verbose, quiet)?,
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&scan_report)?),
    }

    Ok(scan_report.overall_risk == RiskLevel::High)
}

fn init_tracing(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
