use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "license-scanner",
    about = "Scan project dependencies and report license compliance risk",
    version
)]
pub struct Cli {
    /// Config file [default: ./.license-scanner/config.toml, fallback ~/.config/license-scanner/config.toml]
    #[arg(long, global = true, env = "LICENSE_SCANNER_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API
    Serve {
        /// Bind address (overrides `server.host`)
        #[arg(long)]
        host: Option<String>,

        /// Listen port (overrides `server.port`)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Scan a local project directory
    Scan {
        /// Project path to scan
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Report format
        #[arg(long, default_value = "terminal", value_name = "FORMAT")]
        report: ReportFormat,

        /// Show all dependencies (not just medium/high risk)
        #[arg(short, long)]
        verbose: bool,

        /// Only print summary line
        #[arg(short, long, conflicts_with = "verbose")]
        quiet: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_scan_defaults() {
        let cli = Cli::try_parse_from(["license-scanner", "scan"]).unwrap();
        match cli.command {
            Command::Scan {
                path,
                report,
                verbose,
                quiet,
            } => {
                assert_eq!(path, PathBuf::from("."));
                assert_eq!(report, ReportFormat::Terminal);
                assert!(!verbose && !quiet);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli = Cli::try_parse_from([
            "license-scanner",
            "serve",
            "--port",
            "9000",
            "--config",
            "custom.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert!(matches!(cli.command, Command::Serve { port: Some(9000), .. }));
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["license-scanner", "scan", "-q", "-v"]).is_err());
    }
}
