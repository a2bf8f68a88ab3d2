//! Command-line argument parsing for File Stockpiler
//!
//! This module defines the CLI structure using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// File Stockpiler - download what a listing page has and you don't
#[derive(Parser, Debug)]
#[command(
    name = "file_stockpiler",
    version,
    about = "Download files from a directory-listing page that are missing locally",
    long_about = "Reads the links on a directory-listing page, keeps the ones with the configured
extensions, skips any whose name already exists locally under one of the check extensions
(anywhere under the working directory), and downloads the rest one at a time.
Failures are written to fails.txt (or fails1.txt, fails2.txt, ... if taken)."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl the listing page and download missing files
    Run(RunArgs),

    /// Show or edit saved options
    Config(ConfigArgs),
}

/// Options shared by `run` and `config set`
#[derive(Args, Debug, Clone, Default)]
pub struct OptionOverrides {
    /// Listing page URL
    #[arg(short, long, value_name = "URL")]
    pub url: Option<String>,

    /// Extensions to download, comma separated (e.g. "zip,7z")
    #[arg(short = 'd', long, value_name = "EXTS")]
    pub download_formats: Option<String>,

    /// Extensions to look for locally, comma separated, in priority order
    #[arg(short = 'c', long, value_name = "EXTS")]
    pub check_formats: Option<String>,

    /// Compare extensions and local filenames ignoring case
    #[arg(long)]
    pub case_insensitive: bool,
}

impl OptionOverrides {
    /// Whether any option was given
    pub fn is_empty(&self) -> bool {
        self.url.is_none()
            && self.download_formats.is_none()
            && self.check_formats.is_none()
            && !self.case_insensitive
    }
}

/// Arguments for the run command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub options: OptionOverrides,

    /// Directory to scan for existing files and write downloads and logs to
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Write downloads here instead of the root directory
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// List what would be downloaded without downloading
    #[arg(long)]
    pub dry_run: bool,

    /// Never prompt; fail if options are missing
    #[arg(long)]
    pub no_prompt: bool,

    /// Save the effective options after a successful setup
    #[arg(long)]
    pub save: bool,
}

impl RunArgs {
    /// Validate run arguments
    pub fn validate(&self) -> Result<(), String> {
        if self.root.as_os_str().is_empty() {
            return Err("--root cannot be empty".to_string());
        }
        if let Some(dir) = &self.output_dir {
            if dir.as_os_str().is_empty() {
                return Err("--output-dir cannot be empty".to_string());
            }
        }
        Ok(())
    }
}

/// Arguments for config management
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the saved options
    Show,

    /// Print the config file location
    Path,

    /// Delete the saved options
    Reset,

    /// Update saved options
    Set {
        #[command(flatten)]
        options: OptionOverrides,

        /// Switch back to case-sensitive comparison
        #[arg(long, conflicts_with = "case_insensitive")]
        case_sensitive: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Log level implied by the global flags
    pub fn log_level(&self) -> &'static str {
        if self.global.very_verbose {
            "debug"
        } else if self.global.verbose {
            "info"
        } else if self.global.quiet {
            "error"
        } else {
            "warn"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_command() {
        let cli = Cli::try_parse_from([
            "file_stockpiler",
            "run",
            "--url",
            "http://host/roms/",
            "-d",
            "zip",
            "--check-formats",
            "zip,chd",
            "--dry-run",
        ])
        .unwrap();

        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.options.url.as_deref(), Some("http://host/roms/"));
                assert_eq!(args.options.download_formats.as_deref(), Some("zip"));
                assert_eq!(args.options.check_formats.as_deref(), Some("zip,chd"));
                assert!(args.dry_run);
                assert_eq!(args.root, PathBuf::from("."));
                assert!(args.validate().is_ok());
            }
            other => panic!("Expected run command, got {:?}", other),
        }
    }

    #[test]
    fn test_log_levels() {
        let cli = Cli::try_parse_from(["file_stockpiler", "config", "show"]).unwrap();
        assert_eq!(cli.log_level(), "warn");

        let cli = Cli::try_parse_from(["file_stockpiler", "-v", "config", "show"]).unwrap();
        assert_eq!(cli.log_level(), "info");

        let cli = Cli::try_parse_from(["file_stockpiler", "config", "path", "--very-verbose"])
            .unwrap();
        assert_eq!(cli.log_level(), "debug");
    }

    #[test]
    fn test_config_set_conflicting_case_flags() {
        let result = Cli::try_parse_from([
            "file_stockpiler",
            "config",
            "set",
            "--case-insensitive",
            "--case-sensitive",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_is_empty() {
        assert!(OptionOverrides::default().is_empty());
        let overrides = OptionOverrides {
            case_insensitive: true,
            ..Default::default()
        };
        assert!(!overrides.is_empty());
    }
}
