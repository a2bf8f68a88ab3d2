//! File Stockpiler CLI application
//!
//! Crawls a directory-listing page and downloads the files that are not
//! already present locally.

use std::process;

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use file_stockpiler::cli::{handle_config, handle_run, Cli, Commands};
use file_stockpiler::errors::Result;

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let mut source = std::error::Error::source(&e);
        while let Some(cause) = source {
            eprintln!("  caused by: {}", cause);
            source = cause.source();
        }
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(&cli);

    info!("File Stockpiler v{} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Run(args) => {
            info!("Executing run command");
            handle_run(&cli.global, args).await
        }
        Commands::Config(args) => {
            info!("Executing config command");
            handle_config(&cli.global, args).await
        }
    }
}

/// Initialize logging based on CLI verbosity settings
fn init_logging(cli: &Cli) {
    let mut filter = EnvFilter::from_default_env();
    match format!("file_stockpiler={}", cli.log_level()).parse() {
        Ok(directive) => filter = filter.add_directive(directive),
        Err(e) => eprintln!("Ignoring invalid log directive: {}", e),
    }

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(cli.global.very_verbose)
        .with_writer(std::io::stderr)
        .init();

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}
