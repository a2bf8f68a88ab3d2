//! Command handlers for the File Stockpiler CLI
//!
//! Handlers sit between parsed arguments and the library: they resolve the
//! effective options (saved config, flags, prompts), build the crawler, and
//! print the final summary.

use std::path::Path;

use tracing::{info, warn};

use crate::app::{Crawler, ExtensionMatching, ListingClient};
use crate::cli::prompt::Prompter;
use crate::cli::{ConfigAction, ConfigArgs, ConsoleProgress, GlobalArgs, OptionOverrides, RunArgs};
use crate::config::{parse_format_list, AppConfig};
use crate::errors::{AppError, ConfigError, Result};

/// Apply command-line overrides on top of loaded options
pub fn apply_overrides(config: &mut AppConfig, overrides: &OptionOverrides) {
    if let Some(url) = &overrides.url {
        config.target_url = url.trim().to_string();
    }
    if let Some(formats) = &overrides.download_formats {
        config.download_file_formats = parse_format_list(formats);
    }
    if let Some(formats) = &overrides.check_formats {
        config.local_check_file_formats = parse_format_list(formats);
    }
    if overrides.case_insensitive {
        config.extension_matching = ExtensionMatching::CaseInsensitive;
    }
}

fn is_interactive(args: &RunArgs) -> bool {
    !args.no_prompt && atty::is(atty::Stream::Stdin) && atty::is(atty::Stream::Stdout)
}

/// Resolve the options a run will use, prompting when allowed
async fn resolve_run_options(global: &GlobalArgs, args: &RunArgs) -> Result<AppConfig> {
    let config_path = AppConfig::resolve_path(global.config.as_deref())?;
    let saved_exists = config_path.exists();
    let mut config = AppConfig::load(global.config.clone()).await?;
    let interactive = is_interactive(args);

    if interactive && saved_exists && args.options.is_empty() {
        config = Prompter::stdio().review_saved(config)?;
    }

    apply_overrides(&mut config, &args.options);
    config.normalize();

    let mut save = args.save;
    if interactive && !config.missing_fields().is_empty() {
        let outcome = Prompter::stdio().fill_missing(&mut config)?;
        config.normalize();
        save |= outcome.save_requested;
    }

    if let Some(field) = config.missing_fields().first() {
        return Err(ConfigError::MissingField {
            field: field.to_string(),
        }
        .into());
    }

    if save {
        match config.save(&config_path).await {
            Ok(()) => println!("Options saved!"),
            Err(e) => {
                warn!("Failed to save options: {}", e);
                println!("Error during saving options! details:");
                println!("{}", e);
            }
        }
    }

    Ok(config)
}

/// Handle the run command
///
/// Resolves options, crawls the listing page and downloads missing files.
/// Only pre-flight failures are returned as errors; per-file failures end up
/// in the failure log and the summary.
pub async fn handle_run(global: &GlobalArgs, args: RunArgs) -> Result<()> {
    args.validate().map_err(AppError::generic)?;

    let config = resolve_run_options(global, &args).await?;
    info!(
        "Crawling {} for [{}], checking [{}]",
        config.target_url,
        config.download_file_formats.join(","),
        config.local_check_file_formats.join(",")
    );

    let mut crawler_config = config.crawler_config(&args.root);
    if let Some(output_dir) = &args.output_dir {
        crawler_config.output_dir = output_dir.clone();
    }
    crawler_config.dry_run = args.dry_run;

    let client = ListingClient::with_config(&config.client.to_runtime_config())?;
    let mut crawler = Crawler::new(crawler_config, &client, &client)?
        .with_observer(Box::new(ConsoleProgress::new(args.dry_run)));

    let summary = crawler.run().await?;
    println!("{}", summary);

    if let Some(log) = crawler.failure_log().filter(|log| log.has_entries()) {
        println!("Failure details written to {}", log.path().display());
    }
    Ok(())
}

/// Handle the config command
pub async fn handle_config(global: &GlobalArgs, args: ConfigArgs) -> Result<()> {
    let path = AppConfig::resolve_path(global.config.as_deref())?;

    match args.action {
        ConfigAction::Path => {
            println!("{}", path.display());
        }
        ConfigAction::Show => show_config(&path).await?,
        ConfigAction::Reset => {
            if AppConfig::remove(&path).await? {
                println!("Removed saved options at {}", path.display());
            } else {
                println!("No saved options at {}", path.display());
            }
        }
        ConfigAction::Set {
            options,
            case_sensitive,
        } => {
            if options.is_empty() && !case_sensitive {
                return Err(AppError::generic(
                    "Nothing to set. Pass --url, --download-formats, --check-formats or a case flag",
                ));
            }

            let mut config = AppConfig::load(global.config.clone()).await?;
            apply_overrides(&mut config, &options);
            if case_sensitive {
                config.extension_matching = ExtensionMatching::CaseSensitive;
            }
            config.normalize();

            if let Err(e) = config.validate() {
                warn!("Saved options are not ready for a run yet: {}", e);
            }
            config.save(&path).await?;
            println!("Options saved to {}", path.display());
        }
    }
    Ok(())
}

async fn show_config(path: &Path) -> Result<()> {
    if !path.exists() {
        println!("No saved options at {}", path.display());
        return Ok(());
    }

    let config = AppConfig::load_from_file(path).await?;
    let rendered = toml::to_string_pretty(&config).map_err(ConfigError::from)?;
    println!("# {}", path.display());
    print!("{}", rendered);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_overrides() {
        let mut config = AppConfig {
            target_url: "http://old/".to_string(),
            download_file_formats: vec!["zip".to_string()],
            ..Default::default()
        };
        let overrides = OptionOverrides {
            url: Some(" http://new/roms/ ".to_string()),
            check_formats: Some("chd, .7z".to_string()),
            case_insensitive: true,
            ..Default::default()
        };

        apply_overrides(&mut config, &overrides);

        assert_eq!(config.target_url, "http://new/roms/");
        assert_eq!(config.download_file_formats, vec!["zip"]);
        assert_eq!(config.local_check_file_formats, vec!["chd", "7z"]);
        assert_eq!(config.extension_matching, ExtensionMatching::CaseInsensitive);
    }

    #[tokio::test]
    async fn test_run_without_options_fails_when_not_interactive() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        AppConfig::default().save(&config_path).await.unwrap();

        let global = GlobalArgs {
            verbose: false,
            very_verbose: false,
            quiet: true,
            config: Some(config_path),
        };
        let args = RunArgs {
            options: OptionOverrides::default(),
            root: temp_dir.path().to_path_buf(),
            output_dir: None,
            dry_run: true,
            no_prompt: true,
            save: false,
        };

        let result = handle_run(&global, args).await;
        assert!(matches!(
            result,
            Err(AppError::Config(ConfigError::MissingField { .. }))
        ));
    }

    #[tokio::test]
    async fn test_config_set_then_show() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let global = GlobalArgs {
            verbose: false,
            very_verbose: false,
            quiet: true,
            config: Some(config_path.clone()),
        };

        // An explicit config path must exist before it is loaded
        AppConfig::default().save(&config_path).await.unwrap();

        let args = ConfigArgs {
            action: ConfigAction::Set {
                options: OptionOverrides {
                    url: Some("http://host/roms/".to_string()),
                    download_formats: Some("zip".to_string()),
                    check_formats: Some("zip,chd".to_string()),
                    case_insensitive: false,
                },
                case_sensitive: false,
            },
        };
        handle_config(&global, args).await.unwrap();

        let saved = AppConfig::load(Some(config_path)).await.unwrap();
        assert!(saved.validate().is_ok());
        assert_eq!(saved.local_check_file_formats, vec!["zip", "chd"]);
    }
}
