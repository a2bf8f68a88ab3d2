//! Interactive option setup
//!
//! When run from a terminal, the user is asked whether to reuse saved options
//! and is prompted for anything still missing. Prompts read whole lines from
//! any `BufRead`, so the flow can be driven by tests.

use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::config::{parse_format_list, AppConfig};
use crate::constants::formats;

/// Outcome of the interactive setup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SetupOutcome {
    /// Whether any value was entered interactively
    pub changed: bool,
    /// Whether the user asked to save
    pub save_requested: bool,
}

/// Line-based prompter
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<io::StdinLock<'static>, io::Stdout> {
    /// Prompter on the process's stdin and stdout
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `message` and read one trimmed line; EOF reads as empty
    pub fn ask(&mut self, message: &str) -> io::Result<String> {
        writeln!(self.output, "{}", message)?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    /// Ask a yes/no question; only answers starting with `y` count as yes
    pub fn confirm(&mut self, message: &str) -> io::Result<bool> {
        let answer = self.ask(&format!("{} (y/n):", message))?;
        Ok(answer.to_lowercase().starts_with('y'))
    }

    /// Ask for a comma-separated format list, falling back to `defaults`
    fn ask_formats(&mut self, message: &str, defaults: &[&str]) -> io::Result<Vec<String>> {
        let answer = self.ask(message)?;
        let parsed = parse_format_list(&answer);
        if parsed.is_empty() {
            Ok(defaults.iter().map(|s| s.to_string()).collect())
        } else {
            Ok(parsed)
        }
    }

    /// Ask whether saved options should be reused
    ///
    /// Declining clears the crawl options; client and failure log settings
    /// are kept.
    pub fn review_saved(&mut self, saved: AppConfig) -> io::Result<AppConfig> {
        if self.confirm("Continue with saved options?")? {
            return Ok(saved);
        }

        debug!("Discarding saved crawl options");
        Ok(AppConfig {
            client: saved.client,
            failure_log: saved.failure_log,
            ..Default::default()
        })
    }

    /// Prompt for every missing field of `config`
    pub fn fill_missing(&mut self, config: &mut AppConfig) -> io::Result<SetupOutcome> {
        let mut outcome = SetupOutcome::default();

        while config.target_url.is_empty() {
            config.target_url = self.ask("Type the target url:")?;
            outcome.changed = true;
            if config.target_url.is_empty() && !self.confirm("No url given. Try again?")? {
                break;
            }
        }

        if config.download_file_formats.is_empty() {
            config.download_file_formats = self.ask_formats(
                &format!(
                    "Type the file formats to download (separated by \",\" default: {}):",
                    formats::DEFAULT_DOWNLOAD_FORMATS.join(",")
                ),
                formats::DEFAULT_DOWNLOAD_FORMATS,
            )?;
            outcome.changed = true;
        }

        if config.local_check_file_formats.is_empty() {
            config.local_check_file_formats = self.ask_formats(
                &format!(
                    "Type the file formats to locally check if the file already exists (separated by \",\" default: {}):",
                    formats::DEFAULT_CHECK_FORMATS.join(",")
                ),
                formats::DEFAULT_CHECK_FORMATS,
            )?;
            outcome.changed = true;
        }

        if outcome.changed {
            outcome.save_requested = self.confirm("Would you like to save options?")?;
        }
        Ok(outcome)
    }
}
