//! Command-line interface components
//!
//! This module contains CLI-specific code: argument parsing, command
//! handlers, interactive prompts, and console progress output.

pub mod args;
pub mod commands;
pub mod progress;
pub mod prompt;

pub use args::{Cli, Commands, ConfigAction, ConfigArgs, GlobalArgs, OptionOverrides, RunArgs};
pub use commands::{apply_overrides, handle_config, handle_run};
pub use progress::ConsoleProgress;
pub use prompt::{Prompter, SetupOutcome};
