//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `update`: Extract messages from a bundle's templates and merge them
//!   into its translation files
//! - `init`: Initialize trawl configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }
}

#[derive(Debug, Args)]
pub struct UpdateCommand {
    /// Locale of the translation files (e.g. fr, pt_BR)
    pub locale: String,

    /// Bundle name from the config file, or path to the bundle directory
    pub bundle: String,

    /// Prefix for the placeholder value of new messages (overrides config file)
    #[arg(long)]
    pub prefix: Option<String>,

    /// Print the merged messages
    #[arg(long)]
    pub dump_messages: bool,

    /// Write the merged messages to the translation files
    #[arg(long)]
    pub force: bool,

    /// Project root directory
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Update the translation files of a bundle from its templates
    Update(UpdateCommand),
    /// Initialize a new .trawlrc.json configuration file
    Init,
}
