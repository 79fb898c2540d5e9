use std::path::PathBuf;

use crosspost_types::TemplateFormat;
use url::Url;

#[derive(clap::Parser, Debug)]
#[clap(version, about = "Import a work's metadata and text into a posting form")]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Fill a saved posting form with a work fetched from the archive
    Import {
        /// The saved posting page to fill in
        #[clap(long)]
        page: PathBuf,
        /// The address the posting page was saved from
        #[clap(long)]
        page_url: String,
        /// Work to import (defaults to the last one used)
        #[clap(long)]
        url: Option<String>,
        /// How to build the title: blank, orig, custom or default
        #[clap(long, value_parser = crate::config::parse_format)]
        title_format: Option<TemplateFormat>,
        /// How to build the summary: blank, orig, custom or default
        #[clap(long, value_parser = crate::config::parse_format)]
        summary_format: Option<TemplateFormat>,
        /// Add the "Cross-Posted from AO3" tag (true or false)
        #[clap(long, action = clap::ArgAction::Set)]
        crosspost_label: Option<bool>,
        /// Also write the outcome and filled fields to this file
        #[clap(long)]
        output: Option<PathBuf>,
    },
    /// Fetch and parse a work, printing what would be imported
    Fetch { url: Url },
    /// Manage configuration
    Config {
        #[clap(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand, Debug)]
pub enum ConfigCommands {
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., options.title_format)
        key: String,
        /// Configuration value
        value: String,
    },
    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },
    /// Show all configuration
    Show,
    /// Reset configuration to defaults
    Reset {
        /// Skip confirmation prompt
        #[clap(long)]
        force: bool,
    },
}
