mod cli;
mod commands;
mod config;

use clap::Parser;

use crate::cli::Commands;
use crate::commands::{handle_config_command, handle_fetch_command, handle_import_command};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    match cli.command {
        Commands::Import {
            page,
            page_url,
            url,
            title_format,
            summary_format,
            crosspost_label,
            output,
        } => {
            let submitted = commands::import::SubmittedOptions {
                url,
                title_format,
                summary_format,
                crosspost_label,
            };
            handle_import_command(&page, &page_url, submitted, output.as_deref()).await?;
        }
        Commands::Fetch { url } => handle_fetch_command(url).await?,
        Commands::Config { command } => handle_config_command(command).await?,
    }

    Ok(())
}
