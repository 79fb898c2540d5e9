use eyre::Result;
use std::io::{self, Write};

use crosspost_engine::fetch::normalize_work_url;

use crate::cli::ConfigCommands;
use crate::config::{Config, KEYS};

pub async fn handle_config_command(cmd: ConfigCommands) -> Result<()> {
    match cmd {
        ConfigCommands::Set { key, value } => handle_set_config(key, value).await,
        ConfigCommands::Get { key } => handle_get_config(key).await,
        ConfigCommands::Show => handle_show_config().await,
        ConfigCommands::Reset { force } => handle_reset_config(force).await,
    }
}

async fn handle_set_config(key: String, value: String) -> Result<()> {
    let mut config = Config::load().await?;

    if let Err(e) = config.set_value(&key, &value) {
        println!("❌ Failed to set configuration: {}", e);
        return Err(e);
    }

    config.save().await?;
    for line in describe_update(&key, &config) {
        println!("{}", line);
    }
    Ok(())
}

/// Lines echoed after a successful `config set`. The cookie is never echoed,
/// and a work URL is shown the way it will be fetched.
fn describe_update(key: &str, config: &Config) -> Vec<String> {
    if key == "session_cookie" {
        let state = if config.session_cookie.is_some() {
            "saved"
        } else {
            "cleared"
        };
        return vec![format!("✅ Session cookie {}", state)];
    }

    let value = config.get_value(key).unwrap_or_default();
    let mut lines = vec![format!("✅ Configuration updated: {} = {}", key, value)];
    if key == "options.url" && !value.is_empty() {
        match normalize_work_url(&value) {
            Ok(url) => lines.push(format!("   Work will be fetched from {}", url)),
            Err(e) => lines.push(format!("⚠️  {}", e)),
        }
    }
    lines
}

async fn handle_get_config(key: String) -> Result<()> {
    let config = Config::load().await?;

    match config.get_value(&key) {
        Ok(value) => {
            println!("{}: {}", key, value);
            Ok(())
        }
        Err(e) => {
            println!("❌ Failed to get configuration: {}", e);
            Err(e)
        }
    }
}

async fn handle_show_config() -> Result<()> {
    let config = Config::load().await?;
    println!("{}", config.show_all());
    println!("📁 {}", Config::get_config_path().display());
    println!("🔑 Keys: {}", KEYS.join(", "));
    Ok(())
}

async fn handle_reset_config(force: bool) -> Result<()> {
    if !force {
        let config = Config::load().await?;
        if config.session_cookie.is_some() {
            println!("⚠️  The saved session cookie will be removed as well.");
        }
        print!("Reset the work URL, formats and templates to their defaults? (y/N): ");
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if !input.trim().to_lowercase().starts_with('y') {
            println!("❌ Cancelled");
            return Ok(());
        }
    }

    Config::reset().await?;
    println!("✅ Configuration reset to defaults");
    Ok(())
}
