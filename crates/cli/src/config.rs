use std::path::{Path, PathBuf};

use crosspost_types::{Settings, TemplateFormat};
use directories::ProjectDirs;
use eyre::Result;
use serde::{Deserialize, Serialize};
use tokio::fs;
use url::Url;

/// Keys accepted by `config get` and `config set`.
pub const KEYS: [&str; 7] = [
    "options.url",
    "options.ao3_crosspost_label",
    "options.title_format",
    "options.summary_format",
    "title_template.default",
    "summary_template.default",
    "session_cookie",
];

/// Everything the CLI persists between runs.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(flatten)]
    pub settings: Settings,
    /// Cookie header sent when a work is only visible to logged in users.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_cookie: Option<String>,
}

impl Config {
    pub fn get_config_path() -> PathBuf {
        get_default_config_dir().join("config.json")
    }

    pub async fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()).await
    }

    pub async fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()).await
    }

    pub async fn reset() -> Result<Self> {
        let config = Self::default();
        config.save().await?;
        Ok(config)
    }

    /// Loads the configuration at `path`, writing the defaults there first if
    /// nothing exists yet.
    pub async fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let default_config = Self::default();
            default_config.save_to(path).await?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        Ok(())
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();
        let options = &mut self.settings.options;

        match parts.as_slice() {
            ["options", "url"] => {
                options.url = parse_work_url(value)?;
            }
            ["options", "ao3_crosspost_label"] => {
                options.ao3_crosspost_label = value
                    .parse::<bool>()
                    .map_err(|_| eyre::eyre!("Invalid boolean value: {}", value))?;
            }
            ["options", "title_format"] => {
                options.title_format = parse_format(value).map_err(|e| eyre::eyre!(e))?;
            }
            ["options", "summary_format"] => {
                options.summary_format = parse_format(value).map_err(|e| eyre::eyre!(e))?;
            }
            ["title_template", "default"] => {
                self.settings.title_template.template = value.to_string();
            }
            ["summary_template", "default"] => {
                self.settings.summary_template.template = value.to_string();
            }
            ["session_cookie"] => {
                self.session_cookie = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            _ => {
                return Err(unknown_key(key));
            }
        }

        Ok(())
    }

    pub fn get_value(&self, key: &str) -> Result<String> {
        let parts: Vec<&str> = key.split('.').collect();
        let options = &self.settings.options;

        let value = match parts.as_slice() {
            ["options", "url"] => options.url.clone(),
            ["options", "ao3_crosspost_label"] => options.ao3_crosspost_label.to_string(),
            ["options", "title_format"] => options.title_format.to_string(),
            ["options", "summary_format"] => options.summary_format.to_string(),
            ["title_template", "default"] => self.settings.title_template.template.clone(),
            ["summary_template", "default"] => self.settings.summary_template.template.clone(),
            ["session_cookie"] => self.session_cookie.clone().unwrap_or_default(),
            _ => {
                return Err(unknown_key(key));
            }
        };

        Ok(value)
    }

    pub fn show_all(&self) -> String {
        let options = &self.settings.options;
        let url = if options.url.is_empty() {
            "(not set)"
        } else {
            options.url.as_str()
        };

        format!(
            "Configuration:\n\
             Options:\n\
             ├─ url: {}\n\
             ├─ ao3_crosspost_label: {}\n\
             ├─ title_format: {}\n\
             └─ summary_format: {}\n\
             Templates:\n\
             ├─ title_template: {}\n\
             └─ summary_template: {}\n\
             Session:\n\
             └─ session_cookie: {}",
            url,
            options.ao3_crosspost_label,
            options.title_format,
            options.summary_format,
            self.settings.title_template.template,
            self.settings.summary_template.template,
            if self.session_cookie.is_some() {
                "(set)"
            } else {
                "(not set)"
            },
        )
    }
}

fn unknown_key(key: &str) -> eyre::Report {
    eyre::eyre!(
        "Unknown configuration key: {} (known keys: {})",
        key,
        KEYS.join(", ")
    )
}

/// Parses a title or summary format, rejecting anything but the four known
/// names. Shared by `config set` and the import flags.
pub fn parse_format(value: &str) -> std::result::Result<TemplateFormat, String> {
    match value {
        "blank" => Ok(TemplateFormat::Blank),
        "orig" => Ok(TemplateFormat::Orig),
        "custom" => Ok(TemplateFormat::Custom),
        "default" => Ok(TemplateFormat::Default),
        _ => Err(format!(
            "Invalid format: {} (expected blank, orig, custom or default)",
            value
        )),
    }
}

/// An empty value clears the work; anything else must be an absolute web URL.
fn parse_work_url(value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(String::new());
    }

    let url = Url::parse(value).map_err(|e| eyre::eyre!("Invalid work URL: {}: {}", value, e))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(eyre::eyre!("Invalid work URL: {} is not a web address", value));
    }
    Ok(value.to_string())
}

/// Get the default configuration directory
fn get_default_config_dir() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("org", "crosspost", "crosspost") {
        proj_dirs.config_dir().to_path_buf()
    } else {
        // Fallback to current directory if we can't determine project dirs
        PathBuf::from(".crosspost").join("config")
    }
}
