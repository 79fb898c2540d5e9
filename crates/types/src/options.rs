use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a destination title or summary is produced.
///
/// `Default` is also what every unrecognized stored value decodes to, and it
/// behaves exactly like `Orig`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateFormat {
    /// Leave the field empty.
    Blank,
    /// Pass the source field through unchanged.
    Orig,
    /// Render the user's template.
    Custom,
    #[default]
    #[serde(other)]
    Default,
}

impl fmt::Display for TemplateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateFormat::Blank => write!(f, "blank"),
            TemplateFormat::Orig => write!(f, "orig"),
            TemplateFormat::Custom => write!(f, "custom"),
            TemplateFormat::Default => write!(f, "default"),
        }
    }
}

impl FromStr for TemplateFormat {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "blank" => TemplateFormat::Blank,
            "orig" => TemplateFormat::Orig,
            "custom" => TemplateFormat::Custom,
            _ => TemplateFormat::Default,
        })
    }
}

/// Options submitted with an import request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredOptions")]
pub struct Options {
    /// The work to import from.
    pub url: String,
    /// Append the "Cross-Posted from AO3" freeform tag.
    pub ao3_crosspost_label: bool,
    pub title_format: TemplateFormat,
    pub summary_format: TemplateFormat,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            url: String::new(),
            ao3_crosspost_label: true,
            title_format: TemplateFormat::Default,
            summary_format: TemplateFormat::Default,
        }
    }
}

/// Options as they may exist in storage, including records written before
/// the format fields existed.
#[derive(Deserialize)]
struct StoredOptions {
    #[serde(default)]
    url: String,
    #[serde(default = "default_crosspost_label")]
    ao3_crosspost_label: bool,
    title_format: Option<TemplateFormat>,
    summary_format: Option<TemplateFormat>,
    #[serde(default)]
    transform_title: bool,
    #[serde(default)]
    transform_summary: bool,
}

fn default_crosspost_label() -> bool {
    true
}

fn legacy_format(transform: bool) -> TemplateFormat {
    if transform {
        TemplateFormat::Default
    } else {
        TemplateFormat::Orig
    }
}

impl From<StoredOptions> for Options {
    fn from(stored: StoredOptions) -> Self {
        Self {
            url: stored.url.trim().to_string(),
            ao3_crosspost_label: stored.ao3_crosspost_label,
            title_format: stored
                .title_format
                .unwrap_or_else(|| legacy_format(stored.transform_title)),
            summary_format: stored
                .summary_format
                .unwrap_or_else(|| legacy_format(stored.transform_summary)),
        }
    }
}

/// A user-editable template, stored as `{"default": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRecord {
    #[serde(rename = "default")]
    pub template: String,
}

impl TemplateRecord {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }
}

/// Everything an import reads from the settings store, passed in as one
/// bundle so the engine never touches storage itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub options: Options,
    #[serde(default = "default_title_template")]
    pub title_template: TemplateRecord,
    #[serde(default = "default_summary_template")]
    pub summary_template: TemplateRecord,
}

fn default_title_template() -> TemplateRecord {
    TemplateRecord::new("${title}")
}

fn default_summary_template() -> TemplateRecord {
    TemplateRecord::new("${summary}")
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            options: Options::default(),
            title_template: default_title_template(),
            summary_template: default_summary_template(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_format_decodes_as_default() {
        let format: TemplateFormat = serde_json::from_str("\"fancy\"").unwrap();
        assert_eq!(format, TemplateFormat::Default);
        assert_eq!("fancy".parse::<TemplateFormat>().unwrap(), TemplateFormat::Default);
    }

    #[test]
    fn test_legacy_options_are_migrated() {
        let options: Options = serde_json::from_str(
            r#"{"url": " https://archiveofourown.org/works/1 ", "ao3_crosspost_label": false,
                "transform_title": true, "transform_summary": false}"#,
        )
        .unwrap();

        assert_eq!(options.url, "https://archiveofourown.org/works/1");
        assert!(!options.ao3_crosspost_label);
        assert_eq!(options.title_format, TemplateFormat::Default);
        assert_eq!(options.summary_format, TemplateFormat::Orig);
    }

    #[test]
    fn test_explicit_formats_win_over_legacy_flags() {
        let options: Options = serde_json::from_str(
            r#"{"title_format": "custom", "summary_format": "blank", "transform_title": false}"#,
        )
        .unwrap();

        assert!(options.ao3_crosspost_label);
        assert_eq!(options.title_format, TemplateFormat::Custom);
        assert_eq!(options.summary_format, TemplateFormat::Blank);
    }

    #[test]
    fn test_settings_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.title_template.template, "${title}");
        assert_eq!(settings.summary_template.template, "${summary}");

        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["summary_template"]["default"], "${summary}");
        assert_eq!(json["options"]["title_format"], "default");
    }
}
