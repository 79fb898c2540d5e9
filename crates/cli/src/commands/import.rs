use std::path::Path;
use std::sync::Arc;

use crosspost_engine::form::FieldSnapshot;
use crosspost_engine::import::UNSUPPORTED_PAGE_MESSAGE;
use crosspost_engine::{HtmlForm, Importer, is_supported_page};
use crosspost_types::{ImportOutcome, Options, TemplateFormat};
use eyre::Result;
use serde::Serialize;
use tokio::fs;
use tracing::info;

use crate::config::Config;

/// Options given on the command line. Anything left out keeps its saved value.
#[derive(Debug, Default)]
pub struct SubmittedOptions {
    pub url: Option<String>,
    pub title_format: Option<TemplateFormat>,
    pub summary_format: Option<TemplateFormat>,
    pub crosspost_label: Option<bool>,
}

impl SubmittedOptions {
    fn apply(self, options: &mut Options) {
        if let Some(url) = self.url {
            options.url = url.trim().to_string();
        }
        if let Some(format) = self.title_format {
            options.title_format = format;
        }
        if let Some(format) = self.summary_format {
            options.summary_format = format;
        }
        if let Some(label) = self.crosspost_label {
            options.ao3_crosspost_label = label;
        }
    }
}

#[derive(Serialize)]
struct ImportReport<'a> {
    outcome: &'a ImportOutcome,
    fields: Vec<FieldSnapshot>,
}

pub async fn handle_import_command(
    page: &Path,
    page_url: &str,
    submitted: SubmittedOptions,
    output: Option<&Path>,
) -> Result<()> {
    if !is_supported_page(page_url) {
        return Err(eyre::eyre!(UNSUPPORTED_PAGE_MESSAGE));
    }

    let mut config = Config::load().await?;
    submitted.apply(&mut config.settings.options);
    config.save().await?;
    let config = Config::load().await?;

    if config.settings.options.url.is_empty() {
        return Err(eyre::eyre!(
            "No work to import. Pass --url or set options.url first"
        ));
    }

    let html = fs::read_to_string(page).await?;
    let mut form = HtmlForm::parse(&html)?;

    info!("📥 Importing {} into {}", config.settings.options.url, page_url);
    let importer = Importer::new(Arc::new(super::transport(&config)));
    let outcome = importer.run(page_url, &mut form, &config.settings).await;

    let report = ImportReport {
        outcome: &outcome,
        fields: form.fields(),
    };
    let rendered = serde_json::to_string_pretty(&report)?;
    println!("{}", rendered);

    if let Some(path) = output {
        fs::write(path, &rendered).await?;
        println!("💾 Saved to {}", path.display());
    }

    match outcome {
        ImportOutcome::Error { message } => Err(eyre::eyre!(message)),
        ImportOutcome::PartialSuccess { warning } => {
            println!("⚠️  {}", warning);
            Ok(())
        }
        ImportOutcome::Success => {
            println!("✅ Import complete");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_submitted_options_change() {
        let mut options = Options {
            url: "https://archiveofourown.org/works/1".to_string(),
            ..Options::default()
        };

        SubmittedOptions {
            title_format: Some(TemplateFormat::Blank),
            crosspost_label: Some(false),
            ..SubmittedOptions::default()
        }
        .apply(&mut options);

        assert_eq!(options.url, "https://archiveofourown.org/works/1");
        assert_eq!(options.title_format, TemplateFormat::Blank);
        assert_eq!(options.summary_format, TemplateFormat::Default);
        assert!(!options.ao3_crosspost_label);
    }

    #[test]
    fn test_submitted_url_is_trimmed() {
        let mut options = Options::default();
        SubmittedOptions {
            url: Some("  https://archiveofourown.org/works/2\n".to_string()),
            ..SubmittedOptions::default()
        }
        .apply(&mut options);

        assert_eq!(options.url, "https://archiveofourown.org/works/2");
    }
}
