//! Runs one import from start to finish.

use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use crosspost_types::{ImportOutcome, ImportResult, Settings, WorkContent, WorkMetadata};
use futures::FutureExt;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{error, info, warn};

use crate::error::{Error, Result};
use crate::fetch::WorkFetcher;
use crate::form::DestinationForm;
use crate::http::PageTransport;
use crate::mapper::{self, MappingReport};
use crate::parser;

pub const PARTIAL_IMPORT_WARNING: &str = "Warning: some data could not be imported, the most likely reason is that you set your AO3 preferences to hide warnings or tags";

pub const UNHANDLED_ERROR_PREFIX: &str =
    "Unhandled error while importing metadata and filling in the form";

static ADD_CHAPTER_PAGES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"https://squidgeworld\.org/works/[0-9]+/chapters/new",
        r"https://squidgeworld\.org/works/[0-9]+/chapters/[0-9]+/edit",
        r"https://archiveofourown\.org/works/[0-9]+/chapters/new",
        r"https://archiveofourown\.org/works/[0-9]+/chapters/[0-9]+/edit",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

static WORK_PAGES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"https://squidgeworld\.org/works/new",
        r"https://squidgeworld\.org/collections/(.*)/works/new",
        r"https://squidgeworld\.org/works/[0-9]+/edit",
        r"https://archiveofourown\.org/works/new",
        r"https://archiveofourown\.org/collections/(.*)/works/new",
        r"https://archiveofourown\.org/works/[0-9]+/edit",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// Shown instead of the import form on any other page.
pub const UNSUPPORTED_PAGE_MESSAGE: &str = "This extension can only be used on AO3 or Squidgeworld to create a new work, create a new work in a collection, or edit an existing work. Please go to a supported URL and try again. To create a new work go to https://archiveofourown.org/works/new";

/// Whether an import can run against the page at `page_url`.
pub fn is_supported_page(page_url: &str) -> bool {
    WORK_PAGES
        .iter()
        .chain(ADD_CHAPTER_PAGES.iter())
        .any(|pattern| pattern.is_match(page_url))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Creating or editing a whole work.
    NewWork,
    /// Adding or editing a single chapter of an existing work.
    AddChapter,
}

impl ImportMode {
    pub fn from_page_url(page_url: &str) -> Self {
        if ADD_CHAPTER_PAGES
            .iter()
            .any(|pattern| pattern.is_match(page_url))
        {
            ImportMode::AddChapter
        } else {
            ImportMode::NewWork
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStage {
    Idle,
    Fetching,
    Parsing,
    Mapping,
    Done,
}

impl fmt::Display for ImportStage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ImportStage::Idle => write!(f, "idle"),
            ImportStage::Fetching => write!(f, "fetching"),
            ImportStage::Parsing => write!(f, "parsing"),
            ImportStage::Mapping => write!(f, "mapping"),
            ImportStage::Done => write!(f, "done"),
        }
    }
}

impl ImportStage {
    fn advance(&mut self, next: ImportStage) {
        info!(from = %self, to = %next, "Import stage changed");
        *self = next;
    }

    /// Failures in these stages carry a message meant for the user.
    fn reports_verbatim(self) -> bool {
        matches!(self, ImportStage::Fetching | ImportStage::Parsing)
    }
}

pub struct Importer {
    fetcher: WorkFetcher,
}

impl Importer {
    pub fn new(transport: Arc<dyn PageTransport>) -> Self {
        Self {
            fetcher: WorkFetcher::new(transport),
        }
    }

    /// Fetches and parses the work at `url` without touching any form.
    #[tracing::instrument(skip(self))]
    pub async fn import_work(&self, url: &str) -> ImportResult {
        let mut stage = ImportStage::Idle;
        match self.fetch_work(url, &mut stage).await {
            Ok((metadata, data)) => ImportResult::Success { metadata, data },
            Err(e) => ImportResult::Error {
                message: e.to_string(),
            },
        }
    }

    /// Imports the work named in `settings` into the form of the page at
    /// `page_url`.
    ///
    /// This never fails and never panics: every problem is folded into the
    /// returned outcome.
    #[tracing::instrument(skip(self, form, settings))]
    pub async fn run(
        &self,
        page_url: &str,
        form: &mut dyn DestinationForm,
        settings: &Settings,
    ) -> ImportOutcome {
        let mode = ImportMode::from_page_url(page_url);
        info!(?mode, url = %settings.options.url, "Starting import");

        let mut stage = ImportStage::Idle;
        let result = AssertUnwindSafe(self.fill(mode, form, settings, &mut stage))
            .catch_unwind()
            .await;

        let outcome = match result {
            Ok(Ok(report)) if report.is_partial() => ImportOutcome::PartialSuccess {
                warning: PARTIAL_IMPORT_WARNING.to_string(),
            },
            Ok(Ok(_)) => ImportOutcome::Success,
            Ok(Err(e)) if stage.reports_verbatim() => {
                warn!(%stage, "Import failed: {e}");
                ImportOutcome::Error {
                    message: e.to_string(),
                }
            }
            Ok(Err(e)) => {
                error!(%stage, "Import failed: {e:?}");
                ImportOutcome::Error {
                    message: format!("{UNHANDLED_ERROR_PREFIX}: {e}: {e:?}"),
                }
            }
            Err(payload) => {
                let e = Error::Unhandled(if let Some(s) = payload.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = payload.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                });
                error!(%stage, "Import panicked: {e}");
                ImportOutcome::Error {
                    message: format!("{UNHANDLED_ERROR_PREFIX}: {e}"),
                }
            }
        };

        stage.advance(ImportStage::Done);
        outcome
    }

    async fn fill(
        &self,
        mode: ImportMode,
        form: &mut dyn DestinationForm,
        settings: &Settings,
        stage: &mut ImportStage,
    ) -> Result<MappingReport> {
        let (metadata, content) = self.fetch_work(&settings.options.url, stage).await?;

        stage.advance(ImportStage::Mapping);
        match mode {
            ImportMode::NewWork => {
                let mut report = mapper::apply_metadata(form, &metadata, settings)?;
                mapper::apply_content(form, &content, &mut report)?;
                Ok(report)
            }
            ImportMode::AddChapter => mapper::apply_chapter(form, &content),
        }
    }

    async fn fetch_work(
        &self,
        url: &str,
        stage: &mut ImportStage,
    ) -> Result<(WorkMetadata, WorkContent)> {
        stage.advance(ImportStage::Fetching);
        let html = self.fetcher.fetch(url).await?;

        stage.advance(ImportStage::Parsing);
        let (mut metadata, content) = parse_work(&html)?;
        metadata.source_url = url.to_string();
        Ok((metadata, content))
    }
}

fn parse_work(html: &str) -> Result<(WorkMetadata, WorkContent)> {
    let doc = parser::parse_document(html);
    Ok((parser::parse_metadata(&doc)?, parser::parse_content(&doc)?))
}
