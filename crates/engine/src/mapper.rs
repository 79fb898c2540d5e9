//! Fills the destination form from an imported work.
//!
//! Source labels and destination option values are not guaranteed to match,
//! so every lookup can miss. A miss is recorded in the [`MappingReport`] and
//! mapping carries on with the next field.

use std::collections::HashMap;
use std::fmt;

use crosspost_types::{Settings, WorkContent, WorkMetadata};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::form::{
    Checkbox, CommitStrategy, DestinationForm, PlainInput, RichText, SelectBox, TagAutocomplete,
    WidgetId, ensure_checked,
};
use crate::template;

/// Freeform tag appended when the crosspost label option is on.
pub const CROSSPOST_TAG: &str = "Cross-Posted from AO3";

/// Warning labels that name the same checkbox on the two sites.
const WARNING_ALIASES: [(&str, &str); 1] = [(
    "Choose Not To Use Archive Warnings",
    "Creator Chose Not To Use Archive Warnings",
)];

/// Where each field lives on the destination's work and chapter forms.
pub mod selectors {
    pub const RATING: &str = "#work_rating_string";
    pub const WARNINGS: &str = "fieldset.warnings input";
    pub const CATEGORIES: &str = "dd.category input";
    pub const FANDOMS: &str = "dd.fandom input";
    pub const RELATIONSHIPS: &str = "dd.relationship input";
    pub const CHARACTERS: &str = "dd.character input";
    pub const FREEFORM_TAGS: &str = "dd.freeform input";
    pub const TITLE: &str = "dd.title input";
    pub const SUMMARY: &str = "dd.summary textarea";
    pub const LANGUAGE: &str = "#work_language_id";
    pub const BEGINNING_NOTES_TOGGLE: &str = "#front-notes-options-show";
    pub const ENDING_NOTES_TOGGLE: &str = "#end-notes-options-show";
    pub const WORK_NOTES: &str = "#work_notes";
    pub const WORK_ENDNOTES: &str = "#work_endnotes";
    pub const EDITOR: &str = ".mce-editor";
    pub const CHAPTER_POSITION: &str = "#chapter_position";
    pub const CHAPTER_SUMMARY: &str = "#chapter_summary";
    pub const CHAPTER_NOTES: &str = "#chapter_notes";
    pub const CHAPTER_ENDNOTES: &str = "#chapter_endnotes";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Rating,
    Warnings,
    Categories,
    Fandoms,
    Relationships,
    Characters,
    FreeformTags,
    Title,
    Summary,
    Language,
    BeginningNotes,
    EndingNotes,
    ChapterText,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Field::Rating => "rating",
            Field::Warnings => "warnings",
            Field::Categories => "categories",
            Field::Fandoms => "fandoms",
            Field::Relationships => "relationships",
            Field::Characters => "characters",
            Field::FreeformTags => "freeform tags",
            Field::Title => "title",
            Field::Summary => "summary",
            Field::Language => "language",
            Field::BeginningNotes => "beginning notes",
            Field::EndingNotes => "ending notes",
            Field::ChapterText => "chapter text",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Nothing on the page matched the selector.
    WidgetMissing(String),
    /// The widget has no option or checkbox for the source label.
    OptionMissing(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SkipReason::WidgetMissing(selector) => write!(f, "no widget matches '{selector}'"),
            SkipReason::OptionMissing(label) => write!(f, "no option labelled '{label}'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapOutcome {
    Applied,
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    pub field: Field,
    /// The individual label, for fields mapped one item at a time.
    pub item: Option<String>,
    pub outcome: MapOutcome,
}

/// What happened to every field an import tried to fill.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingReport {
    entries: Vec<MappingEntry>,
}

impl MappingReport {
    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Some field or item could not be mapped.
    pub fn is_partial(&self) -> bool {
        self.skipped().next().is_some()
    }

    pub fn skipped(&self) -> impl Iterator<Item = &MappingEntry> {
        self.entries
            .iter()
            .filter(|entry| matches!(entry.outcome, MapOutcome::Skipped(_)))
    }

    /// Outcomes recorded for one field, in order.
    pub fn outcomes(&self, field: Field) -> Vec<&MapOutcome> {
        self.entries
            .iter()
            .filter(|entry| entry.field == field)
            .map(|entry| &entry.outcome)
            .collect()
    }

    fn applied(&mut self, field: Field, item: Option<&str>) {
        self.entries.push(MappingEntry {
            field,
            item: item.map(str::to_string),
            outcome: MapOutcome::Applied,
        });
    }

    fn skipped_because(&mut self, field: Field, item: Option<&str>, reason: SkipReason) {
        warn!(%field, item, %reason, "Could not map field");
        self.entries.push(MappingEntry {
            field,
            item: item.map(str::to_string),
            outcome: MapOutcome::Skipped(reason),
        });
    }
}

/// Maps the work's metadata onto the new or edited work form.
pub fn apply_metadata(
    form: &mut dyn DestinationForm,
    metadata: &WorkMetadata,
    settings: &Settings,
) -> Result<MappingReport> {
    let mut report = MappingReport::default();
    let options = &settings.options;

    apply_select(form, &mut report, Field::Rating, selectors::RATING, &metadata.rating)?;

    let mut warnings = checkbox_table(form, selectors::WARNINGS)?;
    for (a, b) in WARNING_ALIASES {
        alias(&mut warnings, a, b);
        alias(&mut warnings, b, a);
    }
    check_boxes(form, &mut report, Field::Warnings, &warnings, &metadata.warnings)?;

    apply_tags(form, &mut report, Field::Fandoms, selectors::FANDOMS, &metadata.fandoms)?;

    let categories = checkbox_table(form, selectors::CATEGORIES)?;
    check_boxes(form, &mut report, Field::Categories, &categories, &metadata.categories)?;

    apply_tags(
        form,
        &mut report,
        Field::Relationships,
        selectors::RELATIONSHIPS,
        &metadata.relationships,
    )?;
    apply_tags(form, &mut report, Field::Characters, selectors::CHARACTERS, &metadata.characters)?;

    let mut freeform_tags = metadata.freeform_tags.clone();
    if options.ao3_crosspost_label {
        freeform_tags.push(CROSSPOST_TAG.to_string());
    }
    apply_tags(form, &mut report, Field::FreeformTags, selectors::FREEFORM_TAGS, &freeform_tags)?;

    let title = template::render_title(
        template::title_template(options.title_format, &settings.title_template.template),
        &metadata.title,
        &metadata.authors,
    );
    apply_text(form, &mut report, Field::Title, selectors::TITLE, &title)?;

    let summary = template::render_summary(
        template::summary_template(options.summary_format, &settings.summary_template.template),
        &metadata.summary,
        &metadata.title,
        &metadata.source_url,
        &metadata.authors,
    );
    apply_text(form, &mut report, Field::Summary, selectors::SUMMARY, &summary)?;

    apply_select(form, &mut report, Field::Language, selectors::LANGUAGE, &metadata.language)?;

    Ok(report)
}

/// Fills work notes and the work text.
///
/// The text is only written into an empty editor. For a work with chapter
/// wrappers the first chapter seeds the text, and its notes stand in for
/// work notes the work itself does not have.
pub fn apply_content(
    form: &mut dyn DestinationForm,
    content: &WorkContent,
    report: &mut MappingReport,
) -> Result<()> {
    if !content.beginning_notes.is_empty() {
        apply_notes(
            form,
            report,
            Field::BeginningNotes,
            selectors::BEGINNING_NOTES_TOGGLE,
            selectors::WORK_NOTES,
            &content.beginning_notes,
        )?;
    }
    if !content.ending_notes.is_empty() {
        apply_notes(
            form,
            report,
            Field::EndingNotes,
            selectors::ENDING_NOTES_TOGGLE,
            selectors::WORK_ENDNOTES,
            &content.ending_notes,
        )?;
    }

    let Some(editor) = form.find(selectors::EDITOR)? else {
        report.skipped_because(
            Field::ChapterText,
            None,
            SkipReason::WidgetMissing(selectors::EDITOR.to_string()),
        );
        return Ok(());
    };
    if !form.value(editor)?.is_empty() {
        debug!("Work text already present, leaving it alone");
        return Ok(());
    }

    let Some(first) = content.chapters.first() else {
        info!("No chapters found");
        return Ok(());
    };

    if !content.one_shot {
        debug!(chapters = content.chapters.len(), "Multi chapter work");
        if let (true, Some(notes)) = (content.beginning_notes.is_empty(), &first.beginning_notes) {
            apply_notes(
                form,
                report,
                Field::BeginningNotes,
                selectors::BEGINNING_NOTES_TOGGLE,
                selectors::WORK_NOTES,
                notes,
            )?;
        }
        if let (true, Some(notes)) = (content.ending_notes.is_empty(), &first.ending_notes) {
            apply_notes(
                form,
                report,
                Field::EndingNotes,
                selectors::ENDING_NOTES_TOGGLE,
                selectors::WORK_ENDNOTES,
                notes,
            )?;
        }
    }

    if let Some(body) = &first.body {
        commit_text(form, report, editor, body)?;
    }
    Ok(())
}

/// Reads the number a position field starts with, ignoring whatever
/// follows it, so `"3 of 5"` is 3. No leading digits reads as 0.
fn leading_number(value: &str) -> usize {
    let value = value.trim_start();
    let value = value.strip_prefix('+').unwrap_or(value);
    let end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    value[..end].parse().unwrap_or(0)
}

/// Fills the new or edited chapter form with the chapter at the position
/// the page already shows.
///
/// Chapters are matched by position only. A position past the end of the
/// imported work leaves the form untouched.
pub fn apply_chapter(form: &mut dyn DestinationForm, content: &WorkContent) -> Result<MappingReport> {
    let mut report = MappingReport::default();

    let position = match form.find(selectors::CHAPTER_POSITION)? {
        Some(widget) => leading_number(&form.value(widget)?),
        None => 0,
    };
    if position == 0 {
        debug!("Page is not adding a chapter");
        return Ok(report);
    }

    let Some(chapter) = content.chapter(position) else {
        info!(
            position,
            available = content.chapters.len(),
            "No importable chapter at this position"
        );
        return Ok(report);
    };

    if let Some(summary) = &chapter.summary {
        apply_text(form, &mut report, Field::Summary, selectors::CHAPTER_SUMMARY, summary)?;
    }
    if let Some(notes) = &chapter.beginning_notes {
        apply_notes(
            form,
            &mut report,
            Field::BeginningNotes,
            selectors::BEGINNING_NOTES_TOGGLE,
            selectors::CHAPTER_NOTES,
            notes,
        )?;
    }
    if let Some(notes) = &chapter.ending_notes {
        apply_notes(
            form,
            &mut report,
            Field::EndingNotes,
            selectors::ENDING_NOTES_TOGGLE,
            selectors::CHAPTER_ENDNOTES,
            notes,
        )?;
    }
    if let Some(body) = &chapter.body {
        match form.find(selectors::EDITOR)? {
            Some(editor) => commit_text(form, &mut report, editor, body)?,
            None => report.skipped_because(
                Field::ChapterText,
                None,
                SkipReason::WidgetMissing(selectors::EDITOR.to_string()),
            ),
        }
    }

    Ok(report)
}

fn find_or_skip(
    form: &dyn DestinationForm,
    report: &mut MappingReport,
    field: Field,
    selector: &str,
) -> Result<Option<WidgetId>> {
    let widget = form.find(selector)?;
    if widget.is_none() {
        report.skipped_because(field, None, SkipReason::WidgetMissing(selector.to_string()));
    }
    Ok(widget)
}

/// Picks the option whose label matches the source label.
fn apply_select(
    form: &mut dyn DestinationForm,
    report: &mut MappingReport,
    field: Field,
    selector: &str,
    label: &str,
) -> Result<()> {
    let Some(select) = find_or_skip(form, report, field, selector)? else {
        return Ok(());
    };

    let options = form.options(select)?;
    match options.iter().find(|option| option.label == label) {
        Some(option) => {
            SelectBox.commit(form, select, &option.value)?;
            report.applied(field, None);
        }
        None => report.skipped_because(
            field,
            Some(label),
            SkipReason::OptionMissing(label.to_string()),
        ),
    }
    Ok(())
}

/// Maps each checkbox in a group by its trimmed value.
fn checkbox_table(form: &dyn DestinationForm, selector: &str) -> Result<HashMap<String, WidgetId>> {
    let mut table = HashMap::new();
    for widget in form.find_all(selector)? {
        table.insert(form.value(widget)?.trim().to_string(), widget);
    }
    Ok(table)
}

fn alias(table: &mut HashMap<String, WidgetId>, existing: &str, alias: &str) {
    if let Some(&widget) = table.get(existing) {
        table.entry(alias.to_string()).or_insert(widget);
    }
}

fn check_boxes(
    form: &mut dyn DestinationForm,
    report: &mut MappingReport,
    field: Field,
    table: &HashMap<String, WidgetId>,
    labels: &[String],
) -> Result<()> {
    for label in labels {
        match table.get(label) {
            Some(&widget) => {
                Checkbox.commit(form, widget, &true)?;
                report.applied(field, Some(label));
            }
            None => report.skipped_because(
                field,
                Some(label),
                SkipReason::OptionMissing(label.clone()),
            ),
        }
    }
    Ok(())
}

fn apply_tags(
    form: &mut dyn DestinationForm,
    report: &mut MappingReport,
    field: Field,
    selector: &str,
    tags: &[String],
) -> Result<()> {
    let Some(input) = find_or_skip(form, report, field, selector)? else {
        return Ok(());
    };
    TagAutocomplete.commit(form, input, &tags.join(", "))?;
    report.applied(field, None);
    Ok(())
}

fn apply_text(
    form: &mut dyn DestinationForm,
    report: &mut MappingReport,
    field: Field,
    selector: &str,
    text: &str,
) -> Result<()> {
    let Some(widget) = find_or_skip(form, report, field, selector)? else {
        return Ok(());
    };
    PlainInput.commit(form, widget, text)?;
    report.applied(field, None);
    Ok(())
}

/// Notes text boxes stay inert until their "show notes" toggle is on.
fn apply_notes(
    form: &mut dyn DestinationForm,
    report: &mut MappingReport,
    field: Field,
    toggle: &str,
    selector: &str,
    notes: &str,
) -> Result<()> {
    let Some(text_box) = find_or_skip(form, report, field, selector)? else {
        return Ok(());
    };
    match form.find(toggle)? {
        Some(toggle) => ensure_checked(form, toggle)?,
        None => debug!(toggle, "Notes toggle not found, writing notes anyway"),
    }
    PlainInput.commit(form, text_box, notes)?;
    report.applied(field, None);
    Ok(())
}

fn commit_text(
    form: &mut dyn DestinationForm,
    report: &mut MappingReport,
    editor: WidgetId,
    body: &str,
) -> Result<()> {
    RichText.commit(form, editor, body)?;
    report.applied(Field::ChapterText, None);
    Ok(())
}
