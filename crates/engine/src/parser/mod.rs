//! Extraction of work metadata and content from a source work page.
//!
//! Only this module knows the source site's markup. A region that is missing
//! from the page yields an empty value rather than an error, so one odd field
//! never blocks an import.

pub mod dom;
mod sanitize;

use crosspost_types::{Author, ChapterNode, WorkContent, WorkMetadata};
use scraper::{ElementRef, Html};
use tracing::debug;

use self::dom::{ElementExt, Scope};
use crate::error::Result;

pub use self::sanitize::sanitize_paragraphs;

/// Freeform tag that is never carried over to the destination.
const PODFIC_WELCOME: &str = "podfic welcome";

const META: &str = ".meta";
const TITLE: &str = "#workskin h2.title";
/// The work's own byline. Chapter prefaces carry bylines too, and those
/// come later in the page.
const BYLINE: &str = "#workskin .byline";
const SUMMARY: &str = "#workskin > .preface .summary.module .userstuff";
const BEGINNING_NOTES: &str = "#workskin > .preface .notes.module:not(.end) .userstuff";
const ENDING_NOTES: &str = "#work_endnotes .userstuff, #workskin > .afterword .end.notes.module .userstuff";
const CHAPTERS: &str = "#chapters";

pub fn parse_document(html: &str) -> Html {
    Html::parse_document(html)
}

pub fn parse_metadata(doc: &Html) -> Result<WorkMetadata> {
    let meta = doc.select_first_opt(META)?;

    let metadata = WorkMetadata {
        title: first_text(doc.select_first_opt(TITLE)?),
        authors: map_authors(&byline_links(doc)?),
        rating: text_in(meta, "dd.rating.tags")?,
        warnings: tags_in(meta, "dd.warning.tags")?,
        relationships: tags_in(meta, "dd.relationship.tags")?,
        characters: tags_in(meta, "dd.character.tags")?,
        categories: tags_in(meta, "dd.category.tags")?,
        fandoms: tags_in(meta, "dd.fandom.tags")?,
        freeform_tags: filter_freeform_tags(tags_in(meta, "dd.freeform.tags")?),
        language: text_in(meta, "dd.language")?,
        summary: sanitized(doc.select_first_opt(SUMMARY)?),
        source_url: String::new(),
    };

    debug!(
        title = %metadata.title,
        authors = metadata.authors.len(),
        "Parsed work metadata"
    );
    Ok(metadata)
}

fn byline_links(doc: &Html) -> Result<Vec<ElementRef<'_>>> {
    Ok(match doc.select_first_opt(BYLINE)? {
        Some(byline) => byline.select_all("a")?,
        None => Vec::new(),
    })
}

pub fn parse_content(doc: &Html) -> Result<WorkContent> {
    let beginning_notes = sanitized(doc.select_first_opt(BEGINNING_NOTES)?);
    let ending_notes = sanitized(doc.select_first_opt(ENDING_NOTES)?);

    let (chapters, one_shot) = match doc.select_first_opt(CHAPTERS)? {
        Some(region) => segment_chapters(region)?,
        None => (Vec::new(), false),
    };

    debug!(chapters = chapters.len(), one_shot, "Parsed work content");
    Ok(WorkContent {
        beginning_notes,
        ending_notes,
        chapters,
        one_shot,
    })
}

/// Keeps only byline links marked as authors, in page order. A repeated name
/// keeps its first position and takes the last link seen.
pub fn map_authors(anchors: &[ElementRef<'_>]) -> Vec<Author> {
    let mut authors: Vec<Author> = Vec::new();

    for anchor in anchors {
        if anchor.attr_opt("rel").as_deref() != Some("author") {
            continue;
        }

        let name = anchor.text_or_empty();
        let url = anchor.attr_opt("href").unwrap_or_default();
        match authors.iter_mut().find(|author| author.name == name) {
            Some(existing) => existing.url = url,
            None => authors.push(Author { name, url }),
        }
    }

    authors
}

pub fn filter_freeform_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .filter(|tag| tag.to_lowercase() != PODFIC_WELCOME)
        .collect()
}

/// Splits the chapters region into chapters.
///
/// A work without chapter wrappers is a one-shot whose whole body is the
/// first body text element.
fn segment_chapters(region: ElementRef<'_>) -> Result<(Vec<ChapterNode>, bool)> {
    let children = region.element_children();

    if !children.iter().any(|child| child.has_class("chapter")) {
        return Ok(match region.select_first_opt(".userstuff")? {
            Some(body) => {
                let chapter = ChapterNode {
                    body: Some(body.inner_html()),
                    ..Default::default()
                };
                (vec![chapter], true)
            }
            None => {
                debug!("No chapters found");
                (Vec::new(), false)
            }
        });
    }

    let chapters = children
        .into_iter()
        .map(parse_chapter)
        .collect::<Result<Vec<_>>>()?;
    Ok((chapters, false))
}

fn parse_chapter(chapter: ElementRef<'_>) -> Result<ChapterNode> {
    let bodies = chapter.select_all("[role=\"article\"]")?;

    Ok(ChapterNode {
        summary: userstuff_of(chapter.select_first_opt(".summary")?)?,
        beginning_notes: userstuff_of(chapter.select_first_opt(".notes:not(.end)")?)?,
        ending_notes: userstuff_of(chapter.select_first_opt(".end.notes")?)?,
        body: match bodies.as_slice() {
            [body] => Some(body.inner_html()),
            _ => None,
        },
    })
}

fn userstuff_of(section: Option<ElementRef<'_>>) -> Result<Option<String>> {
    let Some(section) = section else {
        return Ok(None);
    };
    Ok(section
        .select_first_opt(".userstuff")?
        .map(|userstuff| userstuff.inner_html()))
}

fn first_text(element: Option<ElementRef<'_>>) -> String {
    element.map(|e| e.text_or_empty()).unwrap_or_default()
}

fn text_in(region: Option<ElementRef<'_>>, selector: &str) -> Result<String> {
    let Some(region) = region else {
        return Ok(String::new());
    };
    Ok(first_text(region.select_first_opt(selector)?))
}

fn tags_in(region: Option<ElementRef<'_>>, selector: &str) -> Result<Vec<String>> {
    let Some(list) = region.map(|r| r.select_first_opt(selector)).transpose()?.flatten() else {
        return Ok(Vec::new());
    };
    Ok(list
        .select_all("a")?
        .iter()
        .map(|a| a.text_or_empty())
        .collect())
}

fn sanitized(element: Option<ElementRef<'_>>) -> String {
    element
        .map(|e| sanitize_paragraphs(&e.inner_html()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_author_links_are_kept() {
        let doc = parse_document(
            r#"<div id="workskin"><h3 class="byline">
                <a rel="author" href="/u/jun">Jun</a>
                <a rel="giftee" href="/u/x">GiftTo</a>
            </h3></div>"#,
        );

        let authors = map_authors(&byline_links(&doc).unwrap());
        assert_eq!(authors, vec![Author::new("Jun", "/u/jun")]);
    }

    #[test]
    fn test_duplicate_author_keeps_position_and_last_link() {
        let doc = parse_document(
            r#"<div id="workskin"><h3 class="byline">
                <a rel="author" href="/u/a1">A</a>,
                <a rel="author" href="/u/b">B</a>,
                <a rel="author" href="/u/a2">A</a>
            </h3></div>"#,
        );

        let authors = map_authors(&byline_links(&doc).unwrap());
        assert_eq!(
            authors,
            vec![Author::new("A", "/u/a2"), Author::new("B", "/u/b")]
        );
    }

    #[test]
    fn test_chapter_bylines_are_not_work_authors() {
        let doc = parse_document(
            r#"<div id="workskin">
              <div class="preface group">
                <h2 class="title heading">Echoes</h2>
                <h3 class="byline heading"><a rel="author" href="/u/jun">Jun</a></h3>
              </div>
              <div id="chapters">
                <div class="chapter" id="chapter-1">
                  <div class="chapter preface group">
                    <h3 class="byline heading"><a rel="author" href="/u/mei">Mei</a></h3>
                  </div>
                  <div class="userstuff module" role="article"><p>One.</p></div>
                </div>
              </div>
            </div>"#,
        );

        let metadata = parse_metadata(&doc).unwrap();
        assert_eq!(metadata.authors, vec![Author::new("Jun", "/u/jun")]);
    }

    #[test]
    fn test_podfic_welcome_is_filtered() {
        let tags = vec![
            "Angst".to_string(),
            "Podfic Welcome".to_string(),
            "Fluff".to_string(),
            "PODFIC WELCOME".to_string(),
        ];
        assert_eq!(filter_freeform_tags(tags), vec!["Angst", "Fluff"]);
    }

    #[test]
    fn test_missing_regions_degrade_to_empty() {
        let doc = parse_document("<html><body><p>Nothing here</p></body></html>");

        let metadata = parse_metadata(&doc).unwrap();
        assert_eq!(metadata, WorkMetadata::default());

        let content = parse_content(&doc).unwrap();
        assert_eq!(content, WorkContent::default());
    }

    #[test]
    fn test_one_shot_body() {
        let doc = parse_document(
            r#"<div id="workskin"><div id="chapters" role="article">
                <h3 class="landmark heading">Work Text:</h3>
                <div class="userstuff"><p>Once upon a time.</p></div>
            </div></div>"#,
        );

        let content = parse_content(&doc).unwrap();
        assert!(content.one_shot);
        assert_eq!(content.chapters.len(), 1);
        assert_eq!(
            content.chapters[0].body.as_deref(),
            Some("<p>Once upon a time.</p>")
        );
    }

    #[test]
    fn test_chapter_without_single_body_has_none() {
        let doc = parse_document(
            r#"<div id="chapters">
                <div class="chapter" id="chapter-1">
                    <div role="article">a</div><div role="article">b</div>
                </div>
            </div>"#,
        );

        let content = parse_content(&doc).unwrap();
        assert!(!content.one_shot);
        assert_eq!(content.chapters.len(), 1);
        assert_eq!(content.chapters[0].body, None);
    }
}
