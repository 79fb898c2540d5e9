use serde::{Deserialize, Serialize};

/// A credited author of a work, in byline order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    /// Profile link exactly as it appears in the byline, usually relative.
    pub url: String,
}

impl Author {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Normalized metadata of an imported work.
///
/// Every string is trimmed. Tag lists keep the order the source site
/// displays them in and may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkMetadata {
    pub title: String,
    pub authors: Vec<Author>,
    pub rating: String,
    pub warnings: Vec<String>,
    pub relationships: Vec<String>,
    pub characters: Vec<String>,
    pub categories: Vec<String>,
    pub fandoms: Vec<String>,
    pub freeform_tags: Vec<String>,
    pub language: String,
    /// Summary with paragraph markup replaced by blank lines.
    pub summary: String,
    /// The URL the user asked to import, not the normalized fetch URL.
    #[serde(rename = "url")]
    pub source_url: String,
}

/// One chapter of a work, extracted from its chapter sub-tree.
///
/// All markup fields hold raw inner HTML as served by the source site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterNode {
    pub summary: Option<String>,
    pub beginning_notes: Option<String>,
    pub ending_notes: Option<String>,
    pub body: Option<String>,
}

/// Body text and notes of an imported work.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkContent {
    pub beginning_notes: String,
    pub ending_notes: String,
    /// Chapters in site order. Chapter `n` on the site is `chapters[n - 1]`.
    pub chapters: Vec<ChapterNode>,
    /// The work has no chapter wrappers, only a single body.
    pub one_shot: bool,
}

impl WorkContent {
    /// Looks up a chapter by its 1-based site position.
    pub fn chapter(&self, position: usize) -> Option<&ChapterNode> {
        position
            .checked_sub(1)
            .and_then(|index| self.chapters.get(index))
    }
}
