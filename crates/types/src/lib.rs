//! Shared data model for crosspost.
//!
//! These types travel between the fetcher, parser, mapper and the front end
//! that drives an import, so all of them serialize with serde using the
//! field names the extension front end expects.

mod options;
mod result;
mod work;

pub use options::{Options, Settings, TemplateFormat, TemplateRecord};
pub use result::{FetchFailure, FetchRequest, FetchResponse, ImportOutcome, ImportResult};
pub use work::{Author, ChapterNode, WorkContent, WorkMetadata};
