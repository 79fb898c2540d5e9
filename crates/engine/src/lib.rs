//! Import engine for cross-posting a fan-fiction work.
//!
//! The engine fetches a work page from the source archive, extracts its
//! metadata and chapters, and fills a destination authoring form with them.
//! The destination page is reached through [`form::DestinationForm`] and the
//! network through [`http::PageTransport`], so both sides can be swapped out.

pub mod error;
pub mod fetch;
pub mod form;
pub mod http;
pub mod import;
pub mod mapper;
pub mod parser;
pub mod template;

pub use crate::fetch::WorkFetcher;
pub use crate::form::{DestinationForm, HtmlForm};
pub use crate::http::{PageTransport, ReqwestTransport};
pub use crate::import::{ImportMode, ImportStage, Importer, is_supported_page};
pub use crate::mapper::MappingReport;
