use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::{WorkContent, WorkMetadata};

/// Result of fetching and parsing one work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum ImportResult {
    Success {
        metadata: WorkMetadata,
        data: WorkContent,
    },
    Error {
        message: String,
    },
}

/// What a whole import run reports back to the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    Success,
    /// The form was filled but some fields could not be mapped.
    PartialSuccess { warning: String },
    Error { message: String },
}

impl ImportOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, ImportOutcome::Error { .. })
    }

    /// The text to show next to the submit control, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            ImportOutcome::Success => None,
            ImportOutcome::PartialSuccess { warning } => Some(warning),
            ImportOutcome::Error { message } => Some(message),
        }
    }
}

// Partial success still reports `"result": "success"` so the front end opens
// its success notification, with the warning riding along.
impl Serialize for ImportOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ImportOutcome::Success => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("result", "success")?;
                map.end()
            }
            ImportOutcome::PartialSuccess { warning } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("result", "success")?;
                map.serialize_entry("warning", warning)?;
                map.end()
            }
            ImportOutcome::Error { message } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("result", "error")?;
                map.serialize_entry("message", message)?;
                map.end()
            }
        }
    }
}

/// Request sent to the page fetching collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    #[serde(rename = "fetchUrl")]
    pub fetch_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum FetchFailure {
    Error { message: String },
}

/// Reply of the page fetching collaborator: the raw page, or an error record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FetchResponse {
    Html(String),
    Failure(FetchFailure),
}

impl FetchResponse {
    pub fn error(message: impl Into<String>) -> Self {
        FetchResponse::Failure(FetchFailure::Error {
            message: message.into(),
        })
    }
}
