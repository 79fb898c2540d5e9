pub type Result<T> = std::result::Result<T, Error>;

/// This defines the error types used in the engine while importing a work.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The remote work could not be retrieved.
    ///
    /// The message is meant for the user as-is, so it is passed through
    /// without any prefix.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A structural selector failed to compile or evaluate.
    #[error("Selector error: {message}")]
    Selector { message: String },

    /// The destination form rejected an operation.
    #[error(transparent)]
    Form(#[from] FormError),

    /// A failure with no better classification, such as a panic while
    /// filling in the form.
    #[error("{0}")]
    Unhandled(String),
}

impl From<eyre::Report> for Error {
    fn from(error: eyre::Report) -> Self {
        Error::Selector {
            message: error.to_string(),
        }
    }
}

/// Failures of the remote fetcher.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("Invalid work URL: {0}")]
    InvalidUrl(String),

    /// Network failure or a non-2xx response.
    #[error("Failed to fetch the work! {0}")]
    FetchFailed(String),
}

/// Misuse of the destination form interface.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Unknown widget: {0}")]
    UnknownWidget(usize),

    #[error("Widget {widget} is a {actual}, expected {expected}")]
    KindMismatch {
        widget: usize,
        expected: &'static str,
        actual: &'static str,
    },
}
