pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Remote error: {0}")]
    Remote(#[from] crate::models::failure::Failure),
}

/// Local failures raised by editor operations before anything reaches the
/// remote boundary.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("Form is not valid: {0}")]
    InvalidForm(String),

    #[error("The question is not saved yet")]
    ParentNotSaved,

    #[error("Record at index {0} has no identifier")]
    NotPersisted(usize),

    #[error("No record at index {0}")]
    IndexOutOfRange(usize),

    #[error("The edited record no longer exists")]
    RowNotFound,

    #[error("No dialog is open")]
    NoPendingDialog,

    #[error("Remote calls need a running tokio runtime")]
    NoRuntime,
}
