use thiserror::Error;

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },
}

/// A collaborator could not deliver. Callers degrade instead of failing the run.
#[derive(Debug, Clone, Error)]
#[error("{collaborator} unavailable: {reason}")]
pub struct Unavailable {
    pub collaborator: &'static str,
    pub reason: String,
}

impl Unavailable {
    #[must_use]
    pub fn new(collaborator: &'static str, reason: impl Into<String>) -> Self {
        Self {
            collaborator,
            reason: reason.into(),
        }
    }
}
