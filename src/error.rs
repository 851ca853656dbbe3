//! Error types for layout extraction and the conversion workflow

use thiserror::Error;

/// Result type alias for figlay operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building layouts or converting designs
#[derive(Error, Debug)]
pub enum Error {
    /// The design file lacks the document/page structure
    #[error("Malformed design document: {0}")]
    MalformedInput(String),

    /// The design URL does not carry a recognizable file key
    #[error("Invalid design URL: {0}")]
    InvalidUrl(String),

    /// Invalid or missing configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Transport-level failure talking to a remote service
    #[error("Network error: {0}")]
    NetworkError(String),

    /// A remote service answered with a non-success status
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The code generator produced unusable output
    #[error("Code generation failed: {0}")]
    GenerationError(String),

    /// A retried operation kept failing
    #[error("Gave up after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: String },

    /// The parsed layout contains no screens to convert
    #[error("No screens found in parsed layout")]
    NoScreens,

    /// Cache store failure
    #[error("Cache error: {0}")]
    CacheError(String),

    /// Failed to assemble the output bundle
    #[error("Archive error: {0}")]
    ArchiveError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether the failure is worth retrying (overload, unavailability, dropped connections).
    pub fn is_transient(&self) -> bool {
        match self {
            Error::NetworkError(_) => true,
            Error::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ArchiveError(err.to_string())
    }
}

#[cfg(feature = "remote")]
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Error::HttpStatus {
                status: status.as_u16(),
                body: err.to_string(),
            },
            None => Error::NetworkError(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overload_statuses_are_transient() {
        let busy = Error::HttpStatus { status: 503, body: "UNAVAILABLE".into() };
        let limited = Error::HttpStatus { status: 429, body: "RESOURCE_EXHAUSTED".into() };
        let missing = Error::HttpStatus { status: 404, body: "Not found".into() };
        assert!(busy.is_transient());
        assert!(limited.is_transient());
        assert!(!missing.is_transient());
        assert!(!Error::GenerationError("empty".into()).is_transient());
        assert!(!Error::MalformedInput("no pages".into()).is_transient());
    }
}
