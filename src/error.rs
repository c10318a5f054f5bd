// src/error.rs

use thiserror::Error;

/// Failure of one stage of the result pipeline.
///
/// Every stage returns this type; no stage recovers from another stage's
/// error, so callers can switch on [`ResultError::kind`] at the top.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResultError {
    /// The USN failed shape validation. Raised before any network call.
    #[error("invalid USN {input:?}: expected 10 characters starting with 4JC")]
    InvalidUsn { input: String },

    /// Transport failure, timeout or a non-200 response.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered but the page lacked the expected structure.
    #[error("unexpected result page: {0}")]
    Parse(String),

    /// No subject carried any credits, so the SGPA ratio is undefined.
    #[error("no creditable subjects; SGPA is undefined")]
    DivisionByZero,
}

/// Category tag of a [`ResultError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidUsn,
    Network,
    Parse,
    DivisionByZero,
}

impl ResultError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResultError::InvalidUsn { .. } => ErrorKind::InvalidUsn,
            ResultError::Network(_) => ErrorKind::Network,
            ResultError::Parse(_) => ErrorKind::Parse,
            ResultError::DivisionByZero => ErrorKind::DivisionByZero,
        }
    }
}

impl From<reqwest::Error> for ResultError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ResultError::Network(format!("request timed out: {}", err))
        } else {
            ResultError::Network(err.to_string())
        }
    }
}
