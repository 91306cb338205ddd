//! Error and result types for talking to the users backend.
//!
//! Every failure is treated the same way by the synchronizer (logged,
//! surfaced, local state untouched); the variants only exist so the
//! notification text can say what went wrong.
//!
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SyncError>;

#[derive(Debug, Error)]
pub enum SyncError {
    /// Connection refused, DNS failure, timeout and the like.
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response. `message` is the trimmed response body.
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The request could not be formed from user input.
    #[error("{0}")]
    Invalid(String),

    /// The client failed before anything was sent, e.g. no worker thread.
    #[error("local failure: {0}")]
    Local(String),
}

impl SyncError {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = message.trim();
        Self::Status {
            status,
            message: if message.is_empty() {
                "no details".to_string()
            } else {
                message.to_string()
            },
        }
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    pub fn local(msg: impl Into<String>) -> Self {
        Self::Local(msg.into())
    }

    /// HTTP status code for server-reported failures.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_trims_body_and_fills_empty() {
        let e = SyncError::status(404, "User not found\n");
        assert_eq!(e.to_string(), "server returned 404: User not found");
        assert_eq!(e.status_code(), Some(404));

        let e = SyncError::status(500, "   ");
        assert_eq!(e.to_string(), "server returned 500: no details");
    }

    #[test]
    fn invalid_has_no_status() {
        let e = SyncError::invalid("Invalid user ID");
        assert_eq!(e.status_code(), None);
        assert_eq!(e.to_string(), "Invalid user ID");
    }

    #[test]
    fn local_failure_is_not_user_input() {
        let e = SyncError::local("could not start request: out of threads");
        assert!(!matches!(e, SyncError::Invalid(_)));
        assert_eq!(e.status_code(), None);
        assert_eq!(e.to_string(), "local failure: could not start request: out of threads");
    }
}
