//! Exit status classification for the external fetcher
//!
//! Only a clean exit is full success. Every other outcome still leaves the
//! downloaded pages usable, so the pipeline treats it as partial success.

use std::fmt;

/// How the fetcher process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitClass {
    /// Exit code 0
    Success,

    /// Exit code 4: some requests failed at the network level
    NetworkFailure,

    /// Exit code 6: the server demanded credentials
    AuthFailure,

    /// Exit code 8: the server answered some requests with an error
    ServerError,

    /// Any other nonzero exit code
    Other(i32),

    /// The process was stopped by a signal or by an interrupt
    Interrupted,
}

impl ExitClass {
    /// Classifies a process exit code (`None` when killed by a signal)
    pub fn from_code(code: Option<i32>) -> Self {
        match code {
            Some(0) => Self::Success,
            Some(4) => Self::NetworkFailure,
            Some(6) => Self::AuthFailure,
            Some(8) => Self::ServerError,
            Some(code) => Self::Other(code),
            None => Self::Interrupted,
        }
    }

    /// Returns true only for a clean exit
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Returns true if downstream stages should run on a partial download
    pub fn is_partial(&self) -> bool {
        !self.is_success()
    }

    /// Warning to report for a non-clean exit
    pub fn warning(&self) -> Option<String> {
        let message = match self {
            Self::Success => return None,
            Self::NetworkFailure => {
                "Fetcher returned exit code 4 (Network Failure). Some files may not have been downloaded. Continuing...".to_string()
            }
            Self::AuthFailure => {
                "Fetcher returned exit code 6 (Username/Password Authentication Failure). Continuing...".to_string()
            }
            Self::ServerError => {
                "Fetcher returned exit code 8 (Server Error). Some links returned 404/403. Continuing...".to_string()
            }
            Self::Other(code) => format!(
                "Fetcher returned exit code {}. Download may be incomplete...",
                code
            ),
            Self::Interrupted => {
                "Fetcher was interrupted. Keeping pages downloaded so far. Continuing...".to_string()
            }
        };
        Some(message)
    }
}

impl fmt::Display for ExitClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::NetworkFailure => write!(f, "network failure (4)"),
            Self::AuthFailure => write!(f, "authentication failure (6)"),
            Self::ServerError => write!(f, "server error (8)"),
            Self::Other(code) => write!(f, "exit code {}", code),
            Self::Interrupted => write!(f, "interrupted"),
        }
    }
}
