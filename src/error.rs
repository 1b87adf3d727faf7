//! Structured error handling and exit codes.

use serde::Serialize;

/// Exit codes for the StoryDeck application.
///
/// - 0: Success
/// - 1: General error (unexpected failure)
/// - 2: Redirected (the requested screen did not render, a redirect was issued)
/// - 3: Remote rejected (the story service refused the request)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: the command completed normally.
    Success = 0,
    /// General error: An unexpected error occurred.
    GeneralError = 1,
    /// Redirected: the requested path ended on a different screen.
    Redirected = 2,
    /// Remote rejected: the story service answered with an error status.
    RemoteRejected = 3,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "SD000",
            Self::GeneralError => "SD001",
            Self::Redirected => "SD002",
            Self::RemoteRejected => "SD003",
        }
    }

    /// Pick the exit code for an application error.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<crate::api::ApiError>() {
            Some(crate::api::ApiError::Rejected { .. }) => Self::RemoteRejected,
            _ => Self::GeneralError,
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "SD001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// HTTP status reported by the story service, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        let status = match err.downcast_ref::<crate::api::ApiError>() {
            Some(crate::api::ApiError::Rejected { status, .. }) => Some(*status),
            _ => None,
        };
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: err.to_string(),
            status,
        }
    }
}
