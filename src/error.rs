//! Structured error handling and exit codes.

use serde::Serialize;

/// Exit codes for the application.
///
/// - 0: Success (every file decoded, and patched if requested)
/// - 1: General error (unexpected failure before or outside file processing)
/// - 2: File errors (at least one file failed; the others were processed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: All files were processed.
    Success = 0,
    /// General error: An unexpected error occurred.
    GeneralError = 1,
    /// File errors: One or more files could not be decoded or patched.
    FileErrors = 2,
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
            Self::Success => "NC000",
            Self::GeneralError => "NC001",
            Self::FileErrors => "NC002",
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "NC001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{:#}", err),
        }
    }
}
