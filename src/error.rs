//! Error types and exit codes for node-warden
//!
//! Provides user-friendly error messages and standardized exit codes.

use std::io;
use std::process::ExitCode;
use thiserror::Error;

/// Exit codes for node-warden
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeWardenExitCode {
    /// Normal exit from the menu
    Success = 0,
    /// Session aborted by the operator
    Interrupted = 1,
    /// General/other error
    GeneralError = 255,
}

impl From<NodeWardenExitCode> for ExitCode {
    fn from(code: NodeWardenExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Error types for node-warden operations
#[derive(Error, Debug)]
pub enum NodeWardenError {
    /// Operator typed something that is not a usable PID
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Process not found
    #[error("Process {0} not found")]
    ProcessNotFound(u32),

    /// Permission denied for operation
    #[error("Permission denied for PID {0}")]
    PermissionDenied(u32),

    /// Operator aborted the session
    #[error("Interrupted by user")]
    Interrupted,

    /// Terminal I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Anything else the OS reported
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl NodeWardenError {
    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> NodeWardenExitCode {
        match self {
            NodeWardenError::Interrupted => NodeWardenExitCode::Interrupted,
            _ => NodeWardenExitCode::GeneralError,
        }
    }
}
