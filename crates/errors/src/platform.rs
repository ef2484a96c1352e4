//! Process execution errors

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

/// Errors that can occur while running external tools
#[derive(Debug, Clone, Error)]
pub enum PlatformError {
    #[error("process execution failed: {command} - {message}")]
    ProcessExecutionFailed { command: String, message: String },

    #[error("command not found: {command}")]
    CommandNotFound { command: String },

    #[error("{command} exited with {}: {stderr}", exit_description(.code))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

#[allow(clippy::ref_option)]
fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

impl UserFacingError for PlatformError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::CommandNotFound { .. } => Some(
                "Install binutils, point TCPKG_AR at an ar binary, or set TCPKG_COMBINER=builtin.",
            ),
            Self::CommandFailed { .. } => {
                Some("The output file may be incomplete and should not be used.")
            }
            Self::ProcessExecutionFailed { .. } => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::ProcessExecutionFailed { .. } => "platform.process_execution_failed",
            Self::CommandNotFound { .. } => "platform.command_not_found",
            Self::CommandFailed { .. } => "platform.command_failed",
        };
        Some(code)
    }
}
