//! Process execution for external tools

use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use std::process::{Command, ExitStatus};
use std::time::Instant;
use tcpkg_errors::{Error, PlatformError};
use tracing::debug;

/// Command builder passed to [`ProcessOperations::execute_command`]
#[derive(Debug, Clone)]
pub struct PlatformCommand {
    program: String,
    args: Vec<OsString>,
    current_dir: Option<PathBuf>,
}

impl PlatformCommand {
    /// Create a new platform command
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    /// Add an argument to the command
    pub fn arg<S: AsRef<OsStr>>(&mut self, arg: S) -> &mut Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Add multiple arguments to the command
    pub fn args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            self.args.push(arg.as_ref().to_os_string());
        }
        self
    }

    /// Set the working directory for the command
    pub fn current_dir<P: Into<PathBuf>>(&mut self, dir: P) -> &mut Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Get the program name
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Get the arguments
    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    /// Get the current directory
    pub fn get_current_dir(&self) -> Option<&PathBuf> {
        self.current_dir.as_ref()
    }

    /// Program and arguments joined for log and error messages
    pub fn display(&self) -> String {
        let mut rendered = self.program.clone();
        for arg in &self.args {
            rendered.push(' ');
            rendered.push_str(&arg.to_string_lossy());
        }
        rendered
    }
}

/// Output from command execution
#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    /// Turn a non-zero exit into [`PlatformError::CommandFailed`]
    ///
    /// # Errors
    ///
    /// Returns an error if the process did not exit successfully.
    pub fn check(self, cmd: &PlatformCommand) -> Result<Self, Error> {
        if self.status.success() {
            return Ok(self);
        }
        Err(PlatformError::CommandFailed {
            command: cmd.display(),
            code: self.status.code(),
            stderr: String::from_utf8_lossy(&self.stderr).trim().to_string(),
        }
        .into())
    }
}

/// Trait for process execution operations
pub trait ProcessOperations {
    /// Execute a command to completion and return its output
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    fn execute_command(&self, cmd: &PlatformCommand) -> Result<CommandOutput, Error>;

    /// Find the path to an executable
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::CommandNotFound`] if the program is not on `PATH`.
    fn which(&self, program: &str) -> Result<PathBuf, Error>;
}

/// Blocking process execution on the host
#[derive(Debug, Clone, Copy, Default)]
pub struct HostProcessOperations;

impl ProcessOperations for HostProcessOperations {
    fn execute_command(&self, cmd: &PlatformCommand) -> Result<CommandOutput, Error> {
        let start = Instant::now();
        debug!(command = %cmd.display(), cwd = ?cmd.get_current_dir(), "executing command");

        let mut command = Command::new(cmd.program());
        command.args(cmd.get_args());
        if let Some(dir) = cmd.get_current_dir() {
            command.current_dir(dir);
        }

        let output = command
            .output()
            .map_err(|e| PlatformError::ProcessExecutionFailed {
                command: cmd.program().to_string(),
                message: e.to_string(),
            })?;

        debug!(
            command = cmd.program(),
            exit_code = ?output.status.code(),
            duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "command finished"
        );

        Ok(CommandOutput {
            status: output.status,
            stderr: output.stderr,
        })
    }

    fn which(&self, program: &str) -> Result<PathBuf, Error> {
        which::which(program).map_err(|_| {
            PlatformError::CommandNotFound {
                command: program.to_string(),
            }
            .into()
        })
    }
}
