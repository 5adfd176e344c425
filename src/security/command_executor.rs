//! SafeCommandExecutor: Type-safe command execution with injection prevention
//!
//! # Security Features
//!
//! - **Allowlist validation**: Only pre-approved commands can execute
//! - **Injection prevention**: Uses `tokio::process::Command`, never a shell
//! - **Working directory validation**: Validates existence before execution
//! - **Timeout control**: Kills processes that run past the configured limit
//!
//! # Example
//!
//! ```rust,no_run
//! use ci_helpers::SafeCommandExecutor;
//! use std::time::Duration;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut executor = SafeCommandExecutor::new(std::env::temp_dir())?;
//! executor.set_timeout(Duration::from_secs(30));
//!
//! let output = executor.execute("gh", &["release", "list"]).await?;
//! println!("{}", String::from_utf8_lossy(&output.stdout));
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

/// Commands the helpers are allowed to run.
const ALLOWED_COMMANDS: &[&str] = &["gh", "git"];

/// Errors that can occur during command execution
#[derive(Error, Debug)]
pub enum CommandError {
    /// Command is not in the allowlist
    #[error("Command '{0}' is not in the allowed whitelist")]
    CommandNotAllowed(String),

    /// Working directory does not exist or is not accessible
    #[error("Working directory does not exist: {0}")]
    InvalidWorkingDirectory(PathBuf),

    /// Command execution failed (e.g., binary not found, permission denied)
    #[error("Command execution failed: {0}")]
    ExecutionFailed(String),

    /// Command exceeded the timeout duration
    #[error("Command timeout after {0:?}")]
    Timeout(Duration),
}

/// Safe command executor with security controls
#[derive(Debug, Clone)]
pub struct SafeCommandExecutor {
    /// Working directory where commands will be executed
    working_dir: PathBuf,
    /// Optional timeout for command execution
    timeout: Option<Duration>,
    /// Executables this instance may run
    allowed_commands: &'static [&'static str],
}

impl SafeCommandExecutor {
    /// Create a new SafeCommandExecutor with working directory validation.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::InvalidWorkingDirectory` if the directory does not exist.
    pub fn new<P: AsRef<Path>>(working_dir: P) -> Result<Self, CommandError> {
        let working_dir = working_dir.as_ref().to_path_buf();

        if !working_dir.is_dir() {
            return Err(CommandError::InvalidWorkingDirectory(working_dir));
        }

        Ok(Self {
            working_dir,
            timeout: None,
            allowed_commands: ALLOWED_COMMANDS,
        })
    }

    /// Set command execution timeout.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = Some(timeout);
    }

    /// Check whether a command name is on the allowlist
    pub fn is_allowed(&self, command: &str) -> bool {
        self.allowed_commands.contains(&command)
    }

    /// Execute a command with allowlist validation.
    ///
    /// Arguments are handed to the process as a vector, so shell
    /// metacharacters in them are never interpreted. When a timeout is set
    /// and expires, the child is killed.
    ///
    /// # Errors
    ///
    /// - `CommandError::CommandNotAllowed` - Command not in the allowlist
    /// - `CommandError::ExecutionFailed` - Binary not found or execution error
    /// - `CommandError::Timeout` - Process still running when the timeout expired
    pub async fn execute(&self, command: &str, args: &[&str]) -> Result<Output, CommandError> {
        if !self.is_allowed(command) {
            return Err(CommandError::CommandNotAllowed(command.to_string()));
        }

        tracing::debug!(command, ?args, dir = %self.working_dir.display(), "executing");

        let child = Command::new(command)
            .args(args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| CommandError::ExecutionFailed(e.to_string()))?;

        let output = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, child.wait_with_output())
                .await
                .map_err(|_| {
                    tracing::warn!(command, ?timeout, "command timed out");
                    CommandError::Timeout(timeout)
                })?,
            None => child.wait_with_output().await,
        };

        output.map_err(|e| CommandError::ExecutionFailed(e.to_string()))
    }
}
