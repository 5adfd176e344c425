//! Error handling for the CI helpers
//!
//! Every failure a helper can report, with the exit code and recovery hints
//! the workflow sees. Built on thiserror like the rest of the crate.

use crate::security::{ClassificationError, CommandError};
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for helper operations
#[derive(Error, Debug)]
pub enum HelperError {
    // Token errors
    #[error("{env_var} is not set.")]
    TokenMissing { env_var: String },

    #[error("{env_var} is not a valid token: {reason}.")]
    TokenInvalid { env_var: String, reason: String },

    #[error("{env_var} has an unrecognized token type '{code}'.")]
    TokenUnrecognized { env_var: String, code: String },

    // Project discovery errors
    #[error("No project directory found.")]
    NoProjectDirectory,

    #[error("No application is configured in this repository.")]
    NoApplication,

    #[error("{} not found", .path.display())]
    ManifestNotFound { path: PathBuf },

    #[error("Invalid manifest {}: {message}", .path.display())]
    InvalidManifest { path: PathBuf, message: String },

    // Release errors
    #[error("Error checking for existing releases: {message}")]
    ReleaseQueryFailed { message: String },

    #[error("Error creating initial release: {message}")]
    ReleaseCreateFailed { message: String },

    // Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // Command execution errors
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HelperError {
    /// Attach the environment variable name to a classification failure
    pub fn from_classification(error: ClassificationError, env_var: &str) -> Self {
        let env_var = env_var.to_string();
        match error {
            ClassificationError::MissingToken => Self::TokenMissing { env_var },
            ClassificationError::InvalidFormat { reason } => Self::TokenInvalid { env_var, reason },
            ClassificationError::UnrecognizedType { code } => {
                Self::TokenUnrecognized { env_var, code }
            }
        }
    }

    /// Absence cases the workflow tolerates: reported, but not a failure
    pub fn is_benign(&self) -> bool {
        matches!(
            self,
            Self::TokenMissing { .. } | Self::NoProjectDirectory | Self::NoApplication
        )
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        if self.is_benign() { 0 } else { 1 }
    }

    /// Bracketed tag the workflow greps for
    pub fn tag(&self) -> &'static str {
        match self {
            Self::NoProjectDirectory => "[WARN]",
            _ => "[ERROR]",
        }
    }

    /// Line printed for the workflow, e.g. `[ERROR] - DOPPLER_TOKEN is not set.`
    pub fn report_line(&self) -> String {
        format!("{} - {}", self.tag(), self)
    }

    /// Get suggested actions for this error
    pub fn suggested_actions(&self) -> Vec<&'static str> {
        match self {
            Self::TokenMissing { .. } => {
                vec!["Export the token as a repository or environment secret"]
            }
            Self::TokenInvalid { .. } => vec![
                "Tokens look like dp.<type>.<secret>",
                "Check the secret was copied in full",
            ],
            Self::TokenUnrecognized { .. } => {
                vec!["Use a personal (pt), service (st) or service account (sa) token"]
            }
            Self::NoProjectDirectory | Self::NoApplication => {
                vec!["Add a project directory containing pyproject.toml"]
            }
            Self::ManifestNotFound { .. } => {
                vec!["Check the project.manifest setting in .ci-helpers.yaml"]
            }
            Self::InvalidManifest { .. } => vec![
                "Fix the TOML syntax",
                "Declare dependencies under [tool.poetry.dependencies]",
            ],
            Self::ReleaseQueryFailed { .. } | Self::ReleaseCreateFailed { .. } => vec![
                "Check that gh is installed and authenticated (GH_TOKEN)",
                "Check the workflow has contents: write permission",
            ],
            Self::ConfigError(_) => vec!["Check .ci-helpers.yaml"],
            Self::Command(_) => vec![
                "Check the command output",
                "Make sure the required CLI tools are installed",
            ],
            Self::Io(_) => vec!["Check file permissions"],
        }
    }

    /// Get error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::TokenMissing { .. } => "TOKEN_MISSING",
            Self::TokenInvalid { .. } => "TOKEN_INVALID",
            Self::TokenUnrecognized { .. } => "TOKEN_UNRECOGNIZED",
            Self::NoProjectDirectory => "NO_PROJECT_DIRECTORY",
            Self::NoApplication => "NO_APPLICATION",
            Self::ManifestNotFound { .. } => "MANIFEST_NOT_FOUND",
            Self::InvalidManifest { .. } => "INVALID_MANIFEST",
            Self::ReleaseQueryFailed { .. } => "RELEASE_QUERY_FAILED",
            Self::ReleaseCreateFailed { .. } => "RELEASE_CREATE_FAILED",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::Command(_) => "COMMAND_ERROR",
            Self::Io(_) => "IO_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, HelperError>;
