//! Initial Release - Creates the first release of a repository if it has none
//!
//! One pass: list releases, and create the configured one only when the list
//! is empty. Nothing is retried.

use super::backend::{NewRelease, ReleaseBackend};
use crate::core::error::Result;

/// What the workflow did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Releases already exist; nothing was created
    AlreadyExists { count: usize },
    /// The initial release was created
    Created { tag: String },
}

impl ReleaseOutcome {
    /// Line printed for the workflow
    pub fn report_line(&self) -> &'static str {
        match self {
            Self::AlreadyExists { .. } => "[INFO] - Initial release already exists, nothing to do.",
            Self::Created { .. } => "[SUCCESS] - Initial release created successfully.",
        }
    }
}

/// Initial release workflow
pub struct InitialRelease<B: ReleaseBackend> {
    backend: B,
    release: NewRelease,
}

impl<B: ReleaseBackend> InitialRelease<B> {
    pub fn new(backend: B, release: NewRelease) -> Self {
        Self { backend, release }
    }

    /// Create the initial release unless one already exists
    pub async fn run(&self) -> Result<ReleaseOutcome> {
        let existing = self.backend.list_releases().await?;
        tracing::debug!(backend = self.backend.name(), count = existing.len(), "existing releases");

        if !existing.is_empty() {
            tracing::info!(count = existing.len(), "releases already exist");
            return Ok(ReleaseOutcome::AlreadyExists {
                count: existing.len(),
            });
        }

        tracing::info!(
            backend = self.backend.name(),
            tag = %self.release.tag,
            draft = self.release.draft,
            "creating initial release"
        );
        self.backend.create_release(&self.release).await?;

        Ok(ReleaseOutcome::Created {
            tag: self.release.tag.clone(),
        })
    }
}
