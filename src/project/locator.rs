//! Project Locator - Finds the directory holding the application's manifest
//!
//! A repository is expected to carry one application directory next to
//! tooling directories. The locator lists the root's immediate child
//! directories, skips hidden and ignored ones, and picks the first (by name)
//! that contains the manifest file.

use crate::core::config::ProjectConfig;
use crate::core::error::{HelperError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Outcome of a project lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectLocation {
    /// A candidate directory contains the manifest
    Found { name: String, path: PathBuf },
    /// There are no candidate directories at all
    NoCandidates,
    /// Candidates exist but none contains the manifest
    NoManifest,
}

/// Locates the project directory under a repository root
#[derive(Debug, Clone)]
pub struct ProjectLocator {
    root: PathBuf,
    manifest: String,
    ignore: Vec<String>,
}

impl ProjectLocator {
    pub fn new(root: impl Into<PathBuf>, config: &ProjectConfig) -> Self {
        Self {
            root: root.into(),
            manifest: config.manifest.clone(),
            ignore: config.ignore.clone(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest(&self) -> &str {
        &self.manifest
    }

    /// Immediate child directories eligible as the project, sorted by name
    pub fn candidates(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();

        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(std::io::Error::from)?;

            // Follows symlinks, unlike entry.file_type().
            if !entry.path().is_dir() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') || self.ignore.iter().any(|i| i == &name) {
                continue;
            }

            names.push(name);
        }

        Ok(names)
    }

    /// Find the project directory
    pub fn locate(&self) -> Result<ProjectLocation> {
        let candidates = self.candidates()?;
        tracing::debug!(root = %self.root.display(), ?candidates, "project candidates");

        if candidates.is_empty() {
            return Ok(ProjectLocation::NoCandidates);
        }

        for name in candidates {
            let path = self.root.join(&name);
            if path.join(&self.manifest).is_file() {
                return Ok(ProjectLocation::Found { name, path });
            }
        }

        Ok(ProjectLocation::NoManifest)
    }

    /// Name of the project directory, or `NoProjectDirectory`
    ///
    /// `Ok(None)` when directories exist but none holds the manifest.
    pub fn project_name(&self) -> Result<Option<String>> {
        match self.locate()? {
            ProjectLocation::Found { name, .. } => Ok(Some(name)),
            ProjectLocation::NoManifest => Ok(None),
            ProjectLocation::NoCandidates => Err(HelperError::NoProjectDirectory),
        }
    }
}
