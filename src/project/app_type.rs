//! App Type Detector - Reports which web frameworks a Python project uses
//!
//! Reads the project's `pyproject.toml` and checks the keys of
//! `[tool.poetry.dependencies]` against the configured framework list.
//!
//! # Example
//!
//! ```
//! use ci_helpers::project::AppTypeDetector;
//! use ci_helpers::core::config::Frameworks;
//! use std::path::Path;
//!
//! let detector = AppTypeDetector::new(Frameworks::default());
//! let manifest = "[tool.poetry.dependencies]\npython = \"^3.12\"\nfastapi = \"*\"\n";
//! let found = detector.detect_from_str(manifest, Path::new("pyproject.toml")).unwrap();
//! assert_eq!(found, vec!["fastapi"]);
//! ```

use crate::core::config::{Frameworks, HelperConfig};
use crate::core::error::{HelperError, Result};
use crate::project::locator::{ProjectLocation, ProjectLocator};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Detects frameworks declared as poetry dependencies
#[derive(Debug, Clone, Default)]
pub struct AppTypeDetector {
    frameworks: Frameworks,
}

impl AppTypeDetector {
    pub fn new(frameworks: Frameworks) -> Self {
        Self { frameworks }
    }

    /// Read a manifest file and detect frameworks in it
    pub async fn detect_in_manifest(&self, path: &Path) -> Result<Vec<String>> {
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(HelperError::ManifestNotFound {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        self.detect_from_str(&content, path)
    }

    /// Detect frameworks in manifest content
    ///
    /// Frameworks are returned in configured order. Dependency names are
    /// compared case-insensitively, as Poetry normalizes them: `Django = "^5"`
    /// reports `django`, where an exact key lookup would miss it.
    pub fn detect_from_str(&self, content: &str, path: &Path) -> Result<Vec<String>> {
        let invalid = |message: String| HelperError::InvalidManifest {
            path: path.to_path_buf(),
            message,
        };

        let manifest: toml::Table =
            toml::from_str(content).map_err(|e| invalid(format!("Invalid TOML syntax: {}", e)))?;

        let dependencies = manifest
            .get("tool")
            .and_then(|v| v.as_table())
            .and_then(|t| t.get("poetry"))
            .and_then(|v| v.as_table())
            .and_then(|t| t.get("dependencies"))
            .and_then(|v| v.as_table())
            .ok_or_else(|| invalid("missing [tool.poetry.dependencies] table".to_string()))?;

        let declared: Vec<String> = dependencies.keys().map(|k| k.to_lowercase()).collect();

        Ok(self
            .frameworks
            .iter()
            .filter(|framework| declared.iter().any(|d| d == &framework.to_lowercase()))
            .map(str::to_string)
            .collect())
    }
}

/// Manifest path for the application under `root`
///
/// Falls back to a manifest at the root itself when child directories exist
/// but none of them carries one.
pub fn resolve_manifest(locator: &ProjectLocator) -> Result<Option<PathBuf>> {
    match locator.locate()? {
        ProjectLocation::Found { path, .. } => Ok(Some(path.join(locator.manifest()))),
        ProjectLocation::NoCandidates => Err(HelperError::NoApplication),
        ProjectLocation::NoManifest => {
            let root_manifest = locator.root().join(locator.manifest());
            Ok(root_manifest.is_file().then_some(root_manifest))
        }
    }
}

/// Locate the project under `root` and detect its frameworks
pub async fn detect_app_types(root: &Path, config: &HelperConfig) -> Result<Vec<String>> {
    let locator = ProjectLocator::new(root, &config.project);

    let Some(manifest) = resolve_manifest(&locator)? else {
        tracing::info!(root = %root.display(), "no manifest found, nothing to detect");
        return Ok(Vec::new());
    };

    tracing::debug!(manifest = %manifest.display(), "scanning manifest");
    AppTypeDetector::new(config.frameworks.clone())
        .detect_in_manifest(&manifest)
        .await
}
