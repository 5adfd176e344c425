//! Release backends
//!
//! `ReleaseBackend` is the seam between the initial-release workflow and the
//! hosting service. `GhCliBackend` drives the GitHub CLI through
//! `SafeCommandExecutor`.

use crate::core::config::ReleaseConfig;
use crate::core::error::{HelperError, Result};
use crate::security::{SafeCommandExecutor, SecureTokenManager};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::process::Output;
use std::time::Duration;

/// Variables `gh` reads its credentials from
const GH_TOKEN_ENV_VARS: &[&str] = &["GH_TOKEN", "GITHUB_TOKEN"];

/// Entry of `gh release list --json tagName`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseSummary {
    #[serde(rename = "tagName")]
    pub tag_name: String,
}

/// Release to create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRelease {
    pub tag: String,
    pub title: String,
    pub notes: String,
    pub draft: bool,
}

impl NewRelease {
    pub fn from_config(config: &ReleaseConfig) -> Self {
        Self {
            tag: config.tag.clone(),
            title: config.title.clone(),
            notes: config.notes.clone(),
            draft: config.draft,
        }
    }

    /// Arguments for `gh`
    pub fn gh_args(&self) -> Vec<String> {
        vec![
            "release".to_string(),
            "create".to_string(),
            self.tag.clone(),
            "--title".to_string(),
            self.title.clone(),
            "--notes".to_string(),
            self.notes.clone(),
            if self.draft { "--draft" } else { "--latest" }.to_string(),
        ]
    }
}

/// Hosting service that stores releases
#[async_trait]
pub trait ReleaseBackend: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Existing releases
    async fn list_releases(&self) -> Result<Vec<ReleaseSummary>>;

    /// Create a release
    async fn create_release(&self, release: &NewRelease) -> Result<()>;
}

/// GitHub CLI backend
#[derive(Debug, Clone)]
pub struct GhCliBackend {
    executor: SafeCommandExecutor,
    /// Tokens scrubbed from `gh` stderr before it is reported
    masks: Vec<SecureTokenManager>,
}

impl GhCliBackend {
    pub fn new(executor: SafeCommandExecutor) -> Self {
        Self {
            executor,
            masks: GH_TOKEN_ENV_VARS
                .iter()
                .map(|name| SecureTokenManager::new(*name))
                .collect(),
        }
    }

    /// Also mask the token held in `env_var` in error messages
    pub fn with_masked_env_var(mut self, env_var: impl Into<String>) -> Self {
        self.masks.push(SecureTokenManager::new(env_var));
        self
    }

    /// Backend running `gh` in `working_dir` with the configured timeout
    pub fn from_config(
        working_dir: impl AsRef<std::path::Path>,
        config: &ReleaseConfig,
    ) -> Result<Self> {
        let mut executor = SafeCommandExecutor::new(working_dir)?;
        executor.set_timeout(Duration::from_secs(config.timeout_secs));
        Ok(Self::new(executor))
    }

    async fn gh(&self, args: Vec<String>) -> Result<Output> {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        Ok(self.executor.execute("gh", &args).await?)
    }

    fn failure_message(&self, output: &Output) -> String {
        self.masked_failure(output.status.code(), &output.stderr)
    }

    fn masked_failure(&self, code: Option<i32>, stderr: &[u8]) -> String {
        let message = describe_failure(code, stderr);
        self.masks
            .iter()
            .fold(message, |text, mask| mask.mask_tokens_in_string(&text))
    }
}

/// Parse the JSON printed by `gh release list --json tagName`
pub fn parse_release_list(stdout: &[u8]) -> Result<Vec<ReleaseSummary>> {
    let text = String::from_utf8_lossy(stdout);
    let text = text.trim();

    if text.is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_str(text).map_err(|e| HelperError::ReleaseQueryFailed {
        message: format!("unexpected gh output: {}", e),
    })
}

fn describe_failure(code: Option<i32>, stderr: &[u8]) -> String {
    let stderr = String::from_utf8_lossy(stderr);
    let stderr = stderr.trim();
    match code {
        Some(code) if stderr.is_empty() => format!("exit code {}", code),
        Some(code) => format!("exit code {} - {}", code, stderr),
        None => "terminated by signal".to_string(),
    }
}

#[async_trait]
impl ReleaseBackend for GhCliBackend {
    fn name(&self) -> &str {
        "gh"
    }

    async fn list_releases(&self) -> Result<Vec<ReleaseSummary>> {
        let args = ["release", "list", "--json", "tagName"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let output = self.gh(args).await.map_err(|e| HelperError::ReleaseQueryFailed {
            message: e.to_string(),
        })?;

        if !output.status.success() {
            return Err(HelperError::ReleaseQueryFailed {
                message: self.failure_message(&output),
            });
        }

        parse_release_list(&output.stdout)
    }

    async fn create_release(&self, release: &NewRelease) -> Result<()> {
        let output = self
            .gh(release.gh_args())
            .await
            .map_err(|e| HelperError::ReleaseCreateFailed {
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(HelperError::ReleaseCreateFailed {
                message: self.failure_message(&output),
            });
        }

        Ok(())
    }
}
