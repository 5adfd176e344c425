//! Configuration structures for ci-helpers
//!
//! Mirrors the optional `.ci-helpers.yaml` file. Every section is optional in
//! the file; `HelperConfig::default()` reproduces the built-in behavior.

use serde::{Deserialize, Serialize};

use crate::security::token_manager::DEFAULT_TOKEN_ENV_VAR;

/// Frameworks recognized out of the box, in output order
pub const DEFAULT_FRAMEWORKS: &[&str] = &[
    "fastapi",
    "click",
    "flask",
    "django",
    "streamlit",
    "reflex",
];

/// Root configuration object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct HelperConfig {
    /// Token classification settings
    pub token: TokenConfig,

    /// Project discovery settings
    pub project: ProjectConfig,

    /// Framework names looked up in the manifest's dependencies
    pub frameworks: Frameworks,

    /// Initial release settings
    pub release: ReleaseConfig,
}

/// Token settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct TokenConfig {
    /// Environment variable holding the token
    pub env_var: String,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            env_var: DEFAULT_TOKEN_ENV_VAR.to_string(),
        }
    }
}

/// Project discovery settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProjectConfig {
    /// Manifest file that marks the project directory
    pub manifest: String,

    /// Top-level directory names never treated as the project
    pub ignore: Vec<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            manifest: "pyproject.toml".to_string(),
            ignore: vec!["scripts".to_string()],
        }
    }
}

/// Ordered framework list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Frameworks(pub Vec<String>);

impl Default for Frameworks {
    fn default() -> Self {
        Self(DEFAULT_FRAMEWORKS.iter().map(|s| s.to_string()).collect())
    }
}

impl Frameworks {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Initial release settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ReleaseConfig {
    /// Tag of the initial release
    pub tag: String,

    /// Release title
    pub title: String,

    /// Release notes
    pub notes: String,

    /// Create a draft instead of marking the release latest
    pub draft: bool,

    /// Per-command timeout for gh invocations
    pub timeout_secs: u64,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            tag: "v0.0.0".to_string(),
            title: "Automated Initial Release".to_string(),
            notes: "Automated Initial release of the project.".to_string(),
            draft: false,
            timeout_secs: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HelperConfig::default();

        assert_eq!(config.token.env_var, "DOPPLER_TOKEN");
        assert_eq!(config.project.manifest, "pyproject.toml");
        assert_eq!(config.project.ignore, vec!["scripts".to_string()]);
        assert_eq!(
            config.frameworks.iter().collect::<Vec<_>>(),
            DEFAULT_FRAMEWORKS.to_vec()
        );
        assert_eq!(config.release.tag, "v0.0.0");
        assert!(!config.release.draft);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "release:\n  draft: true\n";
        let config: HelperConfig = serde_yaml::from_str(yaml).unwrap();

        assert!(config.release.draft);
        assert_eq!(config.release.tag, "v0.0.0");
        assert_eq!(config.token, TokenConfig::default());
    }

    #[test]
    fn test_camel_case_fields() {
        let yaml = "token:\n  envVar: MY_TOKEN\nrelease:\n  timeoutSecs: 5\n";
        let config: HelperConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.token.env_var, "MY_TOKEN");
        assert_eq!(config.release.timeout_secs, 5);
    }

    #[test]
    fn test_frameworks_list() {
        let yaml = "frameworks: [litestar, fastapi]\n";
        let config: HelperConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(
            config.frameworks.iter().collect::<Vec<_>>(),
            vec!["litestar", "fastapi"]
        );
    }
}
