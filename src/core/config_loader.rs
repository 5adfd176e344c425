//! Configuration file loader for ci-helpers
//!
//! This module provides configuration loading, validation, and merging capabilities.

use super::config::*;
use crate::core::error::HelperError;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Configuration file name
pub const CONFIG_FILENAME: &str = ".ci-helpers.yaml";

lazy_static! {
    /// `${VAR_NAME}` references inside string values
    static ref ENV_VAR_REF: Regex = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();

    /// Acceptable environment variable names
    static ref ENV_VAR_NAME: Regex = Regex::new(r"^[A-Z_][A-Z0-9_]*$").unwrap();
}

/// Overrides taken from the command line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub token_env_var: Option<String>,
    pub manifest: Option<String>,
    pub release_tag: Option<String>,
    pub release_draft: Option<bool>,
}

/// Configuration load options
#[derive(Debug, Clone)]
pub struct ConfigLoadOptions {
    /// Repository root to load config from
    pub project_path: PathBuf,

    /// CLI arguments (highest priority)
    pub cli_args: ConfigOverrides,

    /// Environment variables
    pub env: HashMap<String, String>,
}

impl ConfigLoadOptions {
    /// Options reading the current process environment
    pub fn from_process_env(project_path: impl Into<PathBuf>, cli_args: ConfigOverrides) -> Self {
        Self {
            project_path: project_path.into(),
            cli_args,
            env: std::env::vars().collect(),
        }
    }
}

/// Top-level configuration sections, validated independently
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSection {
    Token,
    Project,
    Frameworks,
    Release,
}

impl ConfigSection {
    pub const ALL: &'static [ConfigSection] = &[
        ConfigSection::Token,
        ConfigSection::Project,
        ConfigSection::Frameworks,
        ConfigSection::Release,
    ];
}

/// Configuration validation result
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationResult {
    pub valid: bool,
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationWarning>,
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationError {
    /// Field path (e.g., "release.tag")
    pub field: String,
    pub message: String,
}

/// Configuration validation warning
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

/// Configuration file loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from multiple sources with priority
    ///
    /// Priority (high to low):
    /// 1. CLI arguments
    /// 2. Environment variables
    /// 3. Project config (./.ci-helpers.yaml)
    /// 4. Default values
    ///
    /// Nothing is validated here; see [`ConfigLoader::load_validated`].
    pub async fn load(options: ConfigLoadOptions) -> Result<HelperConfig, HelperError> {
        let config_path = options.project_path.join(CONFIG_FILENAME);

        let mut config = match Self::load_config_file(&config_path).await? {
            Some(config) => {
                tracing::debug!(path = %config_path.display(), "loaded config file");
                config
            }
            None => HelperConfig::default(),
        };

        Self::apply_env(&mut config, &options.env);
        Self::apply_overrides(&mut config, options.cli_args);

        Ok(Self::expand_env_vars(config, &options.env))
    }

    /// Load configuration and validate the sections the caller depends on
    ///
    /// Errors in other sections do not abort the load, so a bad release tag
    /// does not stop the token helper.
    pub async fn load_validated(
        options: ConfigLoadOptions,
        sections: &[ConfigSection],
    ) -> Result<HelperConfig, HelperError> {
        let config = Self::load(options).await?;

        let result = Self::validate_sections(&config, sections);
        for warning in &result.warnings {
            tracing::warn!(field = %warning.field, "{}", warning.message);
        }
        if !result.valid {
            return Err(HelperError::ConfigError(Self::format_validation_result(
                &result,
            )));
        }

        Ok(config)
    }

    /// Load configuration from a YAML file, `None` if it does not exist
    pub async fn load_config_file(file_path: &Path) -> Result<Option<HelperConfig>, HelperError> {
        if !file_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(file_path).await.map_err(|e| {
            HelperError::ConfigError(format!("Failed to read config file: {}", e))
        })?;

        // An empty file deserializes to unit, not a mapping.
        if content.trim().is_empty() {
            return Ok(Some(HelperConfig::default()));
        }

        let config: HelperConfig = serde_yaml::from_str(&content).map_err(|e| {
            HelperError::ConfigError(format!("Failed to parse YAML config: {}", e))
        })?;

        Ok(Some(config))
    }

    /// Apply environment variable overrides
    fn apply_env(config: &mut HelperConfig, env: &HashMap<String, String>) {
        // CI_HELPERS_TOKEN_ENV -> token.envVar
        if let Some(env_var) = env.get("CI_HELPERS_TOKEN_ENV") {
            config.token.env_var = env_var.clone();
        }

        // CI_HELPERS_RELEASE_TAG -> release.tag
        if let Some(tag) = env.get("CI_HELPERS_RELEASE_TAG") {
            config.release.tag = tag.clone();
        }

        // CI_HELPERS_RELEASE_DRAFT -> release.draft
        match env.get("CI_HELPERS_RELEASE_DRAFT").map(|s| s.as_str()) {
            Some("true") => config.release.draft = true,
            Some("false") => config.release.draft = false,
            Some(other) => tracing::warn!(
                value = other,
                "ignoring CI_HELPERS_RELEASE_DRAFT, expected true or false"
            ),
            None => {}
        }
    }

    /// Apply command-line overrides
    fn apply_overrides(config: &mut HelperConfig, overrides: ConfigOverrides) {
        if let Some(env_var) = overrides.token_env_var {
            config.token.env_var = env_var;
        }
        if let Some(manifest) = overrides.manifest {
            config.project.manifest = manifest;
        }
        if let Some(tag) = overrides.release_tag {
            config.release.tag = tag;
        }
        if let Some(draft) = overrides.release_draft {
            config.release.draft = draft;
        }
    }

    /// Expand `${VAR}` references in the free-form string values
    fn expand_env_vars(mut config: HelperConfig, env: &HashMap<String, String>) -> HelperConfig {
        config.release.tag = Self::expand_string(&config.release.tag, env);
        config.release.title = Self::expand_string(&config.release.title, env);
        config.release.notes = Self::expand_string(&config.release.notes, env);
        config
    }

    /// Expand environment variables in a single string
    ///
    /// Unknown variables are left in place.
    pub fn expand_string(input: &str, env: &HashMap<String, String>) -> String {
        ENV_VAR_REF
            .replace_all(input, |caps: &regex::Captures| match env.get(&caps[1]) {
                Some(value) => value.clone(),
                None => {
                    tracing::warn!(var = &caps[1], "environment variable not set, leaving as is");
                    caps[0].to_string()
                }
            })
            .into_owned()
    }

    /// Validate every section of the configuration
    pub fn validate(config: &HelperConfig) -> ConfigValidationResult {
        Self::validate_sections(config, ConfigSection::ALL)
    }

    /// Validate only the given sections
    pub fn validate_sections(
        config: &HelperConfig,
        sections: &[ConfigSection],
    ) -> ConfigValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        for section in sections {
            match section {
                ConfigSection::Token => Self::validate_token(config, &mut errors),
                ConfigSection::Project => Self::validate_project(config, &mut errors),
                ConfigSection::Frameworks => {
                    Self::validate_frameworks(config, &mut errors, &mut warnings)
                }
                ConfigSection::Release => {
                    Self::validate_release(config, &mut errors, &mut warnings)
                }
            }
        }

        ConfigValidationResult {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    fn validate_token(config: &HelperConfig, errors: &mut Vec<ConfigValidationError>) {
        if !ENV_VAR_NAME.is_match(&config.token.env_var) {
            errors.push(ConfigValidationError {
                field: "token.envVar".to_string(),
                message: format!(
                    "'{}' is not a valid environment variable name",
                    config.token.env_var
                ),
            });
        }
    }

    fn validate_project(config: &HelperConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.project.manifest.trim().is_empty() {
            errors.push(ConfigValidationError {
                field: "project.manifest".to_string(),
                message: "Manifest file name must not be empty".to_string(),
            });
        }
    }

    fn validate_frameworks(
        config: &HelperConfig,
        errors: &mut Vec<ConfigValidationError>,
        warnings: &mut Vec<ConfigValidationWarning>,
    ) {
        if config.frameworks.is_empty() {
            errors.push(ConfigValidationError {
                field: "frameworks".to_string(),
                message: "At least one framework is required".to_string(),
            });
        }

        for framework in config.frameworks.iter() {
            if !DEFAULT_FRAMEWORKS.contains(&framework) {
                warnings.push(ConfigValidationWarning {
                    field: "frameworks".to_string(),
                    message: format!("Unknown framework '{}'", framework),
                    suggestion: Some(format!("Known frameworks: {}", DEFAULT_FRAMEWORKS.join(", "))),
                });
            }
        }
    }

    fn validate_release(
        config: &HelperConfig,
        errors: &mut Vec<ConfigValidationError>,
        warnings: &mut Vec<ConfigValidationWarning>,
    ) {
        let version = config
            .release
            .tag
            .strip_prefix('v')
            .unwrap_or(&config.release.tag);
        if let Err(e) = semver::Version::parse(version) {
            errors.push(ConfigValidationError {
                field: "release.tag".to_string(),
                message: format!("'{}' is not a semantic version: {}", config.release.tag, e),
            });
        }

        if config.release.title.trim().is_empty() {
            warnings.push(ConfigValidationWarning {
                field: "release.title".to_string(),
                message: "Release title is empty".to_string(),
                suggestion: Some("gh will fall back to the tag name".to_string()),
            });
        }

        if config.release.timeout_secs == 0 {
            errors.push(ConfigValidationError {
                field: "release.timeoutSecs".to_string(),
                message: "Timeout must be greater than zero".to_string(),
            });
        }
    }

    /// Format validation result for display
    pub fn format_validation_result(result: &ConfigValidationResult) -> String {
        let mut lines = Vec::new();

        if result.valid {
            lines.push("Configuration is valid".to_string());
        } else {
            lines.push("Configuration has errors".to_string());
        }

        for error in &result.errors {
            lines.push(format!("  - [{}] {}", error.field, error.message));
        }

        for warning in &result.warnings {
            lines.push(format!("  - warning [{}] {}", warning.field, warning.message));
            if let Some(suggestion) = &warning.suggestion {
                lines.push(format!("    Suggestion: {}", suggestion));
            }
        }

        lines.join("\n")
    }
}
