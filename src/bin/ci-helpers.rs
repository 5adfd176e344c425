//! ci-helpers CLI
//!
//! Helper commands for CI workflows. Results and `[ERROR]`/`[WARN]` lines go
//! to stdout, one per line; logs and suggested actions go to stderr.

use anyhow::Result;
use ci_helpers::core::logging;
use ci_helpers::{
    ConfigLoadOptions, ConfigLoader, ConfigOverrides, ConfigSection, GhCliBackend, HelperConfig,
    HelperError, InitialRelease, NewRelease, ProjectLocator, SecureTokenManager, detect_app_types,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;

/// Helper commands for CI workflows
#[derive(Parser)]
#[command(name = "ci-helpers")]
#[command(version)]
#[command(about = "Helper commands for CI workflows", long_about = None)]
struct Cli {
    /// Repository root (defaults to current directory)
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Verbose diagnostics on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the type of the secret-manager token
    TokenType {
        /// Environment variable holding the token
        #[arg(long)]
        env_var: Option<String>,
    },

    /// Print the name of the directory holding the project manifest
    ProjectDir {
        /// Manifest file name
        #[arg(long)]
        manifest: Option<String>,
    },

    /// Print the web frameworks the project depends on
    AppType {
        /// Manifest file name
        #[arg(long)]
        manifest: Option<String>,
    },

    /// Create the initial release if the repository has none
    InitialRelease {
        /// Tag of the initial release
        #[arg(long)]
        tag: Option<String>,

        /// Create a draft instead of marking the release latest
        #[arg(long)]
        draft: bool,
    },

    /// Validate .ci-helpers.yaml and print the effective configuration
    CheckConfig,
}

#[tokio::main]
async fn main() {
    let result = run().await;

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            println!("[ERROR] - {:#}", e);
            process::exit(1);
        }
    }
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    // Each command only validates the config sections it reads.
    let (overrides, sections): (ConfigOverrides, &[ConfigSection]) = match &cli.command {
        Commands::TokenType { env_var } => (
            ConfigOverrides {
                token_env_var: env_var.clone(),
                ..Default::default()
            },
            &[ConfigSection::Token],
        ),
        Commands::ProjectDir { manifest } => (
            ConfigOverrides {
                manifest: manifest.clone(),
                ..Default::default()
            },
            &[ConfigSection::Project],
        ),
        Commands::AppType { manifest } => (
            ConfigOverrides {
                manifest: manifest.clone(),
                ..Default::default()
            },
            &[ConfigSection::Project, ConfigSection::Frameworks],
        ),
        Commands::InitialRelease { tag, draft } => (
            ConfigOverrides {
                release_tag: tag.clone(),
                release_draft: draft.then_some(true),
                ..Default::default()
            },
            &[ConfigSection::Release],
        ),
        // check-config reports every problem itself
        Commands::CheckConfig => (ConfigOverrides::default(), &[]),
    };

    let options = ConfigLoadOptions::from_process_env(&cli.root, overrides);
    let config = match ConfigLoader::load_validated(options, sections).await {
        Ok(config) => config,
        Err(e) => return Ok(report_error(&e)),
    };

    let outcome = match cli.command {
        Commands::TokenType { .. } => token_type_command(&config),
        Commands::ProjectDir { .. } => project_dir_command(&cli.root, &config),
        Commands::AppType { .. } => app_type_command(&cli.root, &config).await,
        Commands::InitialRelease { .. } => initial_release_command(&cli.root, &config).await,
        Commands::CheckConfig => check_config_command(&config),
    };

    Ok(match outcome {
        Ok(()) => 0,
        Err(e) => report_error(&e),
    })
}

/// Print the workflow-facing line and return the exit code
fn report_error(error: &HelperError) -> i32 {
    println!("{}", error.report_line());
    for action in error.suggested_actions() {
        tracing::warn!(code = error.code(), "{}", action);
    }
    error.exit_code()
}

fn token_type_command(config: &HelperConfig) -> Result<(), HelperError> {
    let manager = SecureTokenManager::new(&config.token.env_var);

    let kind = manager
        .classify_token()
        .map_err(|e| HelperError::from_classification(e, manager.env_var()))?;

    println!("{}", kind.label());
    Ok(())
}

fn project_dir_command(root: &Path, config: &HelperConfig) -> Result<(), HelperError> {
    let locator = ProjectLocator::new(root, &config.project);

    match locator.project_name()? {
        Some(name) => println!("{}", name),
        None => tracing::info!(manifest = locator.manifest(), "no directory holds the manifest"),
    }
    Ok(())
}

async fn app_type_command(root: &Path, config: &HelperConfig) -> Result<(), HelperError> {
    for framework in detect_app_types(root, config).await? {
        println!("{}", framework);
    }
    Ok(())
}

async fn initial_release_command(
    root: &Path,
    config: &HelperConfig,
) -> Result<(), HelperError> {
    let backend =
        GhCliBackend::from_config(root, &config.release)?.with_masked_env_var(&config.token.env_var);
    let workflow = InitialRelease::new(backend, NewRelease::from_config(&config.release));

    let outcome = workflow.run().await?;
    println!("{}", outcome.report_line());
    Ok(())
}

fn check_config_command(config: &HelperConfig) -> Result<(), HelperError> {
    let result = ConfigLoader::validate(config);
    if !result.valid {
        return Err(HelperError::ConfigError(
            ConfigLoader::format_validation_result(&result),
        ));
    }
    println!("{}", ConfigLoader::format_validation_result(&result));

    let yaml = serde_yaml::to_string(config)
        .map_err(|e| HelperError::ConfigError(format!("Failed to render config: {}", e)))?;
    println!("{}", yaml);
    Ok(())
}
