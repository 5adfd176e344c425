//! Drives the built binary to check what the workflow sees: stdout lines and exit codes.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn ci_helpers(root: &Path, args: &[&str], env: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ci-helpers"));
    cmd.arg("--root")
        .arg(root)
        .args(args)
        .env_remove("DOPPLER_TOKEN")
        .env_remove("CI_HELPERS_TOKEN_ENV")
        .env_remove("CI_HELPERS_RELEASE_TAG")
        .env_remove("CI_HELPERS_RELEASE_DRAFT")
        .env_remove("RUST_LOG");
    for (key, value) in env {
        cmd.env(key, value);
    }
    cmd.output().expect("failed to run ci-helpers")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[test]
fn test_token_type_prints_label() {
    let temp_dir = TempDir::new().unwrap();

    let output = ci_helpers(
        temp_dir.path(),
        &["token-type"],
        &[("DOPPLER_TOKEN", "dp.st.prd.abcdef123456")],
    );

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "service_token");
}

#[test]
fn test_token_type_service_account_label() {
    let temp_dir = TempDir::new().unwrap();

    let output = ci_helpers(
        temp_dir.path(),
        &["token-type"],
        &[("DOPPLER_TOKEN", "dp.sa.abcdef")],
    );

    assert_eq!(stdout(&output), "service_account");
}

#[test]
fn test_token_type_unset_is_benign() {
    let temp_dir = TempDir::new().unwrap();

    let output = ci_helpers(temp_dir.path(), &["token-type"], &[]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "[ERROR] - DOPPLER_TOKEN is not set.");
}

#[test]
fn test_token_type_malformed_fails() {
    let temp_dir = TempDir::new().unwrap();

    let output = ci_helpers(
        temp_dir.path(),
        &["token-type"],
        &[("DOPPLER_TOKEN", "ghp_abcdef")],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).starts_with("[ERROR] - DOPPLER_TOKEN is not a valid token"));
}

#[test]
fn test_token_type_unrecognized_fails() {
    let temp_dir = TempDir::new().unwrap();

    let output = ci_helpers(
        temp_dir.path(),
        &["token-type"],
        &[("DOPPLER_TOKEN", "dp.xx.abcdef")],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("unrecognized token type 'xx'"));
}

#[test]
fn test_token_type_custom_env_var() {
    let temp_dir = TempDir::new().unwrap();

    let output = ci_helpers(
        temp_dir.path(),
        &["token-type", "--env-var", "SECRETS_TOKEN"],
        &[("SECRETS_TOKEN", "dp.pt.abcdef")],
    );

    assert_eq!(stdout(&output), "personal_token");
}

#[test]
fn test_token_type_env_var_from_config_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(".ci-helpers.yaml"),
        "token:\n  envVar: VAULT_TOKEN\n",
    )
    .unwrap();

    let output = ci_helpers(
        temp_dir.path(),
        &["token-type"],
        &[("VAULT_TOKEN", "dp.st.abcdef")],
    );

    assert_eq!(stdout(&output), "service_token");
}

#[test]
fn test_project_dir() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir(temp_dir.path().join("scripts")).unwrap();
    fs::create_dir(temp_dir.path().join("webapp")).unwrap();
    fs::write(temp_dir.path().join("webapp/pyproject.toml"), "").unwrap();

    let output = ci_helpers(temp_dir.path(), &["project-dir"], &[]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "webapp");
}

#[test]
fn test_project_dir_none_found() {
    let temp_dir = TempDir::new().unwrap();

    let output = ci_helpers(temp_dir.path(), &["project-dir"], &[]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "[WARN] - No project directory found.");
}

#[test]
fn test_app_type() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir(temp_dir.path().join("api")).unwrap();
    fs::write(
        temp_dir.path().join("api/pyproject.toml"),
        "[tool.poetry.dependencies]\npython = \"^3.12\"\ndjango = \"^5.0\"\nclick = \"*\"\n",
    )
    .unwrap();

    let output = ci_helpers(temp_dir.path(), &["app-type"], &[]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "click\ndjango");
}

#[test]
fn test_app_type_without_application() {
    let temp_dir = TempDir::new().unwrap();

    let output = ci_helpers(temp_dir.path(), &["app-type"], &[]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        stdout(&output),
        "[ERROR] - No application is configured in this repository."
    );
}

#[test]
fn test_app_type_invalid_manifest_fails() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir(temp_dir.path().join("api")).unwrap();
    fs::write(temp_dir.path().join("api/pyproject.toml"), "[tool.poetry").unwrap();

    let output = ci_helpers(temp_dir.path(), &["app-type"], &[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).starts_with("[ERROR] - Invalid manifest"));
}

#[test]
fn test_token_type_malformed_suggests_actions_on_stderr() {
    let temp_dir = TempDir::new().unwrap();

    let output = ci_helpers(
        temp_dir.path(),
        &["token-type"],
        &[("DOPPLER_TOKEN", "ghp_abcdef")],
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("dp.<type>.<secret>"), "stderr: {}", stderr);
    assert!(!stdout(&output).contains("dp.<type>.<secret>"));
}

#[test]
fn test_token_type_ignores_bad_release_tag() {
    let temp_dir = TempDir::new().unwrap();

    let output = ci_helpers(
        temp_dir.path(),
        &["token-type"],
        &[
            ("DOPPLER_TOKEN", "dp.st.abcdef"),
            ("CI_HELPERS_RELEASE_TAG", "latest"),
        ],
    );

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "service_token");
}

#[test]
fn test_project_dir_ignores_bad_release_config() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir(temp_dir.path().join("webapp")).unwrap();
    fs::write(temp_dir.path().join("webapp/pyproject.toml"), "").unwrap();
    fs::write(
        temp_dir.path().join(".ci-helpers.yaml"),
        "release:\n  tag: not-a-version\n  timeoutSecs: 0\n",
    )
    .unwrap();

    let output = ci_helpers(temp_dir.path(), &["project-dir"], &[]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "webapp");
}

#[test]
fn test_token_type_bad_env_var_name_fails() {
    let temp_dir = TempDir::new().unwrap();

    let output = ci_helpers(
        temp_dir.path(),
        &["token-type"],
        &[("CI_HELPERS_TOKEN_ENV", "not-a-var")],
    );

    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.starts_with("[ERROR] - Configuration error"), "stdout: {}", out);
    assert!(out.contains("token.envVar"));
}

#[test]
fn test_initial_release_rejects_bad_tag_before_calling_gh() {
    let temp_dir = TempDir::new().unwrap();

    let output = ci_helpers(
        temp_dir.path(),
        &["initial-release", "--tag", "latest"],
        &[],
    );

    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.starts_with("[ERROR] - Configuration error"), "stdout: {}", out);
    assert!(out.contains("release.tag"));
}

#[test]
fn test_invalid_config_fails() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(".ci-helpers.yaml"),
        "release:\n  tag: not-a-version\n",
    )
    .unwrap();

    let output = ci_helpers(temp_dir.path(), &["check-config"], &[]);

    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.starts_with("[ERROR] - Configuration error"), "stdout: {}", out);
    assert!(out.contains("Configuration has errors"));
    assert!(out.contains("[release.tag]"));
}

#[test]
fn test_unparsable_config_reported_on_stdout() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join(".ci-helpers.yaml"), "release: [unclosed").unwrap();

    let output = ci_helpers(
        temp_dir.path(),
        &["token-type"],
        &[("DOPPLER_TOKEN", "dp.st.abcdef")],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).starts_with("[ERROR] - Configuration error: Failed to parse YAML config"));
}

#[test]
fn test_check_config_prints_effective_config() {
    let temp_dir = TempDir::new().unwrap();

    let output = ci_helpers(
        temp_dir.path(),
        &["check-config"],
        &[("CI_HELPERS_RELEASE_TAG", "v2.0.0")],
    );

    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    assert!(out.contains("Configuration is valid"));
    assert!(out.contains("tag: v2.0.0"));
}
