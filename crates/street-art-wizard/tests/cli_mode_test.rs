/*
[INPUT]:  Built street-art-wizard binary, YAML config files
[OUTPUT]: Exit status and stderr checks for non-interactive runs
[POS]:    Integration tests - CLI flags and config validation
[UPDATE]: When CLI flags or startup validation change
*/

use std::process::Command;

fn wizard_binary() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_street-art-wizard"));
    command
        .env_remove("STREET_ART__SUPABASE__URL")
        .env_remove("STREET_ART__SUPABASE__ANON_KEY")
        .env("RUST_LOG", "error");
    command
}

#[test]
fn dry_run_with_example_config_validates() {
    let config_path = format!("{}/config/example.yaml", env!("CARGO_MANIFEST_DIR"));

    let output = wizard_binary()
        .arg("--config")
        .arg(&config_path)
        .arg("--dry-run")
        .output()
        .expect("Failed to start street-art-wizard binary");

    assert!(
        output.status.success(),
        "Process exited with non-zero status: {}\nStdout: {}\nStderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn offline_dry_run_needs_no_credentials() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = dir.path().join("config.yaml");
    std::fs::write(&config_path, "table: street_art_submission\n").expect("write config");

    let output = wizard_binary()
        .arg("--config")
        .arg(&config_path)
        .arg("--offline")
        .arg("--dry-run")
        .output()
        .expect("Failed to start street-art-wizard binary");

    assert!(
        output.status.success(),
        "offline dry-run failed\nStderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn missing_credentials_are_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = dir.path().join("config.yaml");
    std::fs::write(&config_path, "table: street_art_submission\n").expect("write config");

    let output = wizard_binary()
        .arg("--config")
        .arg(&config_path)
        .arg("--dry-run")
        .output()
        .expect("Failed to start street-art-wizard binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("supabase.url is required"),
        "unexpected stderr: {stderr}"
    );
}
