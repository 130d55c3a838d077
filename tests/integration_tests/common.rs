// shared utilities for integration tests

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// a temporary directory holding one config file
pub struct TestConfig {
    _dir: TempDir,
    pub path: PathBuf,
}

/// write `content` as a JSON5 config into a fresh temp directory
pub fn create_test_config(content: &str) -> TestConfig {
    let dir = TempDir::new().expect("Failed to create test directory");
    let path = dir.path().join("config.json5");
    fs::write(&path, content).expect("Failed to write test config");
    TestConfig { _dir: dir, path }
}

/// write a serde_json value as the config
#[allow(dead_code)]
pub fn create_config_with_content(content: &serde_json::Value) -> TestConfig {
    create_test_config(&serde_json::to_string_pretty(content).unwrap())
}

/// run ifactions against `config` with extra args
pub fn run_ifactions(config: &Path, args: &[&str]) -> Output {
    let mut cmd_args = vec!["--config", config.to_str().unwrap()];
    cmd_args.extend_from_slice(args);
    run_ifactions_with_env(&cmd_args, &[])
}

/// run ifactions with custom environment
pub fn run_ifactions_with_env(args: &[&str], env_vars: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ifactions"));
    cmd.args(args);
    cmd.env_remove("IFACTIONS_CONFIG");
    cmd.env_remove("RUST_LOG");

    for (key, value) in env_vars {
        cmd.env(key, value);
    }

    cmd.output().expect("Failed to run ifactions")
}

/// parse stdout as a JSON-RPC response
pub fn parse_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(stdout.trim()).unwrap_or_else(|e| {
        panic!("stdout is not JSON ({}): {}", e, stdout);
    })
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[allow(dead_code)]
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}
