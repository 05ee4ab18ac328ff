//! Isolated environment for running the `viewtree` binary

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use tempfile::TempDir;

/// Result of running a viewtree CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Temp directory holding a snapshot and a state file
pub struct TestEnv {
    pub dir: TempDir,
    bin: PathBuf,
}

impl TestEnv {
    /// Environment whose snapshot file contains `json`
    pub fn with_fixture(json: &str) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(dir.path().join("viewtree.json"), json).expect("Failed to write fixture");
        Self {
            dir,
            bin: PathBuf::from(env!("CARGO_BIN_EXE_viewtree")),
        }
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    /// Runs with extra environment variables, e.g. config overrides
    pub fn run_with_env(&self, args: &[&str], vars: &[(&str, &str)]) -> TestResult {
        let output = Command::new(&self.bin)
            .current_dir(self.dir.path())
            .args(args)
            .env_remove("RUST_LOG")
            .env("XDG_CONFIG_HOME", self.dir.path().join(".config"))
            .env("VIEWTREE_FILES_LAYOUT", "list")
            .envs(vars.iter().copied())
            .output()
            .expect("Failed to run viewtree");
        TestResult {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}
