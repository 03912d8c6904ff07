//! Common test utilities for rover integration tests.
//!
//! Provides `TestEnv`, an isolated working directory with a stand-in
//! Terraform executable, and a `rover()` command that starts from an empty
//! environment so stray `ROVER_*` variables cannot leak into a test.

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
pub use tempfile::TempDir;

pub struct TestEnv {
    pub work_dir: TempDir,
}

impl TestEnv {
    /// Create a new test environment with an empty working directory.
    pub fn new() -> Self {
        Self {
            work_dir: TempDir::new().unwrap(),
        }
    }

    /// Create a test environment containing a file named `terraform`.
    pub fn with_terraform() -> Self {
        let env = Self::new();
        env.write_file("terraform", "#!/bin/sh\n");
        env
    }

    /// Get a Command for the rover binary running inside the working directory.
    pub fn rover(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_rover"));
        cmd.env_clear();
        cmd.current_dir(self.work_dir.path());
        cmd
    }

    /// Write a file relative to the working directory and return its path.
    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.work_dir.path().join(name);
        fs::write(&path, contents).expect("Failed to write test file");
        path
    }

    pub fn path(&self) -> &Path {
        self.work_dir.path()
    }

    /// Path of the stand-in Terraform executable.
    pub fn terraform(&self) -> String {
        self.path().join("terraform").display().to_string()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
