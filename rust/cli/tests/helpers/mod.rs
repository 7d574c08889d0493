//! Shared fixtures for the CLI integration tests.
//!
//! `Sandbox` points `DIEMSO_DATA_DIR` at a fresh temporary directory and
//! clears the other configuration variables. Tests that use it must run
//! under `#[serial]` since the environment is process wide.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use tempfile::TempDir;

const CONFIG_VARS: &[&str] = &[
    "DIEMSO_CONFIG",
    "DIEMSO_STARTING_BET",
    "DIEMSO_SQLITE_BACKOFF_MS",
    "DIEMSO_SQLITE_MAX_ATTEMPTS",
];

pub struct Sandbox {
    dir: TempDir,
}

/// Result of one `diemso_cli::run` call.
pub struct CliOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        unsafe {
            std::env::set_var("DIEMSO_DATA_DIR", dir.path());
            for var in CONFIG_VARS {
                std::env::remove_var(var);
            }
        }
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn session_file(&self, key: &str) -> PathBuf {
        self.dir.path().join(format!("{}.json", key))
    }

    pub fn run(&self, args: &[&str]) -> CliOutput {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let argv = std::iter::once("diemso").chain(args.iter().copied());
        let code = diemso_cli::run(argv, &mut out, &mut err);
        CliOutput {
            code,
            stdout: String::from_utf8_lossy(&out).into_owned(),
            stderr: String::from_utf8_lossy(&err).into_owned(),
        }
    }

    /// Runs a command that must succeed and returns its stdout.
    pub fn ok(&self, args: &[&str]) -> String {
        let res = self.run(args);
        assert_eq!(
            res.code, 0,
            "{:?} failed\nstdout:\n{}\nstderr:\n{}",
            args, res.stdout, res.stderr
        );
        res.stdout
    }

    pub fn saved(&self, key: &str) -> serde_json::Value {
        let raw = std::fs::read_to_string(self.session_file(key)).expect("session file");
        serde_json::from_str(&raw).expect("session json")
    }
}

impl Drop for Sandbox {
    fn drop(&mut self) {
        unsafe {
            std::env::remove_var("DIEMSO_DATA_DIR");
        }
    }
}

/// Score of the player named `name` in a saved snapshot.
pub fn score_of(snapshot: &serde_json::Value, name: &str) -> i64 {
    snapshot["players"]
        .as_array()
        .and_then(|players| players.iter().find(|p| p["name"] == name))
        .and_then(|p| p["score"].as_i64())
        .unwrap_or_else(|| panic!("no player {} in snapshot", name))
}
