//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use strata::domain::{Package, Workspace};
use tempfile::TempDir;

/// A workspace laid out on disk in a temporary directory.
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    /// Root manifest named `root` declaring `patterns` as workspaces.
    pub fn new(patterns: &[&str]) -> Self {
        let fixture = Self {
            dir: TempDir::new().unwrap(),
        };
        fixture.write("package.json", &json!({ "name": "root", "private": true, "workspaces": patterns }));
        fixture
    }

    /// Workspace root directory.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Root manifest path.
    pub fn root_manifest(&self) -> PathBuf {
        self.root().join("package.json")
    }

    /// Write `value` as `<relative>` below the root.
    pub fn write(&self, relative: &str, value: &Value) -> PathBuf {
        let path = self.root().join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
        path
    }

    /// Write a member manifest at `<dir>/package.json`.
    pub fn member(&self, dir: &str, name: &str, dependencies: &[&str]) -> PathBuf {
        let deps: serde_json::Map<String, Value> = dependencies
            .iter()
            .map(|dep| ((*dep).to_string(), json!("*")))
            .collect();
        self.write(
            &format!("{dir}/package.json"),
            &json!({ "name": name, "version": "1.0.0", "dependencies": deps }),
        )
    }

    /// Write arbitrary text below the root.
    pub fn text(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root().join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }
}

/// In-memory workspace from `(name, location, requires)` triples.
pub fn workspace(members: &[(&str, &str, &[&str])]) -> Workspace {
    Workspace::new(
        Package::new("root", ""),
        members
            .iter()
            .map(|(name, location, deps)| Package::new(*name, *location).declaring(deps.iter().copied())),
    )
    .unwrap()
}

/// Run the strata binary in `dir`.
pub fn run_strata(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_strata"))
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute strata binary")
}
