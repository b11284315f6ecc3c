//! Application context for CLI command execution.
//!
//! Resolves the workspace root, loads the root manifest with every member,
//! and loads the category configuration.

use crate::categories::CategoryConfig;
use crate::domain::Workspace;
use crate::error::Result;
use crate::loader::load_workspace;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use strata_manifest::{FsSource, MANIFEST_FILE_NAME};
use tokio::process::Command;
use tracing::{debug, warn};

/// Loaded workspace plus its category configuration.
#[derive(Debug)]
pub struct App {
    root_dir: PathBuf,
    workspace: Workspace,
    config: CategoryConfig,
}

impl App {
    /// Load the workspace rooted at `root` (or the detected root) and the
    /// optional category configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or any manifest
    /// cannot be loaded.
    pub async fn load(root: Option<&Path>, categories: Option<&Path>) -> Result<Self> {
        let config = CategoryConfig::load_optional(categories).await?;

        let root_dir = match root {
            Some(root) => root.to_path_buf(),
            None => find_root().await?,
        };
        let workspace = load_workspace(&FsSource::new(), &root_dir.join(MANIFEST_FILE_NAME)).await?;

        Ok(Self {
            root_dir,
            workspace,
            config,
        })
    }

    /// Workspace root directory.
    #[must_use]
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// The loaded workspace.
    #[must_use]
    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Category configuration.
    #[must_use]
    pub fn config(&self) -> &CategoryConfig {
        &self.config
    }

    /// Workspace and configuration, split for callers that mutate one while
    /// reading the other.
    pub fn parts_mut(&mut self) -> (&mut Workspace, &CategoryConfig) {
        (&mut self.workspace, &self.config)
    }
}

/// Top level of the enclosing git checkout, or the current directory when
/// git is unavailable or this is not a checkout.
///
/// # Errors
///
/// Returns `Error::Io` if the current directory cannot be determined.
pub async fn find_root() -> Result<PathBuf> {
    let output = Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .output()
        .await;

    if let Ok(output) = output
        && output.status.success()
    {
        let top = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !top.is_empty() {
            return Ok(PathBuf::from(top));
        }
    }

    debug!("Not inside a git checkout, using the current directory");
    Ok(std::env::current_dir()?)
}

/// Command that opens `path` with the platform's default handler.
#[must_use]
pub fn open_command(path: &Path) -> Command {
    let mut command = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(windows) {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]);
        command
    } else {
        Command::new("xdg-open")
    };
    command.arg(path);
    command
}

/// Open `path` in the default browser. Failure is logged, not returned.
pub async fn open_in_browser(path: &Path) {
    let status = open_command(path)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;
    match status {
        Ok(status) if status.success() => debug!(path = %path.display(), "Opened report"),
        Ok(status) => warn!(path = %path.display(), %status, "Could not open report"),
        Err(e) => warn!(path = %path.display(), error = %e, "Could not open report"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn write(dir: &Path, relative: &str, content: &str) {
        let path = dir.join(relative);
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(path, content).await.unwrap();
    }

    #[tokio::test]
    async fn load_reads_workspace_and_config() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "package.json",
            r#"{ "name": "root", "workspaces": ["packages/*"] }"#,
        )
        .await;
        write(
            temp.path(),
            "packages/a/package.json",
            r#"{ "name": "a", "dependencies": { "b": "*" } }"#,
        )
        .await;
        write(temp.path(), "packages/b/package.json", r#"{ "name": "b" }"#).await;
        write(temp.path(), "categories.json", r#"{ "rules": [{ "id": "all" }] }"#).await;

        let categories = temp.path().join("categories.json");
        let app = App::load(Some(temp.path()), Some(&categories)).await.unwrap();

        assert_eq!(app.workspace().len(), 2);
        assert_eq!(app.workspace().root().name, "root");
        assert_eq!(app.config().rules.len(), 1);
        assert_eq!(app.root_dir(), temp.path());
    }

    #[tokio::test]
    async fn missing_root_manifest_is_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(App::load(Some(temp.path()), None).await.is_err());
    }

    #[test]
    fn open_command_passes_the_path_last() {
        let path = Path::new("/tmp/out/index.html");
        let command = open_command(path);
        let args: Vec<&std::ffi::OsStr> = command.as_std().get_args().collect();
        assert_eq!(args.last().copied(), Some(path.as_os_str()));
    }

    #[tokio::test]
    async fn find_root_always_yields_a_directory() {
        let root = find_root().await.unwrap();
        assert!(root.is_absolute());
    }
}
