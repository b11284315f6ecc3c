//! Rendering DOT text to images.

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Image formats written for every diagram.
pub const FORMATS: [&str; 2] = ["svg", "png"];

/// Turns DOT text into image files.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Render `dot` to `<out_dir>/<filename_base>.<format>` for each of
    /// [`FORMATS`].
    async fn render(&self, dot: &str, out_dir: &Path, filename_base: &str) -> Result<()>;
}

/// Renderer backed by the Graphviz `dot` binary.
#[derive(Debug, Clone)]
pub struct Graphviz {
    binary: PathBuf,
}

impl Graphviz {
    /// Use `binary` instead of `dot` from `PATH`.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// The binary invoked.
    #[must_use]
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    async fn run(&self, dot: &str, format: &str, output: &Path) -> Result<()> {
        let mut child = Command::new(&self.binary)
            .arg(format!("-T{format}"))
            .arg("-o")
            .arg(output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::Render(format!("failed to run {}: {e}", self.binary.display())))?;

        if let Some(mut stdin) = child.stdin.take() {
            let written = async {
                stdin.write_all(dot.as_bytes()).await?;
                stdin.shutdown().await
            }
            .await;
            // A renderer that exits early closes the pipe; its exit status
            // carries the real failure.
            if let Err(e) = written
                && e.kind() != io::ErrorKind::BrokenPipe
            {
                return Err(e.into());
            }
        }

        let result = child.wait_with_output().await?;
        if !result.status.success() {
            return Err(Error::Render(format!(
                "{} exited with {} while writing {}: {}",
                self.binary.display(),
                result.status,
                output.display(),
                String::from_utf8_lossy(&result.stderr).trim()
            )));
        }

        debug!(output = %output.display(), "Rendered diagram");
        Ok(())
    }
}

impl Default for Graphviz {
    fn default() -> Self {
        Self::new("dot")
    }
}

#[async_trait]
impl Renderer for Graphviz {
    async fn render(&self, dot: &str, out_dir: &Path, filename_base: &str) -> Result<()> {
        for format in FORMATS {
            let output = out_dir.join(format!("{filename_base}.{format}"));
            self.run(dot, format, &output).await?;
        }
        Ok(())
    }
}
