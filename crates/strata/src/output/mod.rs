//! Output formatting for CLI commands, as text or JSON.

pub mod color;

use crate::layering::LayeredGraph;
use serde::Serialize;
use std::collections::BTreeSet;
use std::env;
use std::io::{self, Write};

pub use color::{info, success, warning};
use color::{bold, dimmed};

/// Output settings read from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    /// Whether to use colors.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Explicit settings.
    #[must_use]
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Read `NO_COLOR` (any value disables colors) and `STRATA_COLOR`
    /// (`0`/`false` disables colors).
    #[must_use]
    pub fn from_env() -> Self {
        let use_colors = env::var("NO_COLOR").is_err()
            && env::var("STRATA_COLOR")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true);
        Self { use_colors }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { use_colors: true }
    }
}

/// Output format mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text format
    Text,
    /// JSON format for programmatic use
    Json,
}

/// One row of `strata list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageSummary {
    /// Package name.
    pub name: String,
    /// Location relative to the workspace root.
    pub location: String,
    /// Declared version.
    pub version: Option<String>,
    /// Private flag.
    pub private: bool,
    /// Matched category id.
    pub category: Option<String>,
    /// Group key.
    pub group: Option<String>,
    /// Workspace dependencies.
    pub requires: BTreeSet<String>,
    /// Workspace dependents.
    pub needed_by: BTreeSet<String>,
}

/// Pretty-printed JSON followed by a newline.
pub fn print_json<W: Write, T: Serialize + ?Sized>(w: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *w, value)?;
    writeln!(w)
}

/// Print package summaries.
pub fn print_packages(packages: &[PackageSummary], mode: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    match mode {
        OutputMode::Text => write_packages_text(&mut handle, packages, &OutputConfig::from_env()),
        OutputMode::Json => print_json(&mut handle, packages),
    }
}

/// Print a layered order.
pub fn print_order(title: &str, graph: &LayeredGraph, mode: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    match mode {
        OutputMode::Text => write_order_text(&mut handle, title, graph, &OutputConfig::from_env()),
        OutputMode::Json => print_json(&mut handle, graph),
    }
}

fn join(names: &BTreeSet<String>) -> String {
    if names.is_empty() {
        "-".to_string()
    } else {
        names.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
    }
}

pub(crate) fn write_packages_text<W: Write>(
    w: &mut W,
    packages: &[PackageSummary],
    config: &OutputConfig,
) -> io::Result<()> {
    if packages.is_empty() {
        writeln!(w, "No packages found.")?;
        return Ok(());
    }

    for package in packages {
        let version = package
            .version
            .as_deref()
            .map(|v| format!(" v{v}"))
            .unwrap_or_default();
        let private = if package.private { " (private)" } else { "" };
        writeln!(
            w,
            "{}{version}{private}  {}",
            info(&package.name, config),
            dimmed(&package.location, config)
        )?;
        if let Some(category) = &package.category {
            match &package.group {
                Some(group) => writeln!(w, "  category: {category} (group {group})")?,
                None => writeln!(w, "  category: {category}")?,
            }
        }
        writeln!(w, "  requires:  {}", join(&package.requires))?;
        writeln!(w, "  needed by: {}", join(&package.needed_by))?;
    }

    writeln!(
        w,
        "\n{} package{}",
        packages.len(),
        if packages.len() == 1 { "" } else { "s" }
    )
}

pub(crate) fn write_order_text<W: Write>(
    w: &mut W,
    title: &str,
    graph: &LayeredGraph,
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(w, "{}", bold(title, config))?;
    for (id, name) in graph.entries() {
        let targets = graph
            .edges
            .get(id)
            .map(|children| {
                children
                    .iter()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default();
        if targets.is_empty() {
            writeln!(w, "  {}  {}", dimmed(id, config), info(name, config))?;
        } else {
            writeln!(
                w,
                "  {}  {} -> {targets}",
                dimmed(id, config),
                info(name, config)
            )?;
        }
    }
    for cycle in &graph.cycles {
        writeln!(w, "{}", warning(&format!("cycle: {}", cycle.join(" <-> ")), config))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Package, Workspace};
    use crate::layering::order_and_trim;

    fn plain() -> OutputConfig {
        OutputConfig::new(false)
    }

    fn summary(name: &str) -> PackageSummary {
        PackageSummary {
            name: name.to_string(),
            location: format!("packages/{name}"),
            version: Some("1.0.0".to_string()),
            private: true,
            category: Some("libs".to_string()),
            group: None,
            requires: BTreeSet::from(["b".to_string()]),
            needed_by: BTreeSet::new(),
        }
    }

    #[test]
    fn packages_text_lists_relationships() {
        let mut out = Vec::new();
        write_packages_text(&mut out, &[summary("a")], &plain()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("a v1.0.0 (private)  packages/a\n"));
        assert!(text.contains("  category: libs\n"));
        assert!(text.contains("  requires:  b\n"));
        assert!(text.contains("  needed by: -\n"));
        assert!(text.ends_with("1 package\n"));
    }

    #[test]
    fn empty_package_list() {
        let mut out = Vec::new();
        write_packages_text(&mut out, &[], &plain()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No packages found.\n");
    }

    #[test]
    fn order_text_shows_positional_edges() {
        let ws = Workspace::new(
            Package::new("root", ""),
            vec![Package::new("a", "a").declaring(["b"]), Package::new("b", "b")],
        )
        .unwrap();
        let graph = order_and_trim(&ws.names(), ws.packages(), |_| true).unwrap();

        let mut out = Vec::new();
        write_order_text(&mut out, "a", &graph, &plain()).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "a\n  pkg_00  a -> pkg_01\n  pkg_01  b\n"
        );
    }

    #[test]
    fn json_is_pretty_with_trailing_newline() {
        let mut out = Vec::new();
        print_json(&mut out, &summary("a")).unwrap();
        let text = String::from_utf8(out).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["needed_by"], serde_json::json!([]));
        assert!(text.ends_with("}\n"));
    }
}
