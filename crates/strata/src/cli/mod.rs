//! CLI argument parsing and command dispatch.
//!
//! # Commands
//!
//! - `render`: Write every diagram, the legend and `index.html`
//! - `list`: List workspace packages with categories and relationships
//! - `order`: Show the layered order of one package or group
//!
//! # Global Flags
//!
//! - `--root`: Workspace root (default: the git top level)
//! - `--categories`: Category configuration file (JSON or YAML)
//! - `--json`: Output in JSON format
//! - `--verbose`: Debug logging
//!
//! # Example
//!
//! ```bash
//! strata --categories categories.yaml render --output out
//! strata list --group core
//! strata --json order @acme/ui
//! ```

mod args;
mod execute;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use args::{ListArgs, OrderArgs, RenderArgs};

/// Strata - dependency layer diagrams for package.json workspaces
///
/// Loads the root package.json and every workspace member, categorizes
/// packages, and draws their dependencies in layers.
#[derive(Parser, Debug)]
#[command(name = "strata")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Workspace root directory (default: `git rev-parse --show-toplevel`)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Category configuration file (`.json`, `.yaml` or `.yml`)
    #[arg(short, long, global = true)]
    pub categories: Option<PathBuf>,

    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Render the dependency report
    ///
    /// Writes one diagram for the whole workspace, one per group and one per
    /// ungrouped package, plus a legend and `index.html`.
    Render(RenderArgs),

    /// List workspace packages
    ///
    /// Shows location, version, visibility, category, dependencies and
    /// dependents of every member.
    List(ListArgs),

    /// Show the layered order of a package or group
    ///
    /// Prints the node order and positional edges the diagram for NAME
    /// would use.
    Order(OrderArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Default log filter for the chosen verbosity.
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "strata=debug,strata_manifest=debug"
        } else {
            "strata=info,strata_manifest=info"
        }
    }

    /// Execute the CLI command
    pub async fn execute(&self) -> Result<()> {
        use crate::app::App;
        use crate::output::OutputMode;

        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };

        let Some(command) = &self.command else {
            println!("Strata workspace dependency diagrams");
            println!("Use --help for more information");
            return Ok(());
        };

        let mut app = App::load(self.root.as_deref(), self.categories.as_deref()).await?;
        match command {
            Commands::Render(args) => execute::execute_render(&mut app, args, output_mode).await,
            Commands::List(args) => execute::execute_list(&mut app, args, output_mode),
            Commands::Order(args) => execute::execute_order(&mut app, args, output_mode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_no_command() {
        let cli = Cli::try_parse_from(["strata"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.json);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_render_defaults() {
        let cli = Cli::try_parse_from(["strata", "render"]).unwrap();
        match cli.command {
            Some(Commands::Render(args)) => {
                assert_eq!(args.output, PathBuf::from("./out"));
                assert!(!args.dot_only);
                assert!(!args.open);
                assert_eq!(args.dot_binary, PathBuf::from("dot"));
            }
            _ => panic!("Expected Render command"),
        }
    }

    #[test]
    fn test_parse_render_options() {
        let cli = Cli::try_parse_from([
            "strata",
            "render",
            "--output",
            "diagrams",
            "--dot-only",
            "--dot-binary",
            "/usr/local/bin/dot",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Render(args)) => {
                assert_eq!(args.output, PathBuf::from("diagrams"));
                assert!(args.dot_only);
                assert_eq!(args.dot_binary, PathBuf::from("/usr/local/bin/dot"));
            }
            _ => panic!("Expected Render command"),
        }
    }

    #[test]
    fn test_parse_render_open() {
        let cli = Cli::try_parse_from(["strata", "render", "--open"]).unwrap();
        match cli.command {
            Some(Commands::Render(args)) => assert!(args.open),
            _ => panic!("Expected Render command"),
        }
    }

    #[test]
    fn test_parse_render_open_conflicts_with_dot_only() {
        let result = Cli::try_parse_from(["strata", "render", "--open", "--dot-only"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "strata",
            "list",
            "--json",
            "--root",
            "/repo",
            "--categories",
            "cats.yaml",
            "-v",
        ])
        .unwrap();
        assert!(cli.json);
        assert!(cli.verbose);
        assert_eq!(cli.root, Some(PathBuf::from("/repo")));
        assert_eq!(cli.categories, Some(PathBuf::from("cats.yaml")));
        assert_eq!(cli.log_filter(), "strata=debug,strata_manifest=debug");
    }

    #[test]
    fn test_parse_list_group() {
        let cli = Cli::try_parse_from(["strata", "list", "--group", "core"]).unwrap();
        match cli.command {
            Some(Commands::List(args)) => assert_eq!(args.group.as_deref(), Some("core")),
            _ => panic!("Expected List command"),
        }
    }

    #[test]
    fn test_parse_order_requires_name() {
        assert!(Cli::try_parse_from(["strata", "order"]).is_err());
        let cli = Cli::try_parse_from(["strata", "order", "@acme/ui"]).unwrap();
        match cli.command {
            Some(Commands::Order(args)) => assert_eq!(args.name, "@acme/ui"),
            _ => panic!("Expected Order command"),
        }
    }
}
