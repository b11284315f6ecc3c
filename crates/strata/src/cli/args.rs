//! CLI argument structs for all commands.

use clap::Parser;
use std::path::PathBuf;

/// Arguments for the `render` command
#[derive(Parser, Debug, Clone)]
pub struct RenderArgs {
    /// Output directory
    #[arg(short, long, default_value = "./out")]
    pub output: PathBuf,

    /// Write only the `.dot` files; skip image rendering and `index.html`
    #[arg(long)]
    pub dot_only: bool,

    /// Graphviz binary used to render images
    #[arg(long, default_value = "dot")]
    pub dot_binary: PathBuf,

    /// Open `index.html` in the default browser when done
    #[arg(long, conflicts_with = "dot_only")]
    pub open: bool,
}

/// Arguments for the `list` command
#[derive(Parser, Debug, Clone)]
pub struct ListArgs {
    /// Only packages assigned to this group
    #[arg(short, long)]
    pub group: Option<String>,
}

/// Arguments for the `order` command
#[derive(Parser, Debug, Clone)]
pub struct OrderArgs {
    /// Package name or group key
    pub name: String,
}
