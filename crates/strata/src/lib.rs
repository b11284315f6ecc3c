//! Strata - dependency layers of a package.json workspace.
//!
//! Loads a workspace root and its members into a package graph, assigns
//! packages to configured categories, partitions them into per-package and
//! per-group filter sets, and lays each set out in dependency order for
//! diagram rendering.

#![forbid(unsafe_code)]

// Core engine
pub mod categories;
pub mod domain;
pub mod error;
pub mod layering;
pub mod loader;
pub mod partition;
pub mod reach;

// Diagram generation
pub mod render;
pub mod report;

// Public CLI module (needed by binary)
pub mod app;
pub mod cli;
pub mod output;

pub use error::{Error, Result};
