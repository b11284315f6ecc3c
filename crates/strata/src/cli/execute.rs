//! Command execution logic.

use anyhow::Result;

use super::args::{ListArgs, OrderArgs, RenderArgs};
use crate::app::{App, open_in_browser};
use crate::layering::order_and_trim;
use crate::output::{self, OutputConfig, OutputMode, PackageSummary};
use crate::partition::split_graphs;
use crate::render::Graphviz;
use crate::report::{DiagramRequest, Report};
use serde_json::json;
use tracing::info;

/// Execute the render command
pub async fn execute_render(app: &mut App, args: &RenderArgs, output_mode: OutputMode) -> Result<()> {
    let config = OutputConfig::from_env();
    let root_dir = app.root_dir().display().to_string();
    let (workspace, categories) = app.parts_mut();

    if output_mode == OutputMode::Text {
        println!(
            "Parsing package.json files inside {}",
            output::success(&root_dir, &config)
        );
        let count = workspace.len();
        println!("- found {count} package{}", if count == 1 { "" } else { "s" });
        println!("Building graphs");
    }

    let report = Report::build(workspace, categories)?;

    if output_mode == OutputMode::Text {
        println!("Drawing");
        for diagram in report.diagrams() {
            println!("- {}", diagram.request.title);
        }
    }

    let written = report.write_dot(&args.output).await?;
    let index = if args.dot_only {
        None
    } else {
        let renderer = Graphviz::new(&args.dot_binary);
        info!(binary = %renderer.binary().display(), "Rendering diagrams");
        Some(report.write(&args.output, &renderer).await?)
    };

    if args.open
        && let Some(index) = &index
    {
        open_in_browser(index).await;
    }

    match output_mode {
        OutputMode::Json => {
            let value = json!({
                "output": args.output,
                "dot_files": written,
                "index": index,
                "diagrams": report.diagrams(),
            });
            output::print_json(&mut std::io::stdout().lock(), &value)?;
        }
        OutputMode::Text => {
            let target = index.as_ref().unwrap_or(&args.output);
            let target = std::fs::canonicalize(target).unwrap_or_else(|_| target.clone());
            println!(
                "\nWrote to: {}",
                output::success(&target.display().to_string(), &config)
            );
        }
    }
    Ok(())
}

/// Execute the list command
pub fn execute_list(app: &mut App, args: &ListArgs, output_mode: OutputMode) -> Result<()> {
    let (workspace, categories) = app.parts_mut();
    categories.paint(workspace);
    let partition = split_graphs(workspace, categories);

    let summaries: Vec<PackageSummary> = workspace
        .members()
        .map(|package| {
            let group = partition.group_of(&package.name).map(str::to_string);
            PackageSummary {
                name: package.name.clone(),
                location: package.location.clone(),
                version: package.version.clone(),
                private: package.is_private,
                category: categories
                    .match_category(package)
                    .map(|rule| rule.id.clone()),
                group,
                requires: package.requires.clone(),
                needed_by: package.needed_by.clone(),
            }
        })
        .filter(|summary| {
            args.group
                .as_ref()
                .is_none_or(|group| summary.group.as_ref() == Some(group))
        })
        .collect();

    output::print_packages(&summaries, output_mode)?;
    Ok(())
}

/// Execute the order command
pub fn execute_order(app: &mut App, args: &OrderArgs, output_mode: OutputMode) -> Result<()> {
    let (workspace, categories) = app.parts_mut();
    let partition = split_graphs(workspace, categories);

    let request = DiagramRequest::for_name(workspace, &partition, &args.name)
        .ok_or_else(|| crate::error::Error::PackageNotFound(args.name.clone()))?;
    let graph = order_and_trim(&request.filter, workspace.packages(), |name| {
        request.focus.is_interesting(name)
    })?;

    output::print_order(&request.title, &graph, output_mode)?;
    Ok(())
}
