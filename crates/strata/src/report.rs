//! Report assembly.
//!
//! A report is the legend plus one diagram per filter set: the whole
//! workspace first, then each group, then each ungrouped package.

use crate::categories::CategoryConfig;
use crate::domain::Workspace;
use crate::error::{Error, Result};
use crate::layering::{LayeredGraph, order_and_trim};
use crate::partition::{FilterSet, Partition, group_filename, package_filename, split_graphs};
use crate::render::{Renderer, dot, html, legend};
use futures::future::try_join_all;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Base name of the whole-workspace diagram.
pub const ALL_FILENAME: &str = "group__ALL";

/// Base name of the legend diagram.
pub const LEGEND_FILENAME: &str = "legend";

/// Which nodes of a diagram keep their full edge set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "packages", rename_all = "lowercase")]
pub enum Focus {
    /// Every node of the diagram.
    All,
    /// One package.
    Package(String),
}

impl Focus {
    /// True when `name` keeps its full edge set.
    #[must_use]
    pub fn is_interesting(&self, name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Package(package) => package == name,
        }
    }
}

/// One diagram to draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagramRequest {
    /// Heading in the report.
    pub title: String,
    /// Output file base name.
    pub filename_base: String,
    /// Packages drawn.
    pub filter: FilterSet,
    /// Packages whose edges are kept in full.
    pub focus: Focus,
    /// Link every node to its own diagram, not only the unfocused ones.
    pub link_all: bool,
}

impl DiagramRequest {
    /// Every request for a partitioned workspace, in report order.
    #[must_use]
    pub fn all(workspace: &Workspace, partition: &Partition) -> Vec<Self> {
        let mut requests = vec![Self {
            title: "Monorepo".to_string(),
            filename_base: ALL_FILENAME.to_string(),
            filter: workspace.names(),
            focus: Focus::All,
            link_all: true,
        }];

        requests.extend(partition.grouped.iter().map(|(group, filter)| Self {
            title: format!("{group} (grouped)"),
            filename_base: group_filename(group),
            filter: filter.clone(),
            focus: Focus::All,
            link_all: false,
        }));

        requests.extend(partition.ungrouped.iter().map(|(name, filter)| Self {
            title: name.clone(),
            filename_base: package_filename(name),
            filter: filter.clone(),
            focus: Focus::Package(name.clone()),
            link_all: false,
        }));

        requests
    }

    /// Request for a group key, or failing that a package name. A grouped
    /// package gets its own reach with itself in focus.
    #[must_use]
    pub fn for_name(workspace: &Workspace, partition: &Partition, name: &str) -> Option<Self> {
        if let Some(filter) = partition.grouped.get(name) {
            return Some(Self {
                title: format!("{name} (grouped)"),
                filename_base: group_filename(name),
                filter: filter.clone(),
                focus: Focus::All,
                link_all: false,
            });
        }

        workspace.get(name).map(|package| Self {
            title: name.to_string(),
            filename_base: package_filename(name),
            filter: package.reach(),
            focus: Focus::Package(name.to_string()),
            link_all: false,
        })
    }
}

/// A laid-out diagram and its DOT text.
#[derive(Debug, Clone, Serialize)]
pub struct Diagram {
    /// What was asked for.
    pub request: DiagramRequest,
    /// Ordered, trimmed graph.
    pub graph: LayeredGraph,
    /// Graphviz source.
    #[serde(skip)]
    pub dot: String,
}

/// Every diagram of a workspace plus the legend.
#[derive(Debug, Clone)]
pub struct Report {
    partition: Partition,
    diagrams: Vec<Diagram>,
    legend: String,
}

impl Report {
    /// Paint and partition `workspace`, then lay out every diagram.
    ///
    /// # Errors
    ///
    /// Propagates layering errors.
    pub fn build(workspace: &mut Workspace, config: &CategoryConfig) -> Result<Self> {
        config.paint(workspace);
        let partition = split_graphs(workspace, config);

        let diagrams = DiagramRequest::all(workspace, &partition)
            .into_iter()
            .map(|request| {
                let interesting = |name: &str| request.focus.is_interesting(name);
                let graph = order_and_trim(&request.filter, workspace.packages(), interesting)?;
                let dot = dot::package_graph(&graph, workspace.packages(), interesting, request.link_all);
                Ok::<_, Error>(Diagram {
                    request,
                    graph,
                    dot,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            partition,
            diagrams,
            legend: legend::legend(&config.rules),
        })
    }

    /// Filter sets the diagrams were built from.
    #[must_use]
    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// Diagrams in report order.
    #[must_use]
    pub fn diagrams(&self) -> &[Diagram] {
        &self.diagrams
    }

    /// Legend DOT text.
    #[must_use]
    pub fn legend(&self) -> &str {
        &self.legend
    }

    /// Write the legend and every diagram as `.dot` files.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the directory or a file cannot be written.
    pub async fn write_dot(&self, out_dir: &Path) -> Result<Vec<PathBuf>> {
        tokio::fs::create_dir_all(out_dir).await?;

        let mut written = Vec::with_capacity(self.diagrams.len() + 1);
        for (base, text) in self.sources() {
            let path = out_dir.join(format!("{base}.dot"));
            tokio::fs::write(&path, text).await?;
            written.push(path);
        }
        Ok(written)
    }

    /// Write `.dot` files, render every diagram concurrently, and write
    /// `index.html`. Returns the path of `index.html`.
    ///
    /// # Errors
    ///
    /// Returns the first I/O or render failure.
    pub async fn write(&self, out_dir: &Path, renderer: &dyn Renderer) -> Result<PathBuf> {
        self.write_dot(out_dir).await?;

        try_join_all(self.sources().map(|(base, text)| async move {
            renderer.render(text, out_dir, base).await?;
            info!(diagram = %base, "Rendered");
            Ok::<_, Error>(())
        }))
        .await?;

        let mut sections = vec![html::section(None, LEGEND_FILENAME)];
        sections.extend(
            self.diagrams
                .iter()
                .map(|diagram| html::section(Some(&diagram.request.title), &diagram.request.filename_base)),
        );

        let index = out_dir.join("index.html");
        tokio::fs::write(&index, html::document(&sections)).await?;
        Ok(index)
    }

    fn sources(&self) -> impl Iterator<Item = (&str, &str)> {
        std::iter::once((LEGEND_FILENAME, self.legend.as_str())).chain(
            self.diagrams
                .iter()
                .map(|diagram| (diagram.request.filename_base.as_str(), diagram.dot.as_str())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::{CategoryRule, GroupRule, MatcherChain};
    use crate::domain::Package;

    fn workspace() -> Workspace {
        Workspace::new(
            Package::new("root", ""),
            vec![
                Package::new("app", "apps/app").declaring(["ui", "util"]),
                Package::new("ui", "libs/ui").declaring(["util"]),
                Package::new("util", "libs/util"),
            ],
        )
        .unwrap()
    }

    fn config() -> CategoryConfig {
        CategoryConfig::new(
            vec![
                CategoryRule::new("libs")
                    .with_matches("^(ui|util)$")
                    .unwrap()
                    .with_group(GroupRule::Named("core".into()))
                    .with_fill("#ffee00"),
            ],
            MatcherChain::default(),
        )
    }

    #[test]
    fn requests_come_in_report_order() {
        let mut ws = workspace();
        let report = Report::build(&mut ws, &config()).unwrap();

        let bases: Vec<&str> = report
            .diagrams()
            .iter()
            .map(|diagram| diagram.request.filename_base.as_str())
            .collect();
        assert_eq!(bases, ["group__ALL", "group__core", "package__app"]);
        assert_eq!(report.diagrams()[1].request.title, "core (grouped)");
    }

    #[test]
    fn build_paints_and_links_packages() {
        let mut ws = workspace();
        let report = Report::build(&mut ws, &config()).unwrap();

        assert_eq!(ws.get("ui").unwrap().fill.as_deref(), Some("#ffee00"));
        assert_eq!(ws.get("ui").unwrap().filename_base, "group__core");

        let all = &report.diagrams()[0];
        assert_eq!(all.graph.order, ["app", "ui", "util"]);
        assert!(all.dot.contains(r#"URL = "group__core.svg""#));
    }

    #[test]
    fn for_name_prefers_groups_then_packages() {
        let mut ws = workspace();
        let partition = split_graphs(&mut ws, &config());

        let group = DiagramRequest::for_name(&ws, &partition, "core").unwrap();
        assert_eq!(group.filename_base, "group__core");
        assert_eq!(group.focus, Focus::All);

        let package = DiagramRequest::for_name(&ws, &partition, "ui").unwrap();
        assert_eq!(package.focus, Focus::Package("ui".into()));
        assert_eq!(package.filter.len(), 3);

        assert!(DiagramRequest::for_name(&ws, &partition, "nope").is_none());
    }

    #[test]
    fn group_diagram_keeps_edges_between_neighbours() {
        let mut ws = Workspace::new(
            Package::new("root", ""),
            vec![
                Package::new("app", "apps/app").declaring(["core-a", "util"]),
                Package::new("core-a", "libs/core-a").declaring(["util"]),
                Package::new("util", "libs/util"),
            ],
        )
        .unwrap();
        let config = CategoryConfig::new(
            vec![
                CategoryRule::new("core")
                    .with_matches("^core-")
                    .unwrap()
                    .with_group(GroupRule::Flag(true)),
            ],
            MatcherChain::default(),
        );
        let report = Report::build(&mut ws, &config).unwrap();

        let core = report
            .diagrams()
            .iter()
            .find(|diagram| diagram.request.filename_base == "group__core")
            .unwrap();
        assert_eq!(core.request.focus, Focus::All);
        assert_eq!(core.request.filter.len(), 3);

        let util = core.graph.id_of("util").unwrap();
        assert!(core.graph.children_of("app").unwrap().contains(util));
        assert!(!core.dot.contains("URL"));
    }
}
