//! Graphviz DOT text.

use crate::domain::Package;
use crate::layering::LayeredGraph;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::collections::BTreeMap;

/// Characters left alone when a link is written into a node's `URL`.
const URL_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b';')
    .remove(b',')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b'#');

/// Quote `value` as a DOT string.
#[must_use]
pub fn quote(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n");
    format!("\"{escaped}\"")
}

/// Ordered attribute list of a node, edge or graph statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(&'static str, String)>);

impl Attributes {
    /// Empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Quoted, escaped string value.
    #[must_use]
    pub fn text(mut self, name: &'static str, value: &str) -> Self {
        self.0.push((name, quote(value)));
        self
    }

    /// Bare keyword value such as a shape or style.
    #[must_use]
    pub fn keyword(mut self, name: &'static str, value: &str) -> Self {
        self.0.push((name, value.to_string()));
        self
    }

    /// Quoted color.
    #[must_use]
    pub fn color(mut self, name: &'static str, value: &str) -> Self {
        self.0.push((name, format!("\"{value}\"")));
        self
    }

    /// Quoted, percent-encoded `URL`.
    #[must_use]
    pub fn url(mut self, value: &str) -> Self {
        let encoded = utf8_percent_encode(value, URL_SAFE).to_string();
        self.0.push(("URL", quote(&encoded)));
        self
    }

    /// `name = value` pairs joined by `sep`.
    #[must_use]
    pub fn render(&self, sep: &str) -> String {
        self.0
            .iter()
            .map(|(name, value)| format!("{name} = {value}"))
            .collect::<Vec<_>>()
            .join(sep)
    }
}

/// `id [ attributes ];`
#[must_use]
pub fn declare(id: &str, attributes: &Attributes) -> String {
    format!("{id} [ {} ];", attributes.render(", "))
}

/// Shared node attributes: filled, monospace, 12pt.
#[must_use]
pub fn node_defaults() -> String {
    declare(
        "node",
        &Attributes::new()
            .keyword("style", "filled")
            .text("fontname", "Monospace")
            .text("fontsize", "12"),
    )
}

/// True when text on `color` (`#rrggbb`) should be white.
///
/// Unparseable colors count as light.
#[must_use]
pub fn is_dark(color: &str) -> bool {
    let Ok(rgb) = u32::from_str_radix(color.trim_start_matches('#'), 16) else {
        return false;
    };
    let r = (rgb >> 16) & 0xff;
    let g = (rgb >> 8) & 0xff;
    let b = rgb & 0xff;
    (r * 299 + g * 587 + b * 114) / 1000 < 128
}

/// Font color readable on `fill`.
#[must_use]
pub fn font_color(fill: Option<&str>) -> &'static str {
    if fill.is_some_and(is_dark) {
        "#ffffff"
    } else {
        "#000000"
    }
}

/// Node declaration for a package-like box.
#[must_use]
pub fn package_node(
    id: &str,
    label: &str,
    fill: Option<&str>,
    is_private: bool,
    url: Option<&str>,
) -> String {
    let mut attributes = Attributes::new().text("label", label);
    if let Some(fill) = fill {
        attributes = attributes.color("fillcolor", fill);
    }
    attributes = attributes
        .color("fontcolor", font_color(fill))
        .keyword("shape", if is_private { "doubleoctagon" } else { "octagon" });
    if let Some(url) = url {
        attributes = attributes.url(url);
    }
    declare(id, &attributes)
}

/// Full `strict digraph` for a layered filter set.
///
/// Nodes that are not interesting link to their own diagram; with
/// `link_all` every node does.
#[must_use]
pub fn package_graph<F>(
    graph: &LayeredGraph,
    packages: &BTreeMap<String, Package>,
    interesting: F,
    link_all: bool,
) -> String
where
    F: Fn(&str) -> bool,
{
    let init = format!("  {}\n  rankdir=LR", node_defaults());

    let declarations = graph
        .entries()
        .filter_map(|(id, name)| {
            let package = packages.get(name)?;
            let url = (link_all || !interesting(name))
                .then(|| format!("{}.svg", package.filename_base));
            Some(format!(
                "  {}",
                package_node(
                    id,
                    &package.label(),
                    package.fill.as_deref(),
                    package.is_private,
                    url.as_deref(),
                )
            ))
        })
        .collect::<Vec<_>>()
        .join("\n");

    let connectors = graph
        .entries()
        .filter_map(|(id, _)| {
            let children = graph.edges.get(id).filter(|children| !children.is_empty())?;
            let targets = children.iter().map(String::as_str).collect::<Vec<_>>().join(" ");
            Some(format!("  {id} -> {{ {targets} }}"))
        })
        .collect::<Vec<_>>()
        .join("\n");

    let body = [init, declarations, connectors]
        .into_iter()
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("strict digraph {{\n{body}\n}}")
}
