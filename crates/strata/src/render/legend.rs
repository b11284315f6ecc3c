//! Legend diagram.
//!
//! One oval per category rule, arranged in a near-square grid held together
//! by invisible edges, plus a published/private sample pair joined by a
//! visible "Depends on" edge.

use super::dot::{Attributes, declare, font_color, node_defaults, package_node};
use crate::categories::CategoryRule;

fn legend_id(index: usize) -> String {
    format!("legend_{index:02}")
}

/// Number of ovals per grid row for `count` rules.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn row_length(count: usize) -> usize {
    let shorter = ((count as f64).sqrt().round() as usize).max(1);
    ((count as f64 / shorter as f64).round() as usize).max(1)
}

fn category_node(id: &str, rule: &CategoryRule) -> String {
    let mut attributes = Attributes::new().text("label", rule.legend_text());
    if let Some(fill) = &rule.fill {
        attributes = attributes.color("fillcolor", fill);
    }
    attributes = attributes
        .color("fontcolor", font_color(rule.fill.as_deref()))
        .keyword("shape", "oval");
    declare(id, &attributes)
}

/// DOT text of the legend for `rules`.
#[must_use]
pub fn legend(rules: &[CategoryRule]) -> String {
    let init = [
        "label = \"Legend\";".to_string(),
        node_defaults(),
        declare(
            "edge",
            &Attributes::new()
                .keyword("style", "invis")
                .text("fontname", "Monospace"),
        ),
    ]
    .join("\n");

    let categories = rules
        .iter()
        .enumerate()
        .map(|(index, rule)| category_node(&legend_id(index), rule))
        .collect::<Vec<_>>()
        .join("\n");

    let samples = [
        package_node("legend_published", "Published", None, false, None),
        package_node("legend_private", "Private", None, true, None),
    ]
    .join("\n");

    let step = row_length(rules.len());
    let grid = (0..rules.len())
        .filter(|index| index + step < rules.len())
        .map(|index| format!("{} -> {};", legend_id(index), legend_id(index + step)))
        .collect::<Vec<_>>()
        .join("\n");

    let depends_on = format!(
        "legend_private -> legend_published  [ {} ]",
        Attributes::new()
            .keyword("style", "solid")
            .text("label", "Depends on")
            .render(", ")
    );

    let body = [init, categories, samples, grid, depends_on]
        .into_iter()
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "digraph {{\nfontname = \"Monospace\";\ncolor = black;\nrankdir = \"LR\";\n\nsubgraph clusterColors {{\n{body}\n}}\n}}"
    )
}
