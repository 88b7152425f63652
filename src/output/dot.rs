//! GraphViz .dot output
//!
//! Categories with sub categories become clusters, leaf categories become
//! nodes. Sources are nodes linked from the category they are filed in.

use std::fmt::Write;

use crate::category::CallNumberCategory;
use crate::output::base::{Output, OutputContext};

/// Class for GraphViz .dot output
pub struct Dot;

const HEAD: &str = r###"digraph Repohier {
  compound = true;
  edge [ arrowhead=open ];
  graph [ style=filled, rankdir=LR ];
  node [
    fontsize=10,
    fillcolor=white,
    style=filled,
    shape=box ];
"###;

const CATEGORY_COLOUR: &str = "#a0d0ff";
const CLUSTER_COLOUR: &str = "#fce3fa";
const SOURCE_COLOUR: &str = "#fdffd9";

impl Output for Dot {
  fn name(&self) -> &'static str {
    "dot"
  }

  fn render(&self, ctx: &OutputContext<'_>) -> anyhow::Result<String> {
    let mut graph = String::from(HEAD);
    let mut graph_edges = String::new();
    let root = ctx.root();

    writeln!(
      graph,
      "  \"{}\" [ label=\"{}\", fillcolor=\"{CATEGORY_COLOUR}\" ]",
      root.id(),
      escape(&ctx.hierarchy.title())
    )?;
    sources(ctx, root, 2, &mut graph, &mut graph_edges)?;
    for child in root.sub_categories() {
      category(ctx, child, root.id(), 2, &mut graph, &mut graph_edges)?;
    }

    write!(graph, "\n{graph_edges}}}\n")?;
    Ok(graph)
  }
}

fn escape(s: &str) -> String {
  s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn category_label(ctx: &OutputContext<'_>, category: &CallNumberCategory) -> String {
  let mut label = escape(&ctx.label(category.name()));
  if let Some(dates) = ctx.category_dates(category) {
    label.push_str(&format!("\\n{dates}"));
  }
  label
}

fn category(
  ctx: &OutputContext<'_>,
  category: &CallNumberCategory,
  parent_id: &str,
  indent: usize,
  graph: &mut String,
  graph_edges: &mut String,
) -> std::fmt::Result {
  let i = " ".repeat(indent);
  let id = category.id();
  writeln!(
    graph,
    "{i}\"{id}\" [ label=\"{}\", fillcolor=\"{CATEGORY_COLOUR}\", tooltip=\"{}\" ]",
    category_label(ctx, category),
    escape(&ctx.label(category.full_name()))
  )?;
  writeln!(graph_edges, "  \"{parent_id}\" -> \"{id}\"")?;

  if !category.has_sub_categories() {
    return sources(ctx, category, indent, graph, graph_edges);
  }

  writeln!(graph, "{i}subgraph \"cluster_{id}\" {{")?;
  let iin = " ".repeat(indent + 2);
  writeln!(graph, "{iin}label=\"{}\";", category_label(ctx, category))?;
  writeln!(graph, "{iin}fontsize=\"10\";")?;
  writeln!(graph, "{iin}fontname=serif;")?;
  writeln!(graph, "{iin}fillcolor=\"{CLUSTER_COLOUR}\";")?;
  writeln!(graph)?;
  sources(ctx, category, indent + 2, graph, graph_edges)?;
  for child in category.sub_categories() {
    self::category(ctx, child, id, indent + 2, graph, graph_edges)?;
  }
  writeln!(graph, "{i}}}")?;
  writeln!(graph)
}

fn sources(
  ctx: &OutputContext<'_>,
  category: &CallNumberCategory,
  indent: usize,
  graph: &mut String,
  graph_edges: &mut String,
) -> std::fmt::Result {
  let i = " ".repeat(indent);
  for source_id in category.sources() {
    let node = category.source_node_id(source_id);
    let mut label = escape(source_id);
    let truncated = ctx.truncated_call_number(category, source_id);
    if !truncated.is_empty() {
      label.push_str(&format!("\\n{}", escape(&truncated)));
    }
    writeln!(
      graph,
      "{i}\"{node}\" [ label=\"{label}\", fillcolor=\"{SOURCE_COLOUR}\", tooltip=\"{}\" ]",
      escape(ctx.source_title(source_id))
    )?;
    writeln!(graph_edges, "  \"{}\" -> \"{node}\"", category.id())?;
  }
  Ok(())
}
