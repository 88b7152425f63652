//! Plain text tree view

use std::fmt::Write;

use crate::category::CallNumberCategory;
use crate::output::base::{Output, OutputContext};

/// Indented tree of categories and the sources filed in them
pub struct Text;

impl Output for Text {
  fn name(&self) -> &'static str {
    "text"
  }

  fn render(&self, ctx: &OutputContext<'_>) -> anyhow::Result<String> {
    let mut out = String::new();
    let root = ctx.root();
    write!(out, "{}", ctx.hierarchy.title())?;
    if let Some(dates) = ctx.category_dates(root) {
      write!(out, " [{}]", dates)?;
    }
    writeln!(out)?;
    write_category_body(&mut out, ctx, root, 1)?;
    Ok(out)
  }
}

fn write_category_body(
  out: &mut String,
  ctx: &OutputContext<'_>,
  category: &CallNumberCategory,
  depth: usize,
) -> std::fmt::Result {
  let indent = ctx.config.output_indent.unit().repeat(depth);
  for source_id in category.sources() {
    write!(out, "{indent}[{source_id}]")?;
    let truncated = ctx.truncated_call_number(category, source_id);
    if !truncated.is_empty() {
      write!(out, " {truncated}")?;
    }
    let title = ctx.source_title(source_id);
    if !title.is_empty() {
      write!(out, " {title}")?;
    }
    if let Some(dates) = ctx.source_dates(source_id) {
      write!(out, " [{dates}]")?;
    }
    writeln!(out)?;
  }
  for child in category.sub_categories() {
    write!(out, "{indent}{}", ctx.label(child.name()))?;
    if let Some(dates) = ctx.category_dates(child) {
      write!(out, " [{dates}]")?;
    }
    writeln!(out)?;
    write_category_body(out, ctx, child, depth + 1)?;
  }
  Ok(())
}
