//! EAD finding aid
//!
//! Categories become nested numbered components: a category at hierarchy
//! level `L` is written as `c{L-1}` and the sources filed in it as `c{L}`.
//! Past `c12` the unnumbered `<c>` is used.

use log::debug;
use uuid::Uuid;
use xmltree::Element;

use crate::category::CallNumberCategory;
use crate::constants::{EAD_LEVELS, EAD_MAX_NUMBERED_LEVEL};
use crate::date::DateRange;
use crate::element_builder::{write_document, Builder, ElementBuilder};
use crate::output::base::{Output, OutputContext};

/// Class for EAD XML output
pub struct Xml;

impl Output for Xml {
  fn name(&self) -> &'static str {
    "xml"
  }

  fn render(&self, ctx: &OutputContext<'_>) -> anyhow::Result<String> {
    let root = ctx.root();
    let eadid = Uuid::new_v4().to_string();
    debug!("Generated eadid '{}'", eadid);

    let header = Element::builder("eadheader").append(Element::builder("eadid").text(eadid)).append(
      Element::builder("filedesc").append(Element::builder("titlestmt").child_text("titleproper", ctx.hierarchy.title())),
    );

    let did = Element::builder("did")
      .child_text("unittitle", ctx.hierarchy.title())
      .optional_append(ctx.category_dates(root).map(unitdate))
      .optional_append(ctx.hierarchy.repository.as_ref().map(|r| {
        Element::builder("repository").child_text("corpname", if r.name.is_empty() { &r.id } else { &r.name })
      }));

    let dsc = Element::builder("dsc").append_all(components(ctx, root));

    let ead = Element::builder("ead")
      .comment(" Generated by repohier ")
      .append(header)
      .append(
        Element::builder("archdesc")
          .attr("level", "fonds")
          .append(did)
          .append(dsc),
      )
      .build();
    write_document(&ead, ctx.config.output_indent)
  }
}

fn component_name(depth: usize) -> String {
  if depth <= EAD_MAX_NUMBERED_LEVEL {
    format!("c{:02}", depth)
  } else {
    "c".into()
  }
}

fn category_level(hierarchy_level: usize) -> &'static str {
  u32::try_from(hierarchy_level - 1)
    .ok()
    .and_then(|l| EAD_LEVELS.get(&l))
    .copied()
    .unwrap_or("file")
}

fn unitdate(range: &DateRange) -> ElementBuilder {
  Element::builder("unitdate").attr("normal", range.iso()).text(range.to_string())
}

/// Components for the sources and sub categories of `category`
fn components(ctx: &OutputContext<'_>, category: &CallNumberCategory) -> Vec<ElementBuilder> {
  let depth = category.hierarchy_level();
  let sources = category.sources().map(|source_id| {
    let did = Element::builder("did")
      .optional_child_text("unitid", &ctx.truncated_call_number(category, source_id))
      .optional_child_text("unittitle", ctx.source_title(source_id))
      .optional_append(ctx.source_dates(source_id).map(unitdate));
    Element::builder(&component_name(depth))
      .attr("id", category.source_node_id(source_id))
      .attr("level", "item")
      .append(did)
  });
  let children = category.sub_categories().map(|child| {
    let did = Element::builder("did")
      .child_text("unitid", ctx.label(child.name()))
      .optional_append(ctx.category_dates(child).map(unitdate));
    Element::builder(&component_name(child.hierarchy_level() - 1))
      .attr("id", child.id())
      .attr("level", category_level(child.hierarchy_level()))
      .append(did)
      .append_all(components(ctx, child))
  });
  sources.chain(children).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn component_names() {
    assert_eq!(component_name(1), "c01");
    assert_eq!(component_name(12), "c12");
    assert_eq!(component_name(13), "c");
  }

  #[test]
  fn levels() {
    assert_eq!(category_level(2), "fonds");
    assert_eq!(category_level(3), "series");
    assert_eq!(category_level(9), "file");
  }
}
