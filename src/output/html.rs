//! XHTML finding aid

use xmltree::Element;

use crate::category::CallNumberCategory;
use crate::element_builder::{write_html, Builder, ElementBuilder};
use crate::output::base::{Output, OutputContext};

const STYLE: &str = r###"
body { font-family: sans-serif; }
div.category { margin-left: 1.5em; }
table { border-collapse: collapse; margin: 0.5em 0; }
th, td { border: 1px solid #999; padding: 0.2em 0.5em; text-align: left; }
span.dates { color: #555; font-weight: normal; }
"###;

/// Class for HTML output
pub struct Html;

impl Output for Html {
  fn name(&self) -> &'static str {
    "html"
  }

  fn render(&self, ctx: &OutputContext<'_>) -> anyhow::Result<String> {
    let root = ctx.root();
    let title = ctx.hierarchy.title();
    let head = Element::builder("head")
      .append(Element::builder("meta").attr("charset", "UTF-8"))
      .child_text("title", &title)
      .child_text("style", STYLE);
    let body = Element::builder("body")
      .append(heading(1, &title, ctx.category_dates(root).map(ToString::to_string)))
      .optional_append(source_table(ctx, root))
      .append_all(root.sub_categories().map(|c| category_section(ctx, c)));
    let html = Element::builder("html")
      .append(head)
      .append(body)
      .build();
    write_html(&html, ctx.config.output_indent)
  }
}

fn heading(level: usize, text: &str, dates: Option<String>) -> ElementBuilder {
  let h = Element::builder(&format!("h{}", level.min(6))).text(text);
  match dates {
    Some(dates) => h
      .text(" ")
      .append(Element::builder("span").attr("class", "dates").text(format!("[{dates}]"))),
    None => h,
  }
}

fn category_section(ctx: &OutputContext<'_>, category: &CallNumberCategory) -> ElementBuilder {
  Element::builder("div")
    .attr("class", "category")
    .attr("id", category.id())
    .append(heading(
      category.hierarchy_level(),
      &ctx.label(category.name()),
      ctx.category_dates(category).map(ToString::to_string),
    ))
    .optional_append(source_table(ctx, category))
    .append_all(category.sub_categories().map(|c| category_section(ctx, c)))
}

/// Table of the sources filed directly in `category`, if there are any
fn source_table(ctx: &OutputContext<'_>, category: &CallNumberCategory) -> Option<ElementBuilder> {
  let rows: Vec<ElementBuilder> = category
    .sources()
    .map(|source_id| {
      Element::builder("tr")
        .child_text("td", source_id)
        .child_text("td", ctx.truncated_call_number(category, source_id))
        .child_text("td", ctx.source_title(source_id))
        .child_text(
          "td",
          ctx.source_dates(source_id).map(ToString::to_string).unwrap_or_default(),
        )
    })
    .collect();
  if rows.is_empty() {
    return None;
  }
  let header = Element::builder("tr")
    .child_text("th", "Source")
    .child_text("th", "Call number")
    .child_text("th", "Title")
    .child_text("th", "Dates");
  Some(
    Element::builder("table")
      .append(Element::builder("thead").append(header))
      .append(Element::builder("tbody").append_all(rows)),
  )
}
