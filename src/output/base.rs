//! Base of the finding-aid writers

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use log::{debug, info};

use crate::category::CallNumberCategory;
use crate::config::Config;
use crate::date::DateRange;
use crate::hierarchy::BuiltHierarchy;
use crate::sources::Sources;

/// Everything a writer reads: the built tree, the sources it was built from
/// and the display options
#[derive(Clone, Copy)]
pub struct OutputContext<'a> {
  pub hierarchy: &'a BuiltHierarchy,
  pub sources: &'a Sources,
  pub config: &'a Config,
}

impl<'a> OutputContext<'a> {
  pub fn new(hierarchy: &'a BuiltHierarchy, sources: &'a Sources, config: &'a Config) -> Self {
    Self {
      hierarchy,
      sources,
      config,
    }
  }

  pub fn root(&self) -> &'a CallNumberCategory {
    &self.hierarchy.root
  }

  /// Category name or call number as shown to readers
  pub fn label(&self, name: &str) -> String {
    self.config.labels.display(name)
  }

  /// Title of a source, empty when titles are switched off or unknown
  pub fn source_title(&self, source_id: &str) -> &'a str {
    if !self.config.show_titles {
      return "";
    }
    self.sources.source(source_id).map(|s| s.title()).unwrap_or("")
  }

  /// Date range of a source, `None` when dates are switched off
  pub fn source_dates(&self, source_id: &str) -> Option<&'a DateRange> {
    if !self.config.show_dates {
      return None;
    }
    self.sources.source(source_id).and_then(|s| s.date_range())
  }

  /// Date range of a category, `None` when dates are switched off
  pub fn category_dates<'c>(&self, category: &'c CallNumberCategory) -> Option<&'c DateRange> {
    category.date_range().filter(|_| self.config.show_dates)
  }

  /// Displayed rest of a source's call number within `category`, empty when
  /// switched off
  pub fn truncated_call_number(&self, category: &CallNumberCategory, source_id: &str) -> String {
    if !self.config.show_truncated_call_numbers {
      return String::new();
    }
    category
      .truncated_call_number(source_id)
      .map(|c| self.label(c))
      .unwrap_or_default()
  }
}

/// A finding-aid format
pub trait Output {
  /// Format name used in log messages
  fn name(&self) -> &'static str;

  /// Render the whole finding aid
  fn render(&self, ctx: &OutputContext<'_>) -> anyhow::Result<String>;

  /// Render and write to `target`, or to STDOUT when it is `None` or `-`
  fn output(&self, ctx: &OutputContext<'_>, target: Option<&Path>) -> anyhow::Result<()> {
    debug!("Preparing final output using the {} writer", self.name());
    let data = self.render(ctx)?;
    let mut writer = output_target(target)?;
    info!("Writing '{}' with encoding 'UTF-8'", target_name(target));
    writer.write_all(data.as_bytes())?;
    writer.flush()?;
    Ok(())
  }
}

fn is_stdout(target: Option<&Path>) -> bool {
  target.map_or(true, |t| t == Path::new("-"))
}

fn target_name(target: Option<&Path>) -> String {
  match target {
    Some(t) if !is_stdout(target) => t.display().to_string(),
    _ => "STDOUT".into(),
  }
}

/// Open the output target of a writer
pub fn output_target(target: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
  match target {
    Some(file) if !is_stdout(target) => {
      let f = File::create(file).with_context(|| format!("Cannot write output file '{}'", file.display()))?;
      Ok(Box::new(BufWriter::new(f)))
    }
    _ => Ok(Box::new(io::stdout().lock())),
  }
}
