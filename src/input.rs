//! Data source drivers

use std::path::Path;

use anyhow::Context;
use log::info;
use thiserror::Error;

use crate::sources::Sources;
use crate::InputFormat;

pub mod file;

/// Malformed data files
#[derive(Debug, Error)]
pub enum InputError {
  #[error("line {line}: cannot parse GEDCOM line '{text}'")]
  GedcomLine { line: usize, text: String },
  #[error("line {line}: level jumps from {from} to {to}")]
  GedcomLevel { line: usize, from: usize, to: usize },
  #[error("invalid XML: {0}")]
  Xml(#[from] roxmltree::Error),
  #[error("<{element}> without an 'id' attribute")]
  MissingId { element: String },
  #[error("unexpected root element <{0}>, expected <sources>")]
  XmlRoot(String),
}

/// Read all sources and repositories of a data file
pub fn load(path: &Path, format: InputFormat) -> anyhow::Result<Sources> {
  info!("Found {} data file '{}'", format, path.display());
  let text = std::fs::read_to_string(path).with_context(|| format!("Cannot read data file '{}'", path.display()))?;
  let sources = match format {
    InputFormat::Gedcom => file::gedcom::extract_sources(&text),
    InputFormat::Xml => file::xml::extract_sources(&text),
  }
  .with_context(|| format!("Cannot parse data file '{}'", path.display()))?;
  info!(
    "Read {} sources and {} repositories",
    sources.len(),
    sources.repositories().count()
  );
  sources.check_repositories();
  Ok(sources)
}
