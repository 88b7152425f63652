//! Finding-aid writers

use std::path::Path;

use crate::OutputFormat;

pub mod base;
pub mod dot;
pub mod html;
pub mod text;
pub mod xml;

pub use base::{output_target, Output, OutputContext};

/// The writer for an output format
pub fn writer(format: OutputFormat) -> Box<dyn Output> {
  match format {
    OutputFormat::Text => Box::new(text::Text),
    OutputFormat::Xml => Box::new(xml::Xml),
    OutputFormat::Html => Box::new(html::Html),
    OutputFormat::Dot => Box::new(dot::Dot),
  }
}

/// Render `ctx` in its configured format to `target`
pub fn write_output(ctx: &OutputContext<'_>, target: Option<&Path>) -> anyhow::Result<()> {
  writer(ctx.config.output_format).output(ctx, target)
}
