use xmltree::{Element, EmitterConfig, XMLNode};

use crate::OutputIndent;

pub trait Builder {
  fn builder(name: &str) -> ElementBuilder;
}

impl Builder for Element {
  fn builder(name: &str) -> ElementBuilder {
    ElementBuilder(Element::new(name))
  }
}

pub struct ElementBuilder(Element);

impl ElementBuilder {
  pub fn text(mut self, text: impl Into<String>) -> Self {
    self.0.children.push(XMLNode::Text(text.into()));
    self
  }

  pub fn comment(mut self, text: impl Into<String>) -> Self {
    self.0.children.push(XMLNode::Comment(text.into()));
    self
  }

  /// Sets an attribute.
  pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> ElementBuilder {
    self.0.attributes.insert(name.into(), value.into());
    self
  }

  pub fn optional_attr(self, name: impl Into<String>, value: Option<impl Into<String>>) -> ElementBuilder {
    match value {
      Some(value) => self.attr(name, value),
      None => self,
    }
  }

  /// Appends `<name>text</name>`.
  pub fn child_text(self, name: &str, text: impl Into<String>) -> ElementBuilder {
    self.append(Element::builder(name).text(text))
  }

  /// Appends `<name>text</name>` unless `text` is empty.
  pub fn optional_child_text(self, name: &str, text: &str) -> ElementBuilder {
    if text.is_empty() {
      self
    } else {
      self.child_text(name, text)
    }
  }

  /// Appends anything implementing `Into<XMLNode>` into the tree.
  pub fn append(mut self, node: impl Into<XMLNode>) -> ElementBuilder {
    self.0.children.push(node.into());
    self
  }

  pub fn optional_append(mut self, node: Option<impl Into<XMLNode>>) -> ElementBuilder {
    if let Some(node) = node {
      self.0.children.push(node.into());
    }
    self
  }

  /// Appends an iterator of things implementing `Into<XMLNode>` into the tree.
  pub fn append_all<T: Into<XMLNode>>(
    mut self,
    iter: impl IntoIterator<Item = T>,
  ) -> ElementBuilder {
    for node in iter {
      self.0.children.push(node.into());
    }
    self
  }

  /// Builds the `Element`.
  pub fn build(self) -> Element {
    self.0
  }

  pub fn to_node(self) -> XMLNode {
    XMLNode::Element(self.0)
  }
}

impl From<ElementBuilder> for XMLNode {
  fn from(b: ElementBuilder) -> Self {
    b.to_node()
  }
}

fn emitter(indent: OutputIndent) -> EmitterConfig {
  EmitterConfig::new().perform_indent(true).indent_string(indent.unit())
}

fn write_with(root: &Element, config: EmitterConfig) -> anyhow::Result<String> {
  let mut buf = Vec::new();
  root.write_with_config(&mut buf, config)?;
  Ok(String::from_utf8(buf)?)
}

/// Serialise an XML document, indented with `indent`
pub fn write_document(root: &Element, indent: OutputIndent) -> anyhow::Result<String> {
  write_with(root, emitter(indent))
}

/// Serialise an XHTML document. Empty elements keep their end tags and the
/// XML declaration is replaced by the HTML doctype.
pub fn write_html(root: &Element, indent: OutputIndent) -> anyhow::Result<String> {
  let config = emitter(indent)
    .write_document_declaration(false)
    .normalize_empty_elements(false);
  Ok(format!("<!DOCTYPE html>\n{}", write_with(root, config)?))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn builds_nested_elements() {
    let el = Element::builder("did")
      .attr("id", "c1")
      .optional_attr("normal", None::<String>)
      .child_text("unitid", "A/")
      .optional_child_text("unittitle", "")
      .build();
    assert_eq!(el.attributes.get("id").map(String::as_str), Some("c1"));
    assert!(el.attributes.get("normal").is_none());
    assert_eq!(el.children.len(), 1);
    assert_eq!(
      el.get_child("unitid").and_then(|e| e.get_text()).as_deref(),
      Some("A/")
    );
  }

  #[test]
  fn writes_html() {
    let el = Element::builder("p").append(Element::builder("td")).build();
    let text = write_html(&el, OutputIndent::Spaces(2)).unwrap();
    assert!(text.starts_with("<!DOCTYPE html>\n<p>"));
    assert!(text.contains("<td></td>"));
    assert!(!text.contains("<?xml"));
  }
}
