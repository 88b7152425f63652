//! XML data source driver
//!
//! ```xml
//! <sources>
//!   <repository id="R1" name="City Archive"/>
//!   <source id="S1" repository="R1">
//!     <title>Parish register</title>
//!     <callnumber>Fonds A/Series 1</callnumber>
//!     <date>1900</date>
//!   </source>
//! </sources>
//! ```
//!
//! A `<callnumber>` may carry its own `repository` attribute, otherwise it
//! belongs to the repository of its `<source>`.

use log::{debug, trace};
use roxmltree::{Document, Node};

use crate::date::format::parse_date;
use crate::input::InputError;
use crate::source::{Repository, Source};
use crate::sources::Sources;

/// Main data extraction routine
pub fn extract_sources(text: &str) -> Result<Sources, InputError> {
  let doc = Document::parse(text)?;
  let root = doc.root_element();
  if root.tag_name().name() != "sources" {
    return Err(InputError::XmlRoot(root.tag_name().name().into()));
  }

  let mut sources = Sources::new();
  for node in root.children().filter(Node::is_element) {
    match node.tag_name().name() {
      "repository" => sources.add_repository(repository_element(node)?),
      "source" => sources.add_source(source_element(node)?),
      other => trace!("Skipping <{}>", other),
    }
  }
  Ok(sources)
}

fn required_id(node: Node<'_, '_>) -> Result<String, InputError> {
  match node.attribute("id").map(str::trim) {
    Some(id) if !id.is_empty() => Ok(id.into()),
    _ => Err(InputError::MissingId {
      element: node.tag_name().name().into(),
    }),
  }
}

/// Text content exactly as written
fn raw_text_of(node: Node<'_, '_>) -> String {
  node
    .descendants()
    .filter(Node::is_text)
    .filter_map(|n| n.text())
    .collect()
}

/// Text content with whitespace runs collapsed to single spaces
fn text_of(node: Node<'_, '_>) -> String {
  raw_text_of(node).split_whitespace().collect::<Vec<_>>().join(" ")
}

fn repository_element(node: Node<'_, '_>) -> Result<Repository, InputError> {
  let id = required_id(node)?;
  let name = match node.attribute("name") {
    Some(name) => name.trim().into(),
    None => text_of(node),
  };
  Ok(Repository::new(id, name))
}

fn source_element(node: Node<'_, '_>) -> Result<Source, InputError> {
  let id = required_id(node)?;
  debug!("Parsing XML source '{}'", id);
  let mut source = Source::new(&id);
  let default_repository = node.attribute("repository").unwrap_or("").trim();
  let mut cited = false;

  for child in node.children().filter(Node::is_element) {
    match child.tag_name().name() {
      "title" => source.set_title(&text_of(child)),
      "callnumber" => {
        let repository = child.attribute("repository").map(str::trim).unwrap_or(default_repository);
        // delimiters may depend on inner whitespace
        source.add_citation(repository, &raw_text_of(child));
        cited = true;
      }
      "date" => {
        if let Some(date) = parse_date(&text_of(child)) {
          source.add_date(date);
        }
      }
      other => trace!("Skipping <{}> in source '{}'", other, id),
    }
  }

  if !cited && !default_repository.is_empty() {
    source.add_citation(default_repository, "");
  }
  Ok(source)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::date::DateRange;

  #[test]
  fn reads_sources_and_repositories() {
    let sources = extract_sources(
      r#"<?xml version="1.0"?>
      <sources>
        <repository id="R1" name="City Archive"/>
        <repository id="R2">Diocesan
          Library</repository>
        <source id="S1" repository="R1">
          <title>Parish register</title>
          <callnumber>Fonds A/Series 1</callnumber>
          <callnumber repository="R2">MS 12</callnumber>
          <date>1900</date>
          <date>BET 1890 AND 1895</date>
        </source>
        <source id="S2" repository="R1"/>
      </sources>"#,
    )
    .unwrap();

    assert_eq!(sources.repository("R2").unwrap().name, "Diocesan Library");
    let s1 = sources.source("S1").unwrap();
    assert_eq!(s1.title(), "Parish register");
    assert_eq!(s1.call_number(Some("R1")), "Fonds A/Series 1");
    assert_eq!(s1.call_number(Some("R2")), "MS 12");
    assert_eq!(s1.date_range(), Some(&DateRange::years(1890, 1900)));

    let s2 = sources.source("S2").unwrap();
    assert!(s2.cites_repository("R1"));
    assert_eq!(s2.call_number(Some("R1")), "");
  }

  #[test]
  fn call_numbers_keep_inner_whitespace() {
    let sources = extract_sources(
      r#"<sources>
        <source id="S1" repository="R1"><callnumber> A  B/1&#9;2 </callnumber></source>
      </sources>"#,
    )
    .unwrap();
    assert_eq!(sources.source("S1").unwrap().call_number(Some("R1")), "A  B/1\t2");
  }

  #[test]
  fn requires_ids() {
    assert!(matches!(
      extract_sources("<sources><source/></sources>"),
      Err(InputError::MissingId { element }) if element == "source"
    ));
  }

  #[test]
  fn checks_root() {
    assert!(matches!(
      extract_sources("<entries/>"),
      Err(InputError::XmlRoot(root)) if root == "entries"
    ));
  }
}
