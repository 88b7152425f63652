//! GEDCOM data source driver
//!
//! Only the records the hierarchy needs are read: `SOUR` records with their
//! title, repository citations (`REPO` with `CALN`) and dates, and `REPO`
//! records with their name. Everything else is skipped.

use lazy_regex::regex_captures;
use log::{debug, trace, warn};

use crate::date::format::parse_date;
use crate::input::InputError;
use crate::source::{Repository, Source};
use crate::sources::Sources;

#[derive(Clone, Copy, Debug)]
struct Line<'a> {
  level: usize,
  xref: &'a str,
  tag: &'a str,
  value: &'a str,
}

/// Main data extraction routine
pub fn extract_sources(text: &str) -> Result<Sources, InputError> {
  let lines = parse_lines(text)?;
  let mut sources = Sources::new();

  let starts: Vec<usize> = lines
    .iter()
    .enumerate()
    .filter(|(_, l)| l.level == 0)
    .map(|(i, _)| i)
    .collect();
  for (n, &start) in starts.iter().enumerate() {
    let end = starts.get(n + 1).copied().unwrap_or(lines.len());
    let record = &lines[start..end];
    match record[0].tag {
      "SOUR" => {
        if let Some(source) = source_record(record) {
          sources.add_source(source);
        }
      }
      "REPO" => {
        if let Some(repository) = repository_record(record) {
          sources.add_repository(repository);
        }
      }
      _ => trace!("Skipping {} record", record[0].tag),
    }
  }
  Ok(sources)
}

fn parse_lines(text: &str) -> Result<Vec<Line<'_>>, InputError> {
  let mut lines = Vec::new();
  let mut previous_level = 0;
  for (n, raw) in text.trim_start_matches('\u{feff}').lines().enumerate() {
    if raw.trim().is_empty() {
      continue;
    }
    let (_, level, xref, tag, value) = regex_captures!(r"^\s*(\d+)\s+(?:(@[^@]+@)\s+)?(\w+)(?: (.*))?$", raw)
      .ok_or_else(|| InputError::GedcomLine {
        line: n + 1,
        text: raw.into(),
      })?;
    let level: usize = level.parse().map_err(|_| InputError::GedcomLine {
      line: n + 1,
      text: raw.into(),
    })?;
    if level > previous_level + 1 {
      return Err(InputError::GedcomLevel {
        line: n + 1,
        from: previous_level,
        to: level,
      });
    }
    previous_level = level;
    lines.push(Line { level, xref, tag, value });
  }
  Ok(lines)
}

fn strip_xref(pointer: &str) -> &str {
  pointer.trim().trim_matches('@')
}

struct PendingCitation {
  repository_id: String,
  call_number: Option<String>,
}

fn source_record(record: &[Line<'_>]) -> Option<Source> {
  let id = strip_xref(record[0].xref);
  if id.is_empty() {
    warn!("Skipping SOUR record without identifier");
    return None;
  }
  debug!("Parsing GEDCOM source '{}'", id);
  let mut source = Source::new(id);
  let mut title = String::new();
  let mut citations: Vec<PendingCitation> = Vec::new();
  // tags from the record line down to the current line
  let mut path: Vec<&str> = vec![record[0].tag];

  for line in &record[1..] {
    path.truncate(line.level);
    let parent = path.last().copied().unwrap_or("");
    match (line.level, parent, line.tag) {
      (1, _, "TITL") => title = line.value.into(),
      // titles are shown on one line
      (2, "TITL", "CONC") => title.push_str(line.value),
      (2, "TITL", "CONT") => {
        title.push(' ');
        title.push_str(line.value);
      }
      (1, _, "REPO") => citations.push(PendingCitation {
        repository_id: strip_xref(line.value).into(),
        call_number: None,
      }),
      (2, "REPO", "CALN") => {
        if let Some(citation) = citations.last_mut() {
          citation.call_number.get_or_insert_with(|| line.value.into());
        }
      }
      // change dates are record metadata
      (_, _, "DATE") if !path.contains(&"CHAN") => {
        if let Some(date) = parse_date(line.value) {
          source.add_date(date);
        }
      }
      _ => {}
    }
    path.push(line.tag);
  }

  source.set_title(title.trim());
  for citation in citations {
    source.add_citation(citation.repository_id, citation.call_number.as_deref().unwrap_or(""));
  }
  Some(source)
}

fn repository_record(record: &[Line<'_>]) -> Option<Repository> {
  let id = strip_xref(record[0].xref);
  if id.is_empty() {
    warn!("Skipping REPO record without identifier");
    return None;
  }
  let name = record
    .iter()
    .find(|l| l.level == 1 && l.tag == "NAME")
    .map(|l| l.value.trim())
    .unwrap_or("");
  Some(Repository::new(id, name))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::date::DateRange;

  const GEDCOM: &str = "0 HEAD
1 CHAR UTF-8
0 @R1@ REPO
1 NAME City Archive
0 @S1@ SOUR
1 TITL Parish register
2 CONC  of St Mary
1 REPO @R1@
2 CALN Fonds A/Series 1/Item 1
2 CALN ignored
1 DATA
2 EVEN BIRT
3 DATE FROM 1900 TO 1905
1 CHAN
2 DATE 1 JAN 2020
0 @S2@ SOUR
1 TITL Undated letters
1 REPO @R1@
0 TRLR
";

  #[test]
  fn reads_sources_and_repositories() {
    let sources = extract_sources(GEDCOM).unwrap();
    assert_eq!(sources.repository("R1").unwrap().name, "City Archive");

    let s1 = sources.source("S1").unwrap();
    assert_eq!(s1.title(), "Parish register of St Mary");
    assert_eq!(s1.call_number(Some("R1")), "Fonds A/Series 1/Item 1");
    assert_eq!(s1.date_range(), Some(&DateRange::years(1900, 1905)));

    let s2 = sources.source("S2").unwrap();
    assert_eq!(s2.call_number(Some("R1")), "");
    assert!(s2.cites_repository("R1"));
    assert_eq!(s2.date_range(), None);
  }

  #[test]
  fn rejects_level_jumps() {
    let err = extract_sources("0 @S1@ SOUR\n2 TITL x\n").unwrap_err();
    assert!(matches!(err, InputError::GedcomLevel { line: 2, from: 0, to: 2 }));
  }

  #[test]
  fn rejects_garbage() {
    assert!(matches!(
      extract_sources("0 HEAD\nnot gedcom\n"),
      Err(InputError::GedcomLine { line: 2, .. })
    ));
  }

  #[test]
  fn handles_crlf_and_bom() {
    let sources = extract_sources("\u{feff}0 @S1@ SOUR\r\n1 TITL T\r\n").unwrap();
    assert_eq!(sources.source("S1").unwrap().title(), "T");
  }
}
