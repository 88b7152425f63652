//! `Source` objects

use once_cell::unsync::OnceCell;

use crate::date::{DateRange, SourceDate};
use crate::utils::nfc;

/// Link from a source to a repository holding it, with the call number the
/// repository files it under
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepositoryCitation {
  pub repository_id: String,
  pub call_number: String,
}

/// An archival source record
#[derive(Clone, Debug, Default)]
pub struct Source {
  id: String,
  title: String,
  citations: Vec<RepositoryCitation>,
  dates: Vec<SourceDate>,
  date_range: OnceCell<Option<DateRange>>,
}

impl Source {
  pub fn new(id: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      ..Default::default()
    }
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn title(&self) -> &str {
    &self.title
  }

  pub fn set_title(&mut self, title: impl Into<String>) {
    self.title = title.into();
  }

  /// Cite a repository. Call numbers are stored NFC normalised so that equal
  /// looking segments end up in the same category.
  pub fn add_citation(&mut self, repository_id: impl Into<String>, call_number: &str) {
    self.citations.push(RepositoryCitation {
      repository_id: repository_id.into(),
      call_number: nfc(call_number.trim()),
    });
  }

  pub fn citations(&self) -> &[RepositoryCitation] {
    &self.citations
  }

  pub fn cites_repository(&self, repository_id: &str) -> bool {
    self.citations.iter().any(|c| c.repository_id == repository_id)
  }

  /// Call number under the given repository, or under the first cited one.
  /// Empty when there is none.
  pub fn call_number(&self, repository_id: Option<&str>) -> &str {
    let citation = match repository_id {
      Some(id) => self.citations.iter().find(|c| c.repository_id == id),
      None => self.citations.first(),
    };
    citation.map(|c| c.call_number.as_str()).unwrap_or("")
  }

  pub fn add_date(&mut self, date: SourceDate) {
    self.dates.push(date);
    self.date_range = OnceCell::new();
  }

  pub fn dates(&self) -> &[SourceDate] {
    &self.dates
  }

  /// Range over all dates of this source, worked out on first use
  pub fn date_range(&self) -> Option<&DateRange> {
    self.date_range.get_or_init(|| DateRange::from_dates(&self.dates)).as_ref()
  }
}

/// A repository (archive) holding sources
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Repository {
  pub id: String,
  pub name: String,
}

impl Repository {
  pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      name: name.into(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn call_number_per_repository() {
    let mut s = Source::new("S1");
    s.add_citation("R1", " A/1 ");
    s.add_citation("R2", "B-2");
    assert_eq!(s.call_number(None), "A/1");
    assert_eq!(s.call_number(Some("R2")), "B-2");
    assert_eq!(s.call_number(Some("R3")), "");
    assert!(s.cites_repository("R1"));
  }

  #[test]
  fn date_range_follows_added_dates() {
    let mut s = Source::new("S1");
    assert_eq!(s.date_range(), None);
    s.add_date(SourceDate::year(1905));
    s.add_date(SourceDate::year(1900));
    assert_eq!(s.date_range(), Some(&DateRange::years(1900, 1905)));
  }
}
