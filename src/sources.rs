//! `Sources` objects

use indexmap::IndexMap;
use log::warn;

use crate::category::SourceDates;
use crate::date::DateRange;
use crate::source::{Repository, Source};

/// All sources and repositories read from a data file, in file order
#[derive(Clone, Debug, Default)]
pub struct Sources {
  sources: IndexMap<String, Source>,
  repositories: IndexMap<String, Repository>,
}

impl Sources {
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds a source. A second source with the same id replaces the first
  /// one in place.
  pub fn add_source(&mut self, source: Source) {
    if self.sources.contains_key(source.id()) {
      warn!("Duplicate source '{}', keeping the last one", source.id());
    }
    self.sources.insert(source.id().into(), source);
  }

  pub fn add_repository(&mut self, repository: Repository) {
    self.repositories.insert(repository.id.clone(), repository);
  }

  pub fn source(&self, id: &str) -> Option<&Source> {
    self.sources.get(id)
  }

  pub fn sources(&self) -> impl Iterator<Item = &Source> {
    self.sources.values()
  }

  pub fn repository(&self, id: &str) -> Option<&Repository> {
    self.repositories.get(id)
  }

  pub fn repositories(&self) -> impl Iterator<Item = &Repository> {
    self.repositories.values()
  }

  pub fn len(&self) -> usize {
    self.sources.len()
  }

  pub fn is_empty(&self) -> bool {
    self.sources.is_empty()
  }

  /// Sources held by a repository, or every source when `repository_id` is
  /// `None`
  pub fn held_by<'a>(&'a self, repository_id: Option<&'a str>) -> impl Iterator<Item = &'a Source> + 'a {
    self
      .sources
      .values()
      .filter(move |s| repository_id.map_or(true, |id| s.cites_repository(id)))
  }

  /// Warn about citations of repositories missing from the data
  pub fn check_repositories(&self) {
    for source in self.sources.values() {
      for citation in source.citations() {
        if !citation.repository_id.is_empty() && !self.repositories.contains_key(&citation.repository_id) {
          warn!(
            "Source '{}' cites unknown repository '{}'",
            source.id(),
            citation.repository_id
          );
        }
      }
    }
  }
}

impl SourceDates for Sources {
  fn source_date_range(&self, source_id: &str) -> Option<DateRange> {
    self.sources.get(source_id).and_then(|s| s.date_range().cloned())
  }
}
