//! Building the call number hierarchy of a repository
//!
//! The delimiter specification is parsed once, then every source of the
//! repository is filed into one tree and date ranges are aggregated over it.

use std::borrow::Cow;

use itertools::Itertools;
use log::{debug, info};
use thiserror::Error;

use crate::category::{CallNumberCategory, DegenerateMatch, SourceDates};
use crate::config::Config;
use crate::constants::{DEFAULT_CATEGORY, DEFAULT_DELIMITER, NO_CALL_NUMBER};
use crate::delimiter::{DelimiterError, DelimiterExpression, DelimiterExpressionParser, ParsedDelimiters};
use crate::source::Repository;
use crate::sources::Sources;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum HierarchyError {
  #[error("{}", .0.iter().join("\n"))]
  Delimiters(Vec<DelimiterError>),
}

/// Replace call numbers the delimiters cannot cut with reserved category
/// names:
///
/// * an empty call number goes to the "no call number" category
/// * a call number no alternative matches is prefixed with the "default
///   category" name
pub fn substitute_call_number<'a>(call_number: &'a str, alternatives: &[DelimiterExpression]) -> Cow<'a, str> {
  if call_number.is_empty() {
    Cow::Owned(format!("{NO_CALL_NUMBER}{DEFAULT_DELIMITER}"))
  } else if !alternatives.iter().any(|a| a.is_match(call_number)) {
    Cow::Owned(format!("{DEFAULT_CATEGORY}{DEFAULT_DELIMITER}{call_number}"))
  } else {
    Cow::Borrowed(call_number)
  }
}

/// File `(source id, raw call number)` pairs into a new tree and aggregate
/// the date ranges. Returns the root and any degenerate matches met on the
/// way.
pub fn build_hierarchy<'a, D: SourceDates + ?Sized>(
  sources: impl IntoIterator<Item = (&'a str, &'a str)>,
  alternatives: Vec<DelimiterExpression>,
  dates: &D,
) -> (CallNumberCategory, Vec<DegenerateMatch>) {
  let mut root = CallNumberCategory::new_root(alternatives);
  let mut warnings = Vec::new();
  for (source_id, call_number) in sources {
    let call_number = substitute_call_number(call_number, root.delimiter_alternatives());
    if let Some(degenerate) = root.insert(source_id, &call_number) {
      warnings.push(degenerate);
    }
  }
  root.aggregate_dates(dates);
  (root, warnings)
}

/// A finished tree together with what is needed to present it
#[derive(Clone, Debug)]
pub struct BuiltHierarchy {
  pub root: CallNumberCategory,
  pub repository: Option<Repository>,
  pub warnings: Vec<DegenerateMatch>,
}

impl BuiltHierarchy {
  /// Title of the finding aid: the repository name, or its id if unnamed
  pub fn title(&self) -> String {
    match &self.repository {
      Some(r) if !r.name.is_empty() => r.name.clone(),
      Some(r) => r.id.clone(),
      None => "All repositories".into(),
    }
  }
}

pub struct RepositoryHierarchy<'a> {
  config: &'a Config,
  delimiters: ParsedDelimiters,
}

impl<'a> RepositoryHierarchy<'a> {
  pub fn new(config: &'a Config) -> Self {
    let delimiters = DelimiterExpressionParser::new(config.separator).parse(&config.delimiter);
    Self { config, delimiters }
  }

  pub fn delimiters(&self) -> &ParsedDelimiters {
    &self.delimiters
  }

  /// Errors that stop the build. Unless partial delimiters are allowed, any
  /// refused alternative blocks it even if others are valid.
  pub fn blocking_errors(&self) -> Option<&[DelimiterError]> {
    let blocked = if self.config.allow_partial_delimiters {
      self.delimiters.expressions.is_empty()
    } else {
      self.delimiters.has_errors()
    };
    if blocked {
      Some(&self.delimiters.errors)
    } else {
      None
    }
  }

  pub fn build(&self, sources: &Sources) -> Result<BuiltHierarchy, HierarchyError> {
    if let Some(errors) = self.blocking_errors() {
      return Err(HierarchyError::Delimiters(errors.to_vec()));
    }

    let repository_id = self.config.repository.as_deref();
    let repository = match repository_id {
      Some(id) => Some(sources.repository(id).cloned().unwrap_or_else(|| Repository::new(id, ""))),
      None => None,
    };

    info!(
      "Building hierarchy for {} with delimiters '{}'",
      repository_id.unwrap_or("all repositories"),
      self.delimiters.patterns().iter().join("', '")
    );

    let held: Vec<(&str, &str)> = sources
      .held_by(repository_id)
      .map(|s| (s.id(), s.call_number(repository_id)))
      .collect();
    debug!("{} sources to file", held.len());

    let (mut root, warnings) = build_hierarchy(held, self.delimiters.expressions.clone(), sources);
    if self.config.sort {
      root.sort_natural();
    }
    Ok(BuiltHierarchy {
      root,
      repository,
      warnings,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  use crate::config::OptionSource;
  use crate::date::DateRange;
  use crate::source::Source;

  fn alternatives(patterns: &[&str]) -> Vec<DelimiterExpression> {
    patterns.iter().map(|p| DelimiterExpression::new(p).unwrap()).collect()
  }

  #[test]
  fn substitution() {
    let alts = alternatives(&["/"]);
    assert_eq!(
      substitute_call_number("", &alts),
      format!("{NO_CALL_NUMBER}{DEFAULT_DELIMITER}")
    );
    assert_eq!(
      substitute_call_number("Box 1", &alts),
      format!("{DEFAULT_CATEGORY}{DEFAULT_DELIMITER}Box 1")
    );
    assert_eq!(substitute_call_number("A/1", &alts), "A/1");
  }

  #[test]
  fn unmatched_call_numbers_share_the_default_category() {
    let dates: HashMap<String, DateRange> = HashMap::new();
    let (root, warnings) = build_hierarchy(
      vec![("s1", "Box 1"), ("s2", "Box 2"), ("s3", "A/1")],
      alternatives(&["/"]),
      &dates,
    );
    assert!(warnings.is_empty());
    let default = root
      .sub_category(&format!("{DEFAULT_CATEGORY}{DEFAULT_DELIMITER}"))
      .unwrap();
    assert_eq!(default.truncated_call_number("s1"), Some("Box 1"));
    assert_eq!(default.truncated_call_number("s2"), Some("Box 2"));
    assert_eq!(root.sub_categories().count(), 2);
  }

  fn sources() -> Sources {
    let mut sources = Sources::new();
    sources.add_repository(Repository::new("R1", "City Archive"));
    let mut s1 = Source::new("S1");
    s1.add_citation("R1", "A/2");
    let mut s2 = Source::new("S2");
    s2.add_citation("R1", "A/10");
    let mut s3 = Source::new("S3");
    s3.add_citation("R2", "Z/1");
    sources.add_source(s1);
    sources.add_source(s2);
    sources.add_source(s3);
    sources
  }

  #[test]
  fn strict_by_default() {
    let mut config = Config::default();
    config.set_option("delimiter", "/;[", OptionSource::CommandLine).unwrap();
    let builder = RepositoryHierarchy::new(&config);
    assert_eq!(builder.delimiters().patterns(), vec!["/"]);
    match builder.build(&sources()) {
      Err(HierarchyError::Delimiters(errors)) => {
        assert_eq!(errors, vec![DelimiterError::InvalidPattern("[".into())])
      }
      Ok(_) => panic!("build should be blocked"),
    }
  }

  #[test]
  fn partial_delimiters_when_allowed() {
    let mut config = Config::default();
    config.set_option("delimiter", "/;[", OptionSource::CommandLine).unwrap();
    config.allow_partial_delimiters = true;
    let built = RepositoryHierarchy::new(&config).build(&sources()).unwrap();
    assert_eq!(built.root.count_sources(), 3);
  }

  #[test]
  fn repository_filter_and_sort() {
    let mut config = Config::default();
    config.delimiter = "/".into();
    config.repository = Some("R1".into());
    let built = RepositoryHierarchy::new(&config).build(&sources()).unwrap();
    assert_eq!(built.title(), "City Archive");
    assert_eq!(built.root.count_sources(), 2);
    let a: Vec<_> = built.root.sub_category("A/").unwrap().sources().collect();
    assert_eq!(a, vec!["S1", "S2"]);
  }

  #[test]
  fn error_message_lists_every_problem() {
    let err = HierarchyError::Delimiters(vec![
      DelimiterError::InvalidPattern("[".into()),
      DelimiterError::NoValidPattern,
    ]);
    assert_eq!(
      err.to_string(),
      "Regular expression not accepted: [\nNo valid delimiter or valid regular expression for delimiter found."
    );
  }
}
